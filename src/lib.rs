//! Versioned vanity-path gateway for `go get`.
//!
//! Resolves paths like `github.com/user/repo.v1.2` to a branch or tag of the
//! upstream repository and serves a refs advertisement whose default branch
//! points at that ref.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod protocol;
pub mod resolve;
pub mod routing;

pub use config::GatewayConfig;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
