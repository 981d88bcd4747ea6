//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (x-request-id)
//!     → routing (which endpoint)
//!     → handlers.rs (resolve version, rewrite or redirect, render page)
//!     → response.rs (errors to status codes)
//!     → Send to client
//! ```

pub mod handlers;
pub mod pages;
pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestIdLayer, X_REQUEST_ID};
pub use response::GatewayError;
pub use server::{AppState, GatewayServer};
