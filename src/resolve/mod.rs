//! Version resolution subsystem.
//!
//! # Data Flow
//! ```text
//! vantage path ("github.com/user/repo.v1.0")
//!     → candidates.rs (possible versions, longest first)
//!     → fetcher.rs (upstream info/refs for each candidate's base path)
//!     → resolver.rs (first candidate whose refs contain
//!                    refs/heads/<v> or refs/tags/<v>)
//!     → ResolvedVersion (advertisement, matched ref, base path)
//! ```
//!
//! # Design Decisions
//! - Stateless: nothing survives the request that triggered it
//! - Candidates are fetched one at a time; first match wins
//! - Upstream failures for a candidate only skip that candidate

pub mod candidates;
pub mod fetcher;
pub mod resolver;

pub use candidates::{possible_versions, VersionCandidate};
pub use fetcher::{FetchError, HttpRefsFetcher, RefsFetcher};
pub use resolver::{ResolveError, ResolvedVersion, VersionResolver};
