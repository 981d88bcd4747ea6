//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → matcher.rs (evaluate routes in order)
//!     → Return: GatewayRoute, or NotFound / MethodNotAllowed
//! ```
//!
//! # Design Decisions
//! - Repository paths contain slashes, so routes are matched by suffix
//!   on a single catch-all rather than by axum path segments
//! - First match wins; a path that matched with the wrong method
//!   yields 405 instead of 404

pub mod matcher;

pub use matcher::{match_route, route_label, GatewayRoute, RouteError};
