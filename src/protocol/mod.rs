//! Git smart-HTTP wire handling.
//!
//! # Data Flow
//! ```text
//! upstream info/refs body (bytes)
//!     → pktline.rs (split into length-prefixed packets)
//!     → advertisement.rs (ref records: hash + name, with byte offsets)
//!     → rewrite of the default-branch hash, every other byte untouched
//! ```
//!
//! # Design Decisions
//! - Refs are matched against decoded records, never raw substrings
//! - Rewrites patch bytes in place; length prefixes are never recomputed
//!   since object ids are fixed width

pub mod advertisement;
pub mod pktline;

pub use advertisement::{rewrite_default_branch, Advertisement, AdvertisementError, RefRecord};
pub use pktline::{FramingError, Packet, PacketKind};
