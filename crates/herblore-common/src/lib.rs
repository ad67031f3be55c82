//! # Herblore Common
//!
//! Common types shared by the herblore planner crates:
//! - ID types (ItemId, PageId)
//! - Version information for the catalog schema
//! - Resolution and catalog error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod ids;
pub mod version;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::ids::*;
    pub use crate::version::*;
}

pub use prelude::*;
