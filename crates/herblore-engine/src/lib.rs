//! # Herblore Engine
//!
//! Host layer for the herblore planner:
//! - Catalog asset loading and validation
//! - TOML configuration with name-based recipe selections and owned stock
//! - Plan reports for the command line

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod catalog_loader;
pub mod config;
pub mod report;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::catalog_loader::*;
    pub use crate::config::*;
    pub use crate::report::*;
}

pub use prelude::*;
