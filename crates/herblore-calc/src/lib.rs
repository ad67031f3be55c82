//! # Herblore Calc
//!
//! Production planning for herblore potions.
//!
//! This crate provides:
//! - The immutable item/page/recipe catalog
//! - Owned-stock offsetting in dose-equivalents
//! - Yield, experience and tick modelling per recipe
//! - Recursive resolution of a target into materials, experience and ticks
//! - Discovery of pages that need a recipe selection

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod catalog;
pub mod inventory;
pub mod modifiers;
pub mod resolver;
pub mod yields;

#[cfg(test)]
mod test_support;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::catalog::*;
    pub use crate::inventory::*;
    pub use crate::modifiers::*;
    pub use crate::resolver::*;
    pub use crate::yields::*;
}

pub use prelude::*;
