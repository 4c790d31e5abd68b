//! Domain types used throughout the configurator.
//!
//! This module defines:
//!
//! - diamond vocabulary (`Shape`, `AdvancedKind`)
//! - tier classification and panel visibility (`Tier`, `Panel`, `PrecisionSet`)
//! - attribute identifiers (`AttributeKey`)

pub mod types;

pub use types::*;
