//! `diamond-quote` library crate.
//!
//! The binary (`diamond`) is a thin wrapper around this library so that:
//!
//! - the configurator core is testable without a terminal
//! - the pricing service sits behind a trait and can be swapped in tests
//! - the TUI and the one-shot commands share one code path
//!
//! Data flows one way: slider drags update the `model`, listeners request a
//! refresh, the `tier` controller swaps color/clarity precision when the
//! carat crosses a cutoff, and the `visualizer` derives the preview. The
//! `quote` module captures the model, prices it, and builds the quote-form
//! URL.

pub mod app;
pub mod binding;
pub mod cli;
pub mod config;
pub mod configurator;
pub mod debug;
pub mod domain;
pub mod error;
pub mod logging;
pub mod model;
pub mod quote;
pub mod report;
pub mod tier;
pub mod tui;
pub mod visualizer;
