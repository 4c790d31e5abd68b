//! Command-line parsing for the diamond configurator.
//!
//! Argument parsing stays here; `app` turns parsed arguments into a
//! `Configurator` and dispatches.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::Shape;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "diamond", version, about = "Diamond configurator and quote client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive configurator.
    Tui(TuiArgs),
    /// Print the tier, visible panels, and preview for a selection.
    Preview(SelectionArgs),
    /// Price a selection and print the quote-form URL.
    Quote(QuoteArgs),
}

/// Endpoint overrides shared by commands that talk to the pricing service.
#[derive(Debug, Args, Clone, Default)]
pub struct EndpointArgs {
    /// Pricing endpoint (overrides DIAMOND_PRICING_URL).
    #[arg(long, value_name = "URL")]
    pub pricing_url: Option<String>,

    /// Quote form URL (overrides DIAMOND_FORM_URL).
    #[arg(long, value_name = "URL")]
    pub form_url: Option<String>,
}

#[derive(Debug, Args, Clone, Default)]
pub struct TuiArgs {
    #[command(flatten)]
    pub endpoints: EndpointArgs,

    /// Write logs here instead of diamond.log.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// A diamond selection given on the command line.
///
/// Color and clarity are step indices in whichever precision set the carat
/// implies: 0-9 for large stones, 0-2 for medium ones.
#[derive(Debug, Args, Clone)]
pub struct SelectionArgs {
    #[arg(long, value_enum, default_value_t = Shape::Round)]
    pub shape: Shape,

    /// Carat weight (0.01 - 5.00).
    #[arg(short = 'c', long, default_value_t = 1.0)]
    pub carat: f64,

    /// Color step index.
    #[arg(long)]
    pub color: Option<f64>,

    /// Clarity step index.
    #[arg(long)]
    pub clarity: Option<f64>,

    /// Cut step index (0 = N/A .. 4 = Excellent).
    #[arg(long)]
    pub cut: Option<f64>,

    /// Small-stone quality index (0 = Mixed, 1 = Low, 2 = High).
    #[arg(long)]
    pub quality: Option<f64>,

    /// Fluorescence choice index (0 = N/A .. 4 = Very Strong).
    #[arg(long)]
    pub fluorescence: Option<usize>,

    /// Laser drilled choice index (0 = N/A, 1 = Yes).
    #[arg(long)]
    pub laser_drilled: Option<usize>,

    /// Brown tint choice index (0 = N/A, 1 = Yes).
    #[arg(long)]
    pub brown_tint: Option<usize>,

    /// Fracture filled choice index (0 = N/A, 1 = Yes).
    #[arg(long)]
    pub fracture_filled: Option<usize>,

    /// Inclusion type choice index (0 = N/A, 1 = Black Center, 2 = White Off Center).
    #[arg(long)]
    pub inclusion_type: Option<usize>,

    /// Print the preview as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct QuoteArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    #[command(flatten)]
    pub endpoints: EndpointArgs,
}
