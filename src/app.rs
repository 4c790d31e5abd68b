//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and loads settings
//! - sets up logging
//! - builds a configurator from the selection flags
//! - prints previews, submits quotes, or launches the TUI

use clap::Parser;
use serde_json::json;

use crate::cli::{Command, EndpointArgs, QuoteArgs, SelectionArgs, TuiArgs};
use crate::config::Settings;
use crate::configurator::{Configurator, Slider};
use crate::domain::AdvancedKind;
use crate::error::AppError;
use crate::quote::{HttpPricingService, Quote, QuoteForm, QuoteSubmitter};

/// Entry point for the `diamond` binary.
pub fn run() -> Result<(), AppError> {
    // `diamond` and `diamond --pricing-url ...` behave like `diamond tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Preview(args) => handle_preview(args),
        Command::Quote(args) => handle_quote(args),
    }
}

fn settings_for(endpoints: &EndpointArgs, log_file: Option<&std::path::PathBuf>) -> Settings {
    Settings::from_env().with_overrides(
        endpoints.pricing_url.as_deref(),
        endpoints.form_url.as_deref(),
        log_file,
    )
}

fn handle_tui(args: TuiArgs) -> Result<(), AppError> {
    let settings = settings_for(&args.endpoints, args.log_file.as_ref());
    crate::logging::init_file(&settings.log_file)?;
    tracing::info!(pricing_url = %settings.pricing_url, "starting configurator");
    crate::tui::run(&settings)
}

fn handle_preview(args: SelectionArgs) -> Result<(), AppError> {
    crate::logging::init_stderr();
    let cfg = configurator_from_args(&args)?;

    if args.json {
        let doc = json!({
            "tier": cfg.tier(),
            "precision": cfg.precision(),
            "panels": cfg.visible_panels().iter().map(|p| p.title()).collect::<Vec<_>>(),
            "visualizer": cfg.visualizer(),
            "payload": cfg.payload(),
        });
        let text = serde_json::to_string_pretty(&doc)
            .map_err(|e| AppError::new(4, format!("Failed to encode preview: {e}")))?;
        println!("{text}");
        return Ok(());
    }

    println!("{}", crate::report::format_selection(&cfg));
    println!("{}", crate::report::format_visualizer(cfg.visualizer()));
    Ok(())
}

/// Quote form that prints the quote to stdout.
struct StdoutForm;

impl QuoteForm for StdoutForm {
    fn open(&mut self, quote: &Quote) {
        println!("{}", crate::report::format_quote(quote));
    }
}

fn handle_quote(args: QuoteArgs) -> Result<(), AppError> {
    crate::logging::init_stderr();
    let settings = settings_for(&args.endpoints, None);
    let cfg = configurator_from_args(&args.selection)?;

    println!("{}", crate::report::format_selection(&cfg));

    let service = HttpPricingService::new(&settings.pricing_url);
    tracing::info!(endpoint = service.endpoint(), form_url = %settings.form_url, "requesting quote");
    let submitter = QuoteSubmitter::new(service, &settings.form_url);
    submitter.submit(cfg.model(), &mut StdoutForm)?;
    Ok(())
}

/// Build a configurator and drive its sliders to the requested selection.
///
/// Carat goes first so the tier (and the color/clarity precision) is settled
/// before the grades are applied. Grades for hidden panels are ignored.
pub fn configurator_from_args(args: &SelectionArgs) -> Result<Configurator, AppError> {
    let mut cfg = Configurator::new()?;
    cfg.set_shape(args.shape);
    cfg.drag(Slider::Carat, args.carat)?;

    let grades = [
        (Slider::Color, args.color),
        (Slider::Clarity, args.clarity),
        (Slider::Cut, args.cut),
        (Slider::Quality, args.quality),
    ];
    for (slider, value) in grades {
        let Some(value) = value else { continue };
        if !cfg.is_visible(slider.panel()) {
            tracing::warn!(
                slider = slider.panel().title(),
                tier = cfg.tier().display_name(),
                "ignoring value for a panel hidden at this carat"
            );
            continue;
        }
        cfg.drag(slider, value)?;
    }

    let advanced = [
        (AdvancedKind::Fluorescence, args.fluorescence),
        (AdvancedKind::LaserDrilled, args.laser_drilled),
        (AdvancedKind::BrownTint, args.brown_tint),
        (AdvancedKind::FractureFilled, args.fracture_filled),
        (AdvancedKind::InclusionType, args.inclusion_type),
    ];
    for (kind, choice) in advanced {
        if choice.is_some() {
            cfg.select_advanced(kind, choice)?;
        }
    }

    Ok(cfg)
}

/// Rewrite argv so `diamond` defaults to `diamond tui`.
///
/// Rules:
/// - `diamond`                          -> `diamond tui`
/// - `diamond --pricing-url URL ...`    -> `diamond tui --pricing-url URL ...`
/// - `diamond --help/--version/-h`      -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "preview" | "quote");
    if is_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}
