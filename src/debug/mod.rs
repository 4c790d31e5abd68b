//! Debug bundle writer for inspecting a selection and its last quote.

use std::fs::{create_dir_all, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::configurator::Configurator;
use crate::error::AppError;
use crate::quote::Quote;
use crate::report::{format_quote, format_selection, format_visualizer};

pub fn write_debug_bundle(cfg: &Configurator, last_quote: Option<&Quote>) -> Result<PathBuf, AppError> {
    write_debug_bundle_in(Path::new("debug"), cfg, last_quote)
}

pub fn write_debug_bundle_in(
    dir: &Path,
    cfg: &Configurator,
    last_quote: Option<&Quote>,
) -> Result<PathBuf, AppError> {
    create_dir_all(dir).map_err(|e| AppError::new(4, format!("Failed to create debug dir: {e}")))?;

    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!(
        "diamond_debug_{}_{}_{ts}.md",
        cfg.model().shape.symbol(),
        cfg.tier().display_name()
    ));

    let payload = cfg.payload().to_json()?;

    let mut body = String::new();
    body.push_str("# diamond debug bundle\n");
    body.push_str(&format!("- generated: {}\n", Local::now().to_rfc3339()));
    body.push_str(&format!("- tier: {}\n", cfg.tier().display_name()));
    body.push_str(&format!("- precision: {:?}\n", cfg.precision()));
    if let Some(update) = cfg.last_tier_update() {
        body.push_str(&format!(
            "- last tier update: {} -> {} (crossed: {}, swapped: {:?})\n",
            update.previous.display_name(),
            update.tier.display_name(),
            update.crossed(),
            update.swapped
        ));
    }

    body.push_str("\n## Selection\n```\n");
    body.push_str(&format_selection(cfg));
    body.push_str("```\n\n## Attributes\n");
    body.push_str("| key | value | previous | label |\n|---|---|---|---|\n");
    for attr in cfg.model().iter() {
        body.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            attr.name(),
            attr.format_value(attr.value()),
            attr.format_value(attr.previous()),
            attr.display_label().replace('\n', " ")
        ));
    }
    body.push_str("\n## Preview\n```\n");
    body.push_str(&format_visualizer(cfg.visualizer()));
    body.push_str("```\n\n## Submission payload\n```json\n");
    body.push_str(&payload);
    body.push_str("\n```\n");

    body.push_str("\n## Last quote\n");
    match last_quote {
        Some(quote) => {
            body.push_str("```\n");
            body.push_str(&format_quote(quote));
            body.push_str("```\n");
        }
        None => body.push_str("(none)\n"),
    }

    let mut file = File::create(&path)
        .map_err(|e| AppError::new(4, format!("Failed to create debug file: {e}")))?;
    file.write_all(body.as_bytes())
        .map_err(|e| AppError::new(4, format!("Failed to write debug bundle: {e}")))?;

    tracing::info!(path = %path.display(), "wrote debug bundle");
    Ok(path)
}
