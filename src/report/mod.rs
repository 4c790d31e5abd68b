//! Plain-text rendering of the selection, preview, and quote.
//!
//! Formatting lives in one place so the CLI output and the debug bundle stay
//! consistent, and so the state types stay free of presentation code.

use crate::binding::LabelTick;
use crate::configurator::{Configurator, Slider};
use crate::domain::AdvancedKind;
use crate::quote::{PriceSummary, Quote};
use crate::visualizer::{short_label, VisualizerState};

/// One-line label of whatever attribute `slider` is bound to.
pub fn slider_label(cfg: &Configurator, slider: Slider) -> String {
    match cfg.slider(slider).key() {
        Some(key) => cfg.model().display_label(key).replace('\n', " "),
        None => "-".to_string(),
    }
}

/// ASCII slider track with the handle at `fraction` (`[0, 1]`).
pub fn slider_track(fraction: f64, width: usize) -> String {
    if width < 3 {
        return "o".to_string();
    }
    let inner = width - 2;
    let pos = ((inner - 1) as f64 * fraction.clamp(0.0, 1.0)).round() as usize;
    let mut out = String::with_capacity(width);
    out.push('|');
    for i in 0..inner {
        out.push(if i == pos { 'o' } else { '-' });
    }
    out.push('|');
    out
}

/// Step labels laid out under a track of `width` columns.
///
/// Each label is centred over its step. The end labels always win; interior
/// labels that would overlap a neighbour are dropped. Grouped labels show
/// only their first line.
pub fn tick_line(ticks: &[LabelTick], width: usize) -> String {
    let Some(last) = ticks.len().checked_sub(1).filter(|&n| n > 0) else {
        return String::new();
    };
    let place = |i: usize| -> Option<(usize, Vec<char>)> {
        let text: Vec<char> = short_label(&ticks[i].label).chars().collect();
        if text.is_empty() || text.len() > width {
            return None;
        }
        let centre = ((width - 1) as f64 * i as f64 / last as f64).round() as usize;
        let start = centre.saturating_sub(text.len() / 2).min(width - text.len());
        Some((start, text))
    };

    let mut cells = vec![' '; width];
    let mut next_free = 0usize;
    let end = place(last);
    let limit = end.as_ref().map_or(width + 1, |(start, _)| *start);
    for i in 0..last {
        let Some((start, text)) = place(i) else { continue };
        if start < next_free || start + text.len() >= limit {
            continue;
        }
        cells[start..start + text.len()].copy_from_slice(&text);
        next_free = start + text.len() + 1;
    }
    if let Some((start, text)) = end {
        cells[start..start + text.len()].copy_from_slice(&text);
    }
    cells.into_iter().collect::<String>().trim_end().to_string()
}

/// Summary of the current selection, tier, and visible panels.
pub fn format_selection(cfg: &Configurator) -> String {
    let mut out = String::new();
    let model = cfg.model();

    out.push_str("=== diamond - selection ===\n");
    out.push_str(&format!("Shape: {}\n", model.shape.display_name()));
    out.push_str(&format!(
        "Tier: {} | precision: {:?}\n",
        cfg.tier().display_name(),
        cfg.precision()
    ));

    let panels = cfg
        .visible_panels()
        .iter()
        .map(|p| p.title())
        .collect::<Vec<_>>()
        .join(", ");
    out.push_str(&format!("Panels: {panels}\n\n"));

    for slider in Slider::ALL {
        if !cfg.is_visible(slider.panel()) {
            continue;
        }
        let Some(control) = cfg.slider(slider).control() else {
            continue;
        };
        out.push_str(&format!(
            "{:<8} {} {}\n",
            slider.panel().title(),
            slider_track(control.fraction(), 24),
            slider_label(cfg, slider)
        ));
    }

    if cfg.is_visible(crate::domain::Panel::Advanced) {
        out.push_str("\nAdvanced:\n");
        for kind in AdvancedKind::ALL {
            out.push_str(&format!(
                "  {:<16} {}\n",
                kind.display_name(),
                model.advanced.label(kind)
            ));
        }
    }

    out
}

/// Visualizer parameters, one per line.
pub fn format_visualizer(state: &VisualizerState) -> String {
    let mut out = String::new();
    out.push_str(&format!("Preview ({:?}):\n", state.mode));
    out.push_str(&format!("- shape  : {} ({}, {})\n", state.shape_symbol, state.shape_image, state.color_image));
    out.push_str(&format!("- carat  : {}\n", state.carat_label));
    out.push_str(&format!(
        "- color  : {} (opacity {:.3})\n",
        state.color_label, state.color_opacity
    ));
    out.push_str(&format!(
        "- clarity: {} (opacity {:.3})\n",
        state.clarity_label, state.clarity_opacity
    ));
    out.push_str(&format!(
        "- scale  : {:.1}% (clarity {:.1}%)\n",
        state.background_scale_percent, state.clarity_scale_percent
    ));
    out
}

/// Price line, quote-form URL, and form fields.
pub fn format_quote(quote: &Quote) -> String {
    let mut out = String::new();
    match &quote.summary {
        PriceSummary::Range { .. } => out.push_str(&format!("Price range: {}\n", quote.price_range)),
        PriceSummary::NoMatch => out.push_str(&format!("No price: {}\n", quote.price_range)),
    }
    out.push_str(&format!("Quote form: {}\n", quote.url));
    out.push_str("Fields:\n");
    for (key, value) in quote.fields() {
        out.push_str(&format!("  {key:<20} {value}\n"));
    }
    out
}
