//! Preview parameters derived from the attribute model.
//!
//! `render` is a pure function: it reads the model and returns a fresh
//! `VisualizerState`. Nothing here mutates attributes, and every render mode
//! produces a complete state.

use serde::Serialize;

use crate::domain::{AttributeKey, Tier};
use crate::model::AttributeModel;

/// Smallest background size, in percent, used for the lightest stone.
pub const SCALE_FLOOR_PERCENT: f64 = 14.0;

/// Extra background size added at maximum carat.
pub const SCALE_SPAN_PERCENT: f64 = 63.0;

/// Label shown in place of color/clarity for small stones.
pub const SUPPRESSED_LABEL: &str = "N/A";

/// Opacity used for both overlays when color/clarity are suppressed.
pub const SUPPRESSED_OPACITY: f64 = 0.5;

/// Which attribute precision the preview reflects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Full-precision color/clarity grades. Also the initial render.
    Full,
    /// Grouped color/clarity grades with their descriptors stripped.
    Coarse,
    /// Color/clarity not applicable.
    Suppressed,
}

impl RenderMode {
    pub fn for_tier(tier: Tier) -> Self {
        match tier {
            Tier::Small => RenderMode::Suppressed,
            Tier::Medium => RenderMode::Coarse,
            Tier::Large => RenderMode::Full,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualizerState {
    pub mode: RenderMode,
    pub shape_symbol: String,
    pub shape_image: String,
    pub color_image: String,
    pub carat_label: String,
    pub color_label: String,
    pub clarity_label: String,
    pub color_opacity: f64,
    pub clarity_opacity: f64,
    /// Background size of the shape and color overlays, in `[14, 77]`.
    pub background_scale_percent: f64,
    /// Background size of the clarity overlay (`background_scale_percent - 14`).
    pub clarity_scale_percent: f64,
}

/// Compute the preview for `model` in `mode`.
pub fn render(model: &AttributeModel, mode: RenderMode) -> VisualizerState {
    let (color_label, clarity_label, color_opacity, clarity_opacity) = match mode {
        RenderMode::Full => {
            let color = model.get(AttributeKey::Color);
            let clarity = model.get(AttributeKey::Clarity);
            (
                color.display_label(),
                clarity.display_label(),
                color.ratio(),
                clarity.ratio(),
            )
        }
        RenderMode::Coarse => {
            let color = model.get(AttributeKey::ColorMedium);
            let clarity = model.get(AttributeKey::ClarityMedium);
            (
                short_label(&color.display_label()).to_string(),
                short_label(&clarity.display_label()).to_string(),
                color.ratio(),
                clarity.ratio(),
            )
        }
        RenderMode::Suppressed => (
            SUPPRESSED_LABEL.to_string(),
            SUPPRESSED_LABEL.to_string(),
            SUPPRESSED_OPACITY,
            SUPPRESSED_OPACITY,
        ),
    };

    let carat = model.carat();
    let background_scale_percent = scale_percent(carat.value(), carat.max());
    let symbol = model.shape.symbol();

    VisualizerState {
        mode,
        shape_image: format!("{symbol}.svg"),
        color_image: format!("{symbol}_yellow.svg"),
        shape_symbol: symbol,
        carat_label: format!("{:.2}", carat.value()),
        color_label,
        clarity_label,
        color_opacity,
        clarity_opacity,
        background_scale_percent,
        clarity_scale_percent: background_scale_percent - SCALE_FLOOR_PERCENT,
    }
}

/// Render using the mode implied by `tier`.
pub fn render_for_tier(model: &AttributeModel, tier: Tier) -> VisualizerState {
    render(model, RenderMode::for_tier(tier))
}

/// Map a carat value onto the `[14, 77]` percent background scale.
pub fn scale_percent(carat: f64, carat_max: f64) -> f64 {
    if carat_max <= 0.0 {
        return SCALE_FLOOR_PERCENT;
    }
    let ratio = (carat / carat_max).clamp(0.0, 1.0);
    ratio * SCALE_SPAN_PERCENT + SCALE_FLOOR_PERCENT
}

/// Short form of a grouped grade label: the text before the first line break.
///
/// Grouped labels embed a descriptor on a second line
/// (`"G - D\n(colorless)"`). Labels without a line break are returned
/// unchanged, so a reworded catalogue degrades to showing the full text.
pub fn short_label(label: &str) -> &str {
    match label.split_once('\n') {
        Some((head, _)) => head,
        None => label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Shape;

    fn model() -> AttributeModel {
        AttributeModel::standard().unwrap()
    }

    #[test]
    fn full_mode_uses_value_over_max() {
        let state = render(&model(), RenderMode::Full);
        assert_eq!(state.color_label, "H");
        assert_eq!(state.clarity_label, "VS2");
        assert!((state.color_opacity - 5.0 / 9.0).abs() < 1e-12);
        assert!((state.color_opacity - 0.556).abs() < 1e-3);
        assert!((state.clarity_opacity - 4.0 / 9.0).abs() < 1e-12);
        assert_eq!(state.carat_label, "1.00");
    }

    #[test]
    fn coarse_mode_strips_descriptors_and_uses_coarse_max() {
        let mut m = model();
        m.set_value(AttributeKey::ColorMedium, 1.0);
        m.set_value(AttributeKey::ClarityMedium, 2.0);
        let state = render(&m, RenderMode::Coarse);
        assert_eq!(state.color_label, "K - H");
        assert_eq!(state.clarity_label, "I");
        assert!((state.color_opacity - 0.5).abs() < 1e-12);
        assert!((state.clarity_opacity - 1.0).abs() < 1e-12);
    }

    #[test]
    fn suppressed_mode_is_fixed() {
        let state = render(&model(), RenderMode::Suppressed);
        assert_eq!(state.color_label, "N/A");
        assert_eq!(state.clarity_label, "N/A");
        assert_eq!(state.color_opacity, 0.5);
        assert_eq!(state.clarity_opacity, 0.5);
    }

    #[test]
    fn short_label_falls_back_to_the_whole_label() {
        assert_eq!(short_label("K - H\n(near colorless)"), "K - H");
        assert_eq!(short_label("N/A"), "N/A");
        assert_eq!(short_label(""), "");
    }

    #[test]
    fn scale_spans_14_to_77() {
        assert_eq!(scale_percent(0.0, 5.0), 14.0);
        assert_eq!(scale_percent(5.0, 5.0), 77.0);
        let state = render(&model(), RenderMode::Full);
        assert!((state.background_scale_percent - (1.0 / 5.0 * 63.0 + 14.0)).abs() < 1e-12);
        assert!((state.clarity_scale_percent - state.background_scale_percent + 14.0).abs() < 1e-12);
    }

    #[test]
    fn shape_drives_image_names() {
        let mut m = model();
        m.shape = Shape::Pear;
        let state = render(&m, RenderMode::Full);
        assert_eq!(state.shape_symbol, "pear");
        assert_eq!(state.shape_image, "pear.svg");
        assert_eq!(state.color_image, "pear_yellow.svg");
    }

    #[test]
    fn render_is_pure() {
        let m = model();
        let before = m.clone();
        for mode in [RenderMode::Full, RenderMode::Coarse, RenderMode::Suppressed] {
            let a = render(&m, mode);
            let b = render(&m, mode);
            assert_eq!(a, b);
            assert_eq!(a.color_opacity.to_bits(), b.color_opacity.to_bits());
            assert_eq!(a.background_scale_percent.to_bits(), b.background_scale_percent.to_bits());
        }
        assert_eq!(m, before);
    }

    #[test]
    fn tier_selects_mode() {
        assert_eq!(RenderMode::for_tier(Tier::Small), RenderMode::Suppressed);
        assert_eq!(RenderMode::for_tier(Tier::Medium), RenderMode::Coarse);
        assert_eq!(render_for_tier(&model(), Tier::Large).mode, RenderMode::Full);
    }
}
