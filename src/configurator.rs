//! The configurator: one model, its slider bindings, and the derived view.
//!
//! Slider listeners never touch the model or other sliders directly. They
//! write tooltip text and a refresh request into the `Surface`; once the
//! drag returns, the configurator runs the requested refresh (tier
//! re-evaluation and/or a visualizer render). Renders always use the mode of
//! the current tier, whichever slider asked for them.

use crate::binding::{OnChange, RangeInputBinding};
use crate::domain::{AdvancedKind, AttributeKey, Panel, PrecisionSet, Shape, Tier};
use crate::error::DiamondError;
use crate::model::{Attribute, AttributeModel};
use crate::quote::SubmissionPayload;
use crate::tier::{ColorClarityControls, TierController, TierUpdate};
use crate::visualizer::{self, VisualizerState};

/// Work requested by a slider listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// Carat moved: re-evaluate the tier, then render for it.
    Tier,
    /// A grade moved: render for the current tier.
    Visualizer,
}

/// View-side state written by slider listeners.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Surface {
    pub carat_tooltip: String,
    pending: Option<Refresh>,
}

impl Surface {
    pub fn request(&mut self, refresh: Refresh) {
        // A tier refresh always renders, so it absorbs visualizer requests.
        if self.pending != Some(Refresh::Tier) {
            self.pending = Some(refresh);
        }
    }

    fn take(&mut self) -> Option<Refresh> {
        self.pending.take()
    }
}

/// Listener installed for each attribute when it is bound.
pub fn listener_for(key: AttributeKey) -> OnChange<Surface> {
    match key {
        AttributeKey::Carat => Box::new(|attr: &Attribute, surface: &mut Surface| {
            surface.carat_tooltip = format!("{:.2}", attr.value());
            surface.request(Refresh::Tier);
        }),
        AttributeKey::Color
        | AttributeKey::Clarity
        | AttributeKey::ColorMedium
        | AttributeKey::ClarityMedium
        | AttributeKey::QualitySmall => Box::new(|_: &Attribute, surface: &mut Surface| {
            surface.request(Refresh::Visualizer);
        }),
        AttributeKey::Cut => Box::new(|_: &Attribute, _: &mut Surface| {}),
    }
}

/// The five slider positions on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slider {
    Carat,
    Quality,
    Color,
    Clarity,
    Cut,
}

impl Slider {
    pub const ALL: [Slider; 5] = [Slider::Carat, Slider::Quality, Slider::Color, Slider::Clarity, Slider::Cut];

    pub fn panel(self) -> Panel {
        match self {
            Slider::Carat => Panel::Carat,
            Slider::Quality => Panel::Quality,
            Slider::Color => Panel::Color,
            Slider::Clarity => Panel::Clarity,
            Slider::Cut => Panel::Cut,
        }
    }
}

#[derive(Debug)]
pub struct SliderBindings {
    carat: RangeInputBinding<Surface>,
    quality: RangeInputBinding<Surface>,
    color: RangeInputBinding<Surface>,
    clarity: RangeInputBinding<Surface>,
    cut: RangeInputBinding<Surface>,
}

impl SliderBindings {
    fn bind_all(model: &AttributeModel, precision: PrecisionSet) -> Result<Self, DiamondError> {
        let bind = |key: AttributeKey| RangeInputBinding::bind(model.get(key), listener_for(key));
        Ok(Self {
            carat: bind(AttributeKey::Carat)?,
            quality: bind(AttributeKey::QualitySmall)?,
            color: bind(precision.color_key())?,
            clarity: bind(precision.clarity_key())?,
            cut: bind(AttributeKey::Cut)?,
        })
    }

    pub fn get(&self, slider: Slider) -> &RangeInputBinding<Surface> {
        match slider {
            Slider::Carat => &self.carat,
            Slider::Quality => &self.quality,
            Slider::Color => &self.color,
            Slider::Clarity => &self.clarity,
            Slider::Cut => &self.cut,
        }
    }

    fn get_mut(&mut self, slider: Slider) -> &mut RangeInputBinding<Surface> {
        match slider {
            Slider::Carat => &mut self.carat,
            Slider::Quality => &mut self.quality,
            Slider::Color => &mut self.color,
            Slider::Clarity => &mut self.clarity,
            Slider::Cut => &mut self.cut,
        }
    }
}

impl ColorClarityControls for SliderBindings {
    fn rebind_precision(&mut self, model: &AttributeModel, set: PrecisionSet) -> Result<(), DiamondError> {
        let color = set.color_key();
        let clarity = set.clarity_key();
        self.color.rebind(model.get(color), listener_for(color))?;
        self.clarity.rebind(model.get(clarity), listener_for(clarity))?;
        Ok(())
    }
}

#[derive(Debug)]
pub struct Configurator {
    model: AttributeModel,
    tiers: TierController,
    sliders: SliderBindings,
    surface: Surface,
    visualizer: VisualizerState,
    last_update: Option<TierUpdate>,
}

impl Configurator {
    pub fn new() -> Result<Self, DiamondError> {
        Self::with_model(AttributeModel::standard()?)
    }

    pub fn with_model(model: AttributeModel) -> Result<Self, DiamondError> {
        let tiers = TierController::new(&model);
        let sliders = SliderBindings::bind_all(&model, tiers.active())?;
        let visualizer = visualizer::render_for_tier(&model, tiers.tier());
        let surface = Surface {
            carat_tooltip: format!("{:.2}", model.carat().value()),
            pending: None,
        };
        Ok(Self {
            model,
            tiers,
            sliders,
            surface,
            visualizer,
            last_update: None,
        })
    }

    pub fn model(&self) -> &AttributeModel {
        &self.model
    }

    pub fn tier(&self) -> Tier {
        self.tiers.tier()
    }

    pub fn precision(&self) -> PrecisionSet {
        self.tiers.active()
    }

    pub fn visible_panels(&self) -> &'static [Panel] {
        self.tiers.visible_panels()
    }

    pub fn is_visible(&self, panel: Panel) -> bool {
        self.visible_panels().contains(&panel)
    }

    pub fn visualizer(&self) -> &VisualizerState {
        &self.visualizer
    }

    pub fn carat_tooltip(&self) -> &str {
        &self.surface.carat_tooltip
    }

    pub fn slider(&self, slider: Slider) -> &RangeInputBinding<Surface> {
        self.sliders.get(slider)
    }

    /// Outcome of the most recent tier evaluation.
    pub fn last_tier_update(&self) -> Option<&TierUpdate> {
        self.last_update.as_ref()
    }

    /// Drag `slider` to `position` and run whatever refresh it requested.
    pub fn drag(&mut self, slider: Slider, position: f64) -> Result<Option<f64>, DiamondError> {
        let value = self
            .sliders
            .get_mut(slider)
            .drag(&mut self.model, &mut self.surface, position);
        self.process()?;
        Ok(value)
    }

    /// Move `slider` by whole steps.
    pub fn nudge(&mut self, slider: Slider, steps: i64) -> Result<Option<f64>, DiamondError> {
        let value = self
            .sliders
            .get_mut(slider)
            .nudge(&mut self.model, &mut self.surface, steps);
        self.process()?;
        Ok(value)
    }

    pub fn set_shape(&mut self, shape: Shape) {
        self.model.shape = shape;
        self.visualizer = visualizer::render_for_tier(&self.model, self.tiers.tier());
    }

    pub fn select_advanced(&mut self, kind: AdvancedKind, choice: Option<usize>) -> Result<(), DiamondError> {
        self.model.advanced.select(kind, choice)
    }

    pub fn cycle_advanced(&mut self, kind: AdvancedKind) -> Option<usize> {
        self.model.advanced.cycle(kind)
    }

    pub fn payload(&self) -> SubmissionPayload {
        SubmissionPayload::from_model(&self.model)
    }

    fn process(&mut self) -> Result<(), DiamondError> {
        match self.surface.take() {
            Some(Refresh::Tier) => {
                let update = self.tiers.update(&mut self.model, &mut self.sliders)?;
                self.visualizer = visualizer::render_for_tier(&self.model, update.tier);
                self.last_update = Some(update);
            }
            Some(Refresh::Visualizer) => {
                self.visualizer = visualizer::render_for_tier(&self.model, self.tiers.tier());
            }
            None => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visualizer::RenderMode;

    #[test]
    fn initial_state_is_a_large_round_stone() {
        let cfg = Configurator::new().unwrap();
        assert_eq!(cfg.tier(), Tier::Large);
        assert_eq!(cfg.carat_tooltip(), "1.00");
        assert_eq!(cfg.slider(Slider::Color).key(), Some(AttributeKey::Color));
        assert_eq!(cfg.visualizer().mode, RenderMode::Full);
        assert!((cfg.visualizer().color_opacity - 5.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn dragging_carat_into_medium_rebinds_color_and_clarity() {
        let mut cfg = Configurator::new().unwrap();
        cfg.drag(Slider::Carat, 0.5).unwrap();

        assert_eq!(cfg.tier(), Tier::Medium);
        assert_eq!(cfg.carat_tooltip(), "0.50");
        assert_eq!(cfg.slider(Slider::Color).key(), Some(AttributeKey::ColorMedium));
        assert_eq!(cfg.slider(Slider::Clarity).key(), Some(AttributeKey::ClarityMedium));
        assert_eq!(cfg.slider(Slider::Color).control().unwrap().ticks.len(), 3);
        assert_eq!(cfg.visualizer().color_label, "G - D");
        assert_eq!(cfg.visualizer().clarity_label, "VS");
        assert!(cfg.is_visible(Panel::Color));
        assert!(!cfg.is_visible(Panel::Cut));

        cfg.drag(Slider::Color, 1.0).unwrap();
        assert_eq!(cfg.visualizer().color_label, "K - H");
        assert_eq!(cfg.model().value(AttributeKey::Color), 5.0);
    }

    #[test]
    fn returning_to_large_resets_full_grades() {
        let mut cfg = Configurator::new().unwrap();
        cfg.drag(Slider::Carat, 0.5).unwrap();
        cfg.drag(Slider::Carat, 2.0).unwrap();

        assert_eq!(cfg.tier(), Tier::Large);
        assert_eq!(cfg.model().value(AttributeKey::Color), 0.0);
        assert_eq!(cfg.model().value(AttributeKey::Clarity), 0.0);
        assert_eq!(cfg.visualizer().color_label, "D");
        assert_eq!(cfg.slider(Slider::Color).control().unwrap().value, 0.0);
        assert_eq!(cfg.last_tier_update().unwrap().swapped, Some(PrecisionSet::Full));
    }

    #[test]
    fn moving_within_large_keeps_grades() {
        let mut cfg = Configurator::new().unwrap();
        cfg.nudge(Slider::Carat, 10).unwrap();
        cfg.drag(Slider::Carat, 3.0).unwrap();
        assert_eq!(cfg.model().value(AttributeKey::Color), 5.0);
        assert_eq!(cfg.last_tier_update().unwrap().swapped, None);
        assert!((cfg.visualizer().background_scale_percent - (3.0 / 5.0 * 63.0 + 14.0)).abs() < 1e-9);
    }

    #[test]
    fn small_stones_render_suppressed_grades() {
        let mut cfg = Configurator::new().unwrap();
        cfg.drag(Slider::Carat, 0.1).unwrap();
        assert_eq!(cfg.tier(), Tier::Small);
        assert_eq!(cfg.visualizer().color_label, "N/A");
        assert!(cfg.is_visible(Panel::Quality));

        cfg.drag(Slider::Quality, 2.0).unwrap();
        assert_eq!(cfg.visualizer().mode, RenderMode::Suppressed);
        assert_eq!(cfg.model().display_label(AttributeKey::QualitySmall), "High");
    }

    #[test]
    fn cut_changes_do_not_rerender() {
        let mut cfg = Configurator::new().unwrap();
        let before = cfg.visualizer().clone();
        cfg.drag(Slider::Cut, 4.0).unwrap();
        assert_eq!(cfg.visualizer(), &before);
        assert_eq!(cfg.payload().cut, 4.0);
    }

    #[test]
    fn shape_changes_keep_the_render_mode() {
        let mut cfg = Configurator::new().unwrap();
        cfg.drag(Slider::Carat, 0.3).unwrap();
        cfg.set_shape(Shape::Emerald);
        assert_eq!(cfg.visualizer().mode, RenderMode::Coarse);
        assert_eq!(cfg.visualizer().shape_image, "emerald.svg");
    }

    #[test]
    fn large_to_small_to_large_resets_full_grades() {
        let mut cfg = Configurator::new().unwrap();
        cfg.drag(Slider::Color, 7.0).unwrap();
        cfg.drag(Slider::Carat, 0.1).unwrap();
        assert_eq!(cfg.model().value(AttributeKey::Color), 7.0);

        cfg.drag(Slider::Carat, 2.0).unwrap();
        assert_eq!(cfg.tier(), Tier::Large);
        assert_eq!(cfg.model().value(AttributeKey::Color), 0.0);
        assert_eq!(cfg.model().value(AttributeKey::Clarity), 0.0);
        assert_eq!(cfg.slider(Slider::Color).control().unwrap().value, 0.0);
        assert_eq!(cfg.visualizer().color_label, "D");
        assert_eq!(cfg.last_tier_update().unwrap().swapped, Some(PrecisionSet::Full));
    }

    #[test]
    fn hidden_slider_drags_render_for_the_current_tier() {
        let mut cfg = Configurator::new().unwrap();
        cfg.drag(Slider::Quality, 2.0).unwrap();
        assert_eq!(cfg.model().value(AttributeKey::QualitySmall), 2.0);
        assert_eq!(cfg.visualizer().mode, RenderMode::Full);
        assert_eq!(cfg.visualizer().color_label, "H");
    }

    #[test]
    fn surface_tier_request_absorbs_visualizer_requests() {
        let mut surface = Surface::default();
        surface.request(Refresh::Tier);
        surface.request(Refresh::Visualizer);
        assert_eq!(surface.take(), Some(Refresh::Tier));
        assert_eq!(surface.take(), None);
    }
}
