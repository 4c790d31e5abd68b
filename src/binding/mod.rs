//! Slider bindings between a control and one model attribute.
//!
//! A binding owns the control's render state (range, value, label strip) and
//! one change listener. Dragging writes through to the model and then calls
//! the listener synchronously with the updated attribute; there is no event
//! bus between the two.
//!
//! The listener receives a caller-chosen context `C` so it can record side
//! effects (tooltips, refresh requests) without borrowing the model.

use crate::domain::AttributeKey;
use crate::error::DiamondError;
use crate::model::{Attribute, AttributeModel};

/// Listener invoked after every value change made through a binding.
pub type OnChange<C> = Box<dyn FnMut(&Attribute, &mut C)>;

/// One label under the slider track.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelTick {
    pub label: String,
    /// Share of the track width given to this label, in percent.
    pub width_percent: f64,
}

/// Lay out `labels` so each one is centred over its step position.
///
/// Interior labels get `100 / (n - 1)` percent; the first and last get half
/// of that because only half of their box sits over the track.
pub fn label_strip(attribute: &str, labels: &[String]) -> Result<Vec<LabelTick>, DiamondError> {
    if labels.len() < 2 {
        return Err(DiamondError::configuration(
            attribute,
            format!("a slider needs at least 2 step labels, got {}", labels.len()),
        ));
    }

    let last = labels.len() - 1;
    let width = 100.0 / last as f64;
    Ok(labels
        .iter()
        .enumerate()
        .map(|(i, label)| LabelTick {
            label: label.clone(),
            width_percent: if i == 0 || i == last { width / 2.0 } else { width },
        })
        .collect())
}

/// Render state of a bound slider.
#[derive(Debug, Clone, PartialEq)]
pub struct SliderControl {
    pub key: AttributeKey,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub value: f64,
    pub ticks: Vec<LabelTick>,
}

impl SliderControl {
    pub fn from_attribute(attribute: &Attribute) -> Result<Self, DiamondError> {
        Ok(Self {
            key: attribute.key(),
            min: attribute.min(),
            max: attribute.max(),
            step: attribute.step(),
            value: attribute.value(),
            ticks: label_strip(attribute.name(), attribute.labels())?,
        })
    }

    /// Handle position along the track in `[0, 1]`.
    pub fn fraction(&self) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        ((self.value - self.min) / span).clamp(0.0, 1.0)
    }

    /// Value under a point `fraction` of the way along the track.
    pub fn value_at(&self, fraction: f64) -> f64 {
        self.min + fraction.clamp(0.0, 1.0) * (self.max - self.min)
    }
}

pub struct RangeInputBinding<C> {
    control: Option<SliderControl>,
    on_change: Option<OnChange<C>>,
}

impl<C> Default for RangeInputBinding<C> {
    fn default() -> Self {
        Self {
            control: None,
            on_change: None,
        }
    }
}

impl<C> std::fmt::Debug for RangeInputBinding<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RangeInputBinding")
            .field("control", &self.control)
            .field("has_listener", &self.on_change.is_some())
            .finish()
    }
}

impl<C> RangeInputBinding<C> {
    /// Bind a fresh control to `attribute`.
    pub fn bind(attribute: &Attribute, on_change: OnChange<C>) -> Result<Self, DiamondError> {
        let mut binding = Self::default();
        binding.rebind(attribute, on_change)?;
        Ok(binding)
    }

    /// Tear down the current control and listener, then bind to `attribute`.
    ///
    /// On a configuration error the binding is left unbound.
    pub fn rebind(&mut self, attribute: &Attribute, on_change: OnChange<C>) -> Result<(), DiamondError> {
        self.destroy();
        let control = SliderControl::from_attribute(attribute)?;
        tracing::debug!(attribute = attribute.name(), value = attribute.value(), "slider bound");
        self.control = Some(control);
        self.on_change = Some(on_change);
        Ok(())
    }

    pub fn destroy(&mut self) {
        self.control = None;
        self.on_change = None;
    }

    pub fn is_bound(&self) -> bool {
        self.control.is_some()
    }

    pub fn control(&self) -> Option<&SliderControl> {
        self.control.as_ref()
    }

    pub fn key(&self) -> Option<AttributeKey> {
        self.control.as_ref().map(|c| c.key)
    }

    /// Apply a drag to `position`; returns the stored value, or `None` when unbound.
    pub fn drag(&mut self, model: &mut AttributeModel, ctx: &mut C, position: f64) -> Option<f64> {
        self.apply(model, ctx, |attribute| attribute.set_value(position))
    }

    /// Keyboard equivalent of a drag: move by whole steps.
    pub fn nudge(&mut self, model: &mut AttributeModel, ctx: &mut C, steps: i64) -> Option<f64> {
        self.apply(model, ctx, |attribute| attribute.step_by(steps))
    }

    fn apply(
        &mut self,
        model: &mut AttributeModel,
        ctx: &mut C,
        change: impl FnOnce(&mut Attribute) -> f64,
    ) -> Option<f64> {
        let control = self.control.as_mut()?;
        let attribute = model.get_mut(control.key);
        let value = change(&mut *attribute);
        control.value = value;
        if let Some(on_change) = self.on_change.as_mut() {
            on_change(&*attribute, ctx);
        }
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(n: usize) -> Vec<String> {
        (0..n).map(|i| i.to_string()).collect()
    }

    #[derive(Default)]
    struct Calls {
        seen: Vec<(AttributeKey, f64)>,
    }

    fn recorder() -> OnChange<Calls> {
        Box::new(|attr: &Attribute, calls: &mut Calls| calls.seen.push((attr.key(), attr.value())))
    }

    #[test]
    fn label_strip_halves_the_end_labels() {
        let ticks = label_strip("color", &labels(10)).unwrap();
        let interior = 100.0 / 9.0;
        assert!((ticks[0].width_percent - interior / 2.0).abs() < 1e-12);
        assert!((ticks[4].width_percent - interior).abs() < 1e-12);
        assert!((ticks[9].width_percent - interior / 2.0).abs() < 1e-12);
        let total: f64 = ticks.iter().map(|t| t.width_percent).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn two_labels_split_the_track() {
        let ticks = label_strip("carat", &labels(2)).unwrap();
        assert_eq!(ticks[0].width_percent, 50.0);
        assert_eq!(ticks[1].width_percent, 50.0);
    }

    #[test]
    fn single_label_fails_fast() {
        let err = label_strip("quality", &labels(1)).unwrap_err();
        assert!(matches!(err, DiamondError::Configuration { .. }));
        assert!(label_strip("quality", &[]).is_err());
    }

    #[test]
    fn drag_updates_model_then_notifies() {
        let mut model = AttributeModel::standard().unwrap();
        let mut calls = Calls::default();
        let mut binding = RangeInputBinding::bind(model.get(AttributeKey::Color), recorder()).unwrap();

        assert_eq!(binding.drag(&mut model, &mut calls, 7.3), Some(7.0));
        assert_eq!(model.value(AttributeKey::Color), 7.0);
        assert_eq!(binding.control().unwrap().value, 7.0);
        assert_eq!(calls.seen, vec![(AttributeKey::Color, 7.0)]);

        binding.nudge(&mut model, &mut calls, -2);
        assert_eq!(model.value(AttributeKey::Color), 5.0);
        assert_eq!(calls.seen.len(), 2);
    }

    #[test]
    fn rebinding_twice_leaves_one_listener() {
        let mut model = AttributeModel::standard().unwrap();
        let mut calls = Calls::default();
        let mut binding = RangeInputBinding::bind(model.get(AttributeKey::Color), recorder()).unwrap();

        binding.rebind(model.get(AttributeKey::ColorMedium), recorder()).unwrap();
        let first = binding.control().cloned();
        binding.rebind(model.get(AttributeKey::ColorMedium), recorder()).unwrap();
        assert_eq!(binding.control().cloned(), first);

        binding.drag(&mut model, &mut calls, 1.0);
        assert_eq!(calls.seen, vec![(AttributeKey::ColorMedium, 1.0)]);
        assert_eq!(model.value(AttributeKey::Color), 5.0);
    }

    #[test]
    fn unbound_binding_ignores_drags() {
        let mut model = AttributeModel::standard().unwrap();
        let mut calls = Calls::default();
        let mut binding: RangeInputBinding<Calls> = RangeInputBinding::default();
        assert_eq!(binding.drag(&mut model, &mut calls, 3.0), None);
        assert!(calls.seen.is_empty());
    }

    #[test]
    fn control_maps_track_fraction_to_values() {
        let model = AttributeModel::standard().unwrap();
        let control = SliderControl::from_attribute(model.carat()).unwrap();
        assert!((control.fraction() - 0.99 / 4.99).abs() < 1e-12);
        assert_eq!(control.value_at(0.0), 0.01);
        assert_eq!(control.value_at(1.0), 5.0);
    }
}
