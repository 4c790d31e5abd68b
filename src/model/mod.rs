//! The attribute model: every value the shopper can set.
//!
//! One `AttributeModel` is constructed per configurator and passed by
//! reference to bindings, the tier controller, the renderer, and the quote
//! submitter.

use crate::domain::{AdvancedKind, AttributeKey, Shape};
use crate::error::DiamondError;

pub mod attribute;

pub use attribute::Attribute;

const COLOR_LABELS: [&str; 10] = ["D", "E", "F", "G", "H", "I", "J", "K", "L", "M"];
const CLARITY_LABELS: [&str; 10] = ["IF", "VVS1", "VVS2", "VS1", "VS2", "SI1", "SI2", "I1", "I2", "I3"];
const CUT_LABELS: [&str; 5] = ["N/A", "Poor", "Good", "Very Good", "Excellent"];
const COLOR_MEDIUM_LABELS: [&str; 3] = [
    "G - D\n(colorless)",
    "K - H\n(near colorless)",
    "N - L\n(colored)",
];
const CLARITY_MEDIUM_LABELS: [&str; 3] = [
    "VS\n(very slightly included)",
    "SI\n(slightly included)",
    "I\n(included)",
];
const QUALITY_SMALL_LABELS: [&str; 3] = ["Mixed", "Low", "High"];

#[derive(Debug, Clone, PartialEq)]
pub struct AttributeModel {
    carat: Attribute,
    color: Attribute,
    clarity: Attribute,
    cut: Attribute,
    color_med: Attribute,
    clarity_med: Attribute,
    quality_small: Attribute,
    pub shape: Shape,
    pub advanced: AdvancedOptions,
}

impl AttributeModel {
    /// The standard catalogue: 1.00ct Round, color H, clarity VS2.
    pub fn standard() -> Result<Self, DiamondError> {
        Ok(Self {
            carat: Attribute::new(AttributeKey::Carat, 0.01, 5.0, 0.01, &[".01", "5.0"], 1.0)?,
            color: Attribute::new(AttributeKey::Color, 0.0, 9.0, 1.0, &COLOR_LABELS, 5.0)?,
            clarity: Attribute::new(AttributeKey::Clarity, 0.0, 9.0, 1.0, &CLARITY_LABELS, 4.0)?,
            cut: Attribute::new(AttributeKey::Cut, 0.0, 4.0, 1.0, &CUT_LABELS, 0.0)?,
            color_med: Attribute::new(
                AttributeKey::ColorMedium,
                0.0,
                2.0,
                1.0,
                &COLOR_MEDIUM_LABELS,
                0.0,
            )?,
            clarity_med: Attribute::new(
                AttributeKey::ClarityMedium,
                0.0,
                2.0,
                1.0,
                &CLARITY_MEDIUM_LABELS,
                0.0,
            )?,
            quality_small: Attribute::new(
                AttributeKey::QualitySmall,
                0.0,
                2.0,
                1.0,
                &QUALITY_SMALL_LABELS,
                0.0,
            )?,
            shape: Shape::default(),
            advanced: AdvancedOptions::default(),
        })
    }

    pub fn get(&self, key: AttributeKey) -> &Attribute {
        match key {
            AttributeKey::Carat => &self.carat,
            AttributeKey::Color => &self.color,
            AttributeKey::Clarity => &self.clarity,
            AttributeKey::Cut => &self.cut,
            AttributeKey::ColorMedium => &self.color_med,
            AttributeKey::ClarityMedium => &self.clarity_med,
            AttributeKey::QualitySmall => &self.quality_small,
        }
    }

    pub fn get_mut(&mut self, key: AttributeKey) -> &mut Attribute {
        match key {
            AttributeKey::Carat => &mut self.carat,
            AttributeKey::Color => &mut self.color,
            AttributeKey::Clarity => &mut self.clarity,
            AttributeKey::Cut => &mut self.cut,
            AttributeKey::ColorMedium => &mut self.color_med,
            AttributeKey::ClarityMedium => &mut self.clarity_med,
            AttributeKey::QualitySmall => &mut self.quality_small,
        }
    }

    pub fn carat(&self) -> &Attribute {
        &self.carat
    }

    pub fn set_value(&mut self, key: AttributeKey, value: f64) -> f64 {
        self.get_mut(key).set_value(value)
    }

    pub fn value(&self, key: AttributeKey) -> f64 {
        self.get(key).value()
    }

    pub fn reset_to_first(&mut self, key: AttributeKey) -> f64 {
        self.get_mut(key).reset_to_first()
    }

    /// Current label, falling back to the raw value on a lookup miss.
    pub fn display_label(&self, key: AttributeKey) -> String {
        self.get(key).display_label()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        AttributeKey::ALL.into_iter().map(|key| self.get(key))
    }
}

/// Selected choice index per advanced option (`None` = nothing picked).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdvancedOptions {
    selected: [Option<usize>; 5],
}

impl AdvancedOptions {
    fn slot(kind: AdvancedKind) -> usize {
        match kind {
            AdvancedKind::Fluorescence => 0,
            AdvancedKind::LaserDrilled => 1,
            AdvancedKind::BrownTint => 2,
            AdvancedKind::FractureFilled => 3,
            AdvancedKind::InclusionType => 4,
        }
    }

    pub fn selected(&self, kind: AdvancedKind) -> Option<usize> {
        self.selected[Self::slot(kind)]
    }

    pub fn select(&mut self, kind: AdvancedKind, choice: Option<usize>) -> Result<(), DiamondError> {
        if let Some(idx) = choice {
            let len = kind.choices().len();
            if idx >= len {
                return Err(DiamondError::OutOfRange {
                    attribute: kind.raw_key().to_string(),
                    value: idx as f64,
                    index: idx as i64,
                    len,
                });
            }
        }
        self.selected[Self::slot(kind)] = choice;
        Ok(())
    }

    /// Advance unselected → first → ... → last → unselected.
    pub fn cycle(&mut self, kind: AdvancedKind) -> Option<usize> {
        let len = kind.choices().len();
        let next = match self.selected(kind) {
            None => Some(0),
            Some(i) if i + 1 < len => Some(i + 1),
            Some(_) => None,
        };
        self.selected[Self::slot(kind)] = next;
        next
    }

    /// Raw index as submitted to the pricing service; -1 when unselected.
    pub fn raw_index(&self, kind: AdvancedKind) -> i64 {
        self.selected(kind).map(|i| i as i64).unwrap_or(-1)
    }

    pub fn label(&self, kind: AdvancedKind) -> &'static str {
        self.selected(kind)
            .and_then(|i| kind.choices().get(i).copied())
            .unwrap_or("-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalogue_starts_at_documented_values() {
        let model = AttributeModel::standard().unwrap();
        assert_eq!(model.value(AttributeKey::Carat), 1.0);
        assert_eq!(model.display_label(AttributeKey::Color), "H");
        assert_eq!(model.display_label(AttributeKey::Clarity), "VS2");
        assert_eq!(model.display_label(AttributeKey::Cut), "N/A");
        assert_eq!(model.shape, Shape::Round);
        assert_eq!(model.iter().count(), AttributeKey::ALL.len());
    }

    #[test]
    fn keys_route_to_their_attribute() {
        let mut model = AttributeModel::standard().unwrap();
        model.set_value(AttributeKey::ClarityMedium, 2.0);
        assert_eq!(model.get(AttributeKey::ClarityMedium).key(), AttributeKey::ClarityMedium);
        assert_eq!(model.display_label(AttributeKey::ClarityMedium), "I\n(included)");
        assert_eq!(model.value(AttributeKey::Clarity), 4.0);
    }

    #[test]
    fn advanced_options_cycle_and_report_raw_indices() {
        let mut adv = AdvancedOptions::default();
        assert_eq!(adv.raw_index(AdvancedKind::LaserDrilled), -1);
        assert_eq!(adv.cycle(AdvancedKind::LaserDrilled), Some(0));
        assert_eq!(adv.cycle(AdvancedKind::LaserDrilled), Some(1));
        assert_eq!(adv.label(AdvancedKind::LaserDrilled), "Yes");
        assert_eq!(adv.cycle(AdvancedKind::LaserDrilled), None);
        assert_eq!(adv.raw_index(AdvancedKind::LaserDrilled), -1);
    }

    #[test]
    fn selecting_a_missing_choice_is_rejected() {
        let mut adv = AdvancedOptions::default();
        assert!(adv.select(AdvancedKind::BrownTint, Some(2)).is_err());
        adv.select(AdvancedKind::Fluorescence, Some(4)).unwrap();
        assert_eq!(adv.raw_index(AdvancedKind::Fluorescence), 4);
    }
}
