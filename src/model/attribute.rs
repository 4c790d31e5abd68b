//! A single bounded, quantized attribute with display labels.

use crate::domain::AttributeKey;
use crate::error::DiamondError;

/// Decimal places kept after quantizing, to absorb `min + n * step` drift.
const VALUE_PRECISION: f64 = 1e9;

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    key: AttributeKey,
    min: f64,
    max: f64,
    step: f64,
    labels: Vec<String>,
    current: f64,
    previous: f64,
}

impl Attribute {
    /// Create an attribute and quantize `initial` into its range.
    pub fn new(
        key: AttributeKey,
        min: f64,
        max: f64,
        step: f64,
        labels: &[&str],
        initial: f64,
    ) -> Result<Self, DiamondError> {
        if !(min.is_finite() && max.is_finite() && min <= max) {
            return Err(DiamondError::configuration(
                key.name(),
                format!("invalid range [{min}, {max}]"),
            ));
        }
        if !(step.is_finite() && step > 0.0) {
            return Err(DiamondError::configuration(
                key.name(),
                format!("step must be positive, got {step}"),
            ));
        }

        let current = quantize(initial, min, max, step);
        Ok(Self {
            key,
            min,
            max,
            step,
            labels: labels.iter().map(|s| s.to_string()).collect(),
            current,
            previous: current,
        })
    }

    pub fn key(&self) -> AttributeKey {
        self.key
    }

    pub fn name(&self) -> &'static str {
        self.key.name()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn value(&self) -> f64 {
        self.current
    }

    pub fn previous(&self) -> f64 {
        self.previous
    }

    /// Clamp, quantize, and store `value`; the old value becomes `previous`.
    ///
    /// NaN leaves the attribute untouched.
    pub fn set_value(&mut self, value: f64) -> f64 {
        if value.is_nan() {
            return self.current;
        }
        self.previous = self.current;
        self.current = quantize(value, self.min, self.max, self.step);
        self.current
    }

    /// Move to the first step position.
    pub fn reset_to_first(&mut self) -> f64 {
        self.set_value(self.min)
    }

    /// Move by `steps` positions (negative moves down).
    pub fn step_by(&mut self, steps: i64) -> f64 {
        self.set_value(self.current + steps as f64 * self.step)
    }

    /// Label at the step index of `value`.
    pub fn label_for(&self, value: f64) -> Result<&str, DiamondError> {
        let index = step_index(value, self.min, self.step);
        if index < 0 || index as usize >= self.labels.len() {
            return Err(DiamondError::OutOfRange {
                attribute: self.name().to_string(),
                value,
                index,
                len: self.labels.len(),
            });
        }
        Ok(&self.labels[index as usize])
    }

    /// Label of the current value.
    pub fn label(&self) -> Result<&str, DiamondError> {
        self.label_for(self.current)
    }

    /// Label of the current value, or the formatted raw value if it has none.
    pub fn display_label(&self) -> String {
        match self.label() {
            Ok(label) => label.to_string(),
            Err(_) => self.format_value(self.current),
        }
    }

    /// Format a value with as many decimals as the step needs.
    pub fn format_value(&self, value: f64) -> String {
        let decimals = step_decimals(self.step);
        format!("{value:.decimals$}")
    }

    /// `value / max`, clamped to `[0, 1]`.
    pub fn ratio(&self) -> f64 {
        if self.max <= 0.0 {
            return 0.0;
        }
        (self.current / self.max).clamp(0.0, 1.0)
    }
}

fn step_index(value: f64, min: f64, step: f64) -> i64 {
    ((value - min) / step).round() as i64
}

fn quantize(value: f64, min: f64, max: f64, step: f64) -> f64 {
    let clamped = value.clamp(min, max);
    let steps = ((clamped - min) / step).round();
    let snapped = min + steps * step;
    ((snapped * VALUE_PRECISION).round() / VALUE_PRECISION).clamp(min, max)
}

fn step_decimals(step: f64) -> usize {
    let mut scaled = step;
    let mut decimals = 0;
    while (scaled - scaled.round()).abs() > 1e-9 && decimals < 6 {
        scaled *= 10.0;
        decimals += 1;
    }
    decimals
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn color() -> Attribute {
        Attribute::new(
            AttributeKey::Color,
            0.0,
            9.0,
            1.0,
            &["D", "E", "F", "G", "H", "I", "J", "K", "L", "M"],
            5.0,
        )
        .unwrap()
    }

    fn carat() -> Attribute {
        Attribute::new(AttributeKey::Carat, 0.01, 5.0, 0.01, &[".01", "5.0"], 1.0).unwrap()
    }

    #[test]
    fn set_value_clamps_and_quantizes() {
        let mut attr = color();
        assert_eq!(attr.set_value(3.4), 3.0);
        assert_eq!(attr.previous(), 5.0);
        assert_eq!(attr.set_value(12.0), 9.0);
        assert_eq!(attr.set_value(-1.0), 0.0);
        assert_eq!(attr.previous(), 9.0);
    }

    #[test]
    fn carat_steps_do_not_drift_past_cutoffs() {
        let mut attr = carat();
        assert_eq!(attr.set_value(0.69), 0.69);
        assert_eq!(attr.set_value(0.6949), 0.69);
        assert_eq!(attr.set_value(0.171), 0.17);
        assert_eq!(attr.set_value(5.0), 5.0);
    }

    #[test]
    fn nan_is_ignored() {
        let mut attr = color();
        assert_eq!(attr.set_value(f64::NAN), 5.0);
        assert_eq!(attr.previous(), 5.0);
    }

    #[test]
    fn label_lookup_misses_report_out_of_range() {
        let attr = carat();
        assert_eq!(attr.label_for(0.01).unwrap(), ".01");
        let err = attr.label_for(1.0).unwrap_err();
        assert!(matches!(err, DiamondError::OutOfRange { index: 99, len: 2, .. }));
        assert_eq!(attr.display_label(), "1.00");
    }

    #[test]
    fn invalid_step_is_a_configuration_error() {
        let err = Attribute::new(AttributeKey::Cut, 0.0, 4.0, 0.0, &["a", "b"], 0.0).unwrap_err();
        assert!(matches!(err, DiamondError::Configuration { .. }));
    }

    #[test]
    fn ratio_uses_max() {
        let attr = color();
        assert!((attr.ratio() - 5.0 / 9.0).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn label_for_set_value_is_label_at_rounded_index(v in -3.0f64..12.0) {
            let mut attr = color();
            let q = attr.set_value(v);
            let expected = v.clamp(0.0, 9.0).round() as usize;
            prop_assert_eq!(attr.label_for(q).unwrap(), attr.labels()[expected].as_str());
        }

        #[test]
        fn quantized_carat_stays_in_range(v in -10.0f64..10.0) {
            let mut attr = carat();
            let q = attr.set_value(v);
            prop_assert!((0.01..=5.0).contains(&q));
            let steps = (q - 0.01) / 0.01;
            prop_assert!((steps - steps.round()).abs() < 1e-6);
        }
    }
}
