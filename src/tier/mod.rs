//! Carat tier state machine.
//!
//! The controller tracks the current `Tier` and which color/clarity
//! `PrecisionSet` the sliders are bound to. Medium stones use the coarse
//! set, large stones the full set, and small stones hide both panels, so
//! they keep whatever set was active.
//!
//! When the tier requires a set other than the active one, the controller
//! resets both attributes of the new set to their first step and asks the
//! controls to rebind. Entering Large from any other tier always resets and
//! rebinds the full set, even when it was still active from an earlier
//! Large -> Small trip. Re-evaluating within a tier only recomputes the
//! visible panels.

use crate::domain::{AttributeKey, Panel, PrecisionSet, Tier};
use crate::error::DiamondError;
use crate::model::AttributeModel;

/// The color and clarity sliders, as seen by the tier controller.
pub trait ColorClarityControls {
    /// Point the color and clarity sliders at the attributes of `set`.
    fn rebind_precision(&mut self, model: &AttributeModel, set: PrecisionSet) -> Result<(), DiamondError>;
}

/// Outcome of one tier evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct TierUpdate {
    pub previous: Tier,
    pub tier: Tier,
    /// Set the sliders were rebound to, if a swap happened.
    pub swapped: Option<PrecisionSet>,
    pub visible: &'static [Panel],
}

impl TierUpdate {
    pub fn crossed(&self) -> bool {
        self.previous != self.tier
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TierController {
    tier: Tier,
    active: PrecisionSet,
}

impl TierController {
    pub fn new(model: &AttributeModel) -> Self {
        let tier = Tier::classify(model.carat().value());
        Self {
            tier,
            active: tier.required_precision().unwrap_or(PrecisionSet::Full),
        }
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn active(&self) -> PrecisionSet {
        self.active
    }

    pub fn color_key(&self) -> AttributeKey {
        self.active.color_key()
    }

    pub fn clarity_key(&self) -> AttributeKey {
        self.active.clarity_key()
    }

    pub fn visible_panels(&self) -> &'static [Panel] {
        self.tier.visible_panels()
    }

    /// Re-classify the current carat and apply any precision swap.
    pub fn update(
        &mut self,
        model: &mut AttributeModel,
        controls: &mut impl ColorClarityControls,
    ) -> Result<TierUpdate, DiamondError> {
        let previous = self.tier;
        let tier = Tier::classify(model.carat().value());
        self.tier = tier;

        let entering_large = tier == Tier::Large && previous != Tier::Large;
        let swapped = match tier.required_precision() {
            Some(required) if required != self.active || entering_large => {
                model.reset_to_first(required.color_key());
                model.reset_to_first(required.clarity_key());
                controls.rebind_precision(model, required)?;
                self.active = required;
                tracing::info!(
                    from = previous.display_name(),
                    to = tier.display_name(),
                    precision = ?required,
                    "color/clarity sliders reset"
                );
                Some(required)
            }
            _ => None,
        };

        if previous != tier && swapped.is_none() {
            tracing::debug!(from = previous.display_name(), to = tier.display_name(), "tier changed");
        }

        Ok(TierUpdate {
            previous,
            tier,
            swapped,
            visible: tier.visible_panels(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Default)]
    struct FakeControls {
        rebinds: Vec<PrecisionSet>,
    }

    impl ColorClarityControls for FakeControls {
        fn rebind_precision(&mut self, _model: &AttributeModel, set: PrecisionSet) -> Result<(), DiamondError> {
            self.rebinds.push(set);
            Ok(())
        }
    }

    fn setup() -> (AttributeModel, TierController, FakeControls) {
        let model = AttributeModel::standard().unwrap();
        let tiers = TierController::new(&model);
        (model, tiers, FakeControls::default())
    }

    fn move_carat(
        model: &mut AttributeModel,
        tiers: &mut TierController,
        controls: &mut FakeControls,
        carat: f64,
    ) -> TierUpdate {
        model.set_value(AttributeKey::Carat, carat);
        tiers.update(model, controls).unwrap()
    }

    #[test]
    fn starts_large_with_full_precision() {
        let (_, tiers, _) = setup();
        assert_eq!(tiers.tier(), Tier::Large);
        assert_eq!(tiers.active(), PrecisionSet::Full);
        assert_eq!(tiers.color_key(), AttributeKey::Color);
    }

    #[test]
    fn large_to_medium_resets_and_rebinds_coarse_set() {
        let (mut model, mut tiers, mut controls) = setup();
        model.set_value(AttributeKey::ColorMedium, 2.0);
        model.set_value(AttributeKey::ClarityMedium, 1.0);

        let update = move_carat(&mut model, &mut tiers, &mut controls, 0.5);
        assert_eq!(update.tier, Tier::Medium);
        assert_eq!(update.swapped, Some(PrecisionSet::Coarse));
        assert_eq!(controls.rebinds, vec![PrecisionSet::Coarse]);
        assert_eq!(model.value(AttributeKey::ColorMedium), 0.0);
        assert_eq!(model.value(AttributeKey::ClarityMedium), 0.0);
        assert_eq!(tiers.clarity_key(), AttributeKey::ClarityMedium);
    }

    #[test]
    fn medium_to_large_resets_full_set() {
        let (mut model, mut tiers, mut controls) = setup();
        move_carat(&mut model, &mut tiers, &mut controls, 0.5);
        model.set_value(AttributeKey::Color, 7.0);

        let update = move_carat(&mut model, &mut tiers, &mut controls, 0.7);
        assert_eq!(update.swapped, Some(PrecisionSet::Full));
        assert_eq!(model.value(AttributeKey::Color), 0.0);
        assert_eq!(model.value(AttributeKey::Clarity), 0.0);
        assert_eq!(controls.rebinds, vec![PrecisionSet::Coarse, PrecisionSet::Full]);
    }

    #[test]
    fn staying_in_a_tier_never_resets() {
        let (mut model, mut tiers, mut controls) = setup();
        for carat in [1.2, 2.0, 0.7, 4.99] {
            let update = move_carat(&mut model, &mut tiers, &mut controls, carat);
            assert_eq!(update.swapped, None);
            assert!(!update.crossed());
        }
        assert!(controls.rebinds.is_empty());
        assert_eq!(model.value(AttributeKey::Color), 5.0);
        assert_eq!(model.value(AttributeKey::Clarity), 4.0);
    }

    #[test]
    fn small_tier_keeps_active_set_and_shows_quality() {
        let (mut model, mut tiers, mut controls) = setup();
        let update = move_carat(&mut model, &mut tiers, &mut controls, 0.1);
        assert_eq!(update.tier, Tier::Small);
        assert_eq!(update.swapped, None);
        assert_eq!(tiers.active(), PrecisionSet::Full);
        assert!(update.visible.contains(&Panel::Quality));

        // Large -> Small -> Medium still lands on the coarse set.
        let update = move_carat(&mut model, &mut tiers, &mut controls, 0.3);
        assert_eq!(update.swapped, Some(PrecisionSet::Coarse));
    }

    #[test]
    fn large_to_small_to_large_resets_full_set() {
        let (mut model, mut tiers, mut controls) = setup();
        model.set_value(AttributeKey::Color, 7.0);
        model.set_value(AttributeKey::Clarity, 3.0);

        move_carat(&mut model, &mut tiers, &mut controls, 0.1);
        assert!(controls.rebinds.is_empty());
        assert_eq!(model.value(AttributeKey::Color), 7.0);

        let update = move_carat(&mut model, &mut tiers, &mut controls, 2.0);
        assert_eq!(update.swapped, Some(PrecisionSet::Full));
        assert_eq!(controls.rebinds, vec![PrecisionSet::Full]);
        assert_eq!(model.value(AttributeKey::Color), 0.0);
        assert_eq!(model.value(AttributeKey::Clarity), 0.0);
    }

    #[test]
    fn medium_to_small_to_medium_keeps_coarse_grades() {
        let (mut model, mut tiers, mut controls) = setup();
        move_carat(&mut model, &mut tiers, &mut controls, 0.5);
        model.set_value(AttributeKey::ColorMedium, 2.0);

        move_carat(&mut model, &mut tiers, &mut controls, 0.1);
        let update = move_carat(&mut model, &mut tiers, &mut controls, 0.4);
        assert_eq!(update.swapped, None);
        assert_eq!(model.value(AttributeKey::ColorMedium), 2.0);
        assert_eq!(controls.rebinds, vec![PrecisionSet::Coarse]);
    }

    proptest! {
        #[test]
        fn swaps_happen_only_on_precision_changes(path in proptest::collection::vec(0.01f64..5.0, 1..20)) {
            let (mut model, mut tiers, mut controls) = setup();
            for carat in path {
                let before = tiers.active();
                let update = move_carat(&mut model, &mut tiers, &mut controls, carat);
                match update.tier.required_precision() {
                    Some(required) => {
                        prop_assert_eq!(tiers.active(), required);
                        let entering_large = update.tier == Tier::Large && update.previous != Tier::Large;
                        prop_assert_eq!(update.swapped.is_some(), required != before || entering_large);
                    }
                    None => prop_assert!(update.swapped.is_none()),
                }
            }
        }
    }
}
