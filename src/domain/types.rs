//! Shared domain types.
//!
//! These are small, copyable enums so they can be passed freely between the
//! model, the tier controller, the renderer, and the front ends.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Carat at or below which only the small-stone panels are shown.
pub const CARAT_CUTOFF_SMALL: f64 = 0.17;

/// Carat above which the full-precision panels are shown.
pub const CARAT_CUTOFF_LARGE: f64 = 0.69;

/// Diamond cut shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
pub enum Shape {
    #[default]
    Round,
    Princess,
    Emerald,
    Radiant,
    Asscher,
    Pear,
    Oval,
    Heart,
    Marquise,
}

impl Shape {
    pub const ALL: [Shape; 9] = [
        Shape::Round,
        Shape::Princess,
        Shape::Emerald,
        Shape::Radiant,
        Shape::Asscher,
        Shape::Pear,
        Shape::Oval,
        Shape::Heart,
        Shape::Marquise,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Shape::Round => "Round",
            Shape::Princess => "Princess",
            Shape::Emerald => "Emerald",
            Shape::Radiant => "Radiant",
            Shape::Asscher => "Asscher",
            Shape::Pear => "Pear",
            Shape::Oval => "Oval",
            Shape::Heart => "Heart",
            Shape::Marquise => "Marquise",
        }
    }

    /// Lowercase symbol used for preview image names.
    pub fn symbol(self) -> String {
        self.display_name().to_ascii_lowercase()
    }

    pub fn next(self) -> Shape {
        let idx = Shape::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Shape::ALL[(idx + 1) % Shape::ALL.len()]
    }

    pub fn prev(self) -> Shape {
        let idx = Shape::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Shape::ALL[(idx + Shape::ALL.len() - 1) % Shape::ALL.len()]
    }
}

/// Coarse carat-size bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Small,
    Medium,
    Large,
}

impl Tier {
    /// Classify a carat value. Each cutoff belongs to the lower tier.
    pub fn classify(carat: f64) -> Tier {
        if carat <= CARAT_CUTOFF_SMALL {
            Tier::Small
        } else if carat <= CARAT_CUTOFF_LARGE {
            Tier::Medium
        } else {
            Tier::Large
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Tier::Small => "small",
            Tier::Medium => "medium",
            Tier::Large => "large",
        }
    }

    /// Color/clarity precision this tier needs, if any.
    pub fn required_precision(self) -> Option<PrecisionSet> {
        match self {
            Tier::Small => None,
            Tier::Medium => Some(PrecisionSet::Coarse),
            Tier::Large => Some(PrecisionSet::Full),
        }
    }

    /// Panel groups visible in this tier.
    pub fn visible_panels(self) -> &'static [Panel] {
        match self {
            Tier::Small => &[Panel::Shape, Panel::Carat, Panel::Quality],
            Tier::Medium => &[Panel::Shape, Panel::Carat, Panel::Color, Panel::Clarity],
            Tier::Large => &[
                Panel::Shape,
                Panel::Carat,
                Panel::Color,
                Panel::Clarity,
                Panel::Cut,
                Panel::Advanced,
            ],
        }
    }
}

/// Which color/clarity attribute pair the sliders drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrecisionSet {
    /// Individual grades (D..M, IF..I3).
    Full,
    /// Three grouped grades per attribute.
    Coarse,
}

impl PrecisionSet {
    pub fn color_key(self) -> AttributeKey {
        match self {
            PrecisionSet::Full => AttributeKey::Color,
            PrecisionSet::Coarse => AttributeKey::ColorMedium,
        }
    }

    pub fn clarity_key(self) -> AttributeKey {
        match self {
            PrecisionSet::Full => AttributeKey::Clarity,
            PrecisionSet::Coarse => AttributeKey::ClarityMedium,
        }
    }
}

/// Identifies one slider-backed attribute in the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKey {
    Carat,
    Color,
    Clarity,
    Cut,
    ColorMedium,
    ClarityMedium,
    QualitySmall,
}

impl AttributeKey {
    pub const ALL: [AttributeKey; 7] = [
        AttributeKey::Carat,
        AttributeKey::Color,
        AttributeKey::Clarity,
        AttributeKey::Cut,
        AttributeKey::ColorMedium,
        AttributeKey::ClarityMedium,
        AttributeKey::QualitySmall,
    ];

    /// Field name used in submissions and logs.
    pub fn name(self) -> &'static str {
        match self {
            AttributeKey::Carat => "carat",
            AttributeKey::Color => "color",
            AttributeKey::Clarity => "clarity",
            AttributeKey::Cut => "cut",
            AttributeKey::ColorMedium => "color_med",
            AttributeKey::ClarityMedium => "clarity_med",
            AttributeKey::QualitySmall => "quality_small",
        }
    }
}

/// A labelled group of controls that is shown or hidden per tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Panel {
    Shape,
    Carat,
    Quality,
    Color,
    Clarity,
    Cut,
    Advanced,
}

impl Panel {
    pub fn title(self) -> &'static str {
        match self {
            Panel::Shape => "Shape",
            Panel::Carat => "Carat",
            Panel::Quality => "Quality",
            Panel::Color => "Color",
            Panel::Clarity => "Clarity",
            Panel::Cut => "Cut",
            Panel::Advanced => "Advanced",
        }
    }
}

/// Secondary diamond property submitted as a raw choice index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum AdvancedKind {
    Fluorescence,
    LaserDrilled,
    BrownTint,
    FractureFilled,
    InclusionType,
}

impl AdvancedKind {
    pub const ALL: [AdvancedKind; 5] = [
        AdvancedKind::Fluorescence,
        AdvancedKind::LaserDrilled,
        AdvancedKind::BrownTint,
        AdvancedKind::FractureFilled,
        AdvancedKind::InclusionType,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            AdvancedKind::Fluorescence => "Fluorescence",
            AdvancedKind::LaserDrilled => "Laser drilled",
            AdvancedKind::BrownTint => "Brown tint",
            AdvancedKind::FractureFilled => "Fracture filled",
            AdvancedKind::InclusionType => "Inclusion type",
        }
    }

    /// Key used for this option in the `adv_raw` submission block.
    pub fn raw_key(self) -> &'static str {
        match self {
            AdvancedKind::Fluorescence => "fluorescence",
            AdvancedKind::LaserDrilled => "laser",
            AdvancedKind::BrownTint => "brown",
            AdvancedKind::FractureFilled => "fracture",
            AdvancedKind::InclusionType => "inclusion",
        }
    }

    pub fn choices(self) -> &'static [&'static str] {
        match self {
            AdvancedKind::Fluorescence => &["N/A", "Faint", "Medium", "Strong", "Very Strong"],
            AdvancedKind::LaserDrilled | AdvancedKind::BrownTint | AdvancedKind::FractureFilled => {
                &["N/A", "Yes"]
            }
            AdvancedKind::InclusionType => &["N/A", "Black Center", "White Off Center"],
        }
    }
}
