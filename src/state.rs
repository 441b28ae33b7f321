use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Named look applied before the tonal adjustments.
pub enum FilterKind {
    #[default]
    None,
    BwClassic,
    BwContrast,
    Sepia,
    Vintage,
}

impl FilterKind {
    pub const ALL: [FilterKind; 5] = [
        FilterKind::None,
        FilterKind::BwClassic,
        FilterKind::BwContrast,
        FilterKind::Sepia,
        FilterKind::Vintage,
    ];

    /// Stable identifier used on the command line and in presets.
    pub fn id(self) -> &'static str {
        match self {
            FilterKind::None => "none",
            FilterKind::BwClassic => "bw-classic",
            FilterKind::BwContrast => "bw-contrast",
            FilterKind::Sepia => "sepia",
            FilterKind::Vintage => "vintage",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            FilterKind::None => "Original",
            FilterKind::BwClassic => "B&W Classic",
            FilterKind::BwContrast => "B&W Contrast",
            FilterKind::Sepia => "Sepia",
            FilterKind::Vintage => "Vintage",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for FilterKind {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "original" => Ok(FilterKind::None),
            "bw-classic" | "bw1" => Ok(FilterKind::BwClassic),
            "bw-contrast" | "bw2" => Ok(FilterKind::BwContrast),
            "sepia" => Ok(FilterKind::Sepia),
            "vintage" => Ok(FilterKind::Vintage),
            _ => Err(PipelineError::UnknownFilter(s.to_string())),
        }
    }
}

/// Slider range for the signed tonal controls.
pub const SIGNED_RANGE: (i32, i32) = (-100, 100);
/// Slider range for grain and vignette.
pub const EFFECT_RANGE: (i32, i32) = (0, 100);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
/// Integer slider values. Zero is the identity for every field.
pub struct Adjustments {
    pub brightness: i32,
    pub contrast: i32,
    pub saturation: i32,
    pub exposure: i32,
    pub temperature: i32,
    pub sharpness: i32,
    pub grain: i32,
    pub vignette: i32,
}

impl Adjustments {
    /// Returns a copy with every field pulled into its documented range.
    pub fn clamped(&self) -> Self {
        let signed = |v: i32| v.clamp(SIGNED_RANGE.0, SIGNED_RANGE.1);
        let effect = |v: i32| v.clamp(EFFECT_RANGE.0, EFFECT_RANGE.1);
        Self {
            brightness: signed(self.brightness),
            contrast: signed(self.contrast),
            saturation: signed(self.saturation),
            exposure: signed(self.exposure),
            temperature: signed(self.temperature),
            sharpness: signed(self.sharpness),
            grain: effect(self.grain),
            vignette: effect(self.vignette),
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    /// True when none of the per-pixel tonal steps has work to do.
    pub fn tonal_is_identity(&self) -> bool {
        self.brightness == 0
            && self.contrast == 0
            && self.saturation == 0
            && self.exposure == 0
            && self.temperature == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Full parameter set for one render.
pub struct EditState {
    pub filter: FilterKind,
    pub adjustments: Adjustments,
}

impl EditState {
    pub fn is_identity(&self) -> bool {
        self.filter == FilterKind::None && self.adjustments.is_identity()
    }

    /// Reads a preset written as JSON.
    pub fn load_preset(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read preset {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("invalid preset JSON in {}", path.display()))
    }
}
