//! Warning level classification from peak wind speed
//!
//! A total, monotonic step function. Levels follow the tropical cyclone
//! intensity scale used for the South China Sea (Beaufort 8+ bands).

use serde::{Deserialize, Serialize};

/// Severity of a detected storm, ordered from weakest to strongest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningLevel {
    TropicalDepression,
    TropicalStorm,
    SevereTropicalStorm,
    Typhoon,
    StrongTyphoon,
    SuperTyphoon,
}

impl WarningLevel {
    /// Lower wind bound of this level in m/s (inclusive)
    pub fn lower_bound_ms(self) -> f64 {
        match self {
            Self::TropicalDepression => 0.0,
            Self::TropicalStorm => 17.2,
            Self::SevereTropicalStorm => 24.5,
            Self::Typhoon => 32.7,
            Self::StrongTyphoon => 41.5,
            Self::SuperTyphoon => 51.0,
        }
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            Self::TropicalDepression => "Tropical depression",
            Self::TropicalStorm => "Tropical storm",
            Self::SevereTropicalStorm => "Severe tropical storm",
            Self::Typhoon => "Typhoon",
            Self::StrongTyphoon => "Strong typhoon",
            Self::SuperTyphoon => "Super typhoon",
        }
    }
}

impl std::fmt::Display for WarningLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TropicalDepression => write!(f, "tropical_depression"),
            Self::TropicalStorm => write!(f, "tropical_storm"),
            Self::SevereTropicalStorm => write!(f, "severe_tropical_storm"),
            Self::Typhoon => write!(f, "typhoon"),
            Self::StrongTyphoon => write!(f, "strong_typhoon"),
            Self::SuperTyphoon => write!(f, "super_typhoon"),
        }
    }
}

/// All levels, weakest first
pub fn all_levels() -> Vec<WarningLevel> {
    vec![
        WarningLevel::TropicalDepression,
        WarningLevel::TropicalStorm,
        WarningLevel::SevereTropicalStorm,
        WarningLevel::Typhoon,
        WarningLevel::StrongTyphoon,
        WarningLevel::SuperTyphoon,
    ]
}

/// Map peak wind speed (m/s) to a warning level
///
/// NaN and negative speeds map to the weakest level.
pub fn classify(peak_wind_ms: f64) -> WarningLevel {
    all_levels()
        .into_iter()
        .rev()
        .find(|level| peak_wind_ms >= level.lower_bound_ms())
        .unwrap_or(WarningLevel::TropicalDepression)
}
