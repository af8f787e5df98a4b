//! Geometry quality breakpoints
use serde::{Deserialize, Serialize};

const fn default_min_sensors() -> usize {
    4
}

fn default_no_geometry_score() -> f64 {
    999.0
}

fn default_tight_spread_deg() -> f64 {
    0.01
}

fn default_tight_score() -> f64 {
    50.0
}

fn default_wide_spread_deg() -> f64 {
    1.0
}

fn default_wide_score() -> f64 {
    2.0
}

fn default_moderate_score() -> f64 {
    10.0
}

/// Breakpoints of the bounding box spread heuristic used by
/// [GdopEstimator](crate::prelude::GdopEstimator). These are tunables,
/// not physical constants: the heuristic only preserves the qualitative
/// ordering (more spread, better geometry, lower score).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GdopConfig {
    /// Below this sensor count the geometry is scored
    /// [GdopConfig::no_geometry_score] outright
    #[serde(default = "default_min_sensors")]
    pub min_sensors: usize,

    /// Score for sensor sets too small to rate
    #[serde(default = "default_no_geometry_score")]
    pub no_geometry_score: f64,

    /// Spread (summed latitude + longitude extent, degrees) below which
    /// the sensors count as clustered
    #[serde(default = "default_tight_spread_deg")]
    pub tight_spread_deg: f64,

    /// Score for clustered geometry
    #[serde(default = "default_tight_score")]
    pub tight_score: f64,

    /// Spread above which the geometry counts as well distributed
    #[serde(default = "default_wide_spread_deg")]
    pub wide_spread_deg: f64,

    /// Score for well distributed geometry
    #[serde(default = "default_wide_score")]
    pub wide_score: f64,

    /// Score for the band in between
    #[serde(default = "default_moderate_score")]
    pub moderate_score: f64,
}

impl Default for GdopConfig {
    fn default() -> Self {
        Self {
            min_sensors: default_min_sensors(),
            no_geometry_score: default_no_geometry_score(),
            tight_spread_deg: default_tight_spread_deg(),
            tight_score: default_tight_score(),
            wide_spread_deg: default_wide_spread_deg(),
            wide_score: default_wide_score(),
            moderate_score: default_moderate_score(),
        }
    }
}
