//! Pipeline configuration
use serde::{Deserialize, Serialize};

mod gdop;
mod solver;

pub use gdop::GdopConfig;
pub use solver::SolverOpts;

fn default_min_sensors() -> usize {
    3
}

fn default_window_ms() -> i64 {
    2_000
}

fn default_acceptance_threshold() -> f64 {
    80.0
}

fn default_high_confidence() -> f64 {
    90.0
}

fn default_high_confidence_sensors() -> usize {
    4
}

fn default_buffer_capacity() -> usize {
    10_000
}

/// [Config] gathers every tunable of the solve pipeline.
/// [Config::default] matches the deployment defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Minimum distinct sensors to attempt a solve. 3 sensors give the
    /// two independent time differences a 2D fix needs; values below 3
    /// are raised to 3.
    #[serde(default = "default_min_sensors")]
    pub min_sensors: usize,

    /// Time window (milliseconds) applied when a request does not carry
    /// its own.
    #[serde(default = "default_window_ms")]
    pub window_ms: i64,

    /// Confidence below this bar still succeeds, annotated with a
    /// warning.
    #[serde(default = "default_acceptance_threshold")]
    pub acceptance_threshold: f64,

    /// Confidence bar for the asset minting path.
    #[serde(default = "default_high_confidence")]
    pub high_confidence: f64,

    /// Sensor count bar for the asset minting path.
    #[serde(default = "default_high_confidence_sensors")]
    pub high_confidence_sensors: usize,

    /// Capacity of the local fallback buffer (appends past it are
    /// rejected).
    #[serde(default = "default_buffer_capacity")]
    pub buffer_capacity: usize,

    /// Numerical solver settings
    #[serde(default)]
    pub solver: SolverOpts,

    /// Geometry quality breakpoints
    #[serde(default)]
    pub gdop: GdopConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_sensors: default_min_sensors(),
            window_ms: default_window_ms(),
            acceptance_threshold: default_acceptance_threshold(),
            high_confidence: default_high_confidence(),
            high_confidence_sensors: default_high_confidence_sensors(),
            buffer_capacity: default_buffer_capacity(),
            solver: SolverOpts::default(),
            gdop: GdopConfig::default(),
        }
    }
}
