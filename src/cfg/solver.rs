//! Numerical solver preset
use serde::{Deserialize, Serialize};

const fn default_max_iterations() -> usize {
    1_000
}

fn default_finite_diff_step_deg() -> f64 {
    1.0E-7
}

fn default_initial_damping() -> f64 {
    0.1
}

fn default_convergence_step_deg() -> f64 {
    1.0E-9
}

/// Levenberg-Marquardt settings. The iteration cap bounds worst case
/// solve latency; the damping and step values are sized for positions
/// expressed in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverOpts {
    /// Iteration cap before the attempt is abandoned
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Finite difference step (degrees) for the numerical Jacobian
    #[serde(default = "default_finite_diff_step_deg")]
    pub finite_diff_step_deg: f64,

    /// Initial damping factor λ
    #[serde(default = "default_initial_damping")]
    pub initial_damping: f64,

    /// Declare convergence once the accepted step norm (degrees) falls
    /// below this
    #[serde(default = "default_convergence_step_deg")]
    pub convergence_step_deg: f64,
}

impl Default for SolverOpts {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            finite_diff_step_deg: default_finite_diff_step_deg(),
            initial_damping: default_initial_damping(),
            convergence_step_deg: default_convergence_step_deg(),
        }
    }
}
