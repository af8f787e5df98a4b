//! TDOA solver
use std::time::Instant;

use log::{debug, warn};
use nalgebra::{DMatrix, DVector};

use hifitime::Epoch;

use crate::cfg::SolverOpts;
use crate::constants::{NANOS_PER_S, SPEED_OF_LIGHT_M_S};
use crate::estimate::{Method, PositionEstimate, SolveOutcome};
use crate::geodesic;
use crate::reducer::ReducedObservationSet;

/// 3 sensors give 2 independent time differences, the minimum for a 2D
/// fix. This is a physical floor, not a quality threshold.
pub const HARD_MIN_SENSORS: usize = 3;

const MIN_DAMPING: f64 = 1.0E-10;
const MAX_DAMPING: f64 = 1.0E10;
const DAMPING_RETRIES: usize = 10;

/// Residual norm (seconds) under which the fit counts as exact
const RESIDUAL_CONVERGENCE_S: f64 = 1.0E-12;

/// Accepted steps improving the residual norm by less than this
/// (seconds) mean the minimum is reached
const PLATEAU_S: f64 = 1.0E-15;

/// [Solver] turns a [ReducedObservationSet] into a [SolveOutcome] by
/// damped nonlinear least squares over the pairwise time differences.
/// Pure and lock free: one instance may serve concurrent requests.
#[derive(Debug, Clone)]
pub struct Solver {
    opts: SolverOpts,
}

impl Solver {
    /// Builds a new [Solver] with given settings
    pub fn new(opts: SolverOpts) -> Self {
        Self { opts }
    }

    /// Attempts a position fix for `target_id`. `min_sensors` is the
    /// caller's policy minimum; anything below [HARD_MIN_SENSORS] is
    /// raised to it. Insufficiency and non convergence come back as
    /// typed [SolveOutcome] variants, never as a partial estimate.
    pub fn solve(
        &self,
        target_id: &str,
        reduced: &ReducedObservationSet,
        min_sensors: usize,
    ) -> SolveOutcome {
        let required = min_sensors.max(HARD_MIN_SENSORS);
        let found = reduced.len();

        if found < required {
            if reduced.distinct_sensors() < required {
                return SolveOutcome::InsufficientSensors {
                    found: reduced.distinct_sensors(),
                    required,
                };
            }
            return SolveOutcome::InsufficientInWindow { found, required };
        }

        let observations = reduced.observations();
        let sensors = observations
            .iter()
            .map(|obs| obs.coordinates_deg())
            .collect::<Vec<_>>();

        // TDOA against the earliest observing sensor (reduction ordered
        // them): changing the reference changes conditioning, not the
        // solution.
        let t0 = observations[0].timestamp_ns;
        let tdoa_s = observations
            .iter()
            .map(|obs| (obs.timestamp_ns - t0) as f64 / NANOS_PER_S)
            .collect::<Vec<_>>();

        let start = Instant::now();
        match self.minimize(&sensors, &tdoa_s) {
            Some((latitude_deg, longitude_deg, residuals)) => {
                let confidence = confidence_from_residuals(&residuals);
                debug!(
                    "{}: converged at {:.5}°, {:.5}° (confidence {:.2}) in {:.1} ms",
                    target_id,
                    latitude_deg,
                    longitude_deg,
                    confidence,
                    start.elapsed().as_secs_f64() * 1.0E3,
                );
                SolveOutcome::Solved(PositionEstimate {
                    target_id: target_id.to_string(),
                    latitude_deg,
                    longitude_deg,
                    altitude_m: None,
                    confidence,
                    sensor_count: found,
                    gdop: None,
                    method: Method::Tdoa,
                    computed_at: Epoch::now()
                        .unwrap_or_else(|_| Epoch::from_unix_milliseconds(0.0)),
                    ledger_sequence: None,
                    asset_id: None,
                })
            },
            None => {
                warn!(
                    "{}: no convergence from {} sensors after {:.1} ms",
                    target_id,
                    found,
                    start.elapsed().as_secs_f64() * 1.0E3,
                );
                SolveOutcome::DidNotConverge
            },
        }
    }

    /// Levenberg-Marquardt over (latitude, longitude), degrees.
    /// Returns the converged position and its final residual vector, or
    /// None: near singular geometry (colinear or coincident sensors)
    /// escalates the damping past its cap and lands here rather than in
    /// a NaN position.
    fn minimize(
        &self,
        sensors: &[(f64, f64)],
        tdoa_s: &[f64],
    ) -> Option<(f64, f64, DVector<f64>)> {
        // initial guess: unweighted sensor centroid
        let n = sensors.len() as f64;
        let mut x = DVector::from_vec(vec![
            sensors.iter().map(|s| s.0).sum::<f64>() / n,
            sensors.iter().map(|s| s.1).sum::<f64>() / n,
        ]);

        let mut residuals = residual_vector(&x, sensors, tdoa_s);
        if residuals.iter().any(|r| !r.is_finite()) {
            return None;
        }

        let mut lambda = self.opts.initial_damping;
        let mut converged = false;

        for _ in 0..self.opts.max_iterations {
            let norm = residuals.norm();
            if norm < RESIDUAL_CONVERGENCE_S {
                converged = true;
                break;
            }

            let jacobian = self.jacobian(&x, &residuals, sensors, tdoa_s);
            let jt = jacobian.transpose();
            let jtj = &jt * &jacobian;
            let jtr = &jt * &residuals;

            let mut stepped = false;
            for _ in 0..DAMPING_RETRIES {
                let mut damped = jtj.clone();
                damped[(0, 0)] += lambda;
                damped[(1, 1)] += lambda;

                let step = match damped.try_inverse() {
                    Some(inverse) => inverse * -&jtr,
                    None => {
                        lambda *= 10.0;
                        if lambda > MAX_DAMPING {
                            return None;
                        }
                        continue;
                    },
                };

                let candidate = &x + &step;
                let candidate_residuals = residual_vector(&candidate, sensors, tdoa_s);
                let candidate_norm = candidate_residuals.norm();

                if candidate_norm.is_finite() && candidate_norm < norm {
                    x = candidate;
                    residuals = candidate_residuals;
                    lambda = (lambda * 0.1).max(MIN_DAMPING);
                    stepped = true;
                    if step.norm() < self.opts.convergence_step_deg
                        || norm - candidate_norm < PLATEAU_S
                    {
                        converged = true;
                    }
                    break;
                }

                lambda *= 10.0;
                if lambda > MAX_DAMPING {
                    return None;
                }
            }

            if converged {
                break;
            }
            if !stepped {
                return None;
            }
        }

        if !converged {
            return None;
        }

        let (latitude_deg, longitude_deg) = (x[0], x[1]);
        if !latitude_deg.is_finite()
            || !longitude_deg.is_finite()
            || !(-90.0..=90.0).contains(&latitude_deg)
            || !(-180.0..=180.0).contains(&longitude_deg)
        {
            return None;
        }

        Some((latitude_deg, longitude_deg, residuals))
    }

    /// Forward difference Jacobian of the residual vector
    fn jacobian(
        &self,
        x: &DVector<f64>,
        residuals: &DVector<f64>,
        sensors: &[(f64, f64)],
        tdoa_s: &[f64],
    ) -> DMatrix<f64> {
        let delta = self.opts.finite_diff_step_deg;
        let mut jacobian = DMatrix::zeros(residuals.len(), 2);

        for j in 0..2 {
            let mut x_plus = x.clone();
            x_plus[j] += delta;
            let residuals_plus = residual_vector(&x_plus, sensors, tdoa_s);
            for i in 0..residuals.len() {
                jacobian[(i, j)] = (residuals_plus[i] - residuals[i]) / delta;
            }
        }

        jacobian
    }
}

/// Modeled minus observed time differences (seconds) at a candidate
/// position, one entry per non reference sensor.
fn residual_vector(x: &DVector<f64>, sensors: &[(f64, f64)], tdoa_s: &[f64]) -> DVector<f64> {
    let d0 = geodesic::distance_m(x[0], x[1], sensors[0].0, sensors[0].1);
    DVector::from_iterator(
        sensors.len() - 1,
        sensors.iter().zip(tdoa_s).skip(1).map(|(sensor, dt)| {
            let d = geodesic::distance_m(x[0], x[1], sensor.0, sensor.1);
            (d - d0) / SPEED_OF_LIGHT_M_S - dt
        }),
    )
}

/// RMS of the residual vector in nanoseconds, mapped to [0, 100]:
/// each nanosecond of timing disagreement costs 0.05 points. Rounded to
/// 2 decimal places.
fn confidence_from_residuals(residuals: &DVector<f64>) -> f64 {
    if residuals.is_empty() {
        return 100.0;
    }
    let rms_ns =
        (residuals.iter().map(|r| r * r).sum::<f64>() / residuals.len() as f64).sqrt() * NANOS_PER_S;
    let score = (100.0 - rms_ns * 0.05).clamp(0.0, 100.0);
    (score * 100.0).round() / 100.0
}
