//! Geometry quality estimation
use itertools::Itertools;

use crate::cfg::GdopConfig;
use crate::observation::SensorObservation;

/// Scores the spatial conditioning of a sensor set, independent of any
/// solve: lower is better. Residual confidence and geometry can disagree,
/// and a fix with good residuals but clustered sensors deserves the flag.
///
/// This is a coarse bounding box heuristic standing in for a rigorous
/// covariance trace GDOP; the breakpoints live in [GdopConfig].
#[derive(Debug, Clone)]
pub struct GdopEstimator {
    cfg: GdopConfig,
}

impl GdopEstimator {
    /// Builds a new [GdopEstimator] with given breakpoints
    pub fn new(cfg: GdopConfig) -> Self {
        Self { cfg }
    }

    /// Scores (latitude, longitude) sensor positions, both in degrees.
    pub fn score(&self, sensors: &[(f64, f64)]) -> f64 {
        if sensors.len() < self.cfg.min_sensors {
            return self.cfg.no_geometry_score;
        }

        let lat_spread = match sensors.iter().map(|(lat, _)| *lat).minmax().into_option() {
            Some((min, max)) => max - min,
            None => return self.cfg.no_geometry_score,
        };
        let lon_spread = match sensors.iter().map(|(_, lon)| *lon).minmax().into_option() {
            Some((min, max)) => max - min,
            None => return self.cfg.no_geometry_score,
        };

        let spread = lat_spread + lon_spread;
        if spread < self.cfg.tight_spread_deg {
            self.cfg.tight_score
        } else if spread > self.cfg.wide_spread_deg {
            self.cfg.wide_score
        } else {
            self.cfg.moderate_score
        }
    }

    /// Scores the sensors behind a set of observations.
    pub fn score_observations(&self, observations: &[SensorObservation]) -> f64 {
        let sensors = observations
            .iter()
            .map(SensorObservation::coordinates_deg)
            .collect::<Vec<_>>();
        self.score(&sensors)
    }
}

#[cfg(test)]
mod test {
    use super::GdopEstimator;
    use crate::cfg::GdopConfig;
    use rstest::rstest;

    #[test]
    fn too_few_sensors() {
        let estimator = GdopEstimator::new(GdopConfig::default());
        let sensors = vec![(47.0, 8.0), (47.1, 8.1), (47.2, 8.2)];
        assert_eq!(estimator.score(&sensors), 999.0);
    }

    #[rstest]
    #[case::clustered(0.001, 50.0)]
    #[case::moderate(0.1, 10.0)]
    #[case::spread(0.6, 2.0)]
    fn breakpoints(#[case] half_spread_deg: f64, #[case] expected: f64) {
        let estimator = GdopEstimator::new(GdopConfig::default());
        let sensors = vec![
            (47.0, 8.0),
            (47.0 + half_spread_deg, 8.0),
            (47.0, 8.0 + half_spread_deg),
            (47.0 + half_spread_deg, 8.0 + half_spread_deg),
        ];
        assert_eq!(estimator.score(&sensors), expected);
    }

    #[test]
    fn breakpoints_are_configuration() {
        let cfg = GdopConfig {
            wide_spread_deg: 10.0,
            ..Default::default()
        };
        let estimator = GdopEstimator::new(cfg);
        // would rate "wide" under defaults, "moderate" here
        let sensors = vec![(46.0, 7.0), (48.0, 7.0), (46.0, 9.0), (48.0, 9.0)];
        assert_eq!(estimator.score(&sensors), 10.0);
    }
}
