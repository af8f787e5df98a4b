//! Position solutions
use hifitime::Epoch;
use serde::{Deserialize, Serialize};

/// Positioning method behind a [PositionEstimate]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Method {
    /// Time Difference of Arrival multilateration
    #[default]
    Tdoa,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Tdoa => write!(f, "TDOA"),
        }
    }
}

/// One solved position fix. Built once per successful solve; the ledger
/// sequence number and minted asset identifier are attached afterwards by
/// the consuming [Self::with_ledger_sequence] / [Self::with_asset_id]
/// steps, never by mutating a shared instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionEstimate {
    /// Tracked object this fix is for
    pub target_id: String,
    /// Estimated latitude (degrees, WGS84)
    pub latitude_deg: f64,
    /// Estimated longitude (degrees, WGS84)
    pub longitude_deg: f64,
    /// Estimated altitude (meters). The 2D solve leaves this unset.
    pub altitude_m: Option<f64>,
    /// Residual timing agreement mapped to [0, 100], 2 decimal places
    pub confidence: f64,
    /// Sensors that contributed to the fix
    pub sensor_count: usize,
    /// Geometry quality score, lower is better
    pub gdop: Option<f64>,
    /// Positioning method
    pub method: Method,
    /// Wall clock time the fix was computed
    pub computed_at: Epoch,
    /// Immutable log sequence number, when the fix was notarized.
    /// Absence means "not notarized", not "failed".
    pub ledger_sequence: Option<u64>,
    /// Minted asset identifier, on the high confidence path
    pub asset_id: Option<String>,
}

impl PositionEstimate {
    /// Copies and returns [PositionEstimate] with given geometry score
    pub fn with_gdop(mut self, gdop: f64) -> Self {
        self.gdop = Some(gdop);
        self
    }

    /// Copies and returns [PositionEstimate] notarized under given
    /// sequence number
    pub fn with_ledger_sequence(mut self, sequence: u64) -> Self {
        self.ledger_sequence = Some(sequence);
        self
    }

    /// Copies and returns [PositionEstimate] with given minted asset
    pub fn with_asset_id(mut self, asset_id: String) -> Self {
        self.asset_id = Some(asset_id);
        self
    }
}

/// Outcome of one solve attempt. Expected data insufficiency is a typed
/// variant, never an error and never a partial estimate.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveOutcome {
    /// Converged fix
    Solved(PositionEstimate),
    /// Fewer distinct sensors than required, with any window
    InsufficientSensors { found: usize, required: usize },
    /// Enough distinct sensors overall, too few inside the time window.
    /// A wider window may succeed.
    InsufficientInWindow { found: usize, required: usize },
    /// The minimization did not converge; retry with different or more
    /// observations.
    DidNotConverge,
}

impl SolveOutcome {
    pub fn is_solved(&self) -> bool {
        matches!(self, Self::Solved(_))
    }
}

impl std::fmt::Display for SolveOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Solved(estimate) => {
                write!(
                    f,
                    "{} solution computed from {} sensors",
                    estimate.method, estimate.sensor_count
                )
            },
            Self::InsufficientSensors { found, required } => {
                write!(f, "need at least {required} unique sensors, found {found}")
            },
            Self::InsufficientInWindow { found, required } => {
                write!(
                    f,
                    "need at least {required} sensors inside the time window, found {found}"
                )
            },
            Self::DidNotConverge => {
                write!(f, "solver did not converge for the provided observations")
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Method, PositionEstimate, SolveOutcome};
    use hifitime::Epoch;

    #[test]
    fn builder_steps() {
        let estimate = PositionEstimate {
            target_id: "4840D6".to_string(),
            latitude_deg: 47.0,
            longitude_deg: 8.0,
            altitude_m: None,
            confidence: 97.5,
            sensor_count: 4,
            gdop: None,
            method: Method::Tdoa,
            computed_at: Epoch::from_unix_milliseconds(0.0),
            ledger_sequence: None,
            asset_id: None,
        };

        let notarized = estimate
            .with_gdop(2.0)
            .with_ledger_sequence(42)
            .with_asset_id("0.0.1234".to_string());
        assert_eq!(notarized.gdop, Some(2.0));
        assert_eq!(notarized.ledger_sequence, Some(42));
        assert_eq!(notarized.asset_id.as_deref(), Some("0.0.1234"));
    }

    #[test]
    fn failure_messages_carry_counts() {
        let message = SolveOutcome::InsufficientSensors {
            found: 2,
            required: 3,
        }
        .to_string();
        assert!(message.contains('2') && message.contains('3'));

        let message = SolveOutcome::InsufficientInWindow {
            found: 1,
            required: 3,
        }
        .to_string();
        assert!(message.contains("window"));
    }
}
