#![doc = include_str!("../README.md")]

// private modules
mod cfg;
mod constants;
mod error;
mod estimate;
mod gdop;
mod geodesic;
mod observation;
mod pipeline;
mod reducer;
mod solver;

#[cfg(test)]
mod tests;

// prelude
pub mod prelude {
    pub use crate::cfg::{Config, GdopConfig, SolverOpts};
    pub use crate::constants::SPEED_OF_LIGHT_M_S;
    pub use crate::error::Error;
    pub use crate::estimate::{Method, PositionEstimate, SolveOutcome};
    pub use crate::gdop::GdopEstimator;
    pub use crate::geodesic::distance_m;
    pub use crate::observation::SensorObservation;
    pub use crate::pipeline::{
        AdapterError, AssetMinter, FallbackBuffer, Health, ImmutableLog, ObservationStore,
        Pipeline, ProcessReport, ProcessRequest,
    };
    pub use crate::reducer::{reduce, ReducedObservationSet};
    pub use crate::solver::{Solver, HARD_MIN_SENSORS};
    // re-export
    pub use hifitime::Epoch;
}

// pub export
pub use error::Error;
