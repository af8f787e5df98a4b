//! Observation reduction
use std::collections::hash_map::{Entry, HashMap};

use crate::observation::SensorObservation;

/// Reduced observation set, built fresh per solve request:
/// at most one observation per sensor (most recent wins), all within the
/// caller's window of the newest one, ascending by timestamp. The solver
/// treats the earliest entry as its time difference reference, so the
/// ordering must be deterministic for reproducible solves.
#[derive(Debug, Clone, PartialEq)]
pub struct ReducedObservationSet {
    observations: Vec<SensorObservation>,
    distinct_sensors: usize,
}

impl ReducedObservationSet {
    /// Observations retained by the reduction, oldest first.
    pub fn observations(&self) -> &[SensorObservation] {
        &self.observations
    }

    /// Number of distinct sensors seen before window filtering.
    /// Larger than [Self::len] when sensors reported outside the window.
    pub fn distinct_sensors(&self) -> usize {
        self.distinct_sensors
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// Reduces raw observations to one per sensor (most recent wins, first
/// wins on equal timestamps), drops entries older than `window_ns` behind
/// the newest survivor, and orders ascending by timestamp. Never fails on
/// small input: the caller interprets the resulting counts.
pub fn reduce(observations: &[SensorObservation], window_ns: i64) -> ReducedObservationSet {
    if observations.is_empty() {
        return ReducedObservationSet {
            observations: Vec::new(),
            distinct_sensors: 0,
        };
    }

    // Keep input indices, not map order: HashMap iteration would make the
    // tie-break and the final ordering non deterministic.
    let mut best: HashMap<&str, usize> = HashMap::new();
    for (index, obs) in observations.iter().enumerate() {
        match best.entry(obs.sensor_id.as_str()) {
            Entry::Vacant(entry) => {
                entry.insert(index);
            },
            Entry::Occupied(mut entry) => {
                if obs.timestamp_ns > observations[*entry.get()].timestamp_ns {
                    entry.insert(index);
                }
            },
        }
    }

    let distinct_sensors = best.len();

    let mut indices = best.into_values().collect::<Vec<_>>();
    indices.sort_unstable();

    let newest = indices
        .iter()
        .map(|index| observations[*index].timestamp_ns)
        .max()
        .unwrap_or(0);

    let mut kept = indices
        .into_iter()
        .map(|index| observations[index].clone())
        .filter(|obs| newest - obs.timestamp_ns <= window_ns)
        .collect::<Vec<_>>();

    kept.sort_by_key(|obs| obs.timestamp_ns);

    ReducedObservationSet {
        observations: kept,
        distinct_sensors,
    }
}
