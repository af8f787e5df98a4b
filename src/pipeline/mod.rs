//! Solve pipeline
//!
//! [Pipeline] sequences one request end to end: ingest inline
//! observations, assemble the candidate set for the target, reduce,
//! gate on sensor count, solve, score the geometry, then notarize and
//! (for high confidence fixes) mint through the configured
//! collaborators. Requests are independent: methods take `&self`, hold
//! no locks across the numerical solve, and suspend only at
//! collaborator I/O, so any number of targets may be solved
//! concurrently. Abandoning a request at an await point leaves no
//! partial state behind.
use std::sync::Arc;

use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::cfg::Config;
use crate::constants::NANOS_PER_MS;
use crate::error::Error;
use crate::estimate::{PositionEstimate, SolveOutcome};
use crate::gdop::GdopEstimator;
use crate::observation::SensorObservation;
use crate::reducer::reduce;
use crate::solver::Solver;

mod adapters;
mod buffer;

pub use adapters::{AdapterError, AssetMinter, ImmutableLog, ObservationStore};
pub use buffer::FallbackBuffer;

/// One solve request: a target, optional inline observations to ingest
/// first, and the recency window.
#[derive(Debug, Clone)]
pub struct ProcessRequest {
    /// Tracked object identity (ICAO style address, case insensitive)
    pub target_id: String,
    /// Observations delivered with the request, may be empty
    pub observations: Vec<SensorObservation>,
    /// Recency window (milliseconds). [Config::window_ms] applies when
    /// unset.
    pub window_ms: Option<i64>,
}

impl ProcessRequest {
    /// Builds a new [ProcessRequest] with given window
    pub fn new(target_id: &str, observations: Vec<SensorObservation>, window_ms: i64) -> Self {
        Self {
            target_id: target_id.to_string(),
            observations,
            window_ms: Some(window_ms),
        }
    }

    /// Builds a new [ProcessRequest] that uses the configured default
    /// window
    pub fn with_default_window(target_id: &str, observations: Vec<SensorObservation>) -> Self {
        Self {
            target_id: target_id.to_string(),
            observations,
            window_ms: None,
        }
    }
}

/// Outcome of one [Pipeline::process] call. `success` is false only for
/// data insufficiency or non convergence; collaborator trouble never
/// fails a request. The message always spells out the counts involved so
/// the caller can decide to retry, widen the window, or add sensors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessReport {
    pub success: bool,
    pub message: String,
    /// Observations accepted during the ingest step
    pub ingested: usize,
    pub position: Option<PositionEstimate>,
    /// Sequence number assigned by the immutable log, when notarized
    pub ledger_sequence: Option<u64>,
}

/// Collaborator reachability, answered without any round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub store_ok: bool,
    pub log_ok: bool,
    pub sink_ok: bool,
}

/// [Pipeline] owns the solve components and the optional collaborator
/// adapters. Stateless across requests except for the bounded local
/// fallback buffer, which is created here and lives as long as the
/// pipeline.
pub struct Pipeline {
    cfg: Config,
    solver: Solver,
    gdop: GdopEstimator,
    buffer: FallbackBuffer,
    store: Option<Arc<dyn ObservationStore>>,
    ledger: Option<Arc<dyn ImmutableLog>>,
    minter: Option<Arc<dyn AssetMinter>>,
}

impl Pipeline {
    /// Builds a new [Pipeline] with no collaborators: observations live
    /// in the fallback buffer, notarization and minting are skipped.
    pub fn new(cfg: Config) -> Self {
        let solver = Solver::new(cfg.solver.clone());
        let gdop = GdopEstimator::new(cfg.gdop.clone());
        let buffer = FallbackBuffer::with_capacity(cfg.buffer_capacity);
        Self {
            cfg,
            solver,
            gdop,
            buffer,
            store: None,
            ledger: None,
            minter: None,
        }
    }

    /// Copies and returns [Pipeline] with given observation store
    pub fn with_store(mut self, store: Arc<dyn ObservationStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Copies and returns [Pipeline] with given immutable log
    pub fn with_ledger(mut self, ledger: Arc<dyn ImmutableLog>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    /// Copies and returns [Pipeline] with given minting sink
    pub fn with_minter(mut self, minter: Arc<dyn AssetMinter>) -> Self {
        self.minter = Some(minter);
        self
    }

    /// Validates and persists a batch of observations, returning the
    /// accepted count. Falls back to the local buffer when the store is
    /// missing or unreachable.
    pub async fn ingest(&self, observations: Vec<SensorObservation>) -> Result<usize, Error> {
        if observations.is_empty() {
            return Ok(0);
        }
        for obs in &observations {
            obs.validate()?;
        }

        if let Some(store) = &self.store {
            match store.insert_many(&observations).await {
                Ok(count) => return Ok(count),
                Err(error) => {
                    warn!("observation store unavailable, buffering locally: {error}");
                },
            }
        }

        Ok(self.buffer.append_many(observations).await)
    }

    /// Runs one request end to end.
    pub async fn process(&self, request: ProcessRequest) -> Result<ProcessReport, Error> {
        let target_id = request.target_id.trim().to_ascii_uppercase();
        if target_id.is_empty() {
            return Err(Error::EmptyTargetId);
        }
        let window_ms = request.window_ms.unwrap_or(self.cfg.window_ms);
        if window_ms < 0 {
            return Err(Error::InvalidWindow { window_ms });
        }
        let window_ns = window_ms * NANOS_PER_MS;

        let ingested = self.ingest(request.observations).await?;

        let candidates = self.recent_observations(&target_id, window_ns).await;
        let reduced = reduce(&candidates, window_ns);

        let outcome = self.solver.solve(&target_id, &reduced, self.cfg.min_sensors);
        let estimate = match outcome {
            SolveOutcome::Solved(estimate) => estimate,
            failure => {
                return Ok(ProcessReport {
                    success: false,
                    message: failure.to_string(),
                    ingested,
                    position: None,
                    ledger_sequence: None,
                });
            },
        };

        let gdop = self.gdop.score_observations(reduced.observations());
        let mut estimate = estimate.with_gdop(gdop);

        if let Some(ledger) = &self.ledger {
            let sensor_ids = reduced
                .observations()
                .iter()
                .map(|obs| obs.sensor_id.as_str())
                .collect::<Vec<_>>();
            let payload = json!({
                "type": "tdoa_position",
                "target": estimate.target_id,
                "latitude_deg": estimate.latitude_deg,
                "longitude_deg": estimate.longitude_deg,
                "altitude_m": estimate.altitude_m,
                "confidence": estimate.confidence,
                "sensor_count": estimate.sensor_count,
                "sensor_ids": sensor_ids,
                "gdop": estimate.gdop,
                "method": estimate.method.to_string(),
                "computed_at": estimate.computed_at.to_string(),
            });
            match ledger.append(&payload).await {
                Ok(sequence) => estimate = estimate.with_ledger_sequence(sequence),
                Err(error) => warn!("{target_id}: notarization skipped: {error}"),
            }
        }

        if estimate.confidence >= self.cfg.high_confidence
            && estimate.sensor_count >= self.cfg.high_confidence_sensors
        {
            if let Some(minter) = &self.minter {
                match minter.mint(&target_id, estimate.confidence as u32).await {
                    Ok(asset_id) => estimate = estimate.with_asset_id(asset_id),
                    Err(error) => warn!("{target_id}: minting skipped: {error}"),
                }
            }
        }

        let mut message = format!(
            "TDOA solution computed from {} sensors",
            estimate.sensor_count,
        );
        if estimate.confidence < self.cfg.acceptance_threshold {
            message.push_str(&format!(
                " (confidence below threshold {}%)",
                self.cfg.acceptance_threshold,
            ));
        }

        Ok(ProcessReport {
            success: true,
            message,
            ingested,
            ledger_sequence: estimate.ledger_sequence,
            position: Some(estimate),
        })
    }

    /// Collaborator reachability. Configured adapters count as
    /// reachable: no live round trip is performed here.
    pub fn health(&self) -> Health {
        Health {
            store_ok: self.store.is_some(),
            log_ok: self.ledger.is_some(),
            sink_ok: self.minter.is_some(),
        }
    }

    /// Candidate observations for the target, from the store when it
    /// answers, otherwise from the fallback buffer.
    async fn recent_observations(
        &self,
        target_id: &str,
        window_ns: i64,
    ) -> Vec<SensorObservation> {
        if let Some(store) = &self.store {
            match store.query_window(target_id, window_ns).await {
                Ok(rows) => return rows,
                Err(error) => {
                    warn!("{target_id}: store query failed, using fallback buffer: {error}");
                },
            }
        }
        self.buffer.query_window(target_id, window_ns).await
    }
}
