//! External collaborator adapters
//!
//! One explicit trait per collaborator, written against a pinned API:
//! implementations adapt a concrete backend (a database, a distributed
//! ledger, a token service) to exactly this surface. The pipeline treats
//! them as best effort: store failures degrade to the local fallback
//! buffer, log and sink failures are skipped and only visible through
//! [Health](crate::prelude::Health).
use async_trait::async_trait;
use thiserror::Error;

use crate::observation::SensorObservation;

/// Failure of an external collaborator call. Never fatal to a request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AdapterError {
    /// Backend not reachable
    #[error("collaborator unreachable")]
    Unavailable,
    /// Backend reachable but refused the call
    #[error("collaborator rejected the call: {reason}")]
    Rejected { reason: String },
}

/// Durable storage of raw observations, queryable per target by recency
/// window.
#[async_trait]
pub trait ObservationStore: Send + Sync {
    /// Persists a batch, returns the number of records accepted.
    async fn insert_many(&self, observations: &[SensorObservation])
        -> Result<usize, AdapterError>;

    /// Observations for `target_id` no older than `window_ns` behind the
    /// newest held record. Returning a superset of the window is
    /// tolerated: the pipeline re-reduces. Records for other targets are
    /// not.
    async fn query_window(
        &self,
        target_id: &str,
        window_ns: i64,
    ) -> Result<Vec<SensorObservation>, AdapterError>;
}

/// Append only log with monotonically increasing sequence numbers per
/// topic. An absent sequence number on an estimate means "not
/// notarized", not "failed".
#[async_trait]
pub trait ImmutableLog: Send + Sync {
    async fn append(&self, payload: &serde_json::Value) -> Result<u64, AdapterError>;
}

/// Token issuance sink for high confidence fixes.
#[async_trait]
pub trait AssetMinter: Send + Sync {
    async fn mint(&self, subject_id: &str, value: u32) -> Result<String, AdapterError>;
}
