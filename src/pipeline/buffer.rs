//! Local fallback storage
use log::warn;
use tokio::sync::RwLock;

use crate::observation::SensorObservation;

/// Bounded in-process observation store, used when no external store is
/// configured or the configured one is unreachable. Append only: the
/// core never compacts it. Appends serialize behind the write lock;
/// window queries read a snapshot and never observe a partial append.
#[derive(Debug)]
pub struct FallbackBuffer {
    observations: RwLock<Vec<SensorObservation>>,
    capacity: usize,
}

impl FallbackBuffer {
    /// Builds an empty [FallbackBuffer] holding at most `capacity`
    /// observations.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            observations: RwLock::new(Vec::new()),
            capacity,
        }
    }

    /// Appends as many of `observations` as capacity allows and returns
    /// that count. Overflow is rejected, not evicted.
    pub async fn append_many(&self, observations: Vec<SensorObservation>) -> usize {
        let mut guard = self.observations.write().await;
        let room = self.capacity.saturating_sub(guard.len());
        let accepted = observations.len().min(room);
        if accepted < observations.len() {
            warn!(
                "fallback buffer full: dropping {} of {} observations",
                observations.len() - accepted,
                observations.len(),
            );
        }
        guard.extend(observations.into_iter().take(accepted));
        accepted
    }

    /// Buffered observations for `target_id` (case insensitive) no older
    /// than `window_ns` behind the newest buffered record for that
    /// target.
    pub async fn query_window(&self, target_id: &str, window_ns: i64) -> Vec<SensorObservation> {
        let guard = self.observations.read().await;
        let matching = guard
            .iter()
            .filter(|obs| obs.target_id.eq_ignore_ascii_case(target_id))
            .collect::<Vec<_>>();

        let newest = match matching.iter().map(|obs| obs.timestamp_ns).max() {
            Some(newest) => newest,
            None => return Vec::new(),
        };

        matching
            .into_iter()
            .filter(|obs| newest - obs.timestamp_ns <= window_ns)
            .cloned()
            .collect()
    }

    /// Buffered observation count, all targets included.
    pub async fn len(&self) -> usize {
        self.observations.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.observations.read().await.is_empty()
    }

    #[cfg(test)]
    pub async fn reset(&self) {
        self.observations.write().await.clear();
    }
}
