//! Background refresh of the most recent generation seed.
//!
//! Polls the last-seed endpoint on a fixed interval (with an immediate
//! first fetch) and keeps the newest observation available for display
//! and for explicit seed reuse. A failed poll keeps the previous
//! observation; the next tick simply tries again.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use chargen_client::ConsoleApi;
use chargen_core::types::Timestamp;

/// One successful seed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedObservation {
    /// Seed of the most recent run; `-1` while no run has happened.
    pub seed: i64,
    pub refreshed_at: Timestamp,
}

/// Handle to the polling task.
pub struct SeedPoller {
    latest: Arc<RwLock<Option<SeedObservation>>>,
    cancel: CancellationToken,
}

impl SeedPoller {
    /// Start polling `api` every `interval`. The first fetch happens
    /// immediately.
    pub fn spawn(api: Arc<ConsoleApi>, interval: Duration) -> Self {
        let latest: Arc<RwLock<Option<SeedObservation>>> = Arc::new(RwLock::new(None));
        let cancel = CancellationToken::new();

        let shared = Arc::clone(&latest);
        let token = cancel.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        tracing::debug!("Seed poller stopped");
                        return;
                    }
                    _ = ticker.tick() => {
                        match api.last_seed().await {
                            Ok(seed) => {
                                let observation = SeedObservation {
                                    seed,
                                    refreshed_at: chrono::Utc::now(),
                                };
                                *shared.write().expect("seed lock poisoned") = Some(observation);
                            }
                            Err(e) => {
                                tracing::debug!(error = %e, "Seed poll failed");
                            }
                        }
                    }
                }
            }
        });

        Self { latest, cancel }
    }

    /// The newest observation, if any fetch has succeeded yet.
    pub fn latest(&self) -> Option<SeedObservation> {
        *self.latest.read().expect("seed lock poisoned")
    }

    /// Stop the polling task. Idempotent.
    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for SeedPoller {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/* --------------------------------------------------------------------------
   Tests
   -------------------------------------------------------------------------- */
