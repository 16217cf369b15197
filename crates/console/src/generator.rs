//! Generation trigger with single-flight submission.
//!
//! One generation request may be in flight at a time. The busy flag is
//! claimed atomically at submission, and released by a timed background
//! task rather than by request completion, so rapid re-submission stays
//! blocked for a short window even when the backend answers instantly.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chargen_client::{ConsoleApi, GenerationMode};
use chargen_core::options::GenerationOptions;

use crate::error::ConsoleResult;

/// Message reported when the backend refuses or fails a submission.
pub const GENERATION_ERROR_MESSAGE: &str = "Error occurred during generation";

/// Tunables for the trigger.
#[derive(Debug, Clone)]
pub struct TriggerConfig {
    /// Delay before the busy flag is released after a submission.
    pub busy_clear_delay: Duration,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            busy_clear_delay: Duration::from_secs(3),
        }
    }
}

/// Result of a submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A previous submission still holds the busy flag.
    Busy,
    /// The backend accepted the request.
    Accepted,
    /// The backend refused or failed the request.
    Failed { message: &'static str },
}

/// Submits generation requests, one at a time.
pub struct GenerationTrigger {
    api: Arc<ConsoleApi>,
    busy: Arc<AtomicBool>,
    config: TriggerConfig,
}

impl GenerationTrigger {
    pub fn new(api: Arc<ConsoleApi>) -> Self {
        Self::with_config(api, TriggerConfig::default())
    }

    pub fn with_config(api: Arc<ConsoleApi>, config: TriggerConfig) -> Self {
        Self {
            api,
            busy: Arc::new(AtomicBool::new(false)),
            config,
        }
    }

    /// Whether a submission currently holds the busy flag.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Submit one generation request for `character`.
    ///
    /// `character` must be the currently selected character name; the
    /// backend refuses submissions without one. The option set is pushed
    /// first so the request runs against what the panel shows; a failed
    /// push is logged and does not block submission. The prompt is only
    /// forwarded for modes that take one. The busy flag is released on a
    /// timer in both the accepted and the failed case.
    pub async fn submit(
        &self,
        mode: GenerationMode,
        character: &str,
        prompt: Option<&str>,
        options: &GenerationOptions,
    ) -> ConsoleResult<SubmitOutcome> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Ok(SubmitOutcome::Busy);
        }

        match self.api.push_workflow_options(character, options).await {
            Ok(status) if status.success => {}
            Ok(_) => {
                tracing::warn!(character, "Backend rejected pre-submission options push");
            }
            Err(e) => {
                tracing::warn!(character, error = %e, "Pre-submission options push failed");
            }
        }

        let prompt = if mode.takes_prompt() { prompt } else { None };
        let outcome = match self.api.generate(mode, character, prompt, options).await {
            Ok(status) if status.success => SubmitOutcome::Accepted,
            Ok(_) => {
                tracing::error!(character, ?mode, "Backend refused generation request");
                SubmitOutcome::Failed {
                    message: GENERATION_ERROR_MESSAGE,
                }
            }
            Err(e) => {
                tracing::error!(character, ?mode, error = %e, "Generation request failed");
                SubmitOutcome::Failed {
                    message: GENERATION_ERROR_MESSAGE,
                }
            }
        };

        let busy = Arc::clone(&self.busy);
        let delay = self.config.busy_clear_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            busy.store(false, Ordering::SeqCst);
        });

        Ok(outcome)
    }
}

/* --------------------------------------------------------------------------
   Tests
   -------------------------------------------------------------------------- */
