//! The advanced-options panel hub.
//!
//! Every option edit flows through here: the change is merged into the
//! current set, the full set is persisted through the key-value store,
//! the registered observer is notified, and the set is pushed to the
//! backend for the selected character. Persist and notify complete before
//! the push goes out, so the session view is never stale relative to
//! remote confirmation. Push failures are logged and otherwise ignored;
//! local state stays authoritative for the session and nothing retries.

use std::sync::Arc;

use chargen_client::ConsoleApi;
use chargen_core::options::{self, AvailableModels, GenerationOptions, OptionsPatch};
use chargen_core::workflow;

use crate::error::ConsoleResult;
use crate::store::{KvStore, StoreError, OPTIONS_KEY};

/// Observer invoked with the full option set after every mutation.
pub type OptionsObserver = Box<dyn Fn(&GenerationOptions) + Send + Sync>;

/// Stateful panel bound to one selected character.
pub struct OptionsPanel {
    api: Arc<ConsoleApi>,
    store: Arc<dyn KvStore>,
    character: String,
    options: GenerationOptions,
    observer: Option<OptionsObserver>,
}

impl OptionsPanel {
    /// Open the panel for `character`, restoring the persisted option set.
    ///
    /// With no persisted blob the built-in defaults apply, except that the
    /// placeholder checkpoint is replaced by the first available model. An
    /// unreadable blob is discarded the same way rather than blocking the
    /// panel.
    pub fn open(
        api: Arc<ConsoleApi>,
        store: Arc<dyn KvStore>,
        character: impl Into<String>,
        available: &AvailableModels,
    ) -> ConsoleResult<Self> {
        let mut options = match store.get(OPTIONS_KEY)? {
            Some(value) => match serde_json::from_value(value) {
                Ok(options) => options,
                Err(e) => {
                    tracing::warn!(error = %e, "Discarding unreadable persisted options");
                    Self::fresh_defaults(available)
                }
            },
            None => Self::fresh_defaults(available),
        };
        options.ensure_mandatory_lora();

        Ok(Self {
            api,
            store,
            character: character.into(),
            options,
            observer: None,
        })
    }

    fn fresh_defaults(available: &AvailableModels) -> GenerationOptions {
        let mut options = GenerationOptions::default();
        if let Some(first) = available.checkpoints.first() {
            options.checkpoint_model = first.clone();
        }
        options
    }

    /// The current option set; read by the trigger at submission time.
    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    pub fn character(&self) -> &str {
        &self.character
    }

    /// Re-bind the panel to a different selected character. Later pushes
    /// are keyed by the new character; the option set itself is unchanged.
    pub fn set_character(&mut self, character: impl Into<String>) {
        self.character = character.into();
    }

    /// Register the observer notified after every mutation.
    pub fn set_observer(&mut self, observer: OptionsObserver) {
        self.observer = Some(observer);
    }

    /// Merge a partial change and run the persist / notify / push sequence.
    ///
    /// The merged set is validated against the panel limits before it is
    /// committed; a rejected patch leaves the current set untouched.
    pub async fn update(&mut self, patch: &OptionsPatch) -> ConsoleResult<()> {
        let mut next = self.options.clone();
        next.apply(patch)?;
        options::validate_options(&next)?;
        self.options = next;
        self.commit().await
    }

    /// Append an empty secondary model entry; no-op at the cap.
    pub async fn add_lora(&mut self) -> ConsoleResult<bool> {
        if !self.options.add_lora() {
            return Ok(false);
        }
        self.commit().await?;
        Ok(true)
    }

    /// Remove the secondary model entry at `index`; the first entry stays.
    pub async fn remove_lora(&mut self, index: usize) -> ConsoleResult<bool> {
        if !self.options.remove_lora(index) {
            return Ok(false);
        }
        self.commit().await?;
        Ok(true)
    }

    /// Switch the seed policy between last-seed and explicit.
    pub async fn set_use_last_seed(&mut self, enabled: bool) -> ConsoleResult<()> {
        self.options.set_use_last_seed(enabled);
        self.commit().await
    }

    /// Set an explicit seed, switching the last-seed policy off.
    pub async fn set_seed(&mut self, seed: i64) -> ConsoleResult<()> {
        self.options.set_seed(seed);
        self.commit().await
    }

    /// Replace the option set with the character's workflow defaults and
    /// run the persist / notify / push sequence. A fetch or extraction
    /// failure leaves the current set in place.
    pub async fn reset_to_defaults(&mut self) -> ConsoleResult<()> {
        let graph = self.api.default_workflow(&self.character).await?;
        self.options = workflow::extract_default_options(&graph)?;
        self.commit().await
    }

    /// Persist, notify, then push the current set.
    async fn commit(&mut self) -> ConsoleResult<()> {
        let value = serde_json::to_value(&self.options).map_err(StoreError::from)?;
        self.store.set(OPTIONS_KEY, value)?;

        if let Some(observer) = &self.observer {
            observer(&self.options);
        }

        match self
            .api
            .push_workflow_options(&self.character, &self.options)
            .await
        {
            Ok(status) if status.success => {}
            Ok(_) => {
                tracing::warn!(
                    character = %self.character,
                    "Backend rejected workflow options update",
                );
            }
            Err(e) => {
                tracing::warn!(
                    character = %self.character,
                    error = %e,
                    "Failed to push workflow options",
                );
            }
        }

        Ok(())
    }
}

/* --------------------------------------------------------------------------
   Tests
   -------------------------------------------------------------------------- */
