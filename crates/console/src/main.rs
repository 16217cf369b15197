//! `chargen-console` -- headless session probe for the generation
//! console.
//!
//! Connects to a running service instance, restores the persisted option
//! set for the configured character, and keeps the last-seed display
//! fresh until interrupted. Useful for checking a deployment end to end
//! without a browser.
//!
//! # Environment variables
//!
//! | Variable                  | Required | Default                 | Description                      |
//! |---------------------------|----------|-------------------------|----------------------------------|
//! | `CONSOLE_BASE_URL`        | no       | `http://localhost:5000` | Service base HTTP URL            |
//! | `CONSOLE_STATE_FILE`      | no       | `chargen-state.json`    | JSON file backing session state  |
//! | `CONSOLE_CHARACTER`       | no       | `default`               | Character the session edits      |
//! | `SEED_POLL_INTERVAL_SECS` | no       | `5`                     | Seconds between last-seed polls  |

use std::sync::Arc;
use std::time::Duration;

use chargen_client::ConsoleApi;
use chargen_console::config::ConsoleConfig;
use chargen_console::options_panel::OptionsPanel;
use chargen_console::seed_poller::SeedPoller;
use chargen_console::store::{JsonFileStore, KvStore};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chargen_console=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ConsoleConfig::from_env();
    let session_id = uuid::Uuid::new_v4();

    tracing::info!(
        %session_id,
        base_url = %config.base_url,
        state_file = %config.state_file.display(),
        character = %config.character,
        "Starting chargen-console",
    );

    let api = Arc::new(ConsoleApi::new(config.base_url.clone()));

    let models = match api.available_models().await {
        Ok(models) => models,
        Err(e) => {
            tracing::error!(error = %e, "Service unreachable");
            std::process::exit(1);
        }
    };
    tracing::info!(
        checkpoints = models.checkpoints.len(),
        loras = models.loras.len(),
        "Model catalogue loaded",
    );

    match api.user_permissions().await {
        Ok(permissions) => {
            tracing::info!(
                can_delete_files = permissions.can_delete_files,
                "Session permissions resolved",
            );
        }
        Err(e) => tracing::warn!(error = %e, "Permission lookup failed"),
    }

    if let Ok(latest) = api.latest_content().await {
        if let Some(prompt) = latest.prompt {
            tracing::info!(prompt = %prompt, image_url = ?latest.image_url, "Latest content available");
        }
    }

    let store: Arc<dyn KvStore> = Arc::new(JsonFileStore::new(config.state_file.clone()));
    let panel = match OptionsPanel::open(
        Arc::clone(&api),
        store,
        config.character.clone(),
        &models,
    ) {
        Ok(panel) => panel,
        Err(e) => {
            tracing::error!(error = %e, "Failed to restore session options");
            std::process::exit(1);
        }
    };
    tracing::info!(
        checkpoint = %panel.options().checkpoint_model,
        seed = panel.options().seed,
        use_last_seed = panel.options().use_last_seed,
        "Options restored",
    );

    let poller = SeedPoller::spawn(
        Arc::clone(&api),
        Duration::from_secs(config.seed_poll_interval_secs),
    );

    let mut last_reported: Option<i64> = None;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = tokio::time::sleep(Duration::from_secs(1)) => {
                if let Some(observation) = poller.latest() {
                    if last_reported != Some(observation.seed) {
                        tracing::info!(seed = observation.seed, "Last seed changed");
                        last_reported = Some(observation.seed);
                    }
                }
            }
        }
    }

    poller.stop();
    tracing::info!(%session_id, "Shutting down");
}
