use std::path::PathBuf;

/// Console configuration loaded from environment variables.
///
/// All fields have defaults suitable for a service instance on the local
/// machine. Override via environment variables (a `.env` file is read by
/// the binary).
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Service base HTTP URL (default: `http://localhost:5000`).
    pub base_url: String,
    /// File backing the JSON key-value store
    /// (default: `chargen-state.json`).
    pub state_file: PathBuf,
    /// Character whose options the console session edits
    /// (default: `default`).
    pub character: String,
    /// Seconds between last-seed polls (default: `5`).
    pub seed_poll_interval_secs: u64,
}

/// Default interval between last-seed polls.
const DEFAULT_SEED_POLL_INTERVAL_SECS: u64 = 5;

impl ConsoleConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                 |
    /// |---------------------------|-------------------------|
    /// | `CONSOLE_BASE_URL`        | `http://localhost:5000` |
    /// | `CONSOLE_STATE_FILE`      | `chargen-state.json`    |
    /// | `CONSOLE_CHARACTER`       | `default`               |
    /// | `SEED_POLL_INTERVAL_SECS` | `5`                     |
    pub fn from_env() -> Self {
        let base_url = std::env::var("CONSOLE_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:5000".into());

        let state_file: PathBuf = std::env::var("CONSOLE_STATE_FILE")
            .unwrap_or_else(|_| "chargen-state.json".into())
            .into();

        let character =
            std::env::var("CONSOLE_CHARACTER").unwrap_or_else(|_| "default".into());

        let seed_poll_interval_secs: u64 = std::env::var("SEED_POLL_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_SEED_POLL_INTERVAL_SECS);

        Self {
            base_url,
            state_file,
            character,
            seed_poll_interval_secs,
        }
    }
}
