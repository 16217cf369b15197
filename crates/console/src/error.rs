//! Session-level error type for the console components.

use chargen_client::ApiError;
use chargen_core::CoreError;

use crate::store::StoreError;

/// Errors surfaced by the console session components.
///
/// Wraps the domain, HTTP, and persistence error types; components catch
/// and log remote failures they are specified to ignore, so an error
/// reaching the caller always means the operation did not take effect.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// A domain-level error from `chargen_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An HTTP-layer error from `chargen_client`.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A persistence error from the key-value store.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Convenience type alias for component return values.
pub type ConsoleResult<T> = Result<T, ConsoleError>;
