//! Domain error type shared by all core modules.

/// Errors produced by domain-level validation and parsing.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A value failed a domain validation rule.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A workflow graph could not be interpreted as a default option set.
    #[error("Malformed workflow: {0}")]
    MalformedWorkflow(String),
}
