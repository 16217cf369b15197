//! Typed HTTP clients for the character generation service.
//!
//! Two surfaces wrapped with [`reqwest`]: the console API (models, seeds,
//! workflow options, generation submission, file listings) and the admin
//! API (per-user and default permission collections). Both share one
//! error type and response helpers.

pub mod admin;
pub mod console;
pub mod error;

pub use admin::AdminApi;
pub use console::{ConsoleApi, GenerationMode};
pub use error::ApiError;
