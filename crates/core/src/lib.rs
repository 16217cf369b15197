//! Domain logic for the character generation console.
//!
//! Pure types and rules with no I/O: the generation option set and its
//! mutation rules, workflow-default extraction, permission collections,
//! and file-browser path/selection logic. HTTP access lives in
//! `chargen-client`; session orchestration lives in `chargen-console`.

pub mod browse;
pub mod error;
pub mod options;
pub mod permissions;
pub mod types;
pub mod workflow;

pub use error::CoreError;
