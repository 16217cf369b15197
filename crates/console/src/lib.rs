//! Session layer of the character generation console.
//!
//! Wires the domain rules from `chargen-core` and the HTTP surfaces from
//! `chargen-client` into the stateful components a UI embeds: the
//! options panel hub, the generation trigger, the permission editor, the
//! file browser, and the last-seed poller. The `chargen-console` binary
//! is a headless probe over the same components.

pub mod config;
pub mod error;
pub mod file_browser;
pub mod generator;
pub mod options_panel;
pub mod permission_editor;
pub mod seed_poller;
pub mod store;

pub use error::{ConsoleError, ConsoleResult};
