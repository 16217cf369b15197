//! File-browser listing types, path math, and selection state.
//!
//! Listing paths are absolute, slash-delimited, and always carry a
//! trailing slash (`/characters/aurora/`); the root is `/`. Entries are
//! transient and re-fetched on every navigation.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The listing root.
pub const ROOT_PATH: &str = "/";

// ---------------------------------------------------------------------------
// Listing entries
// ---------------------------------------------------------------------------

/// Whether a listing entry is a file or a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    File,
    Folder,
}

/// One entry of a remote directory listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    /// Wire name `type`.
    #[serde(rename = "type")]
    pub kind: FileKind,
    /// Direct URL; present for files only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

// ---------------------------------------------------------------------------
// Path math
// ---------------------------------------------------------------------------

/// The path of `folder` inside `current`.
pub fn child_path(current: &str, folder: &str) -> String {
    format!("{current}{folder}/")
}

/// The parent of `current`; the root is its own parent.
pub fn parent_path(current: &str) -> String {
    let parts: Vec<&str> = current.split('/').collect();
    // "/a/b/" splits into ["", "a", "b", ""]; dropping the last two parts
    // and rejoining yields "/a". Anything shorter is already the root.
    if parts.len() <= 3 {
        return ROOT_PATH.to_string();
    }
    let mut parent = parts[..parts.len() - 2].join("/");
    parent.push('/');
    parent
}

/// Validate a listing path: absolute, trailing slash, no traversal
/// segments.
pub fn validate_path(path: &str) -> Result<(), CoreError> {
    if !path.starts_with('/') {
        return Err(CoreError::Validation(format!(
            "Listing path must be absolute, got '{path}'"
        )));
    }
    if !path.ends_with('/') {
        return Err(CoreError::Validation(format!(
            "Listing path must end with a slash, got '{path}'"
        )));
    }
    if path.split('/').any(|segment| segment == "..") {
        return Err(CoreError::Validation(format!(
            "Listing path must not contain '..', got '{path}'"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// The set of checked entry names in the current listing.
///
/// Name-ordered so the deletion payload is deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionSet {
    names: BTreeSet<String>,
}

impl SelectionSet {
    /// Flip one name in or out of the selection. Returns whether the name
    /// is selected afterwards.
    pub fn toggle(&mut self, name: &str) -> bool {
        if self.names.remove(name) {
            false
        } else {
            self.names.insert(name.to_string());
            true
        }
    }

    /// Replace the selection with every file in `entries`; folders are
    /// never selectable.
    pub fn select_files(&mut self, entries: &[FileEntry]) {
        self.names = entries
            .iter()
            .filter(|entry| entry.kind == FileKind::File)
            .map(|entry| entry.name.clone())
            .collect();
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Selected names in lexicographic order.
    pub fn names(&self) -> Vec<String> {
        self.names.iter().cloned().collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
