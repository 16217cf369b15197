//! Per-user permission collections edited by the admin console.
//!
//! Two independent collections: per-model enable flags (split into
//! checkpoint and secondary model sets) and per-character generate/browse
//! flags. Mutations here touch local editable state only; loading and
//! saving are `chargen-client` concerns.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Enable flag for one known model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPermission {
    pub name: String,
    pub enabled: bool,
}

/// The two model permission collections, partitioned by model kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelPermissionSet {
    pub checkpoints: Vec<ModelPermission>,
    pub loras: Vec<ModelPermission>,
}

/// Which model collection an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    Checkpoint,
    Lora,
}

/// Generate/browse flags for one known character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterPermission {
    pub name: String,
    pub can_generate: bool,
    pub can_browse: bool,
}

/// Which character flag a toggle targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterField {
    Generate,
    Browse,
}

// ---------------------------------------------------------------------------
// Model collection operations
// ---------------------------------------------------------------------------

impl ModelPermissionSet {
    /// The collection for `kind`.
    pub fn collection(&self, kind: ModelKind) -> &[ModelPermission] {
        match kind {
            ModelKind::Checkpoint => &self.checkpoints,
            ModelKind::Lora => &self.loras,
        }
    }

    fn collection_mut(&mut self, kind: ModelKind) -> &mut Vec<ModelPermission> {
        match kind {
            ModelKind::Checkpoint => &mut self.checkpoints,
            ModelKind::Lora => &mut self.loras,
        }
    }

    /// Flip the enabled flag of the named model. Returns whether a model
    /// with that name was found.
    pub fn toggle(&mut self, kind: ModelKind, name: &str) -> bool {
        match self
            .collection_mut(kind)
            .iter_mut()
            .find(|model| model.name == name)
        {
            Some(model) => {
                model.enabled = !model.enabled;
                true
            }
            None => false,
        }
    }

    /// Bulk-set every enabled flag in one collection.
    pub fn set_all(&mut self, kind: ModelKind, enabled: bool) {
        for model in self.collection_mut(kind) {
            model.enabled = enabled;
        }
    }

    /// Whether every model in one collection is enabled. Vacuously true for
    /// an empty collection, matching the select-all checkbox rendering.
    pub fn all_enabled(&self, kind: ModelKind) -> bool {
        self.collection(kind).iter().all(|model| model.enabled)
    }
}

// ---------------------------------------------------------------------------
// Character collection operations
// ---------------------------------------------------------------------------

/// Flip one flag of the named character. Returns whether a character with
/// that name was found.
pub fn toggle_character(
    characters: &mut [CharacterPermission],
    name: &str,
    field: CharacterField,
) -> bool {
    match characters.iter_mut().find(|c| c.name == name) {
        Some(character) => {
            match field {
                CharacterField::Generate => character.can_generate = !character.can_generate,
                CharacterField::Browse => character.can_browse = !character.can_browse,
            }
            true
        }
        None => false,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
