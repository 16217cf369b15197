//! Generation option set and its mutation rules.
//!
//! Holds the option values behind the advanced-options panel: checkpoint
//! model, output dimensions, guidance, seed policy, and the ordered list
//! of secondary (LoRA) models. Field names serialize in the wire casing
//! the backend and the persisted blob both use (`checkpointModel`,
//! `useLastSeed`, `loras`).

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/* --------------------------------------------------------------------------
   Defaults and sentinels
   -------------------------------------------------------------------------- */

/// Placeholder checkpoint name used until the available-model list is known.
pub const DEFAULT_CHECKPOINT: &str = "default";

/// Default output dimension (applies to both width and height).
pub const DEFAULT_DIMENSION: i64 = 1024;

/// Default guidance value.
pub const DEFAULT_GUIDANCE: f64 = 3.0;

/// Seed value meaning "let the backend pick a random seed".
pub const RANDOM_SEED: i64 = -1;

/// Default strength for a newly added secondary model entry.
pub const DEFAULT_LORA_STRENGTH: f64 = 1.0;

/* --------------------------------------------------------------------------
   Validation limits
   -------------------------------------------------------------------------- */

/// Maximum number of secondary model entries.
pub const MAX_LORAS: usize = 5;

/// Minimum output dimension in pixels.
pub const MIN_DIMENSION: i64 = 512;

/// Maximum output dimension in pixels.
pub const MAX_DIMENSION: i64 = 2048;

/// Minimum guidance value.
pub const MIN_GUIDANCE: f64 = 1.0;

/// Maximum guidance value.
pub const MAX_GUIDANCE: f64 = 20.0;

/// Minimum secondary model strength.
pub const MIN_LORA_STRENGTH: f64 = 0.0;

/// Maximum secondary model strength.
pub const MAX_LORA_STRENGTH: f64 = 2.0;

/* --------------------------------------------------------------------------
   Types
   -------------------------------------------------------------------------- */

/// One secondary (LoRA) model entry: a model name and its strength weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoraSelection {
    /// Model name; empty until the user picks one.
    pub name: String,
    /// Strength weight applied on top of the checkpoint model.
    pub strength: f64,
}

impl Default for LoraSelection {
    fn default() -> Self {
        Self {
            name: String::new(),
            strength: DEFAULT_LORA_STRENGTH,
        }
    }
}

/// The full generation option set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOptions {
    /// Selected checkpoint (base) model name.
    pub checkpoint_model: String,
    /// Output width in pixels.
    pub width: i64,
    /// Output height in pixels.
    pub height: i64,
    /// Guidance value passed to the sampler.
    pub guidance: f64,
    /// Seed value; [`RANDOM_SEED`] requests a random seed.
    pub seed: i64,
    /// When true the backend resolves the seed from the last run at
    /// submission time and the local `seed` value is not meaningful.
    pub use_last_seed: bool,
    /// Ordered secondary model entries; the first entry is mandatory.
    pub loras: Vec<LoraSelection>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            checkpoint_model: DEFAULT_CHECKPOINT.to_string(),
            width: DEFAULT_DIMENSION,
            height: DEFAULT_DIMENSION,
            guidance: DEFAULT_GUIDANCE,
            seed: RANDOM_SEED,
            use_last_seed: false,
            loras: vec![LoraSelection::default()],
        }
    }
}

/// Model names offered by the backend, split by model kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AvailableModels {
    /// Checkpoint (base) model names.
    pub checkpoints: Vec<String>,
    /// Secondary (LoRA) model names.
    pub loras: Vec<String>,
}

/// A partial change to the option set; unset fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct OptionsPatch {
    pub checkpoint_model: Option<String>,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub guidance: Option<f64>,
    /// Explicit seed value. Setting one switches `use_last_seed` off.
    pub seed: Option<i64>,
    /// Enabling resets the local seed to [`RANDOM_SEED`].
    pub use_last_seed: Option<bool>,
    /// Positional edit of one secondary model entry.
    pub lora: Option<LoraEdit>,
}

/// Edit of a single secondary model entry by position.
#[derive(Debug, Clone)]
pub struct LoraEdit {
    pub index: usize,
    pub name: Option<String>,
    pub strength: Option<f64>,
}

/* --------------------------------------------------------------------------
   Mutation rules
   -------------------------------------------------------------------------- */

impl GenerationOptions {
    /// Merge a partial change into this option set.
    ///
    /// Seed rules: enabling `use_last_seed` resets the local seed to
    /// [`RANDOM_SEED`]; an explicit `seed` value switches `use_last_seed`
    /// off. A patch carrying both resolves to the explicit seed.
    pub fn apply(&mut self, patch: &OptionsPatch) -> Result<(), CoreError> {
        if let Some(model) = &patch.checkpoint_model {
            self.checkpoint_model = model.clone();
        }
        if let Some(width) = patch.width {
            self.width = width;
        }
        if let Some(height) = patch.height {
            self.height = height;
        }
        if let Some(guidance) = patch.guidance {
            self.guidance = guidance;
        }

        if let Some(enabled) = patch.use_last_seed {
            self.set_use_last_seed(enabled);
        }
        if let Some(seed) = patch.seed {
            self.set_seed(seed);
        }

        if let Some(edit) = &patch.lora {
            let len = self.loras.len();
            let entry = self.loras.get_mut(edit.index).ok_or_else(|| {
                CoreError::Validation(format!(
                    "Secondary model index {} out of range (have {len})",
                    edit.index
                ))
            })?;
            if let Some(name) = &edit.name {
                entry.name = name.clone();
            }
            if let Some(strength) = edit.strength {
                entry.strength = strength;
            }
        }

        Ok(())
    }

    /// Set the seed policy. Enabling resets the local seed to
    /// [`RANDOM_SEED`]; the authoritative value is resolved server-side at
    /// submission time. Disabling keeps the current seed value.
    pub fn set_use_last_seed(&mut self, enabled: bool) {
        self.use_last_seed = enabled;
        if enabled {
            self.seed = RANDOM_SEED;
        }
    }

    /// Set an explicit seed value, switching `use_last_seed` off.
    pub fn set_seed(&mut self, seed: i64) {
        self.seed = seed;
        self.use_last_seed = false;
    }

    /// Append an empty secondary model entry. Returns `false` without
    /// changing anything once [`MAX_LORAS`] entries exist.
    pub fn add_lora(&mut self) -> bool {
        if self.loras.len() >= MAX_LORAS {
            return false;
        }
        self.loras.push(LoraSelection::default());
        true
    }

    /// Remove the secondary model entry at `index`. The first entry is
    /// mandatory and never removed; out-of-range indexes are ignored.
    /// Returns whether an entry was removed.
    pub fn remove_lora(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.loras.len() {
            return false;
        }
        self.loras.remove(index);
        true
    }

    /// Restore the mandatory first entry if the list is empty (a persisted
    /// blob from an older session may carry an empty list).
    pub fn ensure_mandatory_lora(&mut self) {
        if self.loras.is_empty() {
            self.loras.push(LoraSelection::default());
        }
    }
}

/* --------------------------------------------------------------------------
   Validation
   -------------------------------------------------------------------------- */

/// Validate an option set against the panel limits.
pub fn validate_options(options: &GenerationOptions) -> Result<(), CoreError> {
    if options.checkpoint_model.is_empty() {
        return Err(CoreError::Validation(
            "Checkpoint model must not be empty".to_string(),
        ));
    }

    validate_dimension("width", options.width)?;
    validate_dimension("height", options.height)?;

    if options.guidance < MIN_GUIDANCE || options.guidance > MAX_GUIDANCE {
        return Err(CoreError::Validation(format!(
            "Guidance must be between {MIN_GUIDANCE} and {MAX_GUIDANCE}, got {}",
            options.guidance
        )));
    }

    if options.loras.is_empty() || options.loras.len() > MAX_LORAS {
        return Err(CoreError::Validation(format!(
            "Secondary model count must be between 1 and {MAX_LORAS}, got {}",
            options.loras.len()
        )));
    }

    for (index, lora) in options.loras.iter().enumerate() {
        if lora.strength < MIN_LORA_STRENGTH || lora.strength > MAX_LORA_STRENGTH {
            return Err(CoreError::Validation(format!(
                "Secondary model {index} strength must be between \
                 {MIN_LORA_STRENGTH} and {MAX_LORA_STRENGTH}, got {}",
                lora.strength
            )));
        }
    }

    Ok(())
}

/// Validate one output dimension is within the allowed pixel range.
fn validate_dimension(field: &str, value: i64) -> Result<(), CoreError> {
    if value < MIN_DIMENSION || value > MAX_DIMENSION {
        return Err(CoreError::Validation(format!(
            "{field} must be between {MIN_DIMENSION} and {MAX_DIMENSION}, got {value}"
        )));
    }
    Ok(())
}

/* --------------------------------------------------------------------------
   Tests
   -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // --- Defaults and wire format ---

    #[test]
    fn defaults_carry_one_mandatory_lora() {
        let options = GenerationOptions::default();
        assert_eq!(options.checkpoint_model, DEFAULT_CHECKPOINT);
        assert_eq!(options.width, 1024);
        assert_eq!(options.height, 1024);
        assert_eq!(options.guidance, 3.0);
        assert_eq!(options.seed, RANDOM_SEED);
        assert!(!options.use_last_seed);
        assert_eq!(options.loras.len(), 1);
        assert_eq!(options.loras[0].name, "");
        assert_eq!(options.loras[0].strength, 1.0);
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let options = GenerationOptions::default();
        let value = serde_json::to_value(&options).unwrap();
        assert_eq!(value["checkpointModel"], "default");
        assert_eq!(value["useLastSeed"], false);
        assert_eq!(value["loras"][0]["strength"], 1.0);
    }

    #[test]
    fn deserializes_persisted_blob() {
        let blob = json!({
            "checkpointModel": "base-v2.safetensors",
            "width": 768,
            "height": 1152,
            "guidance": 4.5,
            "seed": 12345,
            "useLastSeed": false,
            "loras": [{"name": "detail-tweaker", "strength": 0.8}]
        });
        let options: GenerationOptions = serde_json::from_value(blob).unwrap();
        assert_eq!(options.checkpoint_model, "base-v2.safetensors");
        assert_eq!(options.seed, 12345);
        assert_eq!(options.loras[0].name, "detail-tweaker");
    }

    // --- Patch merge ---

    #[test]
    fn apply_merges_set_fields_only() {
        let mut options = GenerationOptions::default();
        let patch = OptionsPatch {
            width: Some(1536),
            guidance: Some(7.5),
            ..Default::default()
        };
        options.apply(&patch).unwrap();
        assert_eq!(options.width, 1536);
        assert_eq!(options.height, 1024);
        assert_eq!(options.guidance, 7.5);
        assert_eq!(options.checkpoint_model, DEFAULT_CHECKPOINT);
    }

    #[test]
    fn apply_edits_lora_entry_by_index() {
        let mut options = GenerationOptions::default();
        options.add_lora();
        let patch = OptionsPatch {
            lora: Some(LoraEdit {
                index: 1,
                name: Some("style-lora".to_string()),
                strength: Some(0.6),
            }),
            ..Default::default()
        };
        options.apply(&patch).unwrap();
        assert_eq!(options.loras[1].name, "style-lora");
        assert_eq!(options.loras[1].strength, 0.6);
        // First entry untouched.
        assert_eq!(options.loras[0].name, "");
    }

    #[test]
    fn apply_rejects_out_of_range_lora_index() {
        let mut options = GenerationOptions::default();
        let patch = OptionsPatch {
            lora: Some(LoraEdit {
                index: 3,
                name: Some("x".to_string()),
                strength: None,
            }),
            ..Default::default()
        };
        let err = options.apply(&patch).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    // --- Seed rules ---

    #[test]
    fn enabling_use_last_seed_resets_seed() {
        let mut options = GenerationOptions::default();
        options.set_seed(42);
        options.set_use_last_seed(true);
        assert!(options.use_last_seed);
        assert_eq!(options.seed, RANDOM_SEED);
    }

    #[test]
    fn disabling_use_last_seed_keeps_seed() {
        let mut options = GenerationOptions::default();
        options.set_use_last_seed(true);
        options.set_use_last_seed(false);
        assert!(!options.use_last_seed);
        assert_eq!(options.seed, RANDOM_SEED);
    }

    #[test]
    fn explicit_seed_switches_use_last_seed_off() {
        let mut options = GenerationOptions::default();
        options.set_use_last_seed(true);
        options.set_seed(9876);
        assert!(!options.use_last_seed);
        assert_eq!(options.seed, 9876);
    }

    #[test]
    fn patch_with_both_seed_fields_resolves_to_explicit_seed() {
        let mut options = GenerationOptions::default();
        let patch = OptionsPatch {
            seed: Some(777),
            use_last_seed: Some(true),
            ..Default::default()
        };
        options.apply(&patch).unwrap();
        assert!(!options.use_last_seed);
        assert_eq!(options.seed, 777);
    }

    // --- Secondary model list rules ---

    #[test]
    fn add_lora_caps_at_five_entries() {
        let mut options = GenerationOptions::default();
        for _ in 0..4 {
            assert!(options.add_lora());
        }
        assert_eq!(options.loras.len(), 5);
        assert!(!options.add_lora());
        assert_eq!(options.loras.len(), 5);
    }

    #[test]
    fn remove_lora_never_removes_first_entry() {
        let mut options = GenerationOptions::default();
        options.add_lora();
        assert!(!options.remove_lora(0));
        assert_eq!(options.loras.len(), 2);
        assert!(options.remove_lora(1));
        assert_eq!(options.loras.len(), 1);
    }

    #[test]
    fn remove_lora_ignores_out_of_range_index() {
        let mut options = GenerationOptions::default();
        assert!(!options.remove_lora(7));
        assert_eq!(options.loras.len(), 1);
    }

    #[test]
    fn ensure_mandatory_lora_restores_empty_list() {
        let mut options = GenerationOptions::default();
        options.loras.clear();
        options.ensure_mandatory_lora();
        assert_eq!(options.loras.len(), 1);
        options.ensure_mandatory_lora();
        assert_eq!(options.loras.len(), 1);
    }

    // --- Validation ---

    #[test]
    fn validate_accepts_defaults() {
        assert!(validate_options(&GenerationOptions::default()).is_ok());
    }

    #[test]
    fn validate_rejects_empty_checkpoint() {
        let mut options = GenerationOptions::default();
        options.checkpoint_model.clear();
        let err = validate_options(&options).unwrap_err();
        assert!(err.to_string().contains("Checkpoint model"));
    }

    #[test]
    fn validate_rejects_out_of_range_dimensions() {
        let mut options = GenerationOptions::default();
        options.width = 256;
        assert!(validate_options(&options).is_err());

        options.width = DEFAULT_DIMENSION;
        options.height = 4096;
        assert!(validate_options(&options).is_err());
    }

    #[test]
    fn validate_rejects_out_of_range_guidance() {
        let mut options = GenerationOptions::default();
        options.guidance = 0.5;
        assert!(validate_options(&options).is_err());
        options.guidance = 21.0;
        assert!(validate_options(&options).is_err());
    }

    #[test]
    fn validate_rejects_out_of_range_strength() {
        let mut options = GenerationOptions::default();
        options.loras[0].strength = 2.5;
        let err = validate_options(&options).unwrap_err();
        assert!(err.to_string().contains("strength"));
    }

    #[test]
    fn validate_rejects_empty_lora_list() {
        let mut options = GenerationOptions::default();
        options.loras.clear();
        assert!(validate_options(&options).is_err());
    }
}
