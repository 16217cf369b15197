//! Default-option extraction from a character's workflow graph.
//!
//! A default workflow is a backend-defined graph of generation nodes keyed
//! by node id. Node ids are not stable across graph re-exports, so the
//! generation parameters are located by node *shape*: a node qualifies by
//! the keys its `inputs` object carries. Nodes are visited in ascending
//! numeric id order and the first qualifying node wins per parameter, so
//! extraction is deterministic for a given graph.

use serde_json::Value;

use crate::error::CoreError;
use crate::options::GenerationOptions;

/// Extract the default option set from a workflow graph.
///
/// Recognized node shapes, each matched independently:
/// - checkpoint: `inputs.ckpt_name` (string)
/// - dimensions: `inputs.width` and `inputs.height` (integers, same node)
/// - guidance: `inputs.guidance` (number)
/// - seed: `inputs.seed` (integer)
/// - secondary model loader: `inputs.lora_<n>` objects carrying `lora` and
///   `strength` keys
///
/// Linked inputs are `[node_id, slot]` arrays rather than literals and are
/// skipped by the literal accessors. Parameters absent from the graph fall
/// back to the built-in defaults. Loader rows in the graph are defaults of
/// the workflow itself, not user selections, so the extracted set always
/// carries the single mandatory empty secondary entry.
///
/// Fails with [`CoreError::MalformedWorkflow`] when the value is not an
/// object or no generation parameter node is recognized at all.
pub fn extract_default_options(workflow: &Value) -> Result<GenerationOptions, CoreError> {
    let nodes = workflow.as_object().ok_or_else(|| {
        CoreError::MalformedWorkflow("workflow is not a JSON object".to_string())
    })?;

    // Ascending numeric id order; non-numeric ids sort last.
    let mut ids: Vec<&String> = nodes.keys().collect();
    ids.sort_by(|a, b| {
        let ka = a.parse::<u64>().unwrap_or(u64::MAX);
        let kb = b.parse::<u64>().unwrap_or(u64::MAX);
        ka.cmp(&kb).then_with(|| a.cmp(b))
    });

    let mut options = GenerationOptions::default();
    let mut checkpoint_found = false;
    let mut dimensions_found = false;
    let mut guidance_found = false;
    let mut seed_found = false;
    let mut loader_found = false;

    for id in ids {
        let inputs = match nodes[id.as_str()].get("inputs").and_then(Value::as_object) {
            Some(inputs) => inputs,
            None => continue,
        };

        if !checkpoint_found {
            if let Some(name) = inputs.get("ckpt_name").and_then(Value::as_str) {
                options.checkpoint_model = name.to_string();
                checkpoint_found = true;
            }
        }

        if !dimensions_found {
            let width = inputs.get("width").and_then(Value::as_i64);
            let height = inputs.get("height").and_then(Value::as_i64);
            if let (Some(width), Some(height)) = (width, height) {
                options.width = width;
                options.height = height;
                dimensions_found = true;
            }
        }

        if !guidance_found {
            if let Some(guidance) = inputs.get("guidance").and_then(Value::as_f64) {
                options.guidance = guidance;
                guidance_found = true;
            }
        }

        if !seed_found {
            if let Some(seed) = inputs.get("seed").and_then(Value::as_i64) {
                options.seed = seed;
                seed_found = true;
            }
        }

        if !loader_found && is_lora_loader(inputs) {
            loader_found = true;
        }
    }

    if !(checkpoint_found || dimensions_found || guidance_found || seed_found || loader_found) {
        return Err(CoreError::MalformedWorkflow(
            "no generation parameter nodes recognized".to_string(),
        ));
    }

    options.use_last_seed = false;
    Ok(options)
}

/// A secondary model loader node carries `lora_<n>` input objects with
/// `lora` and `strength` keys.
fn is_lora_loader(inputs: &serde_json::Map<String, Value>) -> bool {
    inputs.iter().any(|(key, value)| {
        key.starts_with("lora_")
            && value
                .as_object()
                .is_some_and(|row| row.contains_key("lora") && row.contains_key("strength"))
    })
}

/* --------------------------------------------------------------------------
   Tests
   -------------------------------------------------------------------------- */
