//! Body template rendering.
//!
//! The working payload starts as a deep parse of the stored template.
//! For each field in declaration order the caller-supplied value wins
//! over the spec default, and whichever was picked is written at the
//! field's dotted path. A field with neither a caller value nor a
//! default leaves the template untouched. Without a template the
//! caller's raw payload passes through unmodified.

use hookline_types::webhook::FieldSpec;
use serde_json::Value;
use thiserror::Error;

use super::path::set_path;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("invalid JSON template: {0}")]
    InvalidTemplate(String),
}

/// Render the outbound payload from a body template and caller values.
///
/// Caller values are looked up by the full field key, dots included.
/// Inputs are never mutated.
pub fn render(
    template: Option<&str>,
    fields: &[FieldSpec],
    caller_values: &Value,
) -> Result<Value, TransformError> {
    let template = match template {
        Some(t) if !t.trim().is_empty() => t,
        _ => return Ok(caller_values.clone()),
    };

    let mut payload: Value = serde_json::from_str(template)
        .map_err(|e| TransformError::InvalidTemplate(e.to_string()))?;

    for field in fields {
        let supplied = caller_values
            .as_object()
            .and_then(|map| map.get(&field.key));
        let picked = match supplied {
            Some(v) => Some(v.clone()),
            None => field.default_value.clone(),
        };
        if let Some(value) = picked {
            set_path(&mut payload, &field.key, value);
        }
    }

    Ok(payload)
}
