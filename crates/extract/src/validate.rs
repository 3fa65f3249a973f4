use serde_json::Value;

use crate::error::ExtractError;

/// Parse raw model output as JSON. On failure the full raw text rides along
/// in the error so it reaches the operator unchanged.
pub fn parse_json(raw: &str) -> Result<Value, ExtractError> {
    serde_json::from_str(raw).map_err(|source| ExtractError::Parse {
        source,
        raw: raw.to_string(),
    })
}

/// Validate a parsed value against a JSON Schema. Collects every violation,
/// each prefixed with the instance path of the offending element.
pub fn validate_against(schema: &Value, value: &Value) -> Result<(), ExtractError> {
    let validator = jsonschema::validator_for(schema).map_err(|e| ExtractError::Schema {
        violations: vec![format!("schema definition rejected: {e}")],
    })?;

    let violations: Vec<String> = validator
        .iter_errors(value)
        .map(|err| {
            let path = err.instance_path.to_string();
            if path.is_empty() {
                err.to_string()
            } else {
                format!("{path}: {err}")
            }
        })
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ExtractError::Schema { violations })
    }
}
