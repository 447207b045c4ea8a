//! Field schema validation.
//!
//! Pure and total over arbitrary JSON trees. A required field that is
//! missing (or null, or empty string) yields exactly one error and no
//! further checks for that field; every other failure accumulates so the
//! caller sees the full picture in one pass.

use hookline_types::webhook::{FieldSpec, FieldType, RuleType, ValidationRule};
use serde_json::Value;

use super::path::get_path;

/// Per-field verdict with every error collected for that field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldResult {
    pub field_key: String,
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// Validate a payload against an ordered field schema.
pub fn validate(payload: &Value, fields: &[FieldSpec]) -> Vec<FieldResult> {
    fields.iter().map(|f| validate_field(payload, f)).collect()
}

pub fn is_valid(results: &[FieldResult]) -> bool {
    results.iter().all(|r| r.is_valid)
}

/// Flatten all error strings in field order.
pub fn collect_errors(results: &[FieldResult]) -> Vec<String> {
    results.iter().flat_map(|r| r.errors.iter().cloned()).collect()
}

fn validate_field(payload: &Value, field: &FieldSpec) -> FieldResult {
    let value = get_path(payload, &field.key);
    let empty = matches!(value, None | Some(Value::Null))
        || matches!(value, Some(Value::String(s)) if s.is_empty());

    if empty {
        if field.required {
            return FieldResult {
                field_key: field.key.clone(),
                is_valid: false,
                errors: vec![format!("field '{}' is required", field.key)],
            };
        }
        return FieldResult {
            field_key: field.key.clone(),
            is_valid: true,
            errors: Vec::new(),
        };
    }

    // Empty handling above already returned for the None case.
    let Some(value) = value else {
        return FieldResult {
            field_key: field.key.clone(),
            is_valid: true,
            errors: Vec::new(),
        };
    };

    let mut errors = Vec::new();
    if !type_matches(value, field.field_type) {
        errors.push(format!(
            "field '{}' must be a {}",
            field.key,
            field.field_type.as_str()
        ));
    }

    for rule in &field.validation_rules {
        if let Some(error) = apply_rule(value, field, rule) {
            errors.push(error);
        }
    }

    FieldResult {
        field_key: field.key.clone(),
        is_valid: errors.is_empty(),
        errors,
    }
}

fn type_matches(value: &Value, expected: FieldType) -> bool {
    match expected {
        FieldType::String => value.is_string(),
        FieldType::Number => value.is_number(),
        FieldType::Boolean => value.is_boolean(),
        FieldType::Array => value.is_array(),
        FieldType::Object => value.is_object(),
    }
}

fn apply_rule(value: &Value, field: &FieldSpec, rule: &ValidationRule) -> Option<String> {
    let failed = match rule.rule_type {
        RuleType::Min => bound_violated(value, &rule.value, |actual, limit| actual < limit),
        RuleType::Max => bound_violated(value, &rule.value, |actual, limit| actual > limit),
        RuleType::Pattern => pattern_violated(value, &rule.value, &field.key),
        RuleType::Enum => enum_violated(value, &rule.value),
        RuleType::Custom => false,
    };

    if !failed {
        return None;
    }
    Some(match &rule.message {
        Some(m) => m.clone(),
        None => generated_message(field, rule),
    })
}

fn bound_violated(value: &Value, limit: &Value, violates: fn(f64, f64) -> bool) -> bool {
    let limit = match limit.as_f64() {
        Some(l) => l,
        None => return false,
    };
    match value {
        Value::Number(n) => n.as_f64().map(|v| violates(v, limit)).unwrap_or(false),
        Value::String(s) => violates(s.chars().count() as f64, limit),
        _ => false,
    }
}

fn pattern_violated(value: &Value, pattern: &Value, key: &str) -> bool {
    let (Value::String(s), Value::String(p)) = (value, pattern) else {
        return false;
    };
    match regex::Regex::new(p) {
        Ok(re) => !re.is_match(s),
        Err(err) => {
            tracing::warn!(field = key, error = %err, "skipping unparsable pattern rule");
            false
        }
    }
}

fn enum_violated(value: &Value, allowed: &Value) -> bool {
    match allowed.as_array() {
        Some(list) => !list.contains(value),
        None => false,
    }
}

fn generated_message(field: &FieldSpec, rule: &ValidationRule) -> String {
    let key = &field.key;
    match rule.rule_type {
        RuleType::Min => match rule.value.as_f64() {
            Some(v) if field.field_type == FieldType::String => {
                format!("field '{key}' must be at least {v} characters")
            }
            Some(v) => format!("field '{key}' must be at least {v}"),
            None => format!("field '{key}' violates a min rule"),
        },
        RuleType::Max => match rule.value.as_f64() {
            Some(v) if field.field_type == FieldType::String => {
                format!("field '{key}' must be at most {v} characters")
            }
            Some(v) => format!("field '{key}' must be at most {v}"),
            None => format!("field '{key}' violates a max rule"),
        },
        RuleType::Pattern => format!("field '{key}' does not match the required pattern"),
        RuleType::Enum => format!("field '{key}' must be one of the allowed values"),
        RuleType::Custom => format!("field '{key}' failed a custom rule"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field(key: &str, ty: FieldType, required: bool, rules: Vec<ValidationRule>) -> FieldSpec {
        FieldSpec {
            key: key.to_string(),
            field_type: ty,
            required,
            default_value: None,
            validation_rules: rules,
        }
    }

    fn rule(ty: RuleType, value: Value) -> ValidationRule {
        ValidationRule {
            rule_type: ty,
            value,
            message: None,
        }
    }

    #[test]
    fn test_all_valid_payload() {
        let fields = vec![
            field("to", FieldType::String, true, vec![]),
            field("count", FieldType::Number, true, vec![]),
        ];
        let results = validate(&json!({"to": "a@b.com", "count": 3}), &fields);
        assert!(is_valid(&results));
        assert!(collect_errors(&results).is_empty());
    }

    #[test]
    fn test_required_missing_is_a_single_error() {
        let fields = vec![field(
            "to",
            FieldType::String,
            true,
            vec![rule(RuleType::Min, json!(5))],
        )];
        let results = validate(&json!({}), &fields);
        assert!(!is_valid(&results));
        assert_eq!(results[0].errors, vec!["field 'to' is required"]);
    }

    #[test]
    fn test_required_rejects_null_and_empty_string() {
        let fields = vec![field("to", FieldType::String, true, vec![])];
        assert!(!is_valid(&validate(&json!({"to": null}), &fields)));
        assert!(!is_valid(&validate(&json!({"to": ""}), &fields)));
    }

    #[test]
    fn test_optional_empty_skips_all_checks() {
        let fields = vec![field(
            "nick",
            FieldType::String,
            false,
            vec![rule(RuleType::Min, json!(3))],
        )];
        assert!(is_valid(&validate(&json!({}), &fields)));
        assert!(is_valid(&validate(&json!({"nick": ""}), &fields)));
    }

    #[test]
    fn test_type_mismatch_still_runs_rules() {
        let fields = vec![field(
            "count",
            FieldType::Number,
            true,
            vec![rule(RuleType::Min, json!(10))],
        )];
        let results = validate(&json!({"count": "abc"}), &fields);
        assert_eq!(results[0].errors.len(), 2);
        assert_eq!(results[0].errors[0], "field 'count' must be a number");
    }

    #[test]
    fn test_array_is_not_object() {
        let fields = vec![field("meta", FieldType::Object, true, vec![])];
        let results = validate(&json!({"meta": [1, 2]}), &fields);
        assert_eq!(results[0].errors, vec!["field 'meta' must be a object"]);

        let fields = vec![field("tags", FieldType::Array, true, vec![])];
        assert!(is_valid(&validate(&json!({"tags": [1, 2]}), &fields)));
    }

    #[test]
    fn test_min_max_on_numbers() {
        let fields = vec![field(
            "count",
            FieldType::Number,
            true,
            vec![rule(RuleType::Min, json!(2)), rule(RuleType::Max, json!(5))],
        )];
        assert!(is_valid(&validate(&json!({"count": 3}), &fields)));
        let results = validate(&json!({"count": 1}), &fields);
        assert_eq!(results[0].errors, vec!["field 'count' must be at least 2"]);
        let results = validate(&json!({"count": 9}), &fields);
        assert_eq!(results[0].errors, vec!["field 'count' must be at most 5"]);
    }

    #[test]
    fn test_min_on_string_measures_length() {
        let fields = vec![field(
            "name",
            FieldType::String,
            true,
            vec![rule(RuleType::Min, json!(3))],
        )];
        let results = validate(&json!({"name": "ab"}), &fields);
        assert_eq!(
            results[0].errors,
            vec!["field 'name' must be at least 3 characters"]
        );
        assert!(is_valid(&validate(&json!({"name": "abc"}), &fields)));
    }

    #[test]
    fn test_pattern_applies_to_strings_only() {
        let fields = vec![field(
            "email",
            FieldType::String,
            true,
            vec![rule(RuleType::Pattern, json!("^[^@]+@[^@]+$"))],
        )];
        assert!(is_valid(&validate(&json!({"email": "a@b.com"}), &fields)));
        let results = validate(&json!({"email": "nope"}), &fields);
        assert_eq!(
            results[0].errors,
            vec!["field 'email' does not match the required pattern"]
        );
    }

    #[test]
    fn test_enum_membership() {
        let fields = vec![field(
            "color",
            FieldType::String,
            true,
            vec![rule(RuleType::Enum, json!(["red", "blue"]))],
        )];
        assert!(is_valid(&validate(&json!({"color": "red"}), &fields)));
        let results = validate(&json!({"color": "green"}), &fields);
        assert_eq!(
            results[0].errors,
            vec!["field 'color' must be one of the allowed values"]
        );
    }

    #[test]
    fn test_custom_rule_is_a_noop() {
        let fields = vec![field(
            "x",
            FieldType::String,
            true,
            vec![rule(RuleType::Custom, json!("whatever"))],
        )];
        assert!(is_valid(&validate(&json!({"x": "v"}), &fields)));
    }

    #[test]
    fn test_rule_message_overrides_generated() {
        let fields = vec![field(
            "name",
            FieldType::String,
            true,
            vec![ValidationRule {
                rule_type: RuleType::Min,
                value: json!(3),
                message: Some("name too short".to_string()),
            }],
        )];
        let results = validate(&json!({"name": "a"}), &fields);
        assert_eq!(results[0].errors, vec!["name too short"]);
    }

    #[test]
    fn test_rules_accumulate_in_declaration_order() {
        let fields = vec![field(
            "name",
            FieldType::String,
            true,
            vec![
                rule(RuleType::Min, json!(10)),
                rule(RuleType::Pattern, json!("^[a-z]+$")),
            ],
        )];
        let results = validate(&json!({"name": "AB"}), &fields);
        assert_eq!(
            results[0].errors,
            vec![
                "field 'name' must be at least 10 characters",
                "field 'name' does not match the required pattern",
            ]
        );
    }

    #[test]
    fn test_dotted_path_resolution() {
        let fields = vec![field("user.address.city", FieldType::String, true, vec![])];
        assert!(is_valid(&validate(
            &json!({"user": {"address": {"city": "Lagos"}}}),
            &fields
        )));
        assert!(!is_valid(&validate(&json!({"user": {}}), &fields)));
    }
}
