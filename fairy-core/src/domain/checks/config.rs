// fairy-core/src/domain/checks/config.rs
//
// Typed accessors over a rule's free-form config map.

use serde_json::Value;

use super::CheckError;
use crate::domain::rulepack::RuleConfig;

fn invalid(key: &str, reason: &str) -> CheckError {
    CheckError::InvalidConfig {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

pub fn opt_str<'a>(config: &'a RuleConfig, key: &str) -> Result<Option<&'a str>, CheckError> {
    match config.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Err(invalid(key, "must not be empty")),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(invalid(key, "expected a string")),
    }
}

pub fn req_str<'a>(config: &'a RuleConfig, key: &str) -> Result<&'a str, CheckError> {
    opt_str(config, key)?.ok_or_else(|| CheckError::MissingConfig(key.to_string()))
}

pub fn bool_or(config: &RuleConfig, key: &str, default: bool) -> Result<bool, CheckError> {
    match config.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(invalid(key, "expected true or false")),
    }
}

/// Optional finite number. Numeric strings are accepted, since YAML authors
/// sometimes quote bounds.
pub fn opt_f64(config: &RuleConfig, key: &str) -> Result<Option<f64>, CheckError> {
    let parsed = match config.get(key) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };
    match parsed {
        Some(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(invalid(key, "expected a finite number")),
    }
}

/// A list of scalars rendered as strings. A bare scalar is a one-element list.
pub fn opt_str_list(config: &RuleConfig, key: &str) -> Result<Option<Vec<String>>, CheckError> {
    match config.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| scalar_text(item).ok_or_else(|| invalid(key, "list items must be scalars")))
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        Some(other) => scalar_text(other)
            .map(|s| Some(vec![s]))
            .ok_or_else(|| invalid(key, "expected a list")),
    }
}

/// Column list from the first of `keys` present; also accepts a single `column`.
pub fn columns(config: &RuleConfig, keys: &[&str]) -> Result<Vec<String>, CheckError> {
    for key in keys {
        if let Some(cols) = opt_str_list(config, key)? {
            if cols.is_empty() {
                return Err(invalid(key, "must list at least one column"));
            }
            return Ok(cols);
        }
    }
    if let Some(col) = opt_str(config, "column")? {
        return Ok(vec![col.to_string()]);
    }
    Err(CheckError::MissingConfig(
        keys.first().copied().unwrap_or("columns").to_string(),
    ))
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cfg(v: Value) -> RuleConfig {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn test_columns_fallbacks() {
        let c = cfg(json!({"required_columns": ["a", "b"]}));
        assert_eq!(columns(&c, &["columns", "required_columns"]).unwrap(), ["a", "b"]);

        let c = cfg(json!({"column": "id"}));
        assert_eq!(columns(&c, &["columns"]).unwrap(), ["id"]);

        let c = cfg(json!({}));
        assert!(matches!(
            columns(&c, &["columns"]),
            Err(CheckError::MissingConfig(k)) if k == "columns"
        ));
    }

    #[test]
    fn test_numbers_accept_quoted_values() {
        let c = cfg(json!({"min": "0.5", "max": 9, "bad": "x"}));
        assert_eq!(opt_f64(&c, "min").unwrap(), Some(0.5));
        assert_eq!(opt_f64(&c, "max").unwrap(), Some(9.0));
        assert!(opt_f64(&c, "bad").is_err());
        assert_eq!(opt_f64(&c, "absent").unwrap(), None);
    }

    #[test]
    fn test_wrong_types_are_rejected() {
        let c = cfg(json!({"casefold": "yes", "column": 3}));
        assert!(bool_or(&c, "casefold", false).is_err());
        assert!(req_str(&c, "column").is_err());
    }
}
