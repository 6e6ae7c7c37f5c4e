//! Lenient field decoding
//!
//! The vendor APIs are not consistent about whether identifiers and free-form
//! fields are sent as strings or numbers.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decode an optional string field that may arrive as a string, a number or a
/// boolean. `null` and missing fields decode as `None`.
pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

/// Decode an optional integer field that may arrive as a number or a numeric
/// string. Anything else decodes as `None`.
pub fn opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(Value::String(s)) => s.trim().parse().ok(),
        Some(Value::Bool(b)) => Some(b as i64),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "super::opt_string")]
        text: Option<String>,
        #[serde(default, deserialize_with = "super::opt_i64")]
        number: Option<i64>,
    }

    #[test]
    fn test_numbers_become_text() {
        let probe: Probe = serde_json::from_value(json!({"text": 1712, "number": "42"})).unwrap();
        assert_eq!(probe.text.as_deref(), Some("1712"));
        assert_eq!(probe.number, Some(42));
    }

    #[test]
    fn test_null_and_missing() {
        let probe: Probe = serde_json::from_value(json!({"text": null})).unwrap();
        assert!(probe.text.is_none());
        assert!(probe.number.is_none());
    }
}
