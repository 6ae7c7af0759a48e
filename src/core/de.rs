//! Lenient field deserializers for backend payloads.
//!
//! The backend serializes pandas frames, so numbers arrive as floats, strings
//! or `null` depending on the column. Missing or malformed values coalesce to
//! a default instead of failing the whole payload.

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;

pub(crate) fn decimal_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_decimal(deserializer)?.unwrap_or(Decimal::ZERO))
}

pub(crate) fn optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_to_decimal))
}

pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_string(deserializer)?.unwrap_or_default())
}

/// Strings and numbers become `Some`; `null` and blank strings become `None`.
pub(crate) fn optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

pub(crate) fn count_or_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_count(deserializer)?.unwrap_or(0))
}

pub(crate) fn optional_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// `true`, `1` and `"true"` are true; `null` and anything else are false.
pub(crate) fn bool_or_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1"),
        _ => false,
    })
}

/// Falls back to `T::default()` for `null` or a value of the wrong shape.
pub(crate) fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default())
}

pub(crate) fn value_to_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s.trim()),
        _ => None,
    }
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "decimal_or_zero")]
        amount: Decimal,
        #[serde(default, deserialize_with = "optional_decimal")]
        received: Option<Decimal>,
        #[serde(default, deserialize_with = "string_or_number")]
        reference: String,
        #[serde(default, deserialize_with = "count_or_zero")]
        count: u64,
        #[serde(default, deserialize_with = "bool_or_false")]
        flag: bool,
        #[serde(default, deserialize_with = "or_default")]
        tags: Vec<String>,
    }

    #[test]
    fn null_and_missing_fields_coalesce() {
        let row: Row = serde_json::from_str(r#"{"amount": null}"#).unwrap();
        assert_eq!(row.amount, Decimal::ZERO);
        assert_eq!(row.received, None);
        assert_eq!(row.reference, "");
        assert_eq!(row.count, 0);
        assert!(!row.flag);
        assert!(row.tags.is_empty());
    }

    #[test]
    fn null_flags_and_collections_coalesce() {
        let row: Row = serde_json::from_str(r#"{"flag": null, "tags": null}"#).unwrap();
        assert!(!row.flag);
        assert!(row.tags.is_empty());

        let row: Row = serde_json::from_str(r#"{"flag": "true", "tags": 7}"#).unwrap();
        assert!(row.flag);
        assert!(row.tags.is_empty());

        let row: Row = serde_json::from_str(r#"{"flag": 1, "tags": ["a"]}"#).unwrap();
        assert!(row.flag);
        assert_eq!(row.tags, vec!["a".to_string()]);
    }

    #[test]
    fn numbers_and_strings_are_accepted() {
        let row: Row = serde_json::from_str(
            r#"{"amount": 100.1, "received": "45.50", "reference": 12345, "count": 3.0}"#,
        )
        .unwrap();
        assert_eq!(row.amount, dec!(100.1));
        assert_eq!(row.received, Some(dec!(45.50)));
        assert_eq!(row.reference, "12345");
        assert_eq!(row.count, 3);
    }

    #[test]
    fn malformed_numbers_do_not_fail_the_payload() {
        let row: Row = serde_json::from_str(r#"{"amount": "abc", "count": "x"}"#).unwrap();
        assert_eq!(row.amount, Decimal::ZERO);
        assert_eq!(row.count, 0);
    }
}
