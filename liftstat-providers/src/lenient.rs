//! Lenient decoding of upstream numbers and lists.
//!
//! Resort feeds are inconsistent about types: the same field may arrive as
//! `12`, `12.0`, `"12"`, `"18 - 48"`, `"--"` or `null`, and XML-derived JSON
//! turns one-element lists into bare objects. These helpers read what a
//! human would read and treat the rest as absent.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Reads the leading integer of a string (`"18 - 48"` is 18, `"44''"` is 44).
pub fn leading_int(raw: &str) -> Option<u32> {
    let digits: String = raw
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    if digits.is_empty() {
        return None;
    }
    Some(digits.parse::<u32>().unwrap_or(u32::MAX))
}

/// Reads a non-negative count from any JSON value.
///
/// Fractions are truncated, negatives clamp to zero.
pub fn value_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Some(u32::try_from(u).unwrap_or(u32::MAX))
            } else {
                n.as_f64().filter(|f| f.is_finite()).map(truncate)
            }
        }
        Value::String(s) => leading_int(s),
        _ => None,
    }
}

/// Reads a float-valued depth and rounds it to whole inches.
pub fn value_rounded(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()).map(|f| truncate(f.round())),
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| truncate(f.round())),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn truncate(f: f64) -> u32 {
    if f <= 0.0 {
        0
    } else if f >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        f as u32
    }
}

/// Reads a truthy flag (`true`, `"yes"`, `"true"`, `1`).
pub fn value_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "yes" | "y" | "1"
        ),
        _ => false,
    }
}

/// `deserialize_with` adapter for an optional lenient count.
pub fn opt_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_u32(&value))
}

/// `deserialize_with` adapter for a lenient flag.
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_bool(&value))
}

/// `deserialize_with` adapter accepting a list, a single item or null.
pub fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany<T> {
        Many(Vec<T>),
        One(T),
    }

    Ok(
        match Option::<OneOrMany<T>>::deserialize(deserializer)? {
            Some(OneOrMany::Many(items)) => items,
            Some(OneOrMany::One(item)) => vec![item],
            None => Vec::new(),
        },
    )
}
