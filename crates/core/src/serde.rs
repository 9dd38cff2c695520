//! Serde helper functions for upstream payload deserialization.
//!
//! openSenseMap encodes measurement values as decimal strings and sends
//! empty strings for unset optional attributes.

use serde::{Deserialize, Deserializer};

/// Deserialize an optional string, treating empty strings as None.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.filter(|s| !s.trim().is_empty()))
}

/// Deserialize a decimal given either as a JSON number or as a string.
///
/// Accepts `-2.27` and `"-2.27"`. Surrounding whitespace is ignored.
pub fn deserialize_decimal<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Decimal {
        Number(f64),
        Text(String),
    }

    match Decimal::deserialize(deserializer)? {
        Decimal::Number(n) => Ok(n),
        Decimal::Text(s) => s.trim().parse::<f64>().map_err(serde::de::Error::custom),
    }
}
