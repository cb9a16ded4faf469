//! Lenient field deserializers
//!
//! The backend serializes timestamps either as formatted strings or as
//! epoch milliseconds depending on the endpoint.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Str(String),
    Int(i64),
    Float(f64),
}

/// Deserialize an optional string that may arrive as a JSON number
pub fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<StringOrNumber>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        StringOrNumber::Str(s) => s,
        StringOrNumber::Int(n) => n.to_string(),
        StringOrNumber::Float(n) => n.to_string(),
    }))
}

/// Deserialize a field that may be `null`, substituting its default
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
