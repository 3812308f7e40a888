use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::game::entities::{PileId, PileTable, TileId};

/// Reads an integer from a JSON number or a numeric string.
pub(crate) fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Reads a string from a JSON string or number.
pub(crate) fn as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(as_int(&Value::deserialize(deserializer)?))
}

pub(crate) fn string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(as_string(&Value::deserialize(deserializer)?))
}

pub(crate) fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::String(s) => s.eq_ignore_ascii_case("true"),
        other => as_int(&other).is_some_and(|n| n != 0),
    })
}

/// A `{"<pile id>": <int>}` map. Keys outside the pile range and values
/// that aren't integers are dropped; anything other than an object is
/// treated as absent.
pub(crate) fn pile_table<'de, D>(deserializer: D) -> Result<Option<PileTable<i64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Object(map) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };

    Ok(Some(
        map.iter()
            .filter_map(|(key, value)| {
                let pile = key.trim().parse().ok().and_then(PileId::new)?;
                Some((pile, as_int(value)?))
            })
            .collect(),
    ))
}

/// A list of tile identities. Empty and non-scalar entries are skipped.
pub(crate) fn hand<'de, D>(deserializer: D) -> Result<Vec<TileId>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };

    Ok(items
        .iter()
        .filter_map(as_string)
        .map(TileId::from)
        .filter(|id| !id.is_empty())
        .collect())
}

/// A map (or list) of objects, keeping the entries that decode as `T`.
pub(crate) fn entries<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let values: Vec<Value> = match Value::deserialize(deserializer)? {
        Value::Object(map) => map.into_iter().map(|(_, v)| v).collect(),
        Value::Array(items) => items,
        _ => return Ok(Vec::new()),
    };

    Ok(values
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect())
}
