use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Convert a provider amount into a signed real.
///
/// Accepts a plain number, a numeric string, `{ "unscaledValue": .., "scale": .. }` (the value is
/// `unscaledValue / 10^scale`), or that object nested under `"value"`. Anything missing or
/// malformed yields `0.0`.
pub fn normalize_amount(raw: &Value) -> f64 {
    let parsed = match raw {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        Value::Object(map) => from_object(map),
        _ => None,
    };

    parsed.filter(|value| value.is_finite()).unwrap_or(0.0)
}

fn from_object(map: &Map<String, Value>) -> Option<f64> {
    if map.contains_key("unscaledValue") {
        let unscaled = map.get("unscaledValue").and_then(as_real)?;
        let scale = map.get("scale").and_then(as_scale)?;
        return Some(unscaled / 10f64.powi(scale));
    }

    map.get("value").map(normalize_amount)
}

fn as_real(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn as_scale(value: &Value) -> Option<i32> {
    let scale = match value {
        Value::Number(number) => number.as_i64()?,
        Value::String(text) => text.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    i32::try_from(scale).ok()
}

/// Serde hook for amount fields. Never fails on the amount itself.
pub fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().map(normalize_amount).unwrap_or(0.0))
}
