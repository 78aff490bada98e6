// Wire types for the controller endpoints.
//
// The controller speaks positional JSON arrays rather than objects, so the
// door and change records deserialize from tuples and are exposed with
// named fields.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One entry of the `cfg` response: `[id, name, state, timestamp]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawDoorRecord")]
pub struct DoorRecord {
    pub id: String,
    pub name: String,
    pub state: String,
    /// Seconds since the epoch; `None` when the controller sent something
    /// that is not a number.
    pub changed_at: Option<i64>,
}

#[derive(Deserialize)]
struct RawDoorRecord(String, String, String, #[serde(default)] Value);

impl From<RawDoorRecord> for DoorRecord {
    fn from(RawDoorRecord(id, name, state, ts): RawDoorRecord) -> Self {
        Self {
            id,
            name,
            state,
            changed_at: lenient_timestamp(&ts),
        }
    }
}

/// One entry of an `upd` batch: `[id, state, timestamp]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawChangeRecord")]
pub struct ChangeRecord {
    pub id: String,
    pub state: String,
    pub changed_at: Option<i64>,
}

#[derive(Deserialize)]
struct RawChangeRecord(String, String, #[serde(default)] Value);

impl From<RawChangeRecord> for ChangeRecord {
    fn from(RawChangeRecord(id, state, ts): RawChangeRecord) -> Self {
        Self {
            id,
            state,
            changed_at: lenient_timestamp(&ts),
        }
    }
}

/// The `upd` response: a new cursor plus the changes since the old one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateBatch {
    /// Cursor to send as `lastupdate` on the next poll.
    #[serde(deserialize_with = "numeric_cursor")]
    pub timestamp: i64,
    pub update: Vec<ChangeRecord>,
}

/// Interpret a per-door timestamp the way a browser `parseInt` would.
///
/// Integers pass through, floats (the controller stores `time.time()`) are
/// truncated toward zero, strings yield their leading integer prefix.
/// Anything else, including out-of-range floats, is `None`.
pub fn lenient_timestamp(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(truncate_secs)),
        Value::String(s) => parse_int_prefix(s),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
fn truncate_secs(secs: f64) -> Option<i64> {
    // 2^63, the first float past i64::MAX.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if secs.is_finite() && secs.abs() < LIMIT {
        Some(secs.trunc() as i64)
    } else {
        None
    }
}

fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, digits) = match s.as_bytes().first() {
        Some(b'-') => ("-", &s[1..]),
        Some(b'+') => ("", &s[1..]),
        _ => ("", s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    format!("{sign}{}", &digits[..end]).parse().ok()
}

fn numeric_cursor<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let n = serde_json::Number::deserialize(deserializer)?;
    n.as_i64()
        .or_else(|| n.as_f64().and_then(truncate_secs))
        .ok_or_else(|| serde::de::Error::custom(format!("cursor out of range: {n}")))
}

/// Render an `upt` payload as display text.
///
/// JSON strings lose their quotes; any other value is shown as compact JSON.
pub fn uptime_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn door_record_from_tuple() {
        let rec: DoorRecord =
            serde_json::from_value(json!(["left", "Left Door", "closed", 1_700_000_000.75]))
                .unwrap();
        assert_eq!(
            rec,
            DoorRecord {
                id: "left".into(),
                name: "Left Door".into(),
                state: "closed".into(),
                changed_at: Some(1_700_000_000),
            }
        );
    }

    #[test]
    fn door_record_with_missing_timestamp() {
        let rec: DoorRecord = serde_json::from_value(json!(["d1", "Door", "open"])).unwrap();
        assert_eq!(rec.changed_at, None);
    }

    #[test]
    fn update_batch_parses() {
        let batch: UpdateBatch = serde_json::from_value(json!({
            "timestamp": 100,
            "update": [["d1", "closed", 100], ["d2", "opening", "99abc"]]
        }))
        .unwrap();
        assert_eq!(batch.timestamp, 100);
        assert_eq!(batch.update.len(), 2);
        assert_eq!(batch.update[1].changed_at, Some(99));
    }

    #[test]
    fn update_batch_rejects_non_numeric_cursor() {
        let res: Result<UpdateBatch, _> =
            serde_json::from_value(json!({"timestamp": "soon", "update": []}));
        assert!(res.is_err());
    }

    #[test]
    fn update_batch_requires_update_list() {
        let res: Result<UpdateBatch, _> = serde_json::from_value(json!({"timestamp": 5}));
        assert!(res.is_err());
    }

    #[test]
    fn lenient_timestamps() {
        assert_eq!(lenient_timestamp(&json!(42)), Some(42));
        assert_eq!(lenient_timestamp(&json!(-3.9)), Some(-3));
        assert_eq!(lenient_timestamp(&json!("  17 apples")), Some(17));
        assert_eq!(lenient_timestamp(&json!("-8")), Some(-8));
        assert_eq!(lenient_timestamp(&json!("abc")), None);
        assert_eq!(lenient_timestamp(&json!("")), None);
        assert_eq!(lenient_timestamp(&json!(null)), None);
        assert_eq!(lenient_timestamp(&json!(true)), None);
        assert_eq!(lenient_timestamp(&json!(1e300)), None);
    }

    #[test]
    fn uptime_text_strips_string_quotes() {
        assert_eq!(uptime_text(&json!("Uptime: 3 days")), "Uptime: 3 days");
        assert_eq!(uptime_text(&json!(12)), "12");
        assert_eq!(uptime_text(&json!({"up": 1})), r#"{"up":1}"#);
    }
}
