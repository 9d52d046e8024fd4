//! Topic record definition
//!
//! Recording readers expose every deserialized message as a flat record: the
//! topic it was captured on, the nanosecond receive time, and the message
//! fields. Single-field messages (the shape state-machine topics use) carry
//! their payload under `data`; everything else is passed through untouched in
//! `extra`.

use crate::error::MetricsError;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// State-machine topic in current recordings
pub const DEFAULT_STATE_TOPIC: &str = "/machine/state";

/// State-machine topic used by older center-out recordings
pub const LEGACY_STATE_TOPIC: &str = "/task/center_out/state";

/// One deserialized message from a recording
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicRecord {
    /// Channel the message was recorded on
    pub topic: String,
    /// Nanosecond receive timestamp. Readers emit either an integer or a
    /// digit-string form; both parse to the integer representation.
    #[serde(deserialize_with = "deserialize_time_ns")]
    pub time_ns: i64,
    /// Message payload for single-field messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// Message type name reported by the reader
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub message_type: Option<String>,
    /// Remaining message fields, untouched
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl TopicRecord {
    /// Record carrying a single string payload, the shape state topics use
    pub fn with_data(topic: impl Into<String>, time_ns: i64, data: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            time_ns,
            data: Some(serde_json::Value::String(data.into())),
            message_type: None,
            extra: HashMap::new(),
        }
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, MetricsError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Self, MetricsError> {
        Ok(serde_json::from_str(json)?)
    }
}

fn deserialize_time_ns<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TimeNs {
        Integer(i64),
        Text(String),
    }

    match TimeNs::deserialize(deserializer)? {
        TimeNs::Integer(time_ns) => Ok(time_ns),
        TimeNs::Text(text) => text.trim().parse::<i64>().map_err(|e| {
            serde::de::Error::custom(format!("time_ns '{}' is not an integer: {}", text, e))
        }),
    }
}
