//! Adapter for converting topic records to an EventTable
//!
//! This module filters a day's records down to the configured state topic and
//! builds the event table the metrics pipeline consumes.

use crate::error::MetricsError;
use crate::schema::record::{TopicRecord, DEFAULT_STATE_TOPIC};
use crate::types::{EventTable, StateEvent, StateLabel};

/// Adapter that pulls the state-event table out of a day's records
pub struct EventTableAdapter {
    state_topic: String,
}

impl Default for EventTableAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl EventTableAdapter {
    /// Adapter for the current state topic
    pub fn new() -> Self {
        Self {
            state_topic: DEFAULT_STATE_TOPIC.to_string(),
        }
    }

    /// Adapter for a specific state topic
    ///
    /// Older center-out recordings publish under
    /// [`LEGACY_STATE_TOPIC`](crate::schema::LEGACY_STATE_TOPIC).
    pub fn with_topic(state_topic: impl Into<String>) -> Self {
        Self {
            state_topic: state_topic.into(),
        }
    }

    pub fn state_topic(&self) -> &str {
        &self.state_topic
    }

    /// Parse a JSON array of records
    pub fn parse_array(json: &str) -> Result<Vec<TopicRecord>, MetricsError> {
        let records: Vec<TopicRecord> = serde_json::from_str(json)?;
        Ok(records)
    }

    /// Parse NDJSON (newline-delimited JSON) records
    pub fn parse_ndjson(ndjson: &str) -> Result<Vec<TopicRecord>, MetricsError> {
        let mut records = Vec::new();
        for (line_num, line) in ndjson.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<TopicRecord>(trimmed) {
                Ok(record) => records.push(record),
                Err(e) => {
                    return Err(MetricsError::ParseError(format!(
                        "Failed to parse line {}: {}",
                        line_num + 1,
                        e
                    )));
                }
            }
        }
        Ok(records)
    }

    /// Filter records to the state topic and build the event table.
    ///
    /// Records on other topics are ignored. State records without a string
    /// payload are dropped. A record set where the topic never appears is a
    /// [`MetricsError::MissingTopic`] so the caller can decide whether to
    /// skip the day; a present-but-quiet topic yields an empty table, which
    /// downstream stages handle as zero trials.
    pub fn extract(&self, records: &[TopicRecord]) -> Result<EventTable, MetricsError> {
        let mut events = Vec::new();
        let mut topic_seen = false;

        for record in records {
            if record.topic != self.state_topic {
                continue;
            }
            topic_seen = true;

            let label = match record.data.as_ref().and_then(|value| value.as_str()) {
                Some(label) => StateLabel::from(label),
                None => continue,
            };
            events.push(StateEvent::new(record.time_ns, label));
        }

        if !topic_seen {
            return Err(MetricsError::MissingTopic(self.state_topic.clone()));
        }
        Ok(EventTable::new(events))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn make_test_records() -> Vec<TopicRecord> {
        vec![
            TopicRecord::with_data("/machine/state", 1_000_000_000, "intertrial"),
            TopicRecord::with_data("/machine/state", 2_000_000_000, "move_a"),
            TopicRecord::with_data("/emg/stream", 2_100_000_000, "0.42"),
            TopicRecord::with_data("/machine/state", 3_000_000_000, "success"),
        ]
    }

    #[test]
    fn test_extract_filters_by_topic() {
        let adapter = EventTableAdapter::new();
        let table = adapter.extract(&make_test_records()).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.events[0].label, StateLabel::Intertrial);
        assert_eq!(table.events[1].label, StateLabel::MoveA);
        assert_eq!(table.events[2].label, StateLabel::Success);
        assert_eq!(table.events[2].timestamp_ns, 3_000_000_000);
    }

    #[test]
    fn test_extract_missing_topic() {
        let adapter = EventTableAdapter::with_topic("/task/center_out/state");
        let result = adapter.extract(&make_test_records());

        assert!(matches!(result, Err(MetricsError::MissingTopic(_))));
    }

    #[test]
    fn test_extract_skips_records_without_string_payload() {
        let mut records = make_test_records();
        records.push(TopicRecord {
            topic: "/machine/state".to_string(),
            time_ns: 4_000_000_000,
            data: Some(serde_json::json!(17)),
            message_type: None,
            extra: Default::default(),
        });

        let adapter = EventTableAdapter::new();
        let table = adapter.extract(&records).unwrap();
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_extract_preserves_arrival_order() {
        let records = vec![
            TopicRecord::with_data("/machine/state", 5_000_000_000, "failure"),
            TopicRecord::with_data("/machine/state", 1_000_000_000, "move_a"),
        ];

        let adapter = EventTableAdapter::new();
        let table = adapter.extract(&records).unwrap();
        // Arrival order is kept verbatim, even when timestamps disagree
        assert_eq!(table.events[0].label, StateLabel::Failure);
        assert_eq!(table.events[1].label, StateLabel::MoveA);
    }

    #[test]
    fn test_parse_ndjson() {
        let ndjson = r#"{"topic":"/machine/state","time_ns":1000,"data":"move_a"}

{"topic":"/machine/state","time_ns":"2000","data":"success"}"#;

        let records = EventTableAdapter::parse_ndjson(ndjson).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].time_ns, 2000);
    }

    #[test]
    fn test_parse_ndjson_reports_line_number() {
        let ndjson = "{\"topic\":\"/machine/state\",\"time_ns\":1000,\"data\":\"move_a\"}\nnot json";
        let err = EventTableAdapter::parse_ndjson(ndjson).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_parse_array() {
        let json = r#"[
            {"topic": "/machine/state", "time_ns": 1000, "data": "move_a"},
            {"topic": "/machine/state", "time_ns": 2000, "data": "failure"}
        ]"#;

        let records = EventTableAdapter::parse_array(json).unwrap();
        assert_eq!(records.len(), 2);
    }
}
