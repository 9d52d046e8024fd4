//! Pipeline orchestration
//!
//! This module provides the public API for Trialscope.
//! It orchestrates the full pipeline from recorded topic messages to a
//! day's performance report.

use chrono::{DateTime, NaiveDate, Utc};

use crate::dedup::{collapse_repeats, DEFAULT_DUPLICATE_PRONE};
use crate::error::MetricsError;
use crate::metrics::TrialAggregator;
use crate::params::TaskParams;
use crate::report::{DayReport, ReportEncoder, SessionMeta};
use crate::schema::{EventTableAdapter, TopicRecord};
use crate::time::ns_to_seconds;
use crate::types::{EventTable, StateLabel};

/// Compute one day's performance report from a JSON array of recorded
/// messages.
///
/// # Arguments
/// * `raw_json` - JSON array of topic records in arrival order
/// * `date` - Calendar date of the recording session
///
/// # Returns
/// The day's report, ready for text rendering or a notebook update
///
/// # Example
/// ```ignore
/// let date = NaiveDate::from_ymd_opt(2022, 8, 31).unwrap();
/// let report = records_to_day_report(session_json, date)?;
/// println!("{}", report.render_text());
/// ```
pub fn records_to_day_report(raw_json: &str, date: NaiveDate) -> Result<DayReport, MetricsError> {
    let records = EventTableAdapter::parse_array(raw_json)?;
    SessionProcessor::new().process_records(date, &records, TaskParams::default())
}

/// Compute one day's performance report from an NDJSON message dump.
///
/// # Arguments
/// * `raw_ndjson` - One JSON record per line, in arrival order
/// * `date` - Calendar date of the recording session
///
/// # Returns
/// The day's report, ready for text rendering or a notebook update
pub fn ndjson_to_day_report(
    raw_ndjson: &str,
    date: NaiveDate,
) -> Result<DayReport, MetricsError> {
    let records = EventTableAdapter::parse_ndjson(raw_ndjson)?;
    SessionProcessor::new().process_records(date, &records, TaskParams::default())
}

/// One day's recorded messages with their task configuration
#[derive(Debug, Clone)]
pub struct DayRecords {
    /// Calendar date of the session
    pub date: NaiveDate,
    /// Recorded messages in arrival order
    pub records: Vec<TopicRecord>,
    /// Task configuration extracted for the day
    pub params: TaskParams,
}

/// Stateful processor for turning recorded sessions into day reports.
///
/// Use this when the recordings deviate from the standard task layout
/// (different state topic, start label, or duplicate-prone set), or when
/// several days should carry the same producer instance ID.
pub struct SessionProcessor {
    adapter: EventTableAdapter,
    duplicate_prone: Vec<StateLabel>,
    start_label: StateLabel,
    encoder: ReportEncoder,
}

impl Default for SessionProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionProcessor {
    /// Create a processor for the standard task layout
    pub fn new() -> Self {
        Self {
            adapter: EventTableAdapter::new(),
            duplicate_prone: DEFAULT_DUPLICATE_PRONE.to_vec(),
            start_label: StateLabel::MoveA,
            encoder: ReportEncoder::new(),
        }
    }

    /// Read state events from a specific topic
    pub fn with_topic(mut self, state_topic: impl Into<String>) -> Self {
        self.adapter = EventTableAdapter::with_topic(state_topic);
        self
    }

    /// Replace the duplicate-prone label set
    pub fn with_duplicate_prone(mut self, labels: Vec<StateLabel>) -> Self {
        self.duplicate_prone = labels;
        self
    }

    /// Anchor trial intervals at a different start label
    pub fn with_start_label(mut self, label: StateLabel) -> Self {
        self.start_label = label;
        self
    }

    /// Process one day's records through the full pipeline.
    ///
    /// Pipeline stages:
    /// 1. EventTableAdapter - Filter the state topic into an event table
    /// 2. collapse_repeats - Drop duplicate-prone consecutive repeats
    /// 3. TrialAggregator - Segment trials and aggregate the metrics
    /// 4. ReportEncoder - Assemble the day's report envelope
    pub fn process_records(
        &self,
        date: NaiveDate,
        records: &[TopicRecord],
        params: TaskParams,
    ) -> Result<DayReport, MetricsError> {
        // Stage 1: Extract state events in arrival order
        let table = self.adapter.extract(records)?;

        // Stage 2: Collapse duplicate-prone repeats
        let table = collapse_repeats(&table, &self.duplicate_prone);

        // Stage 3: Aggregate trial metrics
        let performance = TrialAggregator::aggregate(&table, &self.start_label);

        // Stage 4: Assemble the report
        let meta = session_meta(date, &table)?;
        Ok(self.encoder.encode(meta, performance, params))
    }

    /// Process several days independently.
    ///
    /// A day that fails (missing state topic, out-of-range timestamp) yields
    /// its error in place; the remaining days still produce reports.
    pub fn process_days(
        &self,
        days: &[DayRecords],
    ) -> Vec<(NaiveDate, Result<DayReport, MetricsError>)> {
        days.iter()
            .map(|day| {
                (
                    day.date,
                    self.process_records(day.date, &day.records, day.params.clone()),
                )
            })
            .collect()
    }
}

/// Session metadata for one day's event table.
///
/// The date tag follows the `YYYY_MM_DD` form used for metrics files and
/// notebook rows. Start time and duration come from the first and last event
/// timestamps; both are omitted for an empty table.
fn session_meta(date: NaiveDate, table: &EventTable) -> Result<SessionMeta, MetricsError> {
    let date_tag = date.format("%Y_%m_%d").to_string();

    let (first, last) = match (table.iter().next(), table.iter().last()) {
        (Some(first), Some(last)) => (first, last),
        _ => {
            return Ok(SessionMeta {
                date_tag,
                start_time: None,
                session_duration_sec: None,
            })
        }
    };

    let seconds = first.timestamp_ns.div_euclid(1_000_000_000);
    let subsec_ns = first.timestamp_ns.rem_euclid(1_000_000_000) as u32;
    let start = DateTime::<Utc>::from_timestamp(seconds, subsec_ns).ok_or_else(|| {
        MetricsError::InvalidTimestamp(format!("{} ns outside datetime range", first.timestamp_ns))
    })?;

    Ok(SessionMeta {
        date_tag,
        start_time: Some(start.format("%H:%M:%S").to_string()),
        session_duration_sec: Some(ns_to_seconds(last.timestamp_ns - first.timestamp_ns)),
    })
}
