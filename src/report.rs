//! Day report assembly and rendering
//!
//! Bundles the aggregated metrics with session context and producer
//! provenance, renders the line-oriented text form used by the per-day
//! metric files, and appends it to disk. The text layout is fixed; archived
//! files from earlier report generations must stay comparable line by line.

use crate::error::MetricsError;
use crate::params::TaskParams;
use crate::types::TrialPerformance;
use crate::{PRODUCER_NAME, TRIALSCOPE_VERSION};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use uuid::Uuid;

/// Session-level context captured alongside the metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionMeta {
    /// Date tag in `YYYY_MM_DD` form
    pub date_tag: String,
    /// Wall-clock session start, `HH:MM:SS` UTC
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    /// Session length in seconds, last event minus first
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_duration_sec: Option<f64>,
}

/// Producer provenance stamped on every report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportProducer {
    /// Name of the producing software
    pub name: String,
    /// Version of the producing software
    pub version: String,
    /// Unique instance identifier (UUID)
    pub instance_id: String,
}

/// Outcome of a report write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    /// Report appended to the target file
    Written,
    /// Target file already exists and overwrite was not set
    AlreadyExists,
}

/// Assembled report for one recording day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayReport {
    /// Session context
    pub meta: SessionMeta,
    /// Aggregated metrics
    pub performance: TrialPerformance,
    /// Task configuration echoed into the report
    #[serde(default)]
    pub params: TaskParams,
    /// Producer metadata
    pub producer: ReportProducer,
    /// When this report was computed (RFC3339)
    pub computed_at_utc: String,
}

impl DayReport {
    /// Render the persisted text form.
    ///
    /// One summary line, then one `KEY:value` line per metadatum that was
    /// obtainable:
    /// ```text
    /// 2022_08_31,N:4,Success:3,Failure:1,Success_Rate:75
    /// MEAN_TRIAL_T:2.5
    /// N_TARGETS:8
    /// TARGET_RADIUS:0.08
    /// CURSOR_RADIUS:0.05
    /// ```
    /// The rate and mean are written with full float precision, no rounding.
    /// A day with zero trials renders no summary line.
    pub fn render_text(&self) -> String {
        let mut text = String::new();

        if let Some(rate) = self.performance.success_rate() {
            text.push_str(&format!(
                "{},N:{},Success:{},Failure:{},Success_Rate:{}\n",
                self.meta.date_tag,
                self.performance.total_trials,
                self.performance.correct_trials,
                self.performance.incorrect_trials,
                rate
            ));
        }
        if let Some(mean) = self.performance.average_trial_time {
            text.push_str(&format!("MEAN_TRIAL_T:{}\n", mean));
        }
        if let Some(n_targets) = &self.params.n_targets {
            text.push_str(&format!("N_TARGETS:{}\n", n_targets));
        }
        if let Some(target_radius) = &self.params.target_radius {
            text.push_str(&format!("TARGET_RADIUS:{}\n", target_radius));
        }
        if let Some(cursor_radius) = &self.params.cursor_radius {
            text.push_str(&format!("CURSOR_RADIUS:{}\n", cursor_radius));
        }

        text
    }

    /// Append the text form to `path`.
    ///
    /// An existing file is left alone unless `overwrite` is set; the refusal
    /// comes back as a status, not an error. With `overwrite` the write still
    /// appends, matching the historical file behavior.
    pub fn write_text(&self, path: &Path, overwrite: bool) -> Result<WriteStatus, MetricsError> {
        if path.exists() && !overwrite {
            return Ok(WriteStatus::AlreadyExists);
        }

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        file.write_all(self.render_text().as_bytes())?;
        Ok(WriteStatus::Written)
    }

    /// Metric values keyed by report name, for notebook row updates.
    ///
    /// Carries every serialized performance metric plus `SUCCESS_RATE`.
    pub fn metric_values(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut values = match serde_json::to_value(&self.performance) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        };
        if let Some(rate) = self.performance.success_rate() {
            values.insert("SUCCESS_RATE".to_string(), rate.into());
        }
        values
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

/// Conventional metrics file name for a day
pub fn metrics_file_name(date_tag: &str) -> String {
    format!("{}_PERFORMANCE_METRICS.txt", date_tag)
}

/// Report encoder carrying the producer identity
pub struct ReportEncoder {
    instance_id: String,
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    /// Assemble the report envelope for one day
    pub fn encode(
        &self,
        meta: SessionMeta,
        performance: TrialPerformance,
        params: TaskParams,
    ) -> DayReport {
        DayReport {
            meta,
            performance,
            params,
            producer: ReportProducer {
                name: PRODUCER_NAME.to_string(),
                version: TRIALSCOPE_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            computed_at_utc: Utc::now().to_rfc3339(),
        }
    }
}
