//! Trialscope - Trial-performance metrics engine for behavioral task recordings
//!
//! Trialscope turns recorded task sessions into daily performance reports
//! through a deterministic pipeline: record adaptation → repeat collapsing →
//! trial segmentation → metric aggregation → report encoding.
//!
//! ## Modules
//!
//! - **Session Pipeline**: Process one or more days of recorded messages into day reports
//! - **Notebook Module**: Push report metrics into a lab notebook grid

pub mod dedup;
pub mod error;
pub mod metrics;
pub mod notebook;
pub mod params;
pub mod pipeline;
pub mod report;
pub mod schema;
pub mod segmenter;
pub mod time;
pub mod types;

pub use error::MetricsError;
pub use pipeline::{ndjson_to_day_report, records_to_day_report, DayRecords, SessionProcessor};

// Schema exports
pub use schema::{EventTableAdapter, TopicRecord, DEFAULT_STATE_TOPIC, LEGACY_STATE_TOPIC};

// Metric exports
pub use dedup::{collapse_repeats, DEFAULT_DUPLICATE_PRONE};
pub use metrics::{
    compute_mean_trial_time, compute_trial_performance, TrialAggregator,
    TRIAL_DURATION_CUTOFF_SEC,
};
pub use segmenter::find_trial_intervals;
pub use types::{EventTable, StateEvent, StateLabel, TrialInterval, TrialPerformance};

// Report exports
pub use params::TaskParams;
pub use report::{metrics_file_name, DayReport, ReportEncoder, SessionMeta, WriteStatus};

// Notebook exports
pub use notebook::{check_entries, update_row, MemoryNotebook, NotebookSource};

/// Trialscope version embedded in all day reports
pub const TRIALSCOPE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for day reports
pub const PRODUCER_NAME: &str = "trialscope";
