//! Core data types for trial-performance extraction
//!
//! Defines the task state vocabulary, the event table handed over by the
//! upstream recording reader, and the metrics report produced by the
//! aggregator.

use serde::{Deserialize, Serialize};

/// Task states emitted by the behavioral state machine
///
/// The vocabulary is fixed for the standard center-out task; labels from
/// experimental task variants come through as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateLabel {
    MoveA,
    MoveB,
    MoveC,
    HoldA,
    HoldB,
    HoldC,
    DelayA,
    DelayB,
    DelayC,
    OvershootA,
    OvershootB,
    OvershootC,
    Intertrial,
    Success,
    Failure,
    /// For labels outside the fixed vocabulary
    #[serde(untagged)]
    Other(String),
}

impl StateLabel {
    pub fn as_str(&self) -> &str {
        match self {
            StateLabel::MoveA => "move_a",
            StateLabel::MoveB => "move_b",
            StateLabel::MoveC => "move_c",
            StateLabel::HoldA => "hold_a",
            StateLabel::HoldB => "hold_b",
            StateLabel::HoldC => "hold_c",
            StateLabel::DelayA => "delay_a",
            StateLabel::DelayB => "delay_b",
            StateLabel::DelayC => "delay_c",
            StateLabel::OvershootA => "overshoot_a",
            StateLabel::OvershootB => "overshoot_b",
            StateLabel::OvershootC => "overshoot_c",
            StateLabel::Intertrial => "intertrial",
            StateLabel::Success => "success",
            StateLabel::Failure => "failure",
            StateLabel::Other(name) => name.as_str(),
        }
    }

    /// Whether this label closes a trial
    pub fn is_terminal(&self) -> bool {
        matches!(self, StateLabel::Success | StateLabel::Failure)
    }

    /// Whether this label is one of the overshoot states
    pub fn is_overshoot(&self) -> bool {
        matches!(
            self,
            StateLabel::OvershootA | StateLabel::OvershootB | StateLabel::OvershootC
        )
    }
}

impl From<&str> for StateLabel {
    fn from(label: &str) -> Self {
        match label {
            "move_a" => StateLabel::MoveA,
            "move_b" => StateLabel::MoveB,
            "move_c" => StateLabel::MoveC,
            "hold_a" => StateLabel::HoldA,
            "hold_b" => StateLabel::HoldB,
            "hold_c" => StateLabel::HoldC,
            "delay_a" => StateLabel::DelayA,
            "delay_b" => StateLabel::DelayB,
            "delay_c" => StateLabel::DelayC,
            "overshoot_a" => StateLabel::OvershootA,
            "overshoot_b" => StateLabel::OvershootB,
            "overshoot_c" => StateLabel::OvershootC,
            "intertrial" => StateLabel::Intertrial,
            "success" => StateLabel::Success,
            "failure" => StateLabel::Failure,
            other => StateLabel::Other(other.to_string()),
        }
    }
}

/// One recorded discrete state transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateEvent {
    /// Nanosecond receive timestamp as reported by the recorder
    pub timestamp_ns: i64,
    /// Task state entered at this timestamp
    pub label: StateLabel,
}

impl StateEvent {
    pub fn new(timestamp_ns: i64, label: StateLabel) -> Self {
        Self {
            timestamp_ns,
            label,
        }
    }
}

/// An ordered table of state events for one recording session.
///
/// Insertion order is the time order as received. Nothing here re-sorts: an
/// unsorted upstream table is an upstream defect this crate does not correct.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventTable {
    /// Events in arrival order
    pub events: Vec<StateEvent>,
}

impl EventTable {
    pub fn new(events: Vec<StateEvent>) -> Self {
        Self { events }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StateEvent> {
        self.events.iter()
    }
}

impl From<Vec<StateEvent>> for EventTable {
    fn from(events: Vec<StateEvent>) -> Self {
        Self { events }
    }
}

/// Index range of one trial in a deduplicated table.
///
/// `start_index` is the nearest trial-start event preceding the terminal
/// event at `terminal_index`. Indices are only meaningful against the table
/// the interval was derived from; intervals are never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialInterval {
    pub start_index: usize,
    pub terminal_index: usize,
}

/// Aggregated trial-performance metrics for one recording session.
///
/// Fields serialize under the metric names used in persisted reports
/// (`CORRECT_TRIALS`, `AVERAGE_TRIAL_TIME`, ...). Undefined float metrics are
/// omitted from the serialized form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct TrialPerformance {
    /// Count of success events
    pub correct_trials: u32,
    /// Count of failure events
    pub incorrect_trials: u32,
    /// Sum of correct and incorrect trials
    pub total_trials: u32,
    /// Mean success-trial duration in seconds, artifact-filtered; needs at
    /// least 2 surviving samples
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_trial_time: Option<f64>,
    /// Mean gap between consecutive trial starts in seconds.
    ///
    /// A pacing measure over start times, distinct from the per-trial
    /// duration mean above.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_inter_trial_start_gap: Option<f64>,
    /// Overshoot events landing inside success trials
    pub success_with_overshoot: u32,

    // Phase-transition counters: how often the named state immediately
    // preceded a failure or its overshoot state.
    /// move_a immediately before a failure
    pub primary_target_move_error: u32,
    /// hold_a immediately before an overshoot_a
    pub primary_target_overshoot: u32,
    /// overshoot_a immediately before a failure
    pub primary_target_overshoot_error: u32,
    /// delay_a immediately before a failure
    pub secondary_target_instruction_error: u32,
    /// move_b immediately before a failure
    pub secondary_target_move_error: u32,
    /// hold_b immediately before an overshoot_b
    pub secondary_target_overshoot: u32,
    /// overshoot_b immediately before a failure
    pub secondary_target_overshoot_error: u32,
    /// delay_b immediately before a failure
    pub primary_target_return_instruction_error: u32,
    /// move_c immediately before a failure
    pub primary_target_return_move_error: u32,
    /// hold_c immediately before an overshoot_c
    pub primary_target_return_overshoot: u32,
    /// overshoot_c immediately before a failure
    pub primary_target_return_overshoot_error: u32,
}

impl TrialPerformance {
    /// Percentage of trials ending in success.
    ///
    /// Returns `None` when no trials were recorded; ratio metrics never
    /// divide by zero.
    pub fn success_rate(&self) -> Option<f64> {
        if self.total_trials == 0 {
            return None;
        }
        Some(100.0 * self.correct_trials as f64 / self.total_trials as f64)
    }
}
