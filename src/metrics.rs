//! Trial-performance aggregation
//!
//! Derives the session metrics from a deduplicated event table: trial counts,
//! the duration and pacing means, the overshoot tally, and the per-phase
//! transition counters. Each metric is computed independently; an undefined
//! metric never blocks the others.

use crate::segmenter::find_trial_intervals;
use crate::time::ns_to_legacy_seconds;
use crate::types::{EventTable, StateLabel, TrialInterval, TrialPerformance};

/// Trial durations above this cutoff are recorder artifacts (stalled state
/// machine, pause mid-session), not real trials, and are excluded from the
/// duration mean (seconds)
pub const TRIAL_DURATION_CUTOFF_SEC: f64 = 10.0;

/// Minimum surviving samples for a duration mean to be reported
const MIN_DURATION_SAMPLES: usize = 2;

/// Aggregator for trial-performance metrics
pub struct TrialAggregator;

impl TrialAggregator {
    /// Aggregate all metrics over a deduplicated table.
    ///
    /// `start_label` anchors trial intervals; the standard task starts every
    /// trial at `move_a`.
    pub fn aggregate(table: &EventTable, start_label: &StateLabel) -> TrialPerformance {
        let intervals = find_trial_intervals(table, start_label);

        let correct_trials = count_label(table, &StateLabel::Success);
        let incorrect_trials = count_label(table, &StateLabel::Failure);

        let mut performance = TrialPerformance {
            correct_trials,
            incorrect_trials,
            total_trials: correct_trials + incorrect_trials,
            average_trial_time: compute_average_trial_time(table, &intervals),
            mean_inter_trial_start_gap: compute_mean_start_gap(table, start_label),
            success_with_overshoot: count_success_overshoots(table, &intervals),
            ..TrialPerformance::default()
        };
        apply_transition_counts(table, &mut performance);

        performance
    }
}

/// Compute the full trial-performance report for a deduplicated table
pub fn compute_trial_performance(table: &EventTable) -> TrialPerformance {
    TrialAggregator::aggregate(table, &StateLabel::MoveA)
}

/// Mean success-trial duration in seconds, or `None` with fewer than two
/// usable samples.
///
/// Formula: mean of `t(success) - t(start)` over success-terminated trial
/// intervals, after dropping durations above
/// [`TRIAL_DURATION_CUTOFF_SEC`].
pub fn compute_mean_trial_time(table: &EventTable, start_label: &StateLabel) -> Option<f64> {
    let intervals = find_trial_intervals(table, start_label);
    compute_average_trial_time(table, &intervals)
}

fn count_label(table: &EventTable, label: &StateLabel) -> u32 {
    table.iter().filter(|event| event.label == *label).count() as u32
}

fn compute_average_trial_time(table: &EventTable, intervals: &[TrialInterval]) -> Option<f64> {
    let durations: Vec<f64> = intervals
        .iter()
        .filter(|interval| table.events[interval.terminal_index].label == StateLabel::Success)
        .map(|interval| {
            ns_to_legacy_seconds(table.events[interval.terminal_index].timestamp_ns)
                - ns_to_legacy_seconds(table.events[interval.start_index].timestamp_ns)
        })
        .filter(|duration| *duration <= TRIAL_DURATION_CUTOFF_SEC)
        .collect();

    if durations.len() < MIN_DURATION_SAMPLES {
        return None;
    }
    Some(durations.iter().sum::<f64>() / durations.len() as f64)
}

/// Mean gap between consecutive trial starts.
///
/// Formula: mean of the first-order differences of start times. This is a
/// session pacing measure, not a trial duration; it is reported under its own
/// name and never substituted for the duration mean.
fn compute_mean_start_gap(table: &EventTable, start_label: &StateLabel) -> Option<f64> {
    let start_times: Vec<f64> = table
        .iter()
        .filter(|event| event.label == *start_label)
        .map(|event| ns_to_legacy_seconds(event.timestamp_ns))
        .collect();

    if start_times.len() < 2 {
        return None;
    }

    let gap_sum: f64 = start_times.windows(2).map(|pair| pair[1] - pair[0]).sum();
    Some(gap_sum / (start_times.len() - 1) as f64)
}

/// Count overshoot events landing strictly inside success-terminated
/// intervals. An interval holding two overshoot events contributes 2.
fn count_success_overshoots(table: &EventTable, intervals: &[TrialInterval]) -> u32 {
    let mut count = 0;
    for interval in intervals {
        if table.events[interval.terminal_index].label != StateLabel::Success {
            continue;
        }
        for event in &table.events[interval.start_index + 1..interval.terminal_index] {
            if event.label.is_overshoot() {
                count += 1;
            }
        }
    }
    count
}

/// Tally the phase-transition counters in one adjacency pass.
///
/// Each counter fires when its preceding state sits at `index - 1` of its
/// target state in the deduplicated table.
fn apply_transition_counts(table: &EventTable, performance: &mut TrialPerformance) {
    for pair in table.events.windows(2) {
        let counter = match (&pair[0].label, &pair[1].label) {
            (StateLabel::MoveA, StateLabel::Failure) => {
                &mut performance.primary_target_move_error
            }
            (StateLabel::HoldA, StateLabel::OvershootA) => {
                &mut performance.primary_target_overshoot
            }
            (StateLabel::OvershootA, StateLabel::Failure) => {
                &mut performance.primary_target_overshoot_error
            }
            (StateLabel::DelayA, StateLabel::Failure) => {
                &mut performance.secondary_target_instruction_error
            }
            (StateLabel::MoveB, StateLabel::Failure) => {
                &mut performance.secondary_target_move_error
            }
            (StateLabel::HoldB, StateLabel::OvershootB) => {
                &mut performance.secondary_target_overshoot
            }
            (StateLabel::OvershootB, StateLabel::Failure) => {
                &mut performance.secondary_target_overshoot_error
            }
            (StateLabel::DelayB, StateLabel::Failure) => {
                &mut performance.primary_target_return_instruction_error
            }
            (StateLabel::MoveC, StateLabel::Failure) => {
                &mut performance.primary_target_return_move_error
            }
            (StateLabel::HoldC, StateLabel::OvershootC) => {
                &mut performance.primary_target_return_overshoot
            }
            (StateLabel::OvershootC, StateLabel::Failure) => {
                &mut performance.primary_target_return_overshoot_error
            }
            _ => continue,
        };
        *counter += 1;
    }
}
