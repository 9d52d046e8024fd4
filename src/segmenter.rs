//! Trial segmentation
//!
//! Pairs every terminal (`success`/`failure`) event with the nearest
//! preceding trial-start event, producing the index intervals the aggregator
//! measures durations and overshoots over.

use crate::types::{EventTable, StateLabel, TrialInterval};

/// Find the trial interval for every terminal event, in table order.
///
/// `start_label` is the state that opens a trial (`move_a` in the standard
/// task). For each terminal, the start is the largest start index strictly
/// below the terminal index. A terminal with no preceding start is omitted;
/// it still counts toward the success/failure totals, which are tallied
/// independently of intervals.
pub fn find_trial_intervals(table: &EventTable, start_label: &StateLabel) -> Vec<TrialInterval> {
    let start_indices: Vec<usize> = table
        .iter()
        .enumerate()
        .filter(|(_, event)| event.label == *start_label)
        .map(|(index, _)| index)
        .collect();

    let mut intervals = Vec::new();
    for (terminal_index, event) in table.iter().enumerate() {
        if !event.label.is_terminal() {
            continue;
        }

        let position = start_indices.partition_point(|&start| start < terminal_index);
        if position == 0 {
            // Truncated log: terminal before any trial start
            continue;
        }

        intervals.push(TrialInterval {
            start_index: start_indices[position - 1],
            terminal_index,
        });
    }

    intervals
}
