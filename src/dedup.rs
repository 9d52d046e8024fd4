//! Consecutive-repeat collapsing
//!
//! The task state machine re-emits some states several times in a row without
//! a real transition (re-entry ticks from the recorder). Collapsing keeps one
//! event per run for the listed labels and leaves every other label alone,
//! repeated or not.

use crate::types::{EventTable, StateEvent, StateLabel};

/// Labels the recorder is known to re-emit consecutively
pub const DEFAULT_DUPLICATE_PRONE: [StateLabel; 2] =
    [StateLabel::Intertrial, StateLabel::MoveA];

/// Collapse consecutive repeats of duplicate-prone labels.
///
/// Single left-to-right scan. An event is dropped when its label matches the
/// most recent kept label and that label is in `duplicate_prone`; dropped
/// events never become the comparison cursor, so a whole run collapses to its
/// first occurrence. The first event in the table is always kept.
///
/// Returns a new densely indexed table; the input is untouched. Running the
/// collapse twice gives the same table as running it once.
pub fn collapse_repeats(table: &EventTable, duplicate_prone: &[StateLabel]) -> EventTable {
    let mut kept: Vec<StateEvent> = Vec::with_capacity(table.len());

    for event in table.iter() {
        if let Some(previous) = kept.last() {
            if previous.label == event.label && duplicate_prone.contains(&event.label) {
                continue;
            }
        }
        kept.push(event.clone());
    }

    EventTable::new(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn label_at(seconds: f64, label: &str) -> StateEvent {
        StateEvent::new((seconds * 1e9) as i64, StateLabel::from(label))
    }

    #[test]
    fn test_collapses_consecutive_intertrial() {
        let table = EventTable::new(vec![
            label_at(0.0, "intertrial"),
            label_at(0.1, "intertrial"),
            label_at(0.2, "intertrial"),
            label_at(0.3, "move_a"),
        ]);

        let collapsed = collapse_repeats(&table, &DEFAULT_DUPLICATE_PRONE);
        assert_eq!(collapsed.len(), 2);
        assert_eq!(collapsed.events[0].label, StateLabel::Intertrial);
        assert_eq!(collapsed.events[0].timestamp_ns, 0);
        assert_eq!(collapsed.events[1].label, StateLabel::MoveA);
    }

    #[test]
    fn test_keeps_repeats_of_other_labels() {
        let table = EventTable::new(vec![
            label_at(0.0, "hold_a"),
            label_at(0.1, "hold_a"),
            label_at(0.2, "hold_a"),
        ]);

        let collapsed = collapse_repeats(&table, &DEFAULT_DUPLICATE_PRONE);
        assert_eq!(collapsed.len(), 3);
    }

    #[test]
    fn test_interrupted_run_keeps_both_occurrences() {
        let table = EventTable::new(vec![
            label_at(0.0, "intertrial"),
            label_at(0.1, "move_a"),
            label_at(0.2, "intertrial"),
            label_at(0.3, "intertrial"),
        ]);

        let collapsed = collapse_repeats(&table, &DEFAULT_DUPLICATE_PRONE);
        let labels: Vec<&str> = collapsed.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["intertrial", "move_a", "intertrial"]);
    }

    #[test]
    fn test_idempotent() {
        let table = EventTable::new(vec![
            label_at(0.0, "intertrial"),
            label_at(0.1, "intertrial"),
            label_at(0.2, "move_a"),
            label_at(0.3, "move_a"),
            label_at(0.4, "hold_a"),
            label_at(0.5, "success"),
        ]);

        let once = collapse_repeats(&table, &DEFAULT_DUPLICATE_PRONE);
        let twice = collapse_repeats(&once, &DEFAULT_DUPLICATE_PRONE);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_input_untouched() {
        let table = EventTable::new(vec![
            label_at(0.0, "intertrial"),
            label_at(0.1, "intertrial"),
        ]);

        let _ = collapse_repeats(&table, &DEFAULT_DUPLICATE_PRONE);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_empty_table() {
        let table = EventTable::default();
        let collapsed = collapse_repeats(&table, &DEFAULT_DUPLICATE_PRONE);
        assert!(collapsed.is_empty());
    }

    #[test]
    fn test_empty_prone_set_keeps_everything() {
        let table = EventTable::new(vec![
            label_at(0.0, "intertrial"),
            label_at(0.1, "intertrial"),
        ]);

        let collapsed = collapse_repeats(&table, &[]);
        assert_eq!(collapsed.len(), 2);
    }
}
