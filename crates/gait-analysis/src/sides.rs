//! Left/right labeling of gait events.
//!
//! Labels are a pure function of the time order of the active events and the
//! starting side. They are recomputed from scratch on every change: one
//! inserted or removed event flips the parity of every later event.

use gait_core::{Event, Side};

/// Sort events by time and label the active ones alternately, starting with
/// `start_side`.
///
/// Excluded events keep their place in the sequence and receive the label the
/// next active event will carry, so exclusion never breaks the alternation
/// of the remaining events.
pub fn assign_sides(events: &[Event], start_side: Side) -> Vec<Event> {
    let mut sorted = events.to_vec();
    sorted.sort_by(|a, b| a.time.total_cmp(&b.time));

    let mut active_position = 0usize;
    for event in sorted.iter_mut() {
        event.side = if active_position % 2 == 0 {
            start_side
        } else {
            start_side.opposite()
        };
        if event.is_active() {
            active_position += 1;
        }
    }

    sorted
}

/// Active events in time order
pub fn active_events(events: &[Event]) -> Vec<Event> {
    events.iter().filter(|e| e.is_active()).copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events_at(times: &[f64]) -> Vec<Event> {
        times
            .iter()
            .enumerate()
            .map(|(i, &t)| Event::detected(t, 1.0, i))
            .collect()
    }

    #[test]
    fn test_alternation_from_left() {
        let events = assign_sides(&events_at(&[0.0, 0.5, 1.0, 1.5, 2.0]), Side::Left);

        for (i, e) in events.iter().enumerate() {
            assert_eq!(e.side == Side::Left, i % 2 == 0);
        }
    }

    #[test]
    fn test_alternation_from_right() {
        let events = assign_sides(&events_at(&[0.0, 0.5, 1.0]), Side::Right);
        let sides: Vec<Side> = events.iter().map(|e| e.side).collect();
        assert_eq!(sides, vec![Side::Right, Side::Left, Side::Right]);
    }

    #[test]
    fn test_sorts_by_time() {
        let events = assign_sides(&events_at(&[1.0, 0.0, 0.5]), Side::Left);
        let times: Vec<f64> = events.iter().map(|e| e.time).collect();
        assert_eq!(times, vec![0.0, 0.5, 1.0]);
        assert_eq!(events[0].side, Side::Left);
        assert_eq!(events[1].side, Side::Right);
    }

    #[test]
    fn test_idempotent() {
        let once = assign_sides(&events_at(&[0.3, 0.1, 0.7, 0.5]), Side::Left);
        let twice = assign_sides(&once, Side::Left);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_insertion_shifts_parity() {
        let events = assign_sides(&events_at(&[0.0, 1.0, 2.0]), Side::Left);
        assert_eq!(events[2].side, Side::Left);

        let mut edited = events.clone();
        edited.push(Event::manual(0.5, 1.0));
        let relabeled = assign_sides(&edited, Side::Left);

        assert_eq!(relabeled[1].time, 0.5);
        assert_eq!(relabeled[3].time, 2.0);
        assert_eq!(relabeled[3].side, Side::Right);
    }

    #[test]
    fn test_excluded_events_do_not_break_alternation() {
        let mut events = events_at(&[0.0, 0.5, 1.0, 1.5, 2.0]);
        events[1].excluded = true;

        let labeled = assign_sides(&events, Side::Left);
        let active = active_events(&labeled);

        assert_eq!(active.len(), 4);
        for w in active.windows(2) {
            assert_ne!(w[0].side, w[1].side);
        }
        assert_eq!(active[0].side, Side::Left);
    }

    #[test]
    fn test_parity_counts_active_events_only() {
        let mut events = events_at(&[0.0, 0.5, 1.0]);
        events[1].excluded = true;

        let labeled = assign_sides(&events, Side::Left);
        let sides: Vec<Side> = labeled.iter().map(|e| e.side).collect();

        // The third event sits at an even index but is the second active one
        assert_eq!(sides, vec![Side::Left, Side::Right, Side::Right]);
        assert_eq!(labeled[1].side, labeled[2].side);
    }
}
