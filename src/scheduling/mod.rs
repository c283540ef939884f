//! This module takes care of scheduling the event loop, encapsulating use of
//! multiple threads and anything else that will come in the future

#[cfg(feature = "multi-threading")]
mod multi_threading;
#[cfg(not(feature = "multi-threading"))]
mod sequential;

use std::ops::Range;

/// Size of the event batches
///
/// Events are grouped in batches of a certain size, each of which fills its
/// own accumulator. Accumulators are then merged in batch order, so that
/// sequential and parallel runs of an analysis produce identical output.
///
const EVENT_BATCH_SIZE: usize = 1_000;

/// Accumulated analysis results which can be combined with one another
///
/// Merging the results of two consecutive event ranges must give the same
/// result as processing both ranges into a single accumulator.
pub trait Merge {
    /// Integrate the results of another accumulator into this one
    fn merge(&mut self, other: Self);
}

/// Run an event loop in the manner that was configured at build time.
///
/// Takes as parameters the total number of events to be processed, and a
/// kernel that processes a range of event indices into a fresh accumulator.
///
/// Returns the merged accumulator. With no events at all, the kernel is still
/// invoked once on an empty range so that an empty accumulator is returned.
///
pub fn run_event_loop<A: Merge + Send>(
    num_events: usize,
    process_events: impl Send + Sync + Fn(Range<usize>) -> A,
) -> A {
    if num_events == 0 {
        return process_events(0..0);
    }

    // ...in sequential mode
    #[cfg(not(feature = "multi-threading"))]
    {
        sequential::run_event_loop_impl(num_events, process_events)
    }

    // ...in multi-threaded mode
    #[cfg(feature = "multi-threading")]
    {
        multi_threading::run_event_loop_impl(num_events, process_events)
    }
}

/// Split the event index space into batches
fn batches(num_events: usize) -> impl Iterator<Item = Range<usize>> {
    (0..num_events)
        .step_by(EVENT_BATCH_SIZE)
        .map(move |start| start..(start + EVENT_BATCH_SIZE).min(num_events))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records which events were seen, in order
    struct Seen(Vec<usize>);
    //
    impl Merge for Seen {
        fn merge(&mut self, other: Self) {
            self.0.extend(other.0);
        }
    }

    #[test]
    fn every_event_is_processed_once_in_order() {
        for num_events in [0, 1, EVENT_BATCH_SIZE - 1, EVENT_BATCH_SIZE, 3 * EVENT_BATCH_SIZE + 7] {
            let seen = run_event_loop(num_events, |range| Seen(range.collect()));
            assert_eq!(seen.0, (0..num_events).collect::<Vec<_>>());
        }
    }

    #[test]
    fn batch_boundaries() {
        let ranges: Vec<_> = batches(2 * EVENT_BATCH_SIZE + 1).collect();
        assert_eq!(
            ranges,
            [
                0..EVENT_BATCH_SIZE,
                EVENT_BATCH_SIZE..2 * EVENT_BATCH_SIZE,
                2 * EVENT_BATCH_SIZE..2 * EVENT_BATCH_SIZE + 1
            ]
        );
    }
}
