//! Sequential back-end of the event loop

use super::{batches, Merge};
use std::ops::Range;

/// Process events in sequential mode
///
/// We use batched logic even in sequential mode, in order to achieve
/// reproducibility with respect to multi-threaded runs.
///
pub fn run_event_loop_impl<A: Merge>(
    num_events: usize,
    process_events: impl Fn(Range<usize>) -> A,
) -> A {
    // Some double-checking cannot hurt...
    assert!(num_events > 0, "Must process at least one event");

    // Initialize the accumulator with the first batch of events, then
    // integrate the remaining batches in order
    let mut batch_iter = batches(num_events);
    let first_batch = batch_iter.next().expect("There should be at least one batch");
    let mut accumulator = process_events(first_batch);
    for batch in batch_iter {
        accumulator.merge(process_events(batch));
    }

    // Return the final accumulated results
    accumulator
}
