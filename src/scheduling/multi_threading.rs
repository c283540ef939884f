//! Multi-threaded back-end of the event loop

use super::{batches, Merge};
use std::{ops::Range, sync::Mutex};

/// Process events in multi-threaded mode
///
/// Each batch of events is processed by a rayon task into its own
/// accumulator, and accumulators are merged in batch order afterwards so that
/// the output does not depend on task scheduling.
///
pub fn run_event_loop_impl<A: Merge + Send>(
    num_events: usize,
    process_events: impl Send + Sync + Fn(Range<usize>) -> A,
) -> A {
    // Some double-checking cannot hurt...
    assert!(num_events > 0, "Must process at least one event");

    let batch_list: Vec<_> = batches(num_events).collect();
    let accumulator = ReproducibleAccumulator::new(batch_list.len());

    // This function is a synchronization scope: it will only return
    // once all inner tasks have been executed
    rayon::scope(|scope| {
        for (batch_id, batch) in batch_list.into_iter().enumerate() {
            let accumulator_ref = &accumulator;
            let process_events_ref = &process_events;
            scope.spawn(move |_| {
                let result = process_events_ref(batch);
                accumulator_ref.set_task_result(batch_id, result);
            });
        }
    });

    // Extract the results from the accumulator
    accumulator.get_merged_result()
}

/// Reproducibility-optimized results accumulation mechanism
struct ReproducibleAccumulator<A> {
    /// Storage for the intermediary results of parallel tasks
    results: Box<[Mutex<Option<A>>]>,
}
//
impl<A: Merge> ReproducibleAccumulator<A> {
    /// Set up results storage for N parallel tasks
    fn new(num_tasks: usize) -> Self {
        assert!(num_tasks > 0, "There should be at least one task");
        Self {
            results: (0..num_tasks)
                .map(|_| Mutex::new(None))
                .collect::<Vec<_>>()
                .into_boxed_slice(),
        }
    }

    /// Integrate the results of the n-th task
    fn set_task_result(&self, task_id: usize, result: A) {
        let mut lock = self.results[task_id]
            .lock()
            .expect("Mutex data should be valid");
        assert!(lock.is_none(), "Tasks should not report results twice");
        *lock = Some(result);
    }

    /// Aggregate the results in batch order
    fn get_merged_result(self) -> A {
        // Start iterating over the task results
        let mut results_iter = self.results.into_vec().into_iter().map(|entry| {
            entry
                .into_inner()
                .expect("Mutex data should be valid")
                .expect("Result should be ready")
        });

        // Initialize results storage with the result of the first task
        let first_result = results_iter
            .next()
            .expect("There should be at least one task");

        // Merge the results of the other tasks
        results_iter.fold(first_result, |mut r1, r2| {
            r1.merge(r2);
            r1
        })
    }
}
