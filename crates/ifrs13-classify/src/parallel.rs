//! Fan-out for batch classification.
//!
//! Each trade in a batch is classified independently against shared,
//! read-only grids, so large batches can be spread over the rayon pool
//! (`parallel` feature). Results come back in file order either way, which
//! keeps row numbers in batch reports stable.

use ifrs13_core::ClassificationConfig;

/// Applies `f` to every trade (or parsed row) of a batch.
///
/// The batch goes to rayon only when the `parallel` feature is compiled in
/// and [`ClassificationConfig::should_parallelize`] accepts its size. Small
/// batches stay on the calling thread.
#[allow(unused_variables)]
pub fn maybe_parallel_map<T, U, F>(items: &[T], config: &ClassificationConfig, f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        if config.should_parallelize(items.len()) {
            return items.par_iter().map(f).collect();
        }
    }

    items.iter().map(f).collect()
}
