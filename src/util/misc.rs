/// Other utilities
use std::cmp::min;
use std::thread;

/// number of worker threads: the requested count, capped by the
/// number of available cores (all cores if nothing was requested)
pub fn num_threads(requested: Option<usize>) -> usize {
    let nthread_max = thread::available_parallelism()
        .map(|x| x.get())
        .unwrap_or(1);

    match requested {
        Some(x) if x > 0 => min(nthread_max, x),
        _ => nthread_max,
    }
}
