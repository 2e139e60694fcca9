//! Configurable-parallelism map primitive.
//!
//! The only place this crate spawns threads is nearest-neighbour edge
//! construction in `clustering.rs`. Everything else — hull, Bézier,
//! clipping, k-d tree queries, table detection — runs single-threaded on
//! the caller's thread with no async suspension points.

use rayon::ThreadPoolBuilder;

/// Degree of parallelism for [`parallel_map`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parallelism {
    /// Run on the calling thread, no pool.
    Sequential,
    /// Use exactly this many worker threads.
    Fixed(usize),
    /// Use one worker per available core (`num_cpus::get()`).
    Unbounded,
}

impl Parallelism {
    /// Negative or zero means unbounded, a positive count is used as-is —
    /// the conventional `-1 = unbounded` CLI worker-count mapping.
    pub fn from_worker_count(n: i64) -> Self {
        if n <= 0 {
            Parallelism::Unbounded
        } else {
            Parallelism::Fixed(n as usize)
        }
    }

    fn thread_count(self) -> usize {
        match self {
            Parallelism::Sequential => 1,
            Parallelism::Fixed(n) => n.max(1),
            Parallelism::Unbounded => num_cpus::get().max(1),
        }
    }
}

/// Applies `f` to every element of `input`, producing a `Vec` with one
/// slot per index (no shared mutable map, no contested writes) using up to
/// `parallelism` worker threads.
///
/// `f` must be `Sync`: it is called concurrently from multiple threads when
/// `parallelism` is not `Sequential`.
pub fn parallel_map<T, R, F>(input: &[T], parallelism: Parallelism, f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(usize, &T) -> R + Sync,
{
    if matches!(parallelism, Parallelism::Sequential) || input.len() < 2 {
        return input.iter().enumerate().map(|(i, x)| f(i, x)).collect();
    }

    let pool = ThreadPoolBuilder::new()
        .num_threads(parallelism.thread_count())
        .build();

    match pool {
        Ok(pool) => pool.install(|| {
            use rayon::prelude::*;
            input
                .par_iter()
                .enumerate()
                .map(|(i, x)| f(i, x))
                .collect()
        }),
        // A pool that fails to spin up (exhausted OS thread limits, typically)
        // still owes the caller a correct result.
        Err(err) => {
            tracing::debug!(error = %err, "falling back to sequential parallel_map");
            input.iter().enumerate().map(|(i, x)| f(i, x)).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_preserves_order() {
        let input: Vec<i32> = (0..50).collect();
        let out = parallel_map(&input, Parallelism::Sequential, |_, x| x * 2);
        assert_eq!(out, (0..50).map(|x| x * 2).collect::<Vec<_>>());
    }

    #[test]
    fn fixed_matches_sequential_result() {
        let input: Vec<i32> = (0..500).collect();
        let seq = parallel_map(&input, Parallelism::Sequential, |_, x| x * x);
        let par = parallel_map(&input, Parallelism::Fixed(4), |_, x| x * x);
        assert_eq!(seq, par);
    }

    #[test]
    fn unbounded_matches_sequential_result() {
        let input: Vec<i32> = (0..500).collect();
        let seq = parallel_map(&input, Parallelism::Sequential, |_, x| x + 1);
        let par = parallel_map(&input, Parallelism::Unbounded, |_, x| x + 1);
        assert_eq!(seq, par);
    }

    #[test]
    fn from_worker_count_negative_is_unbounded() {
        assert_eq!(Parallelism::from_worker_count(-1), Parallelism::Unbounded);
        assert_eq!(Parallelism::from_worker_count(0), Parallelism::Unbounded);
        assert_eq!(Parallelism::from_worker_count(3), Parallelism::Fixed(3));
    }
}
