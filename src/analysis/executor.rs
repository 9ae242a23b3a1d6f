//! Executors that map the per-spine pipeline over a batch of tasks.
//!
//! Both executors return results in input order, and because every task is
//! pure the sequential and pooled paths produce identical output.
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

/// Maps a pure function over independent items.
pub trait Executor {
    fn map<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> R + Sync + Send;
}

/// In-process runner, one task after the other.
#[derive(Clone, Copy, Debug, Default)]
pub struct SequentialExecutor;

impl SequentialExecutor {
    /// Like [`Executor::map`] but hands each result to `on_result` as soon as
    /// it is ready.
    pub fn map_streaming<T, R, F, C>(&self, items: Vec<T>, f: F, mut on_result: C) -> Vec<R>
    where
        F: Fn(T) -> R,
        C: FnMut(&R),
    {
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            let r = f(item);
            on_result(&r);
            out.push(r);
        }
        out
    }
}

impl Executor for SequentialExecutor {
    fn map<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> R + Sync + Send,
    {
        items.into_iter().map(f).collect()
    }
}

/// Controls whether a batch runs on the worker pool or inline.
#[derive(Clone, Copy, Debug)]
pub struct ParallelOptions {
    enabled: bool,
    min_tasks_for_parallel: usize,
}

impl ParallelOptions {
    /// Construct explicit options.
    pub fn new(enabled: bool, min_tasks_for_parallel: usize) -> Self {
        Self {
            enabled,
            min_tasks_for_parallel: min_tasks_for_parallel.max(1),
        }
    }

    /// Disable the pool regardless of batch size.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            min_tasks_for_parallel: usize::MAX,
        }
    }

    /// Returns true when a batch of `task_count` should go to the pool.
    pub fn should_parallelize(&self, task_count: usize) -> bool {
        self.enabled && task_count >= self.min_tasks_for_parallel
    }

    /// Update the minimum batch size for the pool.
    pub fn with_min_tasks(mut self, min_tasks: usize) -> Self {
        self.min_tasks_for_parallel = min_tasks.max(1);
        self
    }
}

impl Default for ParallelOptions {
    fn default() -> Self {
        Self {
            enabled: cfg!(feature = "parallel"),
            min_tasks_for_parallel: 2,
        }
    }
}

/// Number of workers used by default: all cores but one, at least one.
pub fn default_pool_size() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .saturating_sub(1)
        .max(1)
}

/// Fixed-size rayon pool. Batches smaller than the configured threshold run
/// inline on the calling thread.
pub struct PoolExecutor {
    pool: ThreadPool,
    options: ParallelOptions,
}

impl PoolExecutor {
    pub fn new(threads: usize, options: ParallelOptions) -> Result<Self, String> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads.max(1))
            .thread_name(|i| format!("spine-worker-{i}"))
            .build()
            .map_err(|e| format!("Failed to build worker pool: {e}"))?;
        Ok(Self { pool, options })
    }

    /// Pool of [`default_pool_size`] workers that always parallelizes.
    pub fn with_default_size() -> Result<Self, String> {
        Self::new(default_pool_size(), ParallelOptions::new(true, 1))
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

impl Executor for PoolExecutor {
    fn map<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> R + Sync + Send,
    {
        if !self.options.should_parallelize(items.len()) {
            return items.into_iter().map(f).collect();
        }
        self.pool
            .install(|| items.into_par_iter().map(&f).collect())
    }
}

/// Either executor, chosen at runtime.
pub enum AnyExecutor {
    Sequential(SequentialExecutor),
    Pool(PoolExecutor),
}

impl AnyExecutor {
    /// Pool when `options` enables it (and it can be built), sequential otherwise.
    pub fn from_options(options: ParallelOptions) -> Self {
        if !options.enabled {
            return AnyExecutor::Sequential(SequentialExecutor);
        }
        match PoolExecutor::new(default_pool_size(), options) {
            Ok(pool) => AnyExecutor::Pool(pool),
            Err(err) => {
                log::warn!("{err}; running sequentially");
                AnyExecutor::Sequential(SequentialExecutor)
            }
        }
    }
}

impl Executor for AnyExecutor {
    fn map<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> R + Sync + Send,
    {
        match self {
            AnyExecutor::Sequential(e) => e.map(items, f),
            AnyExecutor::Pool(e) => e.map(items, f),
        }
    }
}
