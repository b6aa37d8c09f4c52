//! Batch execution over a set of tables.
//!
//! Every file is an independent unit of work. Workers pull the next file
//! index from a shared cursor and write into that file's slot, so results
//! come back in input order whatever order the workers finish in.

use std::{
    num::NonZeroUsize,
    path::PathBuf,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    thread,
};

use log::debug;

pub fn resolve_jobs(requested: Option<usize>) -> usize {
    match requested {
        Some(jobs) if jobs > 0 => jobs,
        _ => thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(4),
    }
}

/// Runs `task` for every path on up to `jobs` scoped worker threads and
/// returns the outputs in the order of `paths`.
pub fn run_parallel<T, F>(paths: &[PathBuf], jobs: usize, task: F) -> Vec<T>
where
    T: Send,
    F: Fn(&PathBuf) -> T + Sync,
{
    let workers = jobs.clamp(1, paths.len().max(1));
    debug!("Scanning {} file(s) on {} worker(s)", paths.len(), workers);

    let cursor = AtomicUsize::new(0);
    let slots: Vec<Mutex<Option<T>>> = paths.iter().map(|_| Mutex::new(None)).collect();
    thread::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|| {
                loop {
                    let idx = cursor.fetch_add(1, Ordering::Relaxed);
                    let Some(path) = paths.get(idx) else {
                        break;
                    };
                    let output = task(path);
                    if let Ok(mut slot) = slots[idx].lock() {
                        *slot = Some(output);
                    }
                }
            });
        }
    });

    slots
        .into_iter()
        .filter_map(|slot| slot.into_inner().ok().flatten())
        .collect()
}
