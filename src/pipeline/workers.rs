//! Worker pool: fixed set of threads turning file tasks into digest records.

use anyhow::{Result, anyhow};
use crossbeam_channel::{Receiver, Sender};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use crate::engine::digest::DigestComputer;
use crate::engine::hashing::hash_file;
use crate::utils::config::HashingConsts;
use crate::{FileTask, HashedFile};

use super::report::Reporter;

/// Per-worker counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorkerStats {
    pub hashed: u64,
    pub failed: u64,
}

/// Single hash worker: take tasks until the work queue is closed and drained.
/// Owns one [`DigestComputer`] and one read buffer for its whole life.
fn hash_worker_loop(
    id: usize,
    work_rx: Receiver<FileTask>,
    result_tx: Sender<HashedFile>,
    reporter: Arc<dyn Reporter>,
    cancel: Arc<AtomicBool>,
) -> WorkerStats {
    let mut computer = DigestComputer::new();
    let mut buffer = vec![0u8; HashingConsts::HASH_READ_CHUNK_SIZE];
    let mut stats = WorkerStats::default();

    while let Ok(FileTask { seq, path }) = work_rx.recv() {
        // Keep draining after cancel so the walk never blocks on a full queue.
        if cancel.load(Ordering::Relaxed) {
            continue;
        }
        computer.reset();
        if let Err(err) = hash_file(&mut computer, &path, &mut buffer) {
            reporter.file_failed(&path, &err);
            stats.failed += 1;
            continue;
        }
        let record = HashedFile {
            seq,
            path,
            digests: computer.digests(),
        };
        if result_tx.send(record).is_err() {
            // Serializer is gone; nothing we hash can be written.
            break;
        }
        stats.hashed += 1;
    }
    reporter.worker_done(id, stats.hashed);
    stats
}

/// Handles of the running workers.
pub struct WorkerPool {
    handles: Vec<JoinHandle<WorkerStats>>,
}

impl WorkerPool {
    /// Spawn `num_workers` workers. Each gets its own clone of the queue ends; the caller keeps
    /// its `result_tx` and must drop it after [`join`](Self::join) to close the result queue.
    pub fn spawn(
        num_workers: usize,
        work_rx: Receiver<FileTask>,
        result_tx: &Sender<HashedFile>,
        reporter: &Arc<dyn Reporter>,
        cancel: &Arc<AtomicBool>,
    ) -> Self {
        let handles = (0..num_workers)
            .map(|id| {
                let work_rx = work_rx.clone();
                let result_tx = result_tx.clone();
                let reporter = Arc::clone(reporter);
                let cancel = Arc::clone(cancel);
                thread::spawn(move || hash_worker_loop(id, work_rx, result_tx, reporter, cancel))
            })
            .collect();
        Self { handles }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Wait for every worker to exit (work queue closed and drained) and sum their counters.
    pub fn join(self) -> Result<WorkerStats> {
        let mut total = WorkerStats::default();
        let mut panicked = false;
        for h in self.handles {
            match h.join() {
                Ok(s) => {
                    total.hashed += s.hashed;
                    total.failed += s.failed;
                }
                Err(_) => panicked = true,
            }
        }
        if panicked {
            return Err(anyhow!("worker thread panicked"));
        }
        Ok(total)
    }
}
