//! Progress counter for verbose CLI runs.

use kdam::{Animation, Bar, BarExt};
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::pipeline::{LogReporter, Reporter};
use crate::{HashedFile, RunSummary};

pub type ProgressBar = Arc<Mutex<Bar>>;

/// Create a counter for unknown total (shows count without percentage)
pub fn create_counter(desc: &'static str) -> ProgressBar {
    Arc::new(Mutex::new(kdam::tqdm!(
        total = 0,
        desc = desc,
        animation = Animation::Classic,
        position = 0,
        unit = " files"
    )))
}

/// Force a refresh of the bar (e.g. so the counter shows "0 files" immediately).
pub fn refresh_bar(pb: &ProgressBar) {
    if let Ok(mut bar) = pb.try_lock() {
        let _ = bar.refresh();
    }
}

/// Advance the bar by `n`.
/// Blocks on the lock: only the serializer calls this, so contention is negligible and no update is lost.
pub fn update_progress_bar(pb: &ProgressBar, n: usize) {
    if let Ok(mut bar) = pb.lock() {
        let _ = bar.update(n);
    }
}

/// [`LogReporter`] plus a kdam counter advanced once per written record.
pub struct ProgressReporter {
    inner: LogReporter,
    bar: ProgressBar,
}

impl ProgressReporter {
    pub fn new(desc: &'static str) -> Self {
        let bar = create_counter(desc);
        refresh_bar(&bar);
        Self {
            inner: LogReporter,
            bar,
        }
    }
}

impl Reporter for ProgressReporter {
    fn file_failed(&self, path: &Path, err: &io::Error) {
        self.inner.file_failed(path, err);
    }

    fn walk_entry_skipped(&self, path: Option<&Path>, msg: &str) {
        self.inner.walk_entry_skipped(path, msg);
    }

    fn record_written(&self, _file: &HashedFile) {
        update_progress_bar(&self.bar, 1);
    }

    fn worker_done(&self, id: usize, hashed: u64) {
        self.inner.worker_done(id, hashed);
    }

    fn serializer_done(&self, written: u64) {
        refresh_bar(&self.bar);
        eprintln!();
        self.inner.serializer_done(written);
    }

    fn refused(&self) {
        self.inner.refused();
    }

    fn finished(&self, summary: &RunSummary) {
        self.inner.finished(summary);
    }
}
