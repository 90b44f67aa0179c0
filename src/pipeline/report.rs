//! Reporting capability injected into the walk, workers and serializer.

use log::{debug, info, warn};
use std::io;
use std::path::Path;

use crate::{HashedFile, RunSummary};

/// Everything the pipeline wants to tell the outside world. Per-file failures only surface here.
///
/// Called concurrently from the walk, every worker and the serializer, so implementations must be
/// cheap and must not block for long.
pub trait Reporter: Send + Sync {
    /// The walk queued `path` for hashing.
    fn file_queued(&self, _path: &Path) {}

    /// A worker could not open or read `path`; the file is left out of the output.
    fn file_failed(&self, path: &Path, err: &io::Error);

    /// The walk left an entry out: not a regular file, an unfollowed directory link, or an
    /// unreadable entry (with `skip_walk_errors`).
    fn walk_entry_skipped(&self, _path: Option<&Path>, _msg: &str) {}

    /// The serializer wrote `file` to every sink.
    fn record_written(&self, _file: &HashedFile) {}

    /// Worker `id` exited after hashing `hashed` files.
    fn worker_done(&self, _id: usize, _hashed: u64) {}

    /// The serializer exited after writing `written` records.
    fn serializer_done(&self, _written: u64) {}

    /// The run was refused by the privilege check.
    fn refused(&self) {}

    /// The run finished successfully.
    fn finished(&self, _summary: &RunSummary) {}
}

/// [`Reporter`] that forwards to the `log` facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn file_queued(&self, path: &Path) {
        debug!("Added {} to processing queue", path.display());
    }

    fn file_failed(&self, path: &Path, err: &io::Error) {
        warn!("Failed to hash {}: {}", path.display(), err);
    }

    fn walk_entry_skipped(&self, path: Option<&Path>, msg: &str) {
        match path {
            Some(p) => warn!("Skipping {}: {}", p.display(), msg),
            None => warn!("Skipping walk entry: {}", msg),
        }
    }

    fn worker_done(&self, id: usize, hashed: u64) {
        debug!("Worker {} done ({} files)", id, hashed);
    }

    fn serializer_done(&self, written: u64) {
        debug!("Writer done ({} records)", written);
    }

    fn refused(&self) {
        warn!(
            "You do not appear to be running as an administrator, which may lead to files failing to hash. \
             To ignore this, re-run with --ignore-admin"
        );
    }

    fn finished(&self, summary: &RunSummary) {
        info!(
            "Hashed {} of {} files ({} failed, {} walk entries skipped)",
            summary.hashed, summary.discovered, summary.failed, summary.skipped_walk_entries
        );
    }
}
