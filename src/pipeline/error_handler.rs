use anyhow::{Result, anyhow};
use log::warn;

use crate::RunSummary;

use super::walk::WalkSummary;
use super::workers::WorkerStats;

/// Everything the controller collected after joining the walk, workers and serializer.
pub struct JoinedStages {
    pub walk: Result<WalkSummary>,
    pub workers: Result<WorkerStats>,
    pub written: Result<u64>,
    pub cancelled: bool,
}

/// Pick the run's terminal result. Write failure wins, then the walk error, then a worker panic,
/// then cancellation. Per-file failures never fail the run; they are only summarised here.
pub fn resolve_outcome(stages: JoinedStages) -> Result<RunSummary> {
    let JoinedStages {
        walk,
        workers,
        written,
        cancelled,
    } = stages;

    let written = written?;
    let walk = walk?;
    let workers = workers?;
    if cancelled {
        return Err(anyhow!(
            "Hashing cancelled by user; {} files already hashed were flushed",
            written
        ));
    }
    if workers.failed > 0 {
        warn!(
            "Skipped {} files due to permission errors or read failures",
            workers.failed
        );
    }
    if walk.skipped > 0 {
        warn!("Skipped {} unreadable walk entries", walk.skipped);
    }
    Ok(RunSummary {
        discovered: walk.queued,
        hashed: written,
        failed: workers.failed,
        skipped_walk_entries: walk.skipped,
    })
}
