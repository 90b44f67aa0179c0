//! Pipeline context and queues: shared data handed to the walk, worker pool and serializer.

use crossbeam_channel::{Receiver, Sender, bounded};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::{FileTask, HashedFile, Opts};

use super::report::Reporter;

/// Sizing of the pipeline: worker count and the two queue capacities.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PipelineTuning {
    pub num_workers: usize,
    pub work_cap: usize,
    pub result_cap: usize,
}

impl From<&Opts> for PipelineTuning {
    fn from(o: &Opts) -> Self {
        Self {
            num_workers: o.num_workers,
            work_cap: o.work_backlog,
            result_cap: o.writer_backlog,
        }
    }
}

/// Shared context for the walk: root, walk flags, cancel flag and the reporter.
pub struct PipelineContext {
    pub root: PathBuf,
    /// Canonical paths of the run's own output files; never queued for hashing.
    pub excluded: Vec<PathBuf>,
    pub follow_links: bool,
    pub skip_walk_errors: bool,
    pub cancel: Arc<AtomicBool>,
    pub reporter: Arc<dyn Reporter>,
}

impl PipelineContext {
    pub fn cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }
}

/// The two bounded queues. Walk gets `work_tx`; workers get `work_rx` and `result_tx`; serializer gets `result_rx`.
/// A queue closes when its last sender is dropped; receivers see the close only after draining.
pub struct PipelineChannels {
    pub work_tx: Sender<FileTask>,
    pub work_rx: Receiver<FileTask>,
    pub result_tx: Sender<HashedFile>,
    pub result_rx: Receiver<HashedFile>,
}

pub fn create_pipeline_channels(tuning: &PipelineTuning) -> PipelineChannels {
    let (work_tx, work_rx) = bounded::<FileTask>(tuning.work_cap);
    let (result_tx, result_rx) = bounded::<HashedFile>(tuning.result_cap);
    PipelineChannels {
        work_tx,
        work_rx,
        result_tx,
        result_rx,
    }
}
