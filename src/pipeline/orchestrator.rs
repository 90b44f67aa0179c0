//! Pipeline controller: start the serializer and workers, walk, then shut down in order.

use anyhow::{Result, anyhow};
use log::{debug, error, warn};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::engine::tools::{canonicalize_root, privilege_gate, running_as_root};
use crate::{Opts, RunOutcome, RunSummary};

use super::context::{PipelineChannels, PipelineContext, PipelineTuning, create_pipeline_channels};
use super::error_handler::{JoinedStages, resolve_outcome};
use super::report::Reporter;
use super::serializer::spawn_serializer;
use super::sinks::{DigestSinks, open_file_sinks, sink_paths};
use super::walk::{run_walk_loop, walkdir_iter};
use super::workers::WorkerPool;

/// Controller lifecycle. `Done` and `Aborted` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Running,
    Draining,
    Done,
    Aborted,
}

impl PipelineState {
    /// Running → Aborted on a walk failure; Draining → Aborted on a write failure or cancel.
    pub fn can_transition_to(self, next: PipelineState) -> bool {
        use PipelineState::*;
        matches!(
            (self, next),
            (Idle, Running) | (Running, Draining) | (Running, Aborted) | (Draining, Done) | (Draining, Aborted)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Aborted)
    }
}

fn advance(state: &mut PipelineState, next: PipelineState) {
    debug_assert!(
        state.can_transition_to(next),
        "illegal pipeline transition {:?} -> {:?}",
        state,
        next
    );
    debug!("pipeline: {:?} -> {:?}", state, next);
    *state = next;
}

/// Run the three-stage pipeline over `root`, writing into `sinks`.
///
/// The walk runs on the calling thread. Shutdown order: the walk drops the work queue's sender
/// once it has enumerated everything (or failed); all workers are joined; only then is the
/// result queue's last sender dropped; finally the serializer is joined. Queued work always
/// drains, even when the walk failed.
pub fn run_pipeline<W: Write + Send + 'static>(
    root: &Path,
    opts: &Opts,
    sinks: DigestSinks<W>,
    excluded: Vec<PathBuf>,
    reporter: Arc<dyn Reporter>,
    cancel: Arc<AtomicBool>,
) -> Result<RunSummary> {
    let tuning = PipelineTuning::from(opts);
    let mut state = PipelineState::Idle;
    debug!("pipeline tuning: {:?}", tuning);

    let PipelineChannels {
        work_tx,
        work_rx,
        result_tx,
        result_rx,
    } = create_pipeline_channels(&tuning);

    let serializer = spawn_serializer(result_rx, sinks, &reporter);
    let workers = WorkerPool::spawn(tuning.num_workers, work_rx, &result_tx, &reporter, &cancel);
    advance(&mut state, PipelineState::Running);

    let walk = match canonicalize_root(root) {
        Ok(root) => {
            let ctx = PipelineContext {
                root,
                excluded,
                follow_links: opts.follow_links,
                skip_walk_errors: opts.skip_walk_errors,
                cancel: Arc::clone(&cancel),
                reporter: Arc::clone(&reporter),
            };
            run_walk_loop(work_tx, &ctx, walkdir_iter(&ctx))
        }
        Err(e) => {
            drop(work_tx);
            Err(e)
        }
    };
    match &walk {
        Ok(summary) => {
            if summary.interrupted {
                warn!("walk stopped early after {} files", summary.queued);
            } else {
                debug!("walk finished: {} files queued", summary.queued);
            }
            advance(&mut state, PipelineState::Draining);
        }
        Err(e) => {
            error!("walk aborted: {:#}", e);
            advance(&mut state, PipelineState::Aborted);
        }
    }

    debug!("Waiting for all hash workers to exit...");
    let worker_stats = workers.join();
    drop(result_tx);

    debug!("Waiting for the writer to exit...");
    let written = serializer
        .join()
        .map_err(|_| anyhow!("serializer thread panicked"))
        .and_then(|r| r);

    let outcome = resolve_outcome(JoinedStages {
        walk,
        workers: worker_stats,
        written,
        cancelled: cancel.load(Ordering::Relaxed),
    });
    if !state.is_terminal() {
        let next = match &outcome {
            Ok(_) => PipelineState::Done,
            Err(_) => PipelineState::Aborted,
        };
        advance(&mut state, next);
    }
    let summary = outcome?;
    reporter.finished(&summary);
    Ok(summary)
}

/// Full run: privilege check, open the sinks in `opts.result_dir`, then [`run_pipeline`].
/// The sink files themselves are left out of the walk; anything else in the result directory is hashed.
///
/// Returns [`RunOutcome::Refused`] without touching the filesystem when the process is not
/// elevated and `opts.ignore_privilege_check` is false.
pub fn hash_dir_with(
    root: &Path,
    opts: &Opts,
    reporter: Arc<dyn Reporter>,
    cancel: Arc<AtomicBool>,
) -> Result<RunOutcome> {
    opts.validate()?;
    if !privilege_gate(running_as_root(), opts.ignore_privilege_check) {
        reporter.refused();
        return Ok(RunOutcome::Refused);
    }
    let sinks = open_file_sinks(&opts.result_dir, opts.manifest)?;
    let excluded = sink_paths(&opts.result_dir, opts.manifest)
        .iter()
        .filter_map(|p| p.canonicalize().ok())
        .collect();
    let summary = run_pipeline(root, opts, sinks, excluded, reporter, cancel)?;
    Ok(RunOutcome::Completed(summary))
}
