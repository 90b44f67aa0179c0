//! Pipeline components: walk → worker pool → serializer, and the controller that wires them.

pub mod context;
pub mod error_handler;
pub mod orchestrator;
pub mod report;
pub mod serializer;
pub mod sinks;
pub mod walk;
pub mod workers;

pub use context::{PipelineChannels, PipelineContext, PipelineTuning, create_pipeline_channels};
pub use error_handler::{JoinedStages, resolve_outcome};
pub use orchestrator::{PipelineState, hash_dir_with, run_pipeline};
pub use report::{LogReporter, Reporter};
pub use serializer::{serializer_loop, spawn_serializer};
pub use sinks::{DigestSinks, FileSinks, escape_path, open_file_sinks};
pub use walk::{WalkOutcome, WalkSummary, run_walk_loop, to_outcome_walkdir, walkdir_iter};
pub use workers::{WorkerPool, WorkerStats};
