//! drivehash: walk a directory tree and write MD5, SHA1 and SHA256 whitelists of every file.
//!
//! The work runs as a bounded three-stage pipeline: one walk thread feeds a fixed pool of hashing
//! workers through a bounded queue, and the workers feed a single writer through a second bounded
//! queue. Full queues block the stage upstream, so memory stays flat on any tree size.

pub mod engine;
pub mod pipeline;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

pub use engine::{DigestComputer, digest_bytes};
pub use pipeline::{LogReporter, Reporter, hash_dir_with, run_pipeline};

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// Result alias used by public drivehash API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Hash every regular file under `root` into the whitelists in `opts.result_dir`, logging through
/// the `log` facade.
///
/// Use [`hash_dir_with`] to inject your own [`Reporter`] or a cancel flag.
///
/// ```ignore
/// let opts = drivehash::Opts { ignore_privilege_check: true, ..Default::default() };
/// match drivehash::hash_dir(std::path::Path::new("/data"), &opts)? {
///     drivehash::RunOutcome::Completed(summary) => println!("{} files", summary.hashed),
///     drivehash::RunOutcome::Refused => eprintln!("re-run elevated or with --ignore-admin"),
/// }
/// ```
pub fn hash_dir(root: &Path, opts: &Opts) -> Result<RunOutcome> {
    hash_dir_with(
        root,
        opts,
        Arc::new(LogReporter),
        Arc::new(AtomicBool::new(false)),
    )
}
