//! Public and internal types for the drivehash API and pipeline.

use std::path::PathBuf;

use crate::utils::config::{DefaultBacklogs, PackagePaths, DEFAULT_NUM_WORKERS};

/// Digest algorithms written by the pipeline, in sink order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Md5,
    Sha1,
    Sha256,
}

impl Algorithm {
    /// Every algorithm in tuple-position order (index 0 → first sink).
    pub const ALL: [Algorithm; 3] = [Algorithm::Md5, Algorithm::Sha1, Algorithm::Sha256];

    /// File extension of this algorithm's whitelist sink.
    pub fn extension(self) -> &'static str {
        match self {
            Algorithm::Md5 => "md5",
            Algorithm::Sha1 => "sha1",
            Algorithm::Sha256 => "sha256",
        }
    }

    /// Digest length in bytes.
    pub fn output_len(self) -> usize {
        match self {
            Algorithm::Md5 => 16,
            Algorithm::Sha1 => 20,
            Algorithm::Sha256 => 32,
        }
    }
}

/// The digests of one byte stream, one field per [`Algorithm`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DigestSet {
    pub md5: [u8; 16],
    pub sha1: [u8; 20],
    pub sha256: [u8; 32],
}

impl DigestSet {
    /// Raw digest bytes for `alg`.
    pub fn get(&self, alg: Algorithm) -> &[u8] {
        match alg {
            Algorithm::Md5 => &self.md5,
            Algorithm::Sha1 => &self.sha1,
            Algorithm::Sha256 => &self.sha256,
        }
    }

    /// Lowercase hex encoding of the digest for `alg`.
    pub fn hex(&self, alg: Algorithm) -> String {
        hex::encode(self.get(alg))
    }
}

/// One file discovered by the walk. `seq` is its 0-based discovery index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileTask {
    pub seq: u64,
    pub path: PathBuf,
}

/// A successfully hashed file, as carried from a worker to the serializer.
#[derive(Clone, Debug)]
pub struct HashedFile {
    pub seq: u64,
    pub path: PathBuf,
    pub digests: DigestSet,
}

/// Counters for a finished run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Regular files the walk put on the work queue.
    pub discovered: u64,
    /// Records written to the sinks.
    pub hashed: u64,
    /// Files that failed to open or read inside a worker.
    pub failed: u64,
    /// Walk entries left out: non-regular files, unfollowed directory links, and traversal errors
    /// (with `skip_walk_errors`).
    pub skipped_walk_entries: u64,
}

/// How a run ended when it did not fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    Completed(RunSummary),
    /// Privilege precondition failed and was not bypassed; nothing was created.
    Refused,
}

/// Options for a hashing run (lib and CLI).
#[derive(Clone, Debug)]
pub struct Opts {
    /// Directory receiving the whitelist files. Created if missing.
    pub result_dir: PathBuf,
    /// Number of hashing worker threads.
    pub num_workers: usize,
    /// Capacity of the walk → worker queue.
    pub work_backlog: usize,
    /// Capacity of the worker → writer queue.
    pub writer_backlog: usize,
    /// Follow symbolic links during the walk.
    pub follow_links: bool,
    /// Log and skip walk errors instead of aborting on the first one.
    pub skip_walk_errors: bool,
    /// Run even when not elevated.
    pub ignore_privilege_check: bool,
    /// Also write `whitelist.manifest` (seq and path per line, aligned with the digest sinks).
    pub manifest: bool,
    /// Verbose output (debug logging, progress counter).
    pub verbose: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            result_dir: PathBuf::from(PackagePaths::get().default_result_dir()),
            num_workers: DEFAULT_NUM_WORKERS,
            work_backlog: DefaultBacklogs::PROCESSING,
            writer_backlog: DefaultBacklogs::WRITER,
            follow_links: false,
            skip_walk_errors: false,
            ignore_privilege_check: false,
            manifest: false,
            verbose: false,
        }
    }
}

impl Opts {
    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.num_workers == 0 {
            anyhow::bail!("worker count must be at least 1");
        }
        if self.work_backlog == 0 {
            anyhow::bail!("processing backlog must be at least 1");
        }
        if self.writer_backlog == 0 {
            anyhow::bail!("writer backlog must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let opts = Opts::default();
        assert_eq!(opts.num_workers, 5);
        assert_eq!(opts.work_backlog, 100);
        assert_eq!(opts.writer_backlog, 250);
        assert_eq!(opts.result_dir, PathBuf::from("./results"));
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_capacities() {
        for opts in [
            Opts { num_workers: 0, ..Opts::default() },
            Opts { work_backlog: 0, ..Opts::default() },
            Opts { writer_backlog: 0, ..Opts::default() },
        ] {
            assert!(opts.validate().is_err());
        }
    }

    #[test]
    fn algorithm_order_and_lengths() {
        let exts: Vec<_> = Algorithm::ALL.iter().map(|a| a.extension()).collect();
        assert_eq!(exts, ["md5", "sha1", "sha256"]);
        let set = DigestSet {
            md5: [0; 16],
            sha1: [0; 20],
            sha256: [0; 32],
        };
        for alg in Algorithm::ALL {
            assert_eq!(set.get(alg).len(), alg.output_len());
        }
    }
}
