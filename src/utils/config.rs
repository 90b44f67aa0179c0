//! Application configuration constants.
//! Defaults, buffer sizes and output file names in one place.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::Algorithm;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    config_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Stem shared by every whitelist sink (`whitelist.md5`, `whitelist.sha1`, ...).
    pub const SINK_STEM: &'static str = "whitelist";
    /// Extension of the optional seq/path manifest.
    pub const MANIFEST_EXT: &'static str = "manifest";

    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                config_filename: format!(".{pkg}.toml"),
            }
        })
    }

    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }

    pub fn default_result_dir(&self) -> &'static str {
        "./results"
    }

    /// Path of the whitelist sink for `alg` inside `result_dir`.
    pub fn sink_path(&self, result_dir: &Path, alg: Algorithm) -> PathBuf {
        result_dir.join(format!("{}.{}", Self::SINK_STEM, alg.extension()))
    }

    pub fn manifest_path(&self, result_dir: &Path) -> PathBuf {
        result_dir.join(format!("{}.{}", Self::SINK_STEM, Self::MANIFEST_EXT))
    }
}

// ---- Worker pool ----

/// Hashing worker threads when not overridden.
pub const DEFAULT_NUM_WORKERS: usize = 5;

// ---- Queue backlogs ----

/// Default queue capacities.
pub struct DefaultBacklogs;

impl DefaultBacklogs {
    /// Pending paths before the walk pauses until a worker frees a slot.
    pub const PROCESSING: usize = 100;
    /// Pending digest records before workers pause for the writer. Plan for roughly 80 bytes each.
    pub const WRITER: usize = 250;
}

// ---- Hashing ----

/// Hashing I/O buffer sizes.
pub struct HashingConsts;

impl HashingConsts {
    /// Per-worker read buffer (bytes). 1 MB.
    pub const HASH_READ_CHUNK_SIZE: usize = 1024 * 1024;
}

// ---- Output ----

/// Buffer capacity of each sink writer (bytes).
pub const SINK_BUFFER_SIZE: usize = 64 * 1024;
