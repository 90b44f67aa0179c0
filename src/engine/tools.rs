//! Path and privilege helpers

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// True if the process is running with effective uid 0 (e.g. via sudo).
#[cfg(unix)]
pub fn running_as_root() -> bool {
    unsafe { libc::geteuid() == 0 }
}

/// Elevation is not detected off Unix; runs there need `--ignore-admin`.
#[cfg(not(unix))]
pub fn running_as_root() -> bool {
    false
}

/// Whether a run may start: elevated, or the check was explicitly bypassed.
pub fn privilege_gate(elevated: bool, ignore_check: bool) -> bool {
    elevated || ignore_check
}

/// Canonicalize the walk root. Failure here is a traversal failure.
pub fn canonicalize_root(path: &Path) -> Result<PathBuf> {
    path.canonicalize()
        .with_context(|| format!("cannot read start directory {}", path.display()))
}

