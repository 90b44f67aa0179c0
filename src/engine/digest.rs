//! Incremental MD5 / SHA1 / SHA256 computer, reusable across files via [`DigestComputer::reset`].

use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::io;

use crate::DigestSet;

/// Feeds every chunk into all three hashers at once.
///
/// [`digests`](Self::digests) snapshots the current state without consuming it, so more bytes can
/// follow. Call [`reset`](Self::reset) before reusing an instance for another file; otherwise the
/// previous file's bytes leak into the next digest.
#[derive(Clone, Default)]
pub struct DigestComputer {
    md5: Md5,
    sha1: Sha1,
    sha256: Sha256,
}

impl DigestComputer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk to every hasher.
    pub fn update(&mut self, bytes: &[u8]) {
        self.md5.update(bytes);
        self.sha1.update(bytes);
        self.sha256.update(bytes);
    }

    /// Digests of everything written since construction or the last reset.
    pub fn digests(&self) -> DigestSet {
        DigestSet {
            md5: self.md5.clone().finalize().into(),
            sha1: self.sha1.clone().finalize().into(),
            sha256: self.sha256.clone().finalize().into(),
        }
    }

    /// Back to the empty-input state.
    pub fn reset(&mut self) {
        Digest::reset(&mut self.md5);
        Digest::reset(&mut self.sha1);
        Digest::reset(&mut self.sha256);
    }
}

impl io::Write for DigestComputer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// One-shot digests of `bytes`.
pub fn digest_bytes(bytes: &[u8]) -> DigestSet {
    let mut computer = DigestComputer::new();
    computer.update(bytes);
    computer.digests()
}
