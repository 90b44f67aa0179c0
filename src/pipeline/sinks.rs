//! Output sinks: one whitelist per algorithm plus the optional manifest.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::utils::config::{PackagePaths, SINK_BUFFER_SIZE};
use crate::{Algorithm, HashedFile};

/// The digest sinks in [`Algorithm::ALL`] order, plus an optional manifest.
///
/// Every record puts exactly one line in each sink, so line `k` of every sink describes the same file.
pub struct DigestSinks<W: Write> {
    md5: W,
    sha1: W,
    sha256: W,
    manifest: Option<W>,
}

/// Sinks backed by files in the result directory.
pub type FileSinks = DigestSinks<BufWriter<File>>;

impl<W: Write> DigestSinks<W> {
    pub fn new(md5: W, sha1: W, sha256: W, manifest: Option<W>) -> Self {
        Self {
            md5,
            sha1,
            sha256,
            manifest,
        }
    }

    fn sink_mut(&mut self, alg: Algorithm) -> &mut W {
        match alg {
            Algorithm::Md5 => &mut self.md5,
            Algorithm::Sha1 => &mut self.sha1,
            Algorithm::Sha256 => &mut self.sha256,
        }
    }

    /// Append one hex line per algorithm (and the manifest line) for `record`.
    pub fn write_record(&mut self, record: &HashedFile) -> io::Result<()> {
        for alg in Algorithm::ALL {
            let line = record.digests.hex(alg);
            let sink = self.sink_mut(alg);
            sink.write_all(line.as_bytes())?;
            sink.write_all(b"\n")?;
        }
        if let Some(manifest) = self.manifest.as_mut() {
            writeln!(manifest, "{}\t{}", record.seq, escape_path(&record.path))?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        for alg in Algorithm::ALL {
            self.sink_mut(alg).flush()?;
        }
        if let Some(manifest) = self.manifest.as_mut() {
            manifest.flush()?;
        }
        Ok(())
    }

    /// `(md5, sha1, sha256, manifest)`.
    pub fn into_parts(self) -> (W, W, W, Option<W>) {
        (self.md5, self.sha1, self.sha256, self.manifest)
    }
}

/// One path per manifest line: backslash, tab and newline are escaped.
pub fn escape_path(path: &Path) -> String {
    let raw = path.to_string_lossy();
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}

fn create_sink(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    Ok(BufWriter::with_capacity(SINK_BUFFER_SIZE, file))
}

/// Paths of every sink a run writes in `result_dir`, in [`Algorithm::ALL`] order, manifest last.
pub fn sink_paths(result_dir: &Path, manifest: bool) -> Vec<PathBuf> {
    let paths = PackagePaths::get();
    let mut out: Vec<PathBuf> = Algorithm::ALL
        .iter()
        .map(|alg| paths.sink_path(result_dir, *alg))
        .collect();
    if manifest {
        out.push(paths.manifest_path(result_dir));
    }
    out
}

/// Create `result_dir` if needed and open (truncating) every sink in it.
pub fn open_file_sinks(result_dir: &Path, manifest: bool) -> Result<FileSinks> {
    std::fs::create_dir_all(result_dir)
        .with_context(|| format!("create result directory {}", result_dir.display()))?;
    let paths = PackagePaths::get();
    let md5 = create_sink(&paths.sink_path(result_dir, Algorithm::Md5))?;
    let sha1 = create_sink(&paths.sink_path(result_dir, Algorithm::Sha1))?;
    let sha256 = create_sink(&paths.sink_path(result_dir, Algorithm::Sha256))?;
    let manifest = match manifest {
        true => Some(create_sink(&paths.manifest_path(result_dir))?),
        false => None,
    };
    Ok(DigestSinks::new(md5, sha1, sha256, manifest))
}
