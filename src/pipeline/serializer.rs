//! Single writer: drain the result queue into the sinks in arrival order.

use anyhow::{Context, Result};
use crossbeam_channel::Receiver;
use std::io::Write;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::HashedFile;

use super::report::Reporter;
use super::sinks::DigestSinks;

/// Write records until the result queue is closed and drained, then flush. Returns records written.
///
/// The first write error ends the loop and is returned. Dropping `result_rx` on the way out makes
/// every blocked or later worker `send` fail, which winds the rest of the pipeline down.
pub fn serializer_loop<W: Write>(
    result_rx: Receiver<HashedFile>,
    mut sinks: DigestSinks<W>,
    reporter: &dyn Reporter,
) -> Result<u64> {
    let mut written = 0_u64;
    while let Ok(record) = result_rx.recv() {
        sinks
            .write_record(&record)
            .with_context(|| format!("write digests for {}", record.path.display()))?;
        reporter.record_written(&record);
        written += 1;
    }
    sinks.flush().context("flush whitelist files")?;
    reporter.serializer_done(written);
    Ok(written)
}

pub fn spawn_serializer<W: Write + Send + 'static>(
    result_rx: Receiver<HashedFile>,
    sinks: DigestSinks<W>,
    reporter: &Arc<dyn Reporter>,
) -> JoinHandle<Result<u64>> {
    let reporter = Arc::clone(reporter);
    thread::spawn(move || serializer_loop(result_rx, sinks, reporter.as_ref()))
}
