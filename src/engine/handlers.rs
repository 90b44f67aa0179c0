//! CLI run handler: merge config sources, wire Ctrl+C, run the pipeline.

use anyhow::{Context, Result};
use log::{debug, info};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::engine::arg_parser::Cli;
use crate::engine::progress::ProgressReporter;
use crate::pipeline::{LogReporter, Reporter, hash_dir_with};
use crate::utils::{apply_file_to_opts, load_drivehash_toml, setup_logging};
use crate::{Opts, RunOutcome};

/// Defaults, then `.drivehash.toml` in the working directory, then CLI flags.
fn setup_opts(cli: &Cli) -> Opts {
    let mut opts = Opts::default();
    let file = std::env::current_dir()
        .ok()
        .and_then(|dir| load_drivehash_toml(&dir));
    if let Some(ref file) = file {
        apply_file_to_opts(file, &mut opts);
    }
    cli.apply_to_opts(&mut opts);
    setup_logging(opts.verbose);
    if file.is_some() {
        debug!("Loaded settings from config file");
    }
    opts
}

/// Run one hashing pass for the CLI. A refused run (not elevated) is reported and is not an error.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let opts = setup_opts(cli);
    debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_uppercase(),
        opts
    );

    let cancel_requested = Arc::new(AtomicBool::new(false));
    let cancel_requested_handler = Arc::clone(&cancel_requested);
    ctrlc::set_handler(move || {
        cancel_requested_handler.store(true, Ordering::Relaxed);
    })
    .context("set Ctrl+C handler")?;

    let reporter: Arc<dyn Reporter> = match opts.verbose {
        true => Arc::new(ProgressReporter::new("Hashing")),
        false => Arc::new(LogReporter),
    };

    match hash_dir_with(&cli.start_dir, &opts, reporter, cancel_requested)
        .context("Failed to hash")?
    {
        RunOutcome::Completed(summary) => {
            info!(
                "Whitelists for {} files written to {}",
                summary.hashed,
                opts.result_dir.display()
            );
        }
        RunOutcome::Refused => {}
    }
    Ok(())
}
