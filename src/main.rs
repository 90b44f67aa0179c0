//! drivehash CLI: walk a directory and write MD5/SHA1/SHA256 whitelists.

use anyhow::Result;
use clap::Parser;
use drivehash::engine::Cli;
use drivehash::engine::handle_run;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
