use clap::Parser;
use std::path::PathBuf;

use crate::Opts;

/// Hash every file under a directory into MD5, SHA1 and SHA256 whitelists.
///
/// Flags left unset fall back to `.drivehash.toml` in the current directory, then to built-in defaults.
#[derive(Clone, Debug, Parser)]
#[command(name = "drivehash")]
#[command(about = "Walk a directory or drive and write MD5/SHA1/SHA256 whitelists of every file.")]
pub struct Cli {
    /// The directory or drive path to walk.
    #[arg(long = "start-dir", short = 's', value_name = "DIR")]
    pub start_dir: PathBuf,

    /// Directory to save the whitelists in. Default: ./results
    #[arg(long = "result-dir", short = 'r', value_name = "DIR")]
    pub result_dir: Option<PathBuf>,

    /// Number of hashing workers. Default: 5
    #[arg(long, short = 'w', value_parser = clap::value_parser!(u64).range(1..))]
    pub workers: Option<u64>,

    /// Maximum number of file paths waiting for a worker. Default: 100
    #[arg(long = "backlog-processing", value_parser = clap::value_parser!(u64).range(1..))]
    pub backlog_processing: Option<u64>,

    /// Maximum number of hashes waiting for the writer. Default: 250
    #[arg(long = "backlog-writer", value_parser = clap::value_parser!(u64).range(1..))]
    pub backlog_writer: Option<u64>,

    /// Run even when not elevated. Elevation is only detected on Unix (effective uid 0);
    /// elsewhere this flag is required.
    #[arg(long = "ignore-admin", num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub ignore_admin: Option<bool>,

    /// Follow symbolic links.
    #[arg(long, short = 'f', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub follow_links: Option<bool>,

    /// Log and skip unreadable directories instead of aborting the run.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub skip_walk_errors: Option<bool>,

    /// Also write whitelist.manifest mapping each line to its file path.
    #[arg(long, short = 'm', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub manifest: Option<bool>,

    /// Verbose output (debug logging and a progress counter).
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,
}

/// Overwrite opts field from a CLI flag when given.
macro_rules! apply_cli_opt {
    ($cli:expr, $opts:expr, $cli_field:ident => $opts_field:ident) => {
        if let Some(v) = $cli.$cli_field {
            $opts.$opts_field = v;
        }
    };
}

impl Cli {
    /// Apply the flags that were given on top of `opts` (defaults or file config).
    pub fn apply_to_opts(&self, opts: &mut Opts) {
        if let Some(ref dir) = self.result_dir {
            opts.result_dir = dir.clone();
        }
        if let Some(n) = self.workers {
            opts.num_workers = n as usize;
        }
        if let Some(n) = self.backlog_processing {
            opts.work_backlog = n as usize;
        }
        if let Some(n) = self.backlog_writer {
            opts.writer_backlog = n as usize;
        }
        apply_cli_opt!(self, opts, ignore_admin => ignore_privilege_check);
        apply_cli_opt!(self, opts, follow_links => follow_links);
        apply_cli_opt!(self, opts, skip_walk_errors => skip_walk_errors);
        apply_cli_opt!(self, opts, manifest => manifest);
        apply_cli_opt!(self, opts, verbose => verbose);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_original_flag_names() {
        let cli = Cli::try_parse_from([
            "drivehash",
            "--start-dir",
            "/data",
            "--result-dir",
            "out",
            "--backlog-processing",
            "10",
            "--backlog-writer",
            "20",
            "--ignore-admin",
        ])
        .unwrap();
        let mut opts = Opts::default();
        cli.apply_to_opts(&mut opts);
        assert_eq!(cli.start_dir, PathBuf::from("/data"));
        assert_eq!(opts.result_dir, PathBuf::from("out"));
        assert_eq!(opts.work_backlog, 10);
        assert_eq!(opts.writer_backlog, 20);
        assert!(opts.ignore_privilege_check);
        assert_eq!(opts.num_workers, 5);
    }

    #[test]
    fn start_dir_is_required() {
        assert!(Cli::try_parse_from(["drivehash"]).is_err());
    }

    #[test]
    fn zero_backlog_is_rejected() {
        assert!(Cli::try_parse_from(["drivehash", "-s", ".", "--backlog-writer", "0"]).is_err());
    }

    #[test]
    fn unset_flags_keep_file_values() {
        let cli = Cli::try_parse_from(["drivehash", "-s", "."]).unwrap();
        let mut opts = Opts {
            manifest: true,
            num_workers: 9,
            ..Opts::default()
        };
        cli.apply_to_opts(&mut opts);
        assert!(opts.manifest);
        assert_eq!(opts.num_workers, 9);
    }
}
