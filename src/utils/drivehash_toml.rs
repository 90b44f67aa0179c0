//! Load `.drivehash.toml` from a directory (CLI only). The lib takes everything through [`Opts`].

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::Opts;
use crate::utils::config::PackagePaths;

#[derive(Debug, Default, Deserialize)]
pub struct DrivehashToml {
    #[serde(default)]
    settings: Settings,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Settings {
    result_dir: Option<String>,
    workers: Option<usize>,
    backlog_processing: Option<usize>,
    backlog_writer: Option<usize>,
    follow_links: Option<bool>,
    skip_walk_errors: Option<bool>,
    ignore_admin: Option<bool>,
    manifest: Option<bool>,
    verbose: Option<bool>,
}

/// Load the config file from `dir` if present. Returns None if missing, unreadable or invalid (invalid is logged).
pub fn load_drivehash_toml(dir: &Path) -> Option<DrivehashToml> {
    let path = dir.join(PackagePaths::get().config_filename());
    let s = std::fs::read_to_string(&path).ok()?;
    parse_drivehash_toml(&s)
        .map_err(|e| log::warn!("{}: {}", path.display(), e))
        .ok()
}

pub fn parse_drivehash_toml(s: &str) -> Result<DrivehashToml, toml::de::Error> {
    toml::from_str(s)
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($src:expr, $opts:expr, $src_field:ident => $opts_field:ident) => {
        if let Some(v) = $src.$src_field {
            $opts.$opts_field = v;
        }
    };
}

/// Apply file config to opts (only fields present in the file). Call before applying CLI flags.
pub fn apply_file_to_opts(file: &DrivehashToml, opts: &mut Opts) {
    let s = &file.settings;
    if let Some(ref p) = s.result_dir {
        opts.result_dir = PathBuf::from(p);
    }
    apply_file_opt!(s, opts, workers => num_workers);
    apply_file_opt!(s, opts, backlog_processing => work_backlog);
    apply_file_opt!(s, opts, backlog_writer => writer_backlog);
    apply_file_opt!(s, opts, follow_links => follow_links);
    apply_file_opt!(s, opts, skip_walk_errors => skip_walk_errors);
    apply_file_opt!(s, opts, ignore_admin => ignore_privilege_check);
    apply_file_opt!(s, opts, manifest => manifest);
    apply_file_opt!(s, opts, verbose => verbose);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_values_override_defaults() {
        let file = parse_drivehash_toml(
            r#"
            [settings]
            result_dir = "out"
            workers = 2
            backlog_writer = 7
            manifest = true
            "#,
        )
        .unwrap();
        let mut opts = Opts::default();
        apply_file_to_opts(&file, &mut opts);
        assert_eq!(opts.result_dir, PathBuf::from("out"));
        assert_eq!(opts.num_workers, 2);
        assert_eq!(opts.work_backlog, 100);
        assert_eq!(opts.writer_backlog, 7);
        assert!(opts.manifest);
        assert!(!opts.follow_links);
    }

    #[test]
    fn empty_file_changes_nothing() {
        let file = parse_drivehash_toml("").unwrap();
        let mut opts = Opts::default();
        apply_file_to_opts(&file, &mut opts);
        assert_eq!(opts.num_workers, Opts::default().num_workers);
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert!(parse_drivehash_toml("[settings]\nthreads = 3\n").is_err());
    }

    #[test]
    fn missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_drivehash_toml(dir.path()).is_none());
    }
}
