//! Producer: walk the tree and push every regular file onto the work queue.

use anyhow::{Result, anyhow};
use crossbeam_channel::Sender;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::FileTask;

use super::context::PipelineContext;

/// One result from a directory walk: a file to hash, an entry to skip silently (directories),
/// an entry left out with a reason, or an error with optional path.
pub enum WalkOutcome {
    File(PathBuf),
    Other,
    Skipped { msg: String, path: PathBuf },
    Err { msg: String, path: Option<PathBuf> },
}

/// Convert a walkdir result into [`WalkOutcome`].
///
/// Unfollowed symlinks are resolved: a link to a regular file is hashed through the link, a
/// dangling link goes to the workers so its open failure is reported per file, anything else
/// is skipped with a reason.
pub fn to_outcome_walkdir(r: Result<walkdir::DirEntry, walkdir::Error>) -> WalkOutcome {
    let entry = match r {
        Ok(entry) => entry,
        Err(err) => {
            return WalkOutcome::Err {
                msg: format!("{}", err),
                path: err.path().map(PathBuf::from),
            };
        }
    };
    let file_type = entry.file_type();
    if file_type.is_file() {
        return WalkOutcome::File(entry.into_path());
    }
    if file_type.is_dir() {
        return WalkOutcome::Other;
    }
    if file_type.is_symlink() {
        return match std::fs::metadata(entry.path()) {
            Ok(meta) if meta.is_file() => WalkOutcome::File(entry.into_path()),
            Ok(meta) if meta.is_dir() => WalkOutcome::Skipped {
                msg: "symlink to directory not followed".to_string(),
                path: entry.into_path(),
            },
            Ok(_) => WalkOutcome::Skipped {
                msg: "symlink to a non-regular file".to_string(),
                path: entry.into_path(),
            },
            Err(_) => WalkOutcome::File(entry.into_path()),
        };
    }
    WalkOutcome::Skipped {
        msg: "not a regular file".to_string(),
        path: entry.into_path(),
    }
}

/// Walkdir iterator over `ctx.root`, leaving out the run's own output files.
pub fn walkdir_iter(ctx: &PipelineContext) -> impl Iterator<Item = WalkOutcome> + '_ {
    WalkDir::new(&ctx.root)
        .follow_links(ctx.follow_links)
        .into_iter()
        .map(to_outcome_walkdir)
        .filter(move |o| !matches!(o, WalkOutcome::File(p) if is_excluded(p, &ctx.excluded)))
}

fn is_excluded(path: &Path, excluded: &[PathBuf]) -> bool {
    excluded.iter().any(|e| e == path)
}

/// How the walk ended when it did not fail.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WalkSummary {
    /// Files pushed onto the work queue.
    pub queued: u64,
    /// Entries left out: non-regular files, unfollowed directory links, and errors (with `skip_walk_errors`).
    pub skipped: u64,
    /// The walk stopped early: cancelled, or every worker was gone.
    pub interrupted: bool,
}

/// Consume `iter`, numbering each file in discovery order and sending it to `work_tx`
/// (blocks while the queue is full). Drops `work_tx` on return, closing the queue.
///
/// Errors abort the walk and are returned unless `ctx.skip_walk_errors` is set, in which case
/// they are reported and counted.
pub fn run_walk_loop<I>(work_tx: Sender<FileTask>, ctx: &PipelineContext, iter: I) -> Result<WalkSummary>
where
    I: Iterator<Item = WalkOutcome>,
{
    let mut summary = WalkSummary::default();
    for outcome in iter {
        if ctx.cancelled() {
            summary.interrupted = true;
            break;
        }
        match outcome {
            WalkOutcome::File(path) => {
                ctx.reporter.file_queued(&path);
                let task = FileTask {
                    seq: summary.queued,
                    path,
                };
                if work_tx.send(task).is_err() {
                    summary.interrupted = true;
                    break;
                }
                summary.queued += 1;
            }
            WalkOutcome::Other => {}
            WalkOutcome::Skipped { msg, path } => {
                ctx.reporter.walk_entry_skipped(Some(&path), &msg);
                summary.skipped += 1;
            }
            WalkOutcome::Err { msg, path } => {
                if !ctx.skip_walk_errors {
                    return Err(match path {
                        Some(p) => anyhow!("walk failed at {}: {}", p.display(), msg),
                        None => anyhow!("walk failed: {}", msg),
                    });
                }
                ctx.reporter.walk_entry_skipped(path.as_deref(), &msg);
                summary.skipped += 1;
            }
        }
    }
    drop(work_tx);
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::LogReporter;
    use crossbeam_channel::bounded;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn ctx(skip_walk_errors: bool) -> PipelineContext {
        PipelineContext {
            root: PathBuf::from("/root-under-test"),
            excluded: Vec::new(),
            follow_links: false,
            skip_walk_errors,
            cancel: Arc::new(AtomicBool::new(false)),
            reporter: Arc::new(LogReporter),
        }
    }

    fn outcomes() -> Vec<WalkOutcome> {
        vec![
            WalkOutcome::Other,
            WalkOutcome::File(PathBuf::from("a")),
            WalkOutcome::Err {
                msg: "permission denied".into(),
                path: Some(PathBuf::from("locked")),
            },
            WalkOutcome::File(PathBuf::from("b")),
        ]
    }

    #[test]
    fn numbers_files_in_discovery_order() {
        let (tx, rx) = bounded(8);
        let summary = run_walk_loop(tx, &ctx(true), outcomes().into_iter()).unwrap();
        assert_eq!(summary.queued, 2);
        assert_eq!(summary.skipped, 1);
        assert!(!summary.interrupted);
        let got: Vec<_> = rx.iter().map(|t| (t.seq, t.path)).collect();
        assert_eq!(got, [(0, PathBuf::from("a")), (1, PathBuf::from("b"))]);
    }

    #[test]
    fn error_is_fatal_by_default() {
        let (tx, rx) = bounded(8);
        let err = run_walk_loop(tx, &ctx(false), outcomes().into_iter()).unwrap_err();
        assert!(err.to_string().contains("locked"));
        // Work queued before the error is still there and the queue is closed.
        assert_eq!(rx.iter().count(), 1);
    }

    #[test]
    fn stops_when_no_consumer() {
        let (tx, rx) = bounded(1);
        drop(rx);
        let summary = run_walk_loop(tx, &ctx(false), outcomes().into_iter()).unwrap();
        assert!(summary.interrupted);
        assert_eq!(summary.queued, 0);
    }

    #[test]
    fn stops_when_cancelled() {
        let c = ctx(false);
        c.cancel.store(true, Ordering::Relaxed);
        let (tx, rx) = bounded(8);
        let summary = run_walk_loop(tx, &c, outcomes().into_iter()).unwrap();
        assert!(summary.interrupted);
        assert_eq!(rx.iter().count(), 0);
    }

    #[test]
    fn skipped_entries_are_counted_in_strict_mode() {
        let (tx, rx) = bounded(8);
        let items = vec![
            WalkOutcome::Skipped {
                msg: "not a regular file".into(),
                path: PathBuf::from("fifo"),
            },
            WalkOutcome::File(PathBuf::from("a")),
        ];
        let summary = run_walk_loop(tx, &ctx(false), items.into_iter()).unwrap();
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.queued, 1);
        assert_eq!(rx.iter().count(), 1);
    }

    #[test]
    fn only_exact_sink_paths_are_excluded() {
        let sinks = [PathBuf::from("/data/whitelist.md5")];
        assert!(is_excluded(Path::new("/data/whitelist.md5"), &sinks));
        assert!(!is_excluded(Path::new("/data/a.txt"), &sinks));
        assert!(!is_excluded(Path::new("/data/whitelist.md5.bak"), &sinks));
        assert!(!is_excluded(Path::new("/data/x"), &[]));
    }

    #[cfg(unix)]
    #[test]
    fn unfollowed_symlinks_are_resolved() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("target.txt");
        std::fs::write(&target, "hello world").unwrap();
        std::os::unix::fs::symlink(&target, dir.path().join("file_link")).unwrap();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("dir_link")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("dangling")).unwrap();

        let c = PipelineContext {
            root: dir.path().to_path_buf(),
            ..ctx(false)
        };
        let mut files = Vec::new();
        let mut skipped = Vec::new();
        for outcome in walkdir_iter(&c) {
            match outcome {
                WalkOutcome::File(p) => files.push(p.file_name().unwrap().to_owned()),
                WalkOutcome::Skipped { path, .. } => {
                    skipped.push(path.file_name().unwrap().to_owned())
                }
                WalkOutcome::Other => {}
                WalkOutcome::Err { msg, .. } => panic!("unexpected walk error: {msg}"),
            }
        }
        files.sort();
        assert_eq!(files, ["dangling", "file_link", "target.txt"]);
        assert_eq!(skipped, ["dir_link"]);
    }
}
