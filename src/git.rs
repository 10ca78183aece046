//! # System Git Operations
//!
//! Thin wrappers around the system `git` command. Using the installed binary
//! means credentials, SSH keys, proxies and `insteadOf` rewrites configured on
//! the CI runner apply without any extra setup.
//!
//! Each function runs one git invocation in a given directory and maps a
//! non-zero exit status to [`Error::GitCommand`] carrying git's stderr.

use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{DateTime, Local, Utc};
use log::debug;

use crate::error::{Error, Result};

/// Metadata of a commit, as reported after a checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    /// Full object id.
    pub id: String,
    /// Author name.
    pub author: String,
    /// First line of the commit message.
    pub summary: String,
    /// Committer timestamp, seconds since the Unix epoch.
    pub timestamp: i64,
}

impl CommitInfo {
    /// Committer timestamp rendered in local time.
    pub fn date(&self) -> String {
        DateTime::<Utc>::from_timestamp(self.timestamp, 0)
            .map(|utc| {
                utc.with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string()
            })
            .unwrap_or_else(|| self.timestamp.to_string())
    }
}

/// Run `git <args>` in `dir` and return its trimmed stdout.
fn run_git(dir: &Path, args: &[&str]) -> Result<String> {
    let command = args.join(" ");
    debug!("git -C {} {}", dir.display(), command);

    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .output()
        .map_err(|e| Error::GitSpawn {
            command: command.clone(),
            message: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(Error::GitCommand {
            command,
            path: dir.to_path_buf(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Locate the root of the work tree containing `dir`.
pub fn show_toplevel(dir: &Path) -> Result<PathBuf> {
    match run_git(dir, &["rev-parse", "--show-toplevel"]) {
        Ok(path) if !path.is_empty() => Ok(PathBuf::from(path)),
        Ok(_) => Err(Error::TopLevelNotFound {
            message: format!("{} is not inside a work tree", dir.display()),
        }),
        Err(Error::GitCommand { stderr, .. }) => Err(Error::TopLevelNotFound { message: stderr }),
        Err(e) => Err(e),
    }
}

/// Initialize and update the submodule at `path` (relative to `top_level`).
pub fn submodule_update(top_level: &Path, path: &Path, recursive: bool) -> Result<()> {
    let path = path.to_string_lossy();
    let mut args = vec!["submodule", "update", "--init"];
    if recursive {
        args.push("--recursive");
    }
    args.extend(["--", &*path]);
    run_git(top_level, &args).map(|_| ())
}

/// List all tag names of the repository at `dir`.
pub fn list_tags(dir: &Path) -> Result<Vec<String>> {
    let stdout = run_git(dir, &["tag", "--list"])?;
    Ok(stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

/// Resolve `rev` to the id of the commit it points at.
pub fn resolve_commit(dir: &Path, rev: &str) -> Result<String> {
    let spec = format!("{}^{{commit}}", rev);
    run_git(dir, &["rev-parse", "--verify", "--quiet", &spec]).map_err(|e| match e {
        Error::GitCommand {
            command,
            path,
            stderr,
        } if stderr.is_empty() => Error::GitCommand {
            command,
            path,
            stderr: format!("unknown revision '{}'", rev),
        },
        other => other,
    })
}

/// Point HEAD directly at `commit`, detaching it from any branch.
pub fn detach_head(dir: &Path, commit: &str) -> Result<()> {
    run_git(dir, &["update-ref", "--no-deref", "HEAD", commit]).map(|_| ())
}

/// Force the index and working tree to match HEAD.
pub fn reset_hard(dir: &Path) -> Result<()> {
    run_git(dir, &["reset", "--hard", "--quiet", "HEAD"]).map(|_| ())
}

/// Read metadata of the commit at HEAD.
pub fn head_commit(dir: &Path) -> Result<CommitInfo> {
    let stdout = run_git(dir, &["log", "-1", "--format=%H%x00%an%x00%s%x00%ct", "HEAD"])?;
    parse_commit_info(&stdout).ok_or_else(|| Error::CommitParse {
        path: dir.to_path_buf(),
        message: format!("unexpected git log output: {:?}", stdout),
    })
}

/// Parse the NUL-separated `id, author, summary, timestamp` record.
fn parse_commit_info(record: &str) -> Option<CommitInfo> {
    let mut fields = record.splitn(4, '\0');
    let id = fields.next()?.trim();
    let author = fields.next()?;
    let summary = fields.next()?;
    let timestamp = fields.next()?.trim().parse().ok()?;
    if id.is_empty() {
        return None;
    }
    Some(CommitInfo {
        id: id.to_string(),
        author: author.to_string(),
        summary: summary.to_string(),
        timestamp,
    })
}
