use chrono::{Local, NaiveDateTime, TimeZone};
use std::path::{Path, PathBuf};
use std::process::Command;

use super::RepositoryAdapter;
use crate::error::VcsError;
use crate::types::Commit;

const LOG_PREFIX: &str = "COMMIT|";

/// Git backend driven through the `git` binary. Log enumeration is
/// newest-first, git's native order.
pub struct GitAdapter {
    root: PathBuf,
}

impl GitAdapter {
    /// A `.git` marker directory (or file, for worktrees) means this
    /// adapter can handle the repository.
    pub fn detect(path: &Path) -> bool {
        path.join(".git").exists()
    }

    pub fn new(path: &Path) -> Self {
        GitAdapter {
            root: path.to_path_buf(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<String, VcsError> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .output()
            .map_err(|e| VcsError::Spawn {
                tool: "git",
                source: e,
            })?;
        if !output.status.success() {
            return Err(VcsError::Command {
                tool: "git",
                command: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl RepositoryAdapter for GitAdapter {
    fn name(&self) -> &'static str {
        "git"
    }

    fn current_branch(&self) -> Result<String, VcsError> {
        Ok(self.run(&["rev-parse", "--abbrev-ref", "HEAD"])?.trim().to_string())
    }

    fn checkout(&mut self, branch: &str) -> Result<(), VcsError> {
        self.run(&["checkout", branch]).map(|_| ())
    }

    fn log(&self) -> Result<Vec<Commit>, VcsError> {
        let stdout = self.run(&["log", "--format=COMMIT|%H|%ct|%s"])?;
        let mut commits = Vec::new();
        for line in stdout.lines() {
            if line.trim().is_empty() {
                continue;
            }
            commits.push(parse_log_line(line).ok_or_else(|| VcsError::MalformedLog {
                tool: "git",
                line: line.to_string(),
            })?);
        }
        Ok(commits)
    }

    fn changed_files(&self, id: &str) -> Result<Vec<String>, VcsError> {
        let stdout = self.run(&["diff-tree", "--no-commit-id", "--name-only", "-r", "--root", id])?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|l| l.to_string())
            .collect())
    }
}

/// Parses one `COMMIT|<hash>|<unix-ts>|<subject>` line. The subject keeps
/// any further `|` characters; an empty subject is valid.
fn parse_log_line(line: &str) -> Option<Commit> {
    let rest = line.strip_prefix(LOG_PREFIX)?;
    let mut parts = rest.splitn(3, '|');
    let (id, ts, subject) = (parts.next()?, parts.next()?, parts.next()?);
    let secs: i64 = ts.parse().ok()?;
    Some(Commit {
        id: id.to_string(),
        timestamp: local_datetime(secs)?,
        message: subject.to_string(),
    })
}

/// Unix seconds to naive local time, the clock the rest of the pipeline
/// ages commits against.
fn local_datetime(secs: i64) -> Option<NaiveDateTime> {
    Local.timestamp_opt(secs, 0).single().map(|dt| dt.naive_local())
}
