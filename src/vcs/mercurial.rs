use chrono::{Local, NaiveDateTime, TimeZone};
use std::path::{Path, PathBuf};
use std::process::Command;

use super::RepositoryAdapter;
use crate::error::VcsError;
use crate::types::Commit;

const LOG_PREFIX: &str = "COMMIT|";

// {word(0, date|hgdate)} renders the changeset date as plain unix seconds.
const LOG_TEMPLATE: &str = "COMMIT|{node}|{word(0, date|hgdate)}|{firstline(desc)}\\n";

/// Mercurial backend driven through the `hg` binary. Log enumeration is
/// oldest-first, mercurial's native changelog order.
pub struct HgAdapter {
    root: PathBuf,
}

impl HgAdapter {
    pub fn detect(path: &Path) -> bool {
        path.join(".hg").exists()
    }

    pub fn new(path: &Path) -> Self {
        HgAdapter {
            root: path.to_path_buf(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<String, VcsError> {
        let output = Command::new("hg")
            .args(args)
            .current_dir(&self.root)
            .output()
            .map_err(|e| VcsError::Spawn {
                tool: "hg",
                source: e,
            })?;
        if !output.status.success() {
            return Err(VcsError::Command {
                tool: "hg",
                command: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl RepositoryAdapter for HgAdapter {
    fn name(&self) -> &'static str {
        "hg"
    }

    fn current_branch(&self) -> Result<String, VcsError> {
        Ok(self.run(&["branch"])?.trim().to_string())
    }

    fn checkout(&mut self, branch: &str) -> Result<(), VcsError> {
        self.run(&["update", branch]).map(|_| ())
    }

    fn log(&self) -> Result<Vec<Commit>, VcsError> {
        let stdout = self.run(&["log", "--template", LOG_TEMPLATE])?;
        let mut commits = Vec::new();
        for line in stdout.lines() {
            if line.trim().is_empty() {
                continue;
            }
            commits.push(parse_log_line(line).ok_or_else(|| VcsError::MalformedLog {
                tool: "hg",
                line: line.to_string(),
            })?);
        }
        Ok(commits)
    }

    fn changed_files(&self, id: &str) -> Result<Vec<String>, VcsError> {
        let stdout = self.run(&["status", "--change", id, "--no-status"])?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|l| l.to_string())
            .collect())
    }
}

/// Parses one `COMMIT|<node>|<unix-ts>|<first line of desc>` line.
fn parse_log_line(line: &str) -> Option<Commit> {
    let rest = line.strip_prefix(LOG_PREFIX)?;
    let mut parts = rest.splitn(3, '|');
    let (id, ts, desc) = (parts.next()?, parts.next()?, parts.next()?);
    let secs: i64 = ts.parse().ok()?;
    Some(Commit {
        id: id.to_string(),
        timestamp: local_datetime(secs)?,
        message: desc.to_string(),
    })
}

fn local_datetime(secs: i64) -> Option<NaiveDateTime> {
    Local.timestamp_opt(secs, 0).single().map(|dt| dt.naive_local())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_line_roundtrip() {
        let commit = parse_log_line("COMMIT|9f3a…e1|1700000000|closes the fd leak").unwrap();
        assert_eq!(commit.id, "9f3a…e1");
        assert_eq!(commit.message, "closes the fd leak");
        assert_eq!(commit.timestamp, local_datetime(1_700_000_000).unwrap());
    }

    #[test]
    fn test_parse_log_line_rejects_garbage() {
        assert!(parse_log_line("abort: no repository found").is_none());
        assert!(parse_log_line("COMMIT|node|yesterday|msg").is_none());
    }

    #[test]
    fn test_detect_requires_hg_marker() {
        let tmp = tempfile::tempdir().expect("temp dir");
        assert!(!HgAdapter::detect(tmp.path()));
        std::fs::create_dir(tmp.path().join(".hg")).unwrap();
        assert!(HgAdapter::detect(tmp.path()));
    }

    #[test]
    fn test_log_on_real_repo() {
        let available = Command::new("hg")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false);
        if !available {
            eprintln!("Skipping: hg binary not available");
            return;
        }
        let tmp = tempfile::tempdir().expect("temp dir");
        let run = |args: &[&str]| {
            Command::new("hg")
                .args(args)
                .current_dir(tmp.path())
                .env("HGUSER", "dev <dev@example.com>")
                .output()
                .map(|o| o.status.success())
                .unwrap_or(false)
        };
        if !run(&["init"]) {
            eprintln!("Skipping: hg init failed in sandbox");
            return;
        }
        std::fs::write(tmp.path().join("a.py"), "pass\n").unwrap();
        assert!(run(&["add", "a.py"]));
        assert!(run(&["commit", "-m", "fix import order"]));

        let adapter = HgAdapter::new(tmp.path());
        let log = adapter.log().expect("log should parse");
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].message, "fix import order");
        let files = adapter.changed_files(&log[0].id).expect("changed files");
        assert_eq!(files, vec!["a.py".to_string()]);
    }
}
