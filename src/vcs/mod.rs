pub mod git;
pub mod mercurial;

use std::path::Path;

use crate::error::{ScanError, VcsError};
use crate::types::Commit;

/// Minimum capability set the scan pipeline needs from a version-control
/// backend. `checkout` mutates the working copy, so one adapter instance
/// must serve at most one in-flight scan.
pub trait RepositoryAdapter {
    /// Backend name for status output ("git", "hg").
    fn name(&self) -> &'static str;

    fn current_branch(&self) -> Result<String, VcsError>;

    /// Switches the working copy to `branch`. Fails when the branch does
    /// not exist.
    fn checkout(&mut self, branch: &str) -> Result<(), VcsError>;

    /// Commit log in the backend's native order.
    fn log(&self) -> Result<Vec<Commit>, VcsError>;

    /// Paths changed by the commit with the given id.
    fn changed_files(&self, id: &str) -> Result<Vec<String>, VcsError>;
}

/// Probes the registered backends in order and returns the first whose
/// marker directory is present at `path`.
pub fn detect_adapter(path: &Path) -> Result<Box<dyn RepositoryAdapter>, ScanError> {
    if git::GitAdapter::detect(path) {
        return Ok(Box::new(git::GitAdapter::new(path)));
    }
    if mercurial::HgAdapter::detect(path) {
        return Ok(Box::new(mercurial::HgAdapter::new(path)));
    }
    Err(ScanError::UnsupportedRepository(path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_adapter_rejects_plain_directory() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let result = detect_adapter(tmp.path());
        assert!(
            matches!(result, Err(ScanError::UnsupportedRepository(_))),
            "a directory without VCS markers must not resolve to an adapter"
        );
    }

    #[test]
    fn test_detect_adapter_prefers_git_marker() {
        let tmp = tempfile::tempdir().expect("temp dir");
        std::fs::create_dir(tmp.path().join(".git")).unwrap();
        let adapter = detect_adapter(tmp.path()).expect(".git marker should resolve");
        assert_eq!(adapter.name(), "git");
    }

    #[test]
    fn test_detect_adapter_finds_mercurial_marker() {
        let tmp = tempfile::tempdir().expect("temp dir");
        std::fs::create_dir(tmp.path().join(".hg")).unwrap();
        let adapter = detect_adapter(tmp.path()).expect(".hg marker should resolve");
        assert_eq!(adapter.name(), "hg");
    }
}
