use chrono::{Duration, NaiveDateTime};

use crate::classifier::FixClassifier;
use crate::error::VcsError;
use crate::types::Fix;
use crate::vcs::RepositoryAdapter;

/// Collects the bug-fix commits visible from `adapter`'s log: commits no
/// older than `window_days` before `now` whose message the classifier
/// accepts, each with its changed-file list resolved. Log order is preserved.
///
/// When `branch` is given and differs from the currently checked-out branch,
/// the working copy is switched to it before the log is read — a mutating
/// side effect, so one adapter instance must serve at most one scan at a
/// time. `branch` of `None` scans whatever is checked out.
///
/// An empty result is `Ok`; the caller decides whether that ends the scan.
pub fn extract_fixes(
    adapter: &mut dyn RepositoryAdapter,
    classifier: &FixClassifier,
    branch: Option<&str>,
    now: NaiveDateTime,
    window_days: i64,
) -> Result<Vec<Fix>, VcsError> {
    let cutoff = now - Duration::days(window_days);

    if let Some(target) = branch {
        if adapter.current_branch()? != target {
            adapter.checkout(target)?;
        }
    }

    let mut fixes = Vec::new();
    for commit in adapter.log()? {
        if commit.timestamp < cutoff {
            continue;
        }
        if !classifier.is_fix(&commit.message) {
            continue;
        }
        let files = adapter.changed_files(&commit.id)?;
        fixes.push(Fix {
            id: commit.id,
            timestamp: commit.timestamp,
            message: commit.message,
            files,
        });
    }
    Ok(fixes)
}
