use std::path::PathBuf;

/// Failures from a version-control backend.
#[derive(Debug, thiserror::Error)]
pub enum VcsError {
    /// The VCS binary could not be started at all.
    #[error("failed to run {tool}: {source}")]
    Spawn {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// The VCS command ran and exited non-zero (missing branch, bad
    /// revision, corrupt repository).
    #[error("{tool} {command} failed: {stderr}")]
    Command {
        tool: &'static str,
        command: String,
        stderr: String,
    },

    /// Log output did not match the expected line format.
    #[error("unparseable {tool} log line: {line}")]
    MalformedLog { tool: &'static str, line: String },
}

/// Errors surfaced by one repository scan. In multi-path mode each error is
/// reported for its own path and the remaining paths still run.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// No registered backend recognizes the path.
    #[error("no supported version control system found at '{}'", .0.display())]
    UnsupportedRepository(PathBuf),

    /// Bad bug-identifier list: unreadable file, empty list, or a pattern
    /// that fails to compile. Raised before any extraction begins.
    #[error("bug identifier list: {0}")]
    Classifier(String),

    #[error(transparent)]
    Vcs(#[from] VcsError),
}
