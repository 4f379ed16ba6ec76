use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use crate::error::ScanError;

/// Built-in fix-detection pattern: keyword tokens (bug, fix, close, any
/// suffix form, any case) plus the `QF-` ticket prefix, matched anywhere in
/// the message as one whole-string alternation. These are substring
/// semantics — a subject like "Bugzilla integration" counts as a fix. That
/// is accepted behavior; callers who need precision should supply a ticket
/// identifier list instead, which replaces this pattern entirely.
static DEFAULT_FIX_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^.*(bug(s)?|fix(es|ed)?|close(s|d)?|qf-[0-9]*).*$").unwrap()
});

/// How a [`FixClassifier`] decides whether a commit message is a bug fix.
#[derive(Debug, Clone)]
pub enum ClassifierConfig {
    /// The built-in keyword pattern.
    Default,
    /// Literal ticket identifiers, e.g. loaded via [`load_identifiers`].
    /// Fully replaces the keyword pattern.
    IdentifierList(Vec<String>),
}

/// Compiled commit-message classifier. The pattern is fixed at construction;
/// there is no runtime reconfiguration.
#[derive(Debug, Clone)]
pub struct FixClassifier {
    pattern: Regex,
}

impl FixClassifier {
    pub fn new(config: &ClassifierConfig) -> Result<Self, ScanError> {
        let pattern = match config {
            ClassifierConfig::Default => DEFAULT_FIX_PATTERN.clone(),
            ClassifierConfig::IdentifierList(ids) => {
                if ids.is_empty() {
                    return Err(ScanError::Classifier("identifier list is empty".to_string()));
                }
                let alternation = ids
                    .iter()
                    .map(|id| format!("({})", regex::escape(id)))
                    .collect::<Vec<_>>()
                    .join("|");
                Regex::new(&format!("^.*({alternation}).*$"))
                    .map_err(|e| ScanError::Classifier(format!("cannot compile pattern: {e}")))?
            }
        };
        Ok(FixClassifier { pattern })
    }

    pub fn is_fix(&self, message: &str) -> bool {
        self.pattern.is_match(message)
    }
}

/// Loads ticket identifiers from a file: the first whitespace-separated
/// column of every non-empty line. `#` lines are comments.
pub fn load_identifiers(path: &Path) -> Result<Vec<String>, ScanError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ScanError::Classifier(format!("cannot read '{}': {e}", path.display())))?;
    let ids: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_whitespace().next())
        .map(|s| s.to_string())
        .collect();
    if ids.is_empty() {
        return Err(ScanError::Classifier(format!(
            "no identifiers found in '{}'",
            path.display()
        )));
    }
    Ok(ids)
}
