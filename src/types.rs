use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashMap;

// ─── Core VCS Data ────────────────────────────────────────────────────────────

/// One entry of a repository's commit log, as enumerated by a
/// [`crate::vcs::RepositoryAdapter`]. Read-only to the scan pipeline.
/// Timestamps are naive local time.
#[derive(Debug, Clone)]
pub struct Commit {
    pub id: String,
    pub timestamp: NaiveDateTime,
    pub message: String,
}

/// A commit that passed the fix classifier and the recency window, with its
/// changed-file list resolved. Lives for the duration of one scan.
#[derive(Debug, Clone)]
pub struct Fix {
    #[allow(dead_code)]
    pub id: String,
    pub timestamp: NaiveDateTime,
    pub message: String,
    pub files: Vec<String>,
}

// ─── Scoring ──────────────────────────────────────────────────────────────────

/// Accumulated per-file decay weights. Entries keep first-touch insertion
/// order so that ranking can break score ties deterministically.
#[derive(Debug, Default)]
pub struct HotspotTable {
    index: HashMap<String, usize>,
    entries: Vec<(String, f64)>,
}

impl HotspotTable {
    /// Adds `weight` to the score of `path`, registering the path on first touch.
    pub fn add(&mut self, path: &str, weight: f64) {
        match self.index.get(path) {
            Some(&i) => self.entries[i].1 += weight,
            None => {
                self.index.insert(path.to_string(), self.entries.len());
                self.entries.push((path.to_string(), weight));
            }
        }
    }

    #[allow(dead_code)]
    pub fn get(&self, path: &str) -> Option<f64> {
        self.index.get(path).map(|&i| self.entries[i].1)
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes the table, yielding `(path, score)` pairs in insertion order.
    pub fn into_entries(self) -> Vec<(String, f64)> {
        self.entries
    }
}

/// One ranked output record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedHotspot {
    pub score: f64,
    pub path: String,
}

// ─── Report ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub repo_path: String,
    pub vcs: String,
    pub branch: String,
    pub window_days: i64,
    pub fix_count: usize,
    pub scanned_at: String,
}

/// Everything a reporter needs to render one repository scan: the scan
/// parameters, one entry per fix commit message, and the ranked hotspots.
/// Built once per scan and returned from the pipeline, never mutated through
/// shared state.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub meta: ReportMeta,
    pub fixes: Vec<String>,
    pub hotspots: Vec<RankedHotspot>,
}
