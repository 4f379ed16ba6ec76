use chrono::NaiveDateTime;
use std::collections::HashSet;

use crate::types::{Fix, HotspotTable, RankedHotspot};

// Sigmoid steepness of the decay curve: weight = 1 / (1 + e^(-12t + 12))
// where t = 1 - (fix age / anchor age).
const DECAY_STEEPNESS: f64 = 12.0;

// f64::exp overflows to infinity just above this; weights past it are 0.
const MAX_EXP_ARG: f64 = 709.0;

// Age gaps are clamped to at least one second, so the anchor fix keeps its
// defined weight of 1/(1+e^12) even when it is timestamped exactly at scan
// time (a zero anchor gap would otherwise divide by zero).
const MIN_GAP_SECS: f64 = 1.0;

/// Accumulates one decayed weight per (fix, distinct file) pair.
///
/// Fixes are aged against the chronologically newest fix in the set (the
/// recency anchor). They are sorted by timestamp ascending internally, so
/// the result does not depend on the order the adapter emitted them. A file
/// listed twice in one fix's change list accumulates only once.
pub fn score_fixes(fixes: &[Fix], now: NaiveDateTime) -> HotspotTable {
    let mut table = HotspotTable::default();
    if fixes.is_empty() {
        return table;
    }

    let mut ordered: Vec<&Fix> = fixes.iter().collect();
    ordered.sort_by_key(|f| f.timestamp);

    let anchor = ordered[ordered.len() - 1].timestamp;
    let anchor_gap = gap_seconds(now, anchor);

    for fix in &ordered {
        let this_gap = gap_seconds(now, fix.timestamp);
        let ratio = this_gap / anchor_gap;
        let factor = 1.0 - ratio;
        let weight = decay_weight(factor);

        let mut seen: HashSet<&str> = HashSet::new();
        for file in &fix.files {
            if !seen.insert(file.as_str()) {
                continue;
            }
            table.add(file, weight);
        }
    }
    table
}

/// Sorts by score descending and truncates to `limit`. The sort is stable,
/// so equal scores keep their first-touch order. A limit of 0 yields an
/// empty list; a limit past the table size yields every entry.
pub fn rank_hotspots(table: HotspotTable, limit: usize) -> Vec<RankedHotspot> {
    let mut ranked: Vec<RankedHotspot> = table
        .into_entries()
        .into_iter()
        .map(|(path, score)| RankedHotspot { score, path })
        .collect();
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    ranked.truncate(limit);
    ranked
}

fn gap_seconds(now: NaiveDateTime, earlier: NaiveDateTime) -> f64 {
    ((now - earlier).num_seconds() as f64).max(MIN_GAP_SECS)
}

/// `1 / (1 + e^(-12·factor + 12))`, with the exponent bounds-checked: an
/// argument past the overflow threshold contributes 0.0 instead of poisoning
/// the table with non-finite values.
fn decay_weight(factor: f64) -> f64 {
    let arg = -DECAY_STEEPNESS * factor + DECAY_STEEPNESS;
    if !arg.is_finite() || arg > MAX_EXP_ARG {
        return 0.0;
    }
    1.0 / (1.0 + arg.exp())
}
