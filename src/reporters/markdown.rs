use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::types::Report;

/// Renders one dated report section: the scan summary, the fix messages,
/// and one `<score, 2 decimals> = <path>` line per ranked hotspot.
pub fn render_markdown(report: &Report) -> String {
    let mut out = String::new();
    out.push_str(&format!("## bugspots — {}\n\n", report.meta.scanned_at));
    out.push_str(&format!(
        "Scanning {} repo ({}), branch:{}\n",
        report.meta.repo_path, report.meta.vcs, report.meta.branch
    ));
    out.push_str(&format!(
        "Found {} bugfix commits on the last {} days\n\n",
        report.meta.fix_count, report.meta.window_days
    ));

    out.push_str("### Fixes\n\n");
    for message in &report.fixes {
        out.push_str(&format!("- {message}\n"));
    }

    out.push_str("\n### Hotspots\n\n");
    if report.hotspots.is_empty() {
        out.push_str("No hotspots to report.\n");
    } else {
        for hotspot in &report.hotspots {
            out.push_str(&format!("- {:.2} = {}\n", hotspot.score, hotspot.path));
        }
    }
    out.push('\n');
    out
}

/// Appends the rendered section to `path`, creating the file on first use.
/// Sections accumulate, so one report file carries a dated scan history.
pub fn report_markdown(report: &Report, path: &Path) -> Result<(), String> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| format!("Failed to open {} for appending: {e}", path.display()))?;
    file.write_all(render_markdown(report).as_bytes())
        .map_err(|e| format!("Failed to write {}: {e}", path.display()))?;
    eprintln!("✓ Markdown report appended to {}", path.display());
    Ok(())
}
