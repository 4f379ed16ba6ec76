use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};

use crate::types::Report;

pub fn report_terminal(report: &Report) {
    println!();
    println!(
        "{} — scanning {} repo ({}), branch:{}",
        "bugspots".red().bold(),
        report.meta.repo_path.cyan(),
        report.meta.vcs.bright_black(),
        report.meta.branch.bright_black(),
    );
    println!(
        "Found {} bugfix commits on the last {} days",
        report.meta.fix_count.to_string().bold(),
        report.meta.window_days,
    );
    println!();

    // ── Fixes ──────────────────────────────────────────────────────────────
    println!("{}", "Fixes".bold());
    println!("{}", "─".repeat(80).bright_black());
    for message in &report.fixes {
        println!("      -{message}");
    }
    println!();

    // ── Hotspots ───────────────────────────────────────────────────────────
    println!("{}", "Hotspots".bold());
    println!("{}", "─".repeat(80).bright_black());

    if report.hotspots.is_empty() {
        println!("{}", "  No hotspots to report.".yellow());
        println!();
        return;
    }

    let top_score = report.hotspots[0].score;
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["RANK", "SCORE", "FILE"]);
    for (i, hotspot) in report.hotspots.iter().enumerate() {
        table.add_row(vec![
            Cell::new(format!("{:3}", i + 1)),
            score_cell(hotspot.score, top_score),
            Cell::new(truncate_path(&hotspot.path, 60)),
        ]);
    }
    println!("{table}");
    println!();
}

// ─── Cell builders ────────────────────────────────────────────────────────────

/// Score cell: plain numeric text, colored by its share of the top score so
/// comfy-table measures the real visible width (no ANSI bytes in the content).
fn score_cell(score: f64, top_score: f64) -> Cell {
    let text = format!("{score:.6}");
    let share = if top_score > 0.0 { score / top_score } else { 0.0 };
    if share >= 0.75 {
        Cell::new(text).fg(Color::Red)
    } else if share >= 0.5 {
        Cell::new(text).fg(Color::Yellow)
    } else {
        Cell::new(text).fg(Color::Green)
    }
}

fn truncate_path(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    format!("…{}", &s[s.len().saturating_sub(max - 1)..])
}
