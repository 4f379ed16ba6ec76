mod classifier;
mod config;
mod error;
mod extractor;
mod reporters;
mod scoring;
mod types;
mod vcs;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use classifier::{ClassifierConfig, FixClassifier};
use config::BugspotsConfig;
use error::ScanError;
use types::{Report, ReportMeta};

#[derive(Parser, Debug)]
#[command(
    name = "bugspots",
    about = "Rank bug-prone files using the time-decayed fix-commit heuristic",
    version,
    long_about = "Scans version-control history for bug-fix commits and ranks the\n\
                  files they touched by a time-decayed weight: files fixed often,\n\
                  and recently, float to the top.\n\n\
                  Accepts one or more repository paths (git or mercurial); each is\n\
                  scanned independently with the same settings."
)]
struct Args {
    /// Repository paths to scan (git or mercurial working copies).
    #[arg(value_name = "PATH", default_value = ".")]
    paths: Vec<PathBuf>,

    /// Days of history to include [default: 30]
    #[arg(long)]
    days: Option<i64>,

    /// Branch to scan; checked out first when it is not the current one.
    /// Omit to stay on the currently checked-out branch.
    #[arg(long)]
    branch: Option<String>,

    /// Maximum number of hotspots to report [default: 10]
    #[arg(long)]
    limit: Option<usize>,

    /// File of ticket identifiers (first column per line); replaces the
    /// built-in bug/fix/close keyword matching entirely.
    #[arg(long)]
    bugs_file: Option<PathBuf>,

    /// Output format: terminal, json, markdown [default: terminal]
    #[arg(long)]
    format: Option<String>,

    /// Output file. JSON defaults to stdout; markdown defaults to
    /// bugspots-report.md (sections are appended, one per scan).
    #[arg(long)]
    output: Option<PathBuf>,

    /// YAML config file (CLI flags take precedence over its values).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print an annotated config template and exit.
    #[arg(long)]
    generate_config: bool,
}

/// Settings after merging CLI flags over the config file over built-in
/// defaults.
#[derive(Debug)]
struct ScanSettings {
    days: i64,
    limit: usize,
    branch: Option<String>,
    bugs_file: Option<PathBuf>,
    format: String,
    output: Option<PathBuf>,
}

fn resolve_settings(args: &Args, cfg: &BugspotsConfig) -> ScanSettings {
    ScanSettings {
        days: args.days.or(cfg.days).unwrap_or(30),
        limit: args.limit.or(cfg.limit).unwrap_or(10),
        branch: args.branch.clone().or_else(|| cfg.branch.clone()),
        bugs_file: args
            .bugs_file
            .clone()
            .or_else(|| cfg.bugs_file.as_ref().map(PathBuf::from)),
        format: args
            .format
            .clone()
            .or_else(|| cfg.format.clone())
            .unwrap_or_else(|| "terminal".to_string()),
        output: args.output.clone().or_else(|| cfg.output.as_ref().map(PathBuf::from)),
    }
}

fn main() {
    let args = Args::parse();

    if args.generate_config {
        if let Err(e) = config::print_template(args.output.as_deref()) {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
        return;
    }

    let cfg = match &args.config {
        Some(path) => match config::load_config(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },
        None => BugspotsConfig::default(),
    };
    let settings = resolve_settings(&args, &cfg);

    if !matches!(settings.format.as_str(), "terminal" | "json" | "markdown") {
        eprintln!(
            "Error: invalid --format \"{}\". Expected one of: terminal, json, markdown",
            settings.format
        );
        std::process::exit(1);
    }
    if settings.days < 1 {
        eprintln!("Error: --days must be 1 or greater, got {}", settings.days);
        std::process::exit(1);
    }

    // The classifier is built once, before any repository is touched, so a
    // bad identifier list fails the whole invocation up front.
    let classifier_config = match &settings.bugs_file {
        Some(path) => match classifier::load_identifiers(path) {
            Ok(ids) => ClassifierConfig::IdentifierList(ids),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },
        None => ClassifierConfig::Default,
    };
    let classifier = match FixClassifier::new(&classifier_config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let is_multi = args.paths.len() > 1;
    let mut reported = 0usize;

    for path in &args.paths {
        let repo_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("repo");

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        pb.enable_steady_tick(Duration::from_millis(80));
        pb.set_message(format!("Scanning {}...", path.display()));
        let started = Instant::now();

        let outcome = run_scan(path, &settings, &classifier);
        pb.finish_and_clear();

        match outcome {
            Ok(Some(report)) => {
                eprintln!(
                    "✔ [{}] {} fix commits on branch {} — ⏱ {}",
                    repo_name,
                    report.meta.fix_count,
                    report.meta.branch,
                    fmt_dur(started.elapsed()),
                );
                if let Err(e) = render_report(&report, repo_name, &settings, is_multi) {
                    eprintln!("Error reporting {}: {e}", path.display());
                    continue;
                }
                reported += 1;
            }
            Ok(None) => {
                eprintln!(
                    "✘ [{}] Not found commits matching search criteria (last {} days)",
                    repo_name, settings.days,
                );
            }
            Err(e) => {
                eprintln!("Error scanning {}: {e}", path.display());
            }
        }
    }

    if reported == 0 {
        std::process::exit(1);
    }
}

// ─── Scan pipeline ─────────────────────────────────────────────────────────────

/// Runs one repository through the full pipeline: adapter detection, fix
/// extraction, scoring, ranking. `Ok(None)` means no commit matched the
/// window and classifier — the scorer is never invoked on an empty fix set.
fn run_scan(
    path: &Path,
    settings: &ScanSettings,
    classifier: &FixClassifier,
) -> Result<Option<Report>, ScanError> {
    let mut adapter = vcs::detect_adapter(path)?;
    let now = chrono::Local::now().naive_local();

    let fixes = extractor::extract_fixes(
        adapter.as_mut(),
        classifier,
        settings.branch.as_deref(),
        now,
        settings.days,
    )?;
    if fixes.is_empty() {
        return Ok(None);
    }

    let branch = match &settings.branch {
        Some(b) => b.clone(),
        None => adapter.current_branch()?,
    };
    let fix_messages: Vec<String> = fixes.iter().map(|f| f.message.clone()).collect();

    let table = scoring::score_fixes(&fixes, now);
    let hotspots = scoring::rank_hotspots(table, settings.limit);

    Ok(Some(Report {
        meta: ReportMeta {
            repo_path: path.display().to_string(),
            vcs: adapter.name().to_string(),
            branch,
            window_days: settings.days,
            fix_count: fix_messages.len(),
            scanned_at: now.format("%Y-%m-%d %H:%M:%S").to_string(),
        },
        fixes: fix_messages,
        hotspots,
    }))
}

fn render_report(
    report: &Report,
    repo_name: &str,
    settings: &ScanSettings,
    is_multi: bool,
) -> Result<(), String> {
    match settings.format.as_str() {
        "json" => {
            let output = settings.output.as_deref().map(|base| {
                if is_multi {
                    make_output_path(base, repo_name)
                } else {
                    base.to_path_buf()
                }
            });
            reporters::json::report_json(report, output.as_deref())
        }
        "markdown" => {
            let default_path = PathBuf::from("bugspots-report.md");
            let path = settings.output.as_deref().unwrap_or(&default_path);
            reporters::markdown::report_markdown(report, path)
        }
        _ => {
            reporters::terminal::report_terminal(report);
            Ok(())
        }
    }
}

// ─── Duration formatting ───────────────────────────────────────────────────────

fn fmt_dur(d: Duration) -> String {
    let ms = d.as_millis();
    if ms >= 1000 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{ms}ms")
    }
}

// ─── Output path helpers ───────────────────────────────────────────────────────

/// Given a base output path and a repo name, insert the repo name before the
/// extension. e.g. `report.json` + `my-app` → `report-my-app.json`
fn make_output_path(base: &Path, repo_name: &str) -> PathBuf {
    let stem = base.file_stem().and_then(|s| s.to_str()).unwrap_or("bugspots");
    let ext = base.extension().and_then(|s| s.to_str()).unwrap_or("json");
    let dir = base.parent().unwrap_or(Path::new("."));
    let safe: String = repo_name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
        .collect();
    dir.join(format!("{stem}-{safe}.{ext}"))
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;

    fn base_args() -> Args {
        Args {
            paths: vec![PathBuf::from(".")],
            days: None,
            branch: None,
            limit: None,
            bugs_file: None,
            format: None,
            output: None,
            config: None,
            generate_config: false,
        }
    }

    #[test]
    fn test_settings_defaults() {
        let settings = resolve_settings(&base_args(), &BugspotsConfig::default());
        assert_eq!(settings.days, 30, "default window matches the original tool");
        assert_eq!(settings.limit, 10, "default limit matches the original tool");
        assert_eq!(settings.format, "terminal");
        assert!(settings.branch.is_none());
    }

    #[test]
    fn test_config_file_fills_unset_flags() {
        let cfg = BugspotsConfig {
            days: Some(90),
            branch: Some("release".to_string()),
            limit: Some(5),
            ..Default::default()
        };
        let settings = resolve_settings(&base_args(), &cfg);
        assert_eq!(settings.days, 90);
        assert_eq!(settings.branch.as_deref(), Some("release"));
        assert_eq!(settings.limit, 5);
    }

    #[test]
    fn test_cli_flags_beat_config_file() {
        let mut args = base_args();
        args.days = Some(7);
        args.format = Some("json".to_string());
        let cfg = BugspotsConfig {
            days: Some(90),
            format: Some("markdown".to_string()),
            ..Default::default()
        };
        let settings = resolve_settings(&args, &cfg);
        assert_eq!(settings.days, 7, "CLI flag must win over config value");
        assert_eq!(settings.format, "json");
    }

    #[test]
    fn test_make_output_path() {
        let base = PathBuf::from("report.json");
        assert_eq!(make_output_path(&base, "my-app"), PathBuf::from("report-my-app.json"));
    }

    #[test]
    fn test_make_output_path_special_chars() {
        let base = PathBuf::from("out/report.json");
        let result = make_output_path(&base, "my app/v2");
        assert!(
            result.to_str().unwrap().contains("my-app-v2"),
            "special chars should be sanitized"
        );
    }

    #[test]
    fn test_fmt_dur_milliseconds() {
        let s = fmt_dur(Duration::from_millis(250));
        assert!(s.ends_with("ms"), "sub-second durations use 'ms': got '{s}'");
    }

    #[test]
    fn test_fmt_dur_seconds() {
        let s = fmt_dur(Duration::from_millis(1_500));
        assert!(s.contains("1.5"), "durations >= 1s use decimal seconds: got '{s}'");
    }

    // ── Full pipeline against a real repo (skipped when git is unavailable) ──

    fn git_available() -> bool {
        Command::new("git")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn git_in(dir: &Path, args: &[&str]) -> bool {
        Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn commit_file(dir: &Path, name: &str, message: &str) {
        // Content varies with the message so repeat commits to one file
        // always have something to record.
        std::fs::write(dir.join(name), format!("{message}\n")).unwrap();
        assert!(git_in(dir, &["add", name]));
        assert!(git_in(dir, &["commit", "-q", "-m", message]));
    }

    fn settings() -> ScanSettings {
        ScanSettings {
            days: 30,
            limit: 10,
            branch: None,
            bugs_file: None,
            format: "terminal".to_string(),
            output: None,
        }
    }

    #[test]
    fn test_run_scan_end_to_end() {
        if !git_available() {
            eprintln!("Skipping: git binary not available");
            return;
        }
        let tmp = tempfile::tempdir().expect("temp dir");
        if !git_in(tmp.path(), &["init", "-q"])
            || !git_in(tmp.path(), &["config", "user.email", "dev@example.com"])
            || !git_in(tmp.path(), &["config", "user.name", "dev"])
        {
            eprintln!("Skipping: git init failed in sandbox");
            return;
        }
        commit_file(tmp.path(), "feature.rs", "add the feature");
        commit_file(tmp.path(), "parser.rs", "fix parser panic");
        commit_file(tmp.path(), "parser.rs", "fix parser fallout again");

        let classifier = FixClassifier::new(&ClassifierConfig::Default).unwrap();
        let report = run_scan(tmp.path(), &settings(), &classifier)
            .expect("scan should succeed")
            .expect("fix commits exist, report must be produced");

        assert_eq!(report.meta.fix_count, 2, "two commits carry fix keywords");
        assert_eq!(report.hotspots.len(), 1, "only parser.rs was touched by fixes");
        assert_eq!(report.hotspots[0].path, "parser.rs");
        assert!(report.hotspots[0].score > 0.0);
        assert_eq!(report.fixes.len(), 2);
    }

    #[test]
    fn test_run_scan_no_matches_is_none() {
        if !git_available() {
            eprintln!("Skipping: git binary not available");
            return;
        }
        let tmp = tempfile::tempdir().expect("temp dir");
        if !git_in(tmp.path(), &["init", "-q"])
            || !git_in(tmp.path(), &["config", "user.email", "dev@example.com"])
            || !git_in(tmp.path(), &["config", "user.name", "dev"])
        {
            eprintln!("Skipping: git init failed in sandbox");
            return;
        }
        commit_file(tmp.path(), "feature.rs", "add the feature");

        let classifier = FixClassifier::new(&ClassifierConfig::Default).unwrap();
        let outcome = run_scan(tmp.path(), &settings(), &classifier).expect("scan should succeed");
        assert!(outcome.is_none(), "no fix commits must yield the empty outcome");
    }

    #[test]
    fn test_run_scan_unsupported_path_is_error() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let classifier = FixClassifier::new(&ClassifierConfig::Default).unwrap();
        let result = run_scan(tmp.path(), &settings(), &classifier);
        assert!(
            matches!(result, Err(ScanError::UnsupportedRepository(_))),
            "a plain directory must fail detection, not crash the scan loop"
        );
    }
}
