use serde::Deserialize;
use std::path::Path;

/// All settings that can be placed in a .bugspots.yml config file.
/// Every field is optional — omitted fields fall back to CLI defaults.
/// CLI flags always take precedence over values set here.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BugspotsConfig {
    pub days: Option<i64>,
    pub branch: Option<String>,
    pub limit: Option<usize>,
    pub bugs_file: Option<String>,
    pub format: Option<String>,
    pub output: Option<String>,
}

impl BugspotsConfig {
    /// Validates semantic constraints that serde cannot enforce.
    ///
    /// Returns a human-readable error describing exactly what is wrong and
    /// what values are accepted. Called automatically by [`load_config`].
    pub fn validate(&self) -> Result<(), String> {
        if let Some(fmt) = &self.format {
            match fmt.as_str() {
                "terminal" | "json" | "markdown" => {}
                other => {
                    return Err(format!(
                        "Invalid 'format' value: \"{other}\". \
                         Expected one of: \"terminal\", \"json\", \"markdown\""
                    ))
                }
            }
        }

        if let Some(d) = self.days {
            if d < 1 {
                return Err(format!(
                    "Invalid 'days' value: {d}. The scan window must cover at least 1 day"
                ));
            }
        }

        Ok(())
    }
}

/// Reads, parses, and validates a YAML config file from `path`.
pub fn load_config(path: &Path) -> Result<BugspotsConfig, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Cannot read config file '{}': {e}", path.display()))?;
    let cfg: BugspotsConfig = serde_yaml::from_str(&content)
        .map_err(|e| format!("Invalid config file '{}': {e}", path.display()))?;
    cfg.validate()
        .map_err(|e| format!("Config file '{}': {e}", path.display()))?;
    Ok(cfg)
}

/// Annotated YAML template — printed by `--generate-config`.
pub static TEMPLATE: &str = r#"# bugspots configuration file
# Generated by: bugspots --generate-config
#
# All settings are optional. Omit any field to use the built-in default.
# CLI flags always take precedence over values in this file.
# Save this file as .bugspots.yml in your repository root, then run:
#
#   bugspots --config .bugspots.yml [path]

# Days of history to include in the scan.
# days: 30

# Branch to scan. Omit to stay on the currently checked-out branch.
# The scan checks the branch out when it is not the current one.
# branch: "main"

# Maximum number of hotspots to report.
# limit: 10

# File of ticket identifiers (first whitespace-separated column per line).
# When set, these literal identifiers replace the built-in bug/fix/close
# keyword matching entirely.
# bugs_file: "known-bug-tickets.txt"

# Output format: terminal, json, markdown
# format: "terminal"

# Output file. JSON defaults to stdout; markdown appends dated sections
# to bugspots-report.md.
# output: "bugspots-report.md"
"#;

/// Prints the config template to stdout, or writes it to `output_path` if given.
pub fn print_template(output_path: Option<&Path>) -> Result<(), String> {
    match output_path {
        Some(path) => std::fs::write(path, TEMPLATE)
            .map_err(|e| format!("Cannot write config template to '{}': {e}", path.display())),
        None => {
            print!("{TEMPLATE}");
            Ok(())
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
