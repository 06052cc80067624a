//! Decoy Rule Definition Linter CLI
//!
//! Validates mock-rule definition files before they are preloaded into a
//! Decoy store, catching silently dead rules (invalid regexes, shadowed
//! occurrence overrides, typoed field names) ahead of time.
//!
//! Usage:
//!   decoy-lint <directory_or_file> [OPTIONS]

use clap::Parser;
use decoy_lint::{lint_file, LintIssue, LintOptions, LintResult, Severity};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

// ANSI color codes
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// Decoy Rule Definition Linter
#[derive(Parser, Debug)]
#[command(name = "decoy-lint")]
#[command(
    author,
    version,
    about = "Validate rule definition files for the Decoy mock-response engine"
)]
struct Args {
    /// Path to a rule file or a directory of rule files
    #[arg(required = true)]
    path: PathBuf,

    /// Output format: text (default), json
    #[arg(short, long, default_value = "text")]
    output: String,

    /// Only show errors (hide warnings)
    #[arg(short = 'e', long)]
    errors_only: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Strict mode - treat warnings as errors
    #[arg(short, long)]
    strict: bool,
}

fn main() {
    let args = Args::parse();

    println!("{BOLD}{CYAN}Decoy Rule Linter{RESET}");
    println!("{DIM}━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━{RESET}");

    let mut result = LintResult::default();
    let options = LintOptions {
        verbose: args.verbose,
    };

    let files = collect_rule_files(&args.path);

    if files.is_empty() {
        println!(
            "{YELLOW}Warning:{RESET} No JSON files found in {:?}",
            args.path
        );
        std::process::exit(0);
    }

    println!("{DIM}Scanning:{RESET} {CYAN}{}{RESET}", args.path.display());
    println!(
        "{DIM}Found:{RESET}    {BOLD}{}{RESET} rule file(s)\n",
        files.len()
    );
    result.files_checked = files.len();

    // First pass: parse everything and look for shadowed occurrence overrides
    // across the whole rule set.
    let mut rule_docs: Vec<(PathBuf, Value)> = Vec::new();
    for file in &files {
        match load_rule_file(file) {
            Ok(doc) => rule_docs.push((file.clone(), doc)),
            Err(e) => {
                result.add_issue(
                    LintIssue::error("E001", format!("Failed to parse JSON: {e}"), file.clone())
                        .with_suggestion("Check for JSON syntax errors"),
                );
            }
        }
    }
    check_shadowed_overrides(&rule_docs, &mut result);

    // Second pass: validate each file using the library.
    for (file, _) in &rule_docs {
        let file_result = lint_file(file, &options);
        // Merge without double-counting files_checked (we already counted)
        result.issues.extend(file_result.issues);
        result.errors += file_result.errors;
        result.warnings += file_result.warnings;
    }

    if args.output == "json" {
        print_results_json(&result);
    } else {
        print_results(&result, &args);
    }

    let has_errors = result.errors > 0 || (args.strict && result.warnings > 0);
    std::process::exit(if has_errors { 1 } else { 0 });
}

fn collect_rule_files(path: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    if path.is_file() {
        if path.extension().is_some_and(|ext| ext == "json") {
            files.push(path.to_path_buf());
        }
    } else if path.is_dir() {
        if let Ok(entries) = std::fs::read_dir(path) {
            for entry in entries.flatten() {
                let entry_path = entry.path();
                if entry_path.is_file() && entry_path.extension().is_some_and(|ext| ext == "json") {
                    files.push(entry_path);
                }
            }
        }
    }

    files.sort();
    files
}

fn load_rule_file(path: &Path) -> Result<Value, String> {
    let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&content).map_err(|e| e.to_string())
}

/// Two rules sharing a route and an `at` value can never both win: the one
/// registered first always takes the occurrence. Flag the collision across
/// the entire rule set, since preload order is filename order.
fn check_shadowed_overrides(rule_docs: &[(PathBuf, Value)], result: &mut LintResult) {
    let mut seen: HashMap<(String, u64), Vec<PathBuf>> = HashMap::new();

    for (file, doc) in rule_docs {
        let rules: Vec<&Value> = match doc {
            Value::Array(items) => items.iter().collect(),
            other => vec![other],
        };
        for rule in rules {
            let route = rule.get("route").and_then(|v| v.as_str());
            let at = rule.get("at").and_then(|v| v.as_u64());
            if let (Some(route), Some(at)) = (route, at) {
                seen.entry((route.to_string(), at)).or_default().push(file.clone());
            }
        }
    }

    for ((route, at), files) in &seen {
        if files.len() > 1 {
            let file_names: Vec<String> = files
                .iter()
                .map(|f| {
                    f.file_name()
                        .unwrap_or_default()
                        .to_string_lossy()
                        .to_string()
                })
                .collect();

            result.add_issue(
                LintIssue::warning(
                    "W104",
                    format!(
                        "Occurrence override at={at} for route \"{route}\" appears in {} rules: {}",
                        files.len(),
                        file_names.join(", ")
                    ),
                    files[0].clone(),
                )
                .with_location("at")
                .with_suggestion("Only the first registered rule can win that occurrence"),
            );
        }
    }
}

fn print_results_json(result: &LintResult) {
    match serde_json::to_string_pretty(&result) {
        Ok(output) => println!("{output}"),
        Err(e) => eprintln!("{RED}Failed to serialize results: {e}{RESET}"),
    }
}

fn print_results(result: &LintResult, args: &Args) {
    println!();

    if result.issues.is_empty() {
        println!("{GREEN}{BOLD}No issues found!{RESET}");
    } else {
        // Group issues by file
        let mut issues_by_file: HashMap<&PathBuf, Vec<&LintIssue>> = HashMap::new();
        for issue in &result.issues {
            issues_by_file.entry(&issue.file).or_default().push(issue);
        }

        // Sort files for consistent output
        let mut files: Vec<_> = issues_by_file.keys().collect();
        files.sort();

        for file in files {
            let issues = &issues_by_file[file];

            let filtered_issues: Vec<_> = if args.errors_only {
                issues
                    .iter()
                    .filter(|i| i.severity == Severity::Error)
                    .collect()
            } else {
                issues.iter().collect()
            };

            if filtered_issues.is_empty() {
                continue;
            }

            let file_errors = filtered_issues
                .iter()
                .filter(|i| i.severity == Severity::Error)
                .count();
            let file_warnings = filtered_issues
                .iter()
                .filter(|i| i.severity == Severity::Warning)
                .count();

            let file_name = file.file_name().unwrap_or_default().to_string_lossy();

            let status_indicator = if file_errors > 0 {
                format!("{RED}FAIL{RESET}")
            } else {
                format!("{YELLOW}WARN{RESET}")
            };

            let mut parts = Vec::new();
            if file_errors > 0 {
                parts.push(format!("{RED}{file_errors} error(s){RESET}{DIM}"));
            }
            if file_warnings > 0 {
                parts.push(format!("{YELLOW}{file_warnings} warning(s){RESET}{DIM}"));
            }
            let counts = if parts.is_empty() {
                String::new()
            } else {
                format!(" {DIM}({}){RESET}", parts.join(", "))
            };

            println!("{status_indicator} {BOLD}{CYAN}{file_name}{RESET}{counts}");

            for issue in filtered_issues {
                let severity_marker = match issue.severity {
                    Severity::Error => format!("{RED}|{RESET}"),
                    Severity::Warning => format!("{YELLOW}|{RESET}"),
                    Severity::Info => format!("{CYAN}|{RESET}"),
                };

                let severity_str = format!(
                    "{BOLD}{}{}{RESET}",
                    severity_color(&issue.severity),
                    issue.severity.label()
                );

                let location_str = issue
                    .location
                    .as_ref()
                    .map(|l| format!("{DIM}[{RESET}{CYAN}{l}{RESET}{DIM}]{RESET}"))
                    .unwrap_or_default();

                let code_str = format!(
                    "{DIM}({}{}{DIM}){RESET}",
                    severity_color(&issue.severity),
                    issue.code
                );

                println!(
                    "  {severity_marker} {location_str} {severity_str}: {} {code_str}",
                    issue.message
                );

                if let Some(suggestion) = &issue.suggestion {
                    println!("  {severity_marker}   {GREEN}-> {suggestion}{RESET}");
                }
            }
            println!();
        }
    }

    // Summary
    println!("{DIM}━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━{RESET}");
    println!("{BOLD}{CYAN}Summary{RESET}");
    println!("{DIM}━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━{RESET}");
    println!(
        "  {DIM}Files checked:{RESET} {BOLD}{}{RESET}",
        result.files_checked
    );

    if result.errors > 0 {
        println!(
            "  {RED}Errors:{RESET}    {BOLD}{RED}{}{RESET}",
            result.errors
        );
    } else {
        println!("  {GREEN}Errors:{RESET}    {BOLD}{GREEN}0{RESET}");
    }

    if result.warnings > 0 {
        println!(
            "  {YELLOW}Warnings:{RESET}  {BOLD}{YELLOW}{}{RESET}",
            result.warnings
        );
    } else {
        println!("  {DIM}Warnings:{RESET}  {BOLD}0{RESET}");
    }

    println!();

    if result.errors == 0 && result.warnings == 0 {
        println!("{GREEN}{BOLD}All checks passed!{RESET}");
    } else if result.errors == 0 {
        println!("{YELLOW}{BOLD}Passed with warnings{RESET}");
    } else {
        println!("{RED}{BOLD}Linting failed with errors{RESET}");
    }
}

fn severity_color(severity: &Severity) -> &'static str {
    match severity {
        Severity::Error => RED,
        Severity::Warning => YELLOW,
        Severity::Info => CYAN,
    }
}
