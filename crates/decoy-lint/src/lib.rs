//! Rule-definition linting library for the Decoy mock-response engine.
//!
//! Decoy tolerates almost anything at load time — absent fields impose no
//! constraint and an invalid matcher regex simply never matches — which makes
//! a silently dead rule easy to ship. This library validates rule files
//! before they reach the store. It can be used standalone or through the
//! `decoy-lint` CLI binary.
//!
//! # Example
//!
//! ```no_run
//! use decoy_lint::{lint_directory, LintOptions};
//! use std::path::Path;
//!
//! let result = lint_directory(Path::new("./default_routes"), &LintOptions::default());
//! if result.has_errors() {
//!     eprintln!("Found {} errors", result.errors);
//! }
//! ```

mod types;
mod validator;

use std::path::Path;

pub use types::{LintIssue, LintOptions, LintResult, Severity};

// Re-export validation functions for advanced usage
pub use validator::{validate_rule, validate_rule_file};

/// Lint a single rule file (one rule object or a top-level array of rules).
pub fn lint_file(path: &Path, options: &LintOptions) -> LintResult {
    let mut result = LintResult::new();
    result.files_checked = 1;

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            result.add_issue(LintIssue::error(
                "E001",
                format!("Failed to read file: {e}"),
                path.to_path_buf(),
            ));
            return result;
        }
    };

    let value: serde_json::Value = match serde_json::from_str(&content) {
        Ok(v) => v,
        Err(e) => {
            result.add_issue(LintIssue::error(
                "E002",
                format!("Invalid JSON: {e}"),
                path.to_path_buf(),
            ));
            return result;
        }
    };

    validate_rule_file(path, &value, &mut result, options);
    result
}

/// Lint all JSON files in a directory (non-recursive).
pub fn lint_directory(path: &Path, options: &LintOptions) -> LintResult {
    let mut result = LintResult::new();

    let entries = match std::fs::read_dir(path) {
        Ok(e) => e,
        Err(e) => {
            result.add_issue(LintIssue::error(
                "E001",
                format!("Failed to read directory: {e}"),
                path.to_path_buf(),
            ));
            return result;
        }
    };

    for entry in entries.flatten() {
        let file_path = entry.path();
        if file_path.extension().map(|e| e == "json").unwrap_or(false) {
            let file_result = lint_file(&file_path, options);
            result.merge(file_result);
        }
    }

    result
}

/// Lint a JSON string directly (useful for in-memory validation).
pub fn lint_json(json: &str, source_name: &str, options: &LintOptions) -> LintResult {
    let mut result = LintResult::new();
    result.files_checked = 1;

    let path = Path::new(source_name);

    let value: serde_json::Value = match serde_json::from_str(json) {
        Ok(v) => v,
        Err(e) => {
            result.add_issue(LintIssue::error(
                "E002",
                format!("Invalid JSON: {e}"),
                path.to_path_buf(),
            ));
            return result;
        }
    };

    validate_rule_file(path, &value, &mut result, options);
    result
}

/// Lint a parsed JSON value directly (useful when you already have parsed JSON).
pub fn lint_value(
    value: &serde_json::Value,
    source_name: &str,
    options: &LintOptions,
) -> LintResult {
    let mut result = LintResult::new();
    result.files_checked = 1;

    let path = Path::new(source_name);
    validate_rule_file(path, value, &mut result, options);
    result
}
