//! Core validation logic for rule definitions.

use crate::types::{LintIssue, LintOptions, LintResult};
use regex::Regex;
use serde_json::Value;
use std::path::Path;

const KNOWN_FIELDS: [&str; 8] = [
    "route",
    "payload",
    "queryParams",
    "requiredHeaders",
    "at",
    "responseCode",
    "responseBody",
    "responseHeaders",
];

const CONSTRAINT_GROUPS: [&str; 3] = ["payload", "queryParams", "requiredHeaders"];

/// Validate the contents of one rule file: either a single rule object or a
/// top-level array of rules.
pub fn validate_rule_file(
    file: &Path,
    value: &Value,
    result: &mut LintResult,
    options: &LintOptions,
) {
    match value {
        Value::Array(rules) => {
            for (idx, rule) in rules.iter().enumerate() {
                validate_rule(file, rule, &format!("rules[{idx}]"), result, options);
            }
        }
        other => validate_rule(file, other, "rule", result, options),
    }
}

/// Validate a single rule definition.
pub fn validate_rule(
    file: &Path,
    rule: &Value,
    location: &str,
    result: &mut LintResult,
    _options: &LintOptions,
) {
    let obj = match rule.as_object() {
        Some(obj) => obj,
        None => {
            result.add_issue(
                LintIssue::error("E101", "Rule must be a JSON object", file.to_path_buf())
                    .with_location(location),
            );
            return;
        }
    };

    check_route(file, rule, location, result);
    for group in CONSTRAINT_GROUPS {
        check_constraint_group(file, rule, group, location, result);
    }
    check_at(file, rule, location, result);
    check_response(file, rule, location, result);

    for key in obj.keys() {
        if !KNOWN_FIELDS.contains(&key.as_str()) {
            result.add_issue(
                LintIssue::warning(
                    "W103",
                    format!("Unknown field: {key}"),
                    file.to_path_buf(),
                )
                .with_location(format!("{location}.{key}"))
                .with_suggestion(format!("Known fields: {}", KNOWN_FIELDS.join(", "))),
            );
        }
    }
}

fn check_route(file: &Path, rule: &Value, location: &str, result: &mut LintResult) {
    match rule.get("route") {
        None => {
            result.add_issue(
                LintIssue::warning(
                    "W101",
                    "Rule has no route and will match every path",
                    file.to_path_buf(),
                )
                .with_location(location)
                .with_suggestion("Add a \"route\" pattern, e.g. \"/users/.*\""),
            );
        }
        Some(Value::String(pattern)) => {
            if let Err(e) = Regex::new(pattern) {
                result.add_issue(
                    LintIssue::error(
                        "E103",
                        format!("Route is not a valid regex: {e}"),
                        file.to_path_buf(),
                    )
                    .with_location(format!("{location}.route")),
                );
            }
        }
        Some(_) => {
            result.add_issue(
                LintIssue::error("E102", "Route must be a string", file.to_path_buf())
                    .with_location(format!("{location}.route")),
            );
        }
    }
}

fn check_constraint_group(
    file: &Path,
    rule: &Value,
    group: &str,
    location: &str,
    result: &mut LintResult,
) {
    let Some(value) = rule.get(group) else { return };

    let obj = match value.as_object() {
        Some(obj) => obj,
        None => {
            result.add_issue(
                LintIssue::error(
                    "E104",
                    format!("{group} must be an object of field-to-matcher pairs"),
                    file.to_path_buf(),
                )
                .with_location(format!("{location}.{group}")),
            );
            return;
        }
    };

    for (field, matcher) in obj {
        let field_location = format!("{location}.{group}.{field}");
        match matcher {
            Value::String(pattern) => {
                // Invalid matchers never match at runtime, so a rule carrying
                // one is silently dead weight.
                if let Err(e) = Regex::new(pattern) {
                    result.add_issue(
                        LintIssue::error(
                            "E106",
                            format!("Matcher is not a valid regex: {e}"),
                            file.to_path_buf(),
                        )
                        .with_location(field_location)
                        .with_suggestion("Escape literal regex metacharacters, e.g. \\[ for ["),
                    );
                }
            }
            Value::Number(_) | Value::Bool(_) => {}
            _ => {
                result.add_issue(
                    LintIssue::error(
                        "E105",
                        "Matcher must be a scalar (string pattern, number, or boolean)",
                        file.to_path_buf(),
                    )
                    .with_location(field_location)
                    .with_suggestion(
                        "Address nested payload members with a field path key like outer[0].inner",
                    ),
                );
            }
        }
    }
}

fn check_at(file: &Path, rule: &Value, location: &str, result: &mut LintResult) {
    if let Some(at) = rule.get("at") {
        let positive = at.as_u64().is_some_and(|n| n >= 1);
        if !positive {
            result.add_issue(
                LintIssue::error(
                    "E107",
                    format!("\"at\" must be a positive integer, got {at}"),
                    file.to_path_buf(),
                )
                .with_location(format!("{location}.at"))
                .with_suggestion("Occurrence counts start at 1 for the first matching request"),
            );
        }
    }
}

fn check_response(file: &Path, rule: &Value, location: &str, result: &mut LintResult) {
    match rule.get("responseCode") {
        Some(code) => {
            let in_range = code.as_u64().is_some_and(|n| (100..=599).contains(&n));
            if !in_range {
                result.add_issue(
                    LintIssue::warning(
                        "W102",
                        format!("responseCode {code} is not a valid HTTP status"),
                        file.to_path_buf(),
                    )
                    .with_location(format!("{location}.responseCode")),
                );
            }
        }
        None => {
            if rule.get("responseBody").is_none() {
                result.add_issue(
                    LintIssue::info(
                        "I101",
                        "Rule declares no response; matches return an empty response",
                        file.to_path_buf(),
                    )
                    .with_location(location),
                );
            }
        }
    }
}
