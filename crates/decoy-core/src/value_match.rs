//! Shared value-matching primitive.
//!
//! Matcher values are untagged: literals and regex fragments go through the
//! same path. Both sides are stringified and the matcher string is compiled
//! as an unanchored regex tested against the actual string. A literal digit
//! sequence is a valid pattern matching itself, so no separate equality
//! fallback is needed; producers wanting exact matches anchor the pattern
//! (`^(foo|bar|baz)$`).

use regex::Regex;
use serde_json::Value;
use std::borrow::Cow;

/// Stringify a JSON value the way request values arrive over the wire:
/// strings unquoted, everything else in its JSON rendering.
pub fn stringify(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        other => Cow::Owned(other.to_string()),
    }
}

/// Test a matcher value against an actual value.
///
/// An invalid regex in the matcher fails this field only; one bad rule must
/// not break matching for other candidates.
pub fn value_matches(matcher: &Value, actual: &Value) -> bool {
    pattern_matches(&stringify(matcher), &stringify(actual))
}

/// Test a matcher value against a raw string (already-decoded query value,
/// header value).
pub fn value_matches_str(matcher: &Value, actual: &str) -> bool {
    pattern_matches(&stringify(matcher), actual)
}

fn pattern_matches(pattern: &str, actual: &str) -> bool {
    match Regex::new(pattern) {
        Ok(re) => re.is_match(actual),
        Err(_) => false,
    }
}

/// Decode a form-encoded query component: `+` is a literal space, then
/// percent-escapes are resolved. Undecodable escapes leave the input as-is
/// rather than failing the match call.
pub fn form_decode(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}
