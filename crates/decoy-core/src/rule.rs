//! Rule definitions for the mock-response store.
//!
//! A `Rule` pairs a route pattern (and optional constraints on query
//! parameters, request payload, and headers) with a canned response. Rules
//! are deserialized from JSON rule files or built programmatically; every
//! field except `route` is optional, and absent constraint groups simply
//! impose no filtering.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Constraint group: field path (or flat key) to matcher value.
///
/// Matcher values are untagged: every value is stringified and treated as a
/// regex pattern, which also covers literals since a literal is a valid
/// pattern matching itself.
pub type MatcherMap = HashMap<String, serde_json::Value>;

/// A registered mock rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Rule {
    /// Regex pattern tested against the request pathname. The empty default
    /// matches any path, so `Rule::default()` is a catch-all.
    pub route: String,

    /// Payload constraints, keyed by dot/bracket field path (`outer[0].inner`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<MatcherMap>,

    /// Query-string constraints, keyed by flat query key. Keys containing
    /// `[`/`]` are still flat keys here, never field paths.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_params: Option<MatcherMap>,

    /// Header constraints. Header-name lookup is case-insensitive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_headers: Option<MatcherMap>,

    /// When set, the rule is eligible only on the Nth request whose path
    /// matched this rule's route group (see `RuleStore::match_request`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub at: Option<u64>,

    /// Status code returned verbatim on match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_code: Option<u16>,

    /// Body returned verbatim on match (string, object, anything).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_body: Option<serde_json::Value>,

    /// Headers returned verbatim on match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_headers: Option<HashMap<String, String>>,
}

impl Rule {
    /// Number of declared fields across the primary constraint groups
    /// (query parameters + payload). This is the primary specificity score
    /// for a rule whose constraints were all satisfied.
    pub(crate) fn primary_field_count(&self) -> usize {
        self.query_params.as_ref().map_or(0, HashMap::len)
            + self.payload.as_ref().map_or(0, HashMap::len)
    }

    /// Number of declared header constraints; breaks primary-score ties.
    pub(crate) fn header_field_count(&self) -> usize {
        self.required_headers.as_ref().map_or(0, HashMap::len)
    }
}
