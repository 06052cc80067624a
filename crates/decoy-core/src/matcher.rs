//! Candidate filtering, specificity scoring, and winner selection.
//!
//! Given an incoming request descriptor, the matcher filters rules whose
//! route pattern matches the pathname, disqualifies candidates with unmet
//! constraints, advances the per-route occurrence counters, and picks the
//! winner:
//!
//! 1. A rule whose `at` equals its route group's running count is maximally
//!    specific and beats every default rule.
//! 2. Within a partition, the score is the pair (satisfied query + payload
//!    fields, satisfied header fields), compared lexicographically — header
//!    constraints only discriminate when the primary counts tie.
//! 3. Remaining ties go to the earliest inserted rule, so add order never
//!    decides between rules of different specificity.

use crate::field_path;
use crate::rule::Rule;
use crate::value_match::{form_decode, value_matches, value_matches_str};
use regex::Regex;
use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// Split a request path into pathname and raw query string.
pub fn split_path(path: &str) -> (&str, Option<&str>) {
    match path.split_once('?') {
        Some((pathname, query)) => (pathname, Some(query)),
        None => (path, None),
    }
}

/// Parse a query string into a flat key/value map, form-decoding both sides.
///
/// Keys are literal: `outer[0].inner=1` yields the key `outer[0].inner`,
/// never a nested path. One scalar per key; a repeated key keeps the last
/// occurrence.
pub fn parse_query(raw: &str) -> HashMap<String, String> {
    raw.split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            Some((form_decode(key), form_decode(value)))
        })
        .collect()
}

/// Select the winning rule for a request, advancing occurrence counters.
///
/// Counters tick once per call per distinct route string among the rules
/// whose pattern matched the pathname — a candidate disqualified by its
/// constraints still advances its route group.
pub(crate) fn select<'a>(
    rules: &'a [Rule],
    route_hits: &mut HashMap<String, u64>,
    path: &str,
    payload: Option<&Value>,
    headers: Option<&HashMap<String, String>>,
) -> Option<&'a Rule> {
    let (pathname, raw_query) = split_path(path);
    let query = raw_query.map(parse_query).unwrap_or_default();

    // Route patterns are compiled per call; a pattern that fails to compile
    // disqualifies only its own rule.
    let candidates: Vec<&Rule> = rules
        .iter()
        .filter(|rule| match Regex::new(&rule.route) {
            Ok(re) => re.is_match(pathname),
            Err(_) => false,
        })
        .collect();

    let mut seen_routes = HashSet::new();
    for rule in &candidates {
        if seen_routes.insert(rule.route.as_str()) {
            *route_hits.entry(rule.route.clone()).or_insert(0) += 1;
        }
    }

    let mut best: Option<(Specificity, &Rule)> = None;
    for rule in candidates {
        if !qualifies(rule, &query, payload, headers) {
            continue;
        }
        let at_eligible =
            matches!(rule.at, Some(at) if route_hits.get(rule.route.as_str()) == Some(&at));
        let score = Specificity {
            at_eligible,
            primary: rule.primary_field_count(),
            headers: rule.header_field_count(),
        };
        // Strictly-greater keeps the earliest inserted rule on full ties.
        if best.as_ref().is_none_or(|(top, _)| score > *top) {
            best = Some((score, rule));
        }
    }
    best.map(|(_, rule)| rule)
}

/// Ordered by derived lexicographic comparison: occurrence eligibility
/// dominates, then primary field count, then header count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Specificity {
    at_eligible: bool,
    primary: usize,
    headers: usize,
}

/// Every declared field of every present constraint group must resolve and
/// match; a rule with no constraint groups qualifies on route alone.
fn qualifies(
    rule: &Rule,
    query: &HashMap<String, String>,
    payload: Option<&Value>,
    headers: Option<&HashMap<String, String>>,
) -> bool {
    if let Some(params) = &rule.query_params {
        let all = params.iter().all(|(key, matcher)| {
            query
                .get(key)
                .is_some_and(|actual| value_matches_str(matcher, actual))
        });
        if !all {
            return false;
        }
    }

    if let Some(fields) = &rule.payload {
        let Some(payload) = payload else { return false };
        let all = fields.iter().all(|(path, matcher)| {
            field_path::lookup(payload, path)
                .is_some_and(|actual| value_matches(matcher, actual))
        });
        if !all {
            return false;
        }
    }

    if let Some(required) = &rule.required_headers {
        let all = required.iter().all(|(name, matcher)| {
            lookup_header(headers, name).is_some_and(|actual| value_matches_str(matcher, actual))
        });
        if !all {
            return false;
        }
    }

    true
}

// Header names are matched case-insensitively, as HTTP intends.
fn lookup_header<'a>(headers: Option<&'a HashMap<String, String>>, name: &str) -> Option<&'a str> {
    headers?
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}
