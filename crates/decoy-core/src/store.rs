//! In-memory rule store with per-route occurrence counters.

use crate::matcher;
use crate::rule::Rule;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;

/// Combined store state — rules and counters live under a single lock so a
/// match never observes a counter tick without the rule set it was computed
/// against, and a flush clears both atomically.
#[derive(Debug, Default)]
struct StoreState {
    rules: Vec<Rule>,
    route_hits: HashMap<String, u64>,
}

/// Ordered collection of registered rules plus the occurrence counter for
/// each distinct route string.
///
/// State is instance-owned: independent stores never share counters, so
/// parallel test suites can each hold their own.
#[derive(Debug, Default)]
pub struct RuleStore {
    state: Mutex<StoreState>,
}

impl RuleStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule. Insertion order is preserved and participates in the
    /// deterministic tie-break fallback. No validation happens here; absent
    /// fields mean "no constraint".
    pub fn add(&self, rule: Rule) {
        self.state.lock().rules.push(rule);
    }

    /// Clear every rule and every occurrence counter.
    pub fn flush(&self) {
        let mut state = self.state.lock();
        state.rules.clear();
        state.route_hits.clear();
    }

    /// Snapshot of the registered rules in insertion order.
    pub fn get_all(&self) -> Vec<Rule> {
        self.state.lock().rules.clone()
    }

    /// Number of registered rules.
    pub fn len(&self) -> usize {
        self.state.lock().rules.len()
    }

    /// Whether no rules are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Select the best-matching rule for a request descriptor, or `None`
    /// when nothing qualifies (a normal outcome, not an error).
    ///
    /// `path` may carry a query string; `payload` is the parsed request body
    /// for POST-style matching; `headers` are matched case-insensitively by
    /// name. Advances the occurrence counter of every distinct route group
    /// whose pattern matched the pathname.
    pub fn match_request(
        &self,
        path: &str,
        payload: Option<&Value>,
        headers: Option<&HashMap<String, String>>,
    ) -> Option<Rule> {
        let mut state = self.state.lock();
        let StoreState { rules, route_hits } = &mut *state;
        matcher::select(rules, route_hits, path, payload, headers).cloned()
    }

    /// Current occurrence count for a route group. Zero until a request's
    /// path first matches that route's pattern.
    pub fn route_hits(&self, route: &str) -> u64 {
        self.state
            .lock()
            .route_hits
            .get(route)
            .copied()
            .unwrap_or(0)
    }
}
