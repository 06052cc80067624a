//! Behavioral tests for the rule store and matching engine.

use decoy_core::{Rule, RuleStore};
use serde_json::json;
use std::collections::HashMap;

fn rule(value: serde_json::Value) -> Rule {
    serde_json::from_value(value).unwrap()
}

fn headers(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn empty_store_matches_nothing() {
    let store = RuleStore::new();
    assert!(store.match_request("/match/me", None, None).is_none());
}

#[test]
fn get_all_reflects_adds_and_flush() {
    let store = RuleStore::new();
    assert_eq!(store.get_all().len(), 0, "should start empty");

    store.add(rule(json!({})));
    store.add(rule(json!({})));
    assert_eq!(store.get_all().len(), 2);

    store.flush();
    assert_eq!(store.get_all().len(), 0);
}

#[test]
fn matches_the_expected_route() {
    let store = RuleStore::new();
    let wanted = rule(json!({
        "route": "/foo/bar",
        "responseCode": 200,
        "responseBody": "foo"
    }));

    store.add(rule(json!({
        "route": "/i/don/t/want/this",
        "responseCode": 403,
        "responseBody": "xxx"
    })));
    store.add(wanted.clone());

    let winner = store.match_request("/foo/bar", None, None).unwrap();
    assert_eq!(winner, wanted);
}

#[test]
fn routes_match_as_regex_patterns() {
    let store = RuleStore::new();
    let wanted = rule(json!({
        "route": "/foo.*",
        "responseCode": 200,
        "responseBody": "foo"
    }));
    store.add(wanted.clone());
    store.add(rule(json!({ "route": "/i/don/t/want/this", "responseCode": 403 })));

    let winner = store.match_request("/foo/bar", None, None).unwrap();
    assert_eq!(winner, wanted);
}

#[test]
fn at_overrides_the_default_rule_on_the_nth_call() {
    let store = RuleStore::new();
    store.add(rule(json!({ "route": "/i/don/t/want/this", "responseCode": 403 })));
    store.add(rule(json!({ "route": "/match/me", "responseCode": 200, "responseBody": "weba" })));
    store.add(rule(json!({
        "route": "/match/me",
        "responseCode": 204,
        "responseBody": "it worked",
        "at": 2
    })));

    let codes: Vec<_> = (0..3)
        .map(|_| {
            store
                .match_request("/match/me", None, None)
                .unwrap()
                .response_code
        })
        .collect();
    assert_eq!(codes, vec![Some(200), Some(204), Some(200)]);
}

#[test]
fn payload_constraint_disqualifies_without_payload() {
    let store = RuleStore::new();
    store.add(rule(json!({
        "route": "/match/me",
        "payload": { "id": 1 },
        "responseCode": 200
    })));

    // Route matches, but the declared payload field cannot resolve.
    assert!(store.match_request("/match/me", None, None).is_none());
}

#[test]
fn payload_decides_between_rules_sharing_a_route() {
    let store = RuleStore::new();
    store.add(rule(json!({
        "route": "/match/me",
        "payload": { "id": 1 },
        "responseCode": 200,
        "responseBody": "weba"
    })));
    store.add(rule(json!({
        "route": "/match/me",
        "payload": { "id": 2 },
        "responseCode": 403,
        "responseBody": "buuu"
    })));

    let winner = store
        .match_request("/match/me", Some(&json!({ "id": 1 })), None)
        .unwrap();
    assert_eq!(winner.response_body, Some(json!("weba")));
    assert_eq!(winner.response_code, Some(200));
}

#[test]
fn payload_fields_support_nested_paths() {
    let store = RuleStore::new();
    store.add(rule(json!({
        "route": "/match/me",
        "payload": { "outer[0].inner": 1 },
        "responseCode": 200,
        "responseBody": "weba"
    })));
    store.add(rule(json!({
        "route": "/match/me",
        "payload": { "id": 2 },
        "responseCode": 403
    })));

    let winner = store
        .match_request("/match/me", Some(&json!({ "outer": [{ "inner": 1 }] })), None)
        .unwrap();
    assert_eq!(winner.response_code, Some(200));
}

#[test]
fn bracketed_query_keys_are_flat_not_paths() {
    let store = RuleStore::new();
    store.add(rule(json!({
        "route": "/match/me",
        "queryParams": { "outer[0].inner": 1 },
        "responseCode": 200
    })));

    let winner = store
        .match_request("/match/me?outer[0].inner=1", None, None)
        .unwrap();
    assert_eq!(winner.response_code, Some(200));

    assert!(store.match_request("/match/me?param=1", None, None).is_none());
}

#[test]
fn payload_matchers_accept_explicit_regexes() {
    let store = RuleStore::new();
    store.add(rule(json!({
        "route": "/match/me",
        "payload": { "id": "[\\d+]" },
        "responseCode": 200,
        "responseBody": "Regex success"
    })));

    let winner = store
        .match_request("/match/me", Some(&json!({ "id": 9273892 })), None)
        .unwrap();
    assert_eq!(winner.response_code, Some(200));

    store.add(rule(json!({
        "route": "/match/me",
        "payload": { "a": "[\\d+]", "b": "^(foo|bar|baz)$" },
        "responseCode": 200,
        "responseBody": "Regex success"
    })));

    let winner = store
        .match_request("/match/me", Some(&json!({ "a": 2, "b": "baz" })), None)
        .unwrap();
    assert_eq!(winner.response_body, Some(json!("Regex success")));

    // "bazz" is outside the anchored alternation.
    assert!(store
        .match_request("/match/me", Some(&json!({ "a": 2, "foo": "bazz" })), None)
        .is_none());
}

#[test]
fn query_params_match_literals_and_spaces() {
    let store = RuleStore::new();
    store.add(rule(json!({
        "route": "/match/me",
        "queryParams": { "a": 1, "b": 2 },
        "responseCode": 200,
        "responseBody": "Query param success"
    })));

    let winner = store.match_request("/match/me?a=1&b=2", None, None).unwrap();
    assert_eq!(winner.response_code, Some(200));

    // Query order never matters.
    let winner = store.match_request("/match/me?b=2&a=1", None, None).unwrap();
    assert_eq!(winner.response_code, Some(200));

    store.add(rule(json!({
        "route": "/match/me",
        "queryParams": { "name": "Fabio Hirata" },
        "responseCode": 200,
        "responseBody": "Space success"
    })));

    let winner = store
        .match_request("/match/me?name=Fabio Hirata", None, None)
        .unwrap();
    assert_eq!(winner.response_body, Some(json!("Space success")));

    // ...and form-encoded with +
    let winner = store
        .match_request("/match/me?name=Fabio+Hirata", None, None)
        .unwrap();
    assert_eq!(winner.response_body, Some(json!("Space success")));
}

#[test]
fn query_params_accept_explicit_regexes() {
    let store = RuleStore::new();
    store.add(rule(json!({
        "route": "/match/me",
        "queryParams": { "a": "[0-9]" },
        "responseCode": 200,
        "responseBody": "Regex success"
    })));

    for query in ["a=0", "a=9", "a=1234567890"] {
        let winner = store
            .match_request(&format!("/match/me?{query}"), None, None)
            .unwrap();
        assert_eq!(winner.response_code, Some(200));
    }

    store.add(rule(json!({
        "route": "/match/me",
        "queryParams": { "b": "[0-9]", "c": "[\\d+]", "d": 1, "e": "^(foo|bar)$" },
        "responseCode": 200,
        "responseBody": "Regex success"
    })));

    let winner = store
        .match_request("/match/me?e=bar&b=12345&c=6789&d=1", None, None)
        .unwrap();
    assert_eq!(winner.response_code, Some(200));
}

#[test]
fn specificity_breaks_ties_not_add_order() {
    let more_specific = json!({
        "route": "/match/me",
        "queryParams": { "a": "[0-9]+" },
        "payload": { "b": "^[a-z]+$" },
        "responseCode": 200
    });
    let less_specific = json!({
        "route": "/match/me",
        "queryParams": { "a": "[0-9]+" },
        "responseCode": 400
    });

    for order in [
        [&more_specific, &less_specific],
        [&less_specific, &more_specific],
    ] {
        let store = RuleStore::new();
        for r in order {
            store.add(rule(r.clone()));
        }

        let winner = store
            .match_request("/match/me?a=1234", Some(&json!({ "b": "abcd" })), None)
            .unwrap();
        assert_eq!(winner.response_code, Some(200));

        let winner = store
            .match_request("/match/me?a=1234", Some(&json!({ "b": "abc123" })), None)
            .unwrap();
        assert_eq!(winner.response_code, Some(400));
    }
}

#[test]
fn headers_break_ties_when_primary_counts_are_equal() {
    let with_header = json!({
        "route": "/match/me",
        "at": 1,
        "queryParams": { "a": "[0-9]+" },
        "requiredHeaders": { "Cookie": "Y=[a-z]+" },
        "responseCode": 200
    });
    let without_header = json!({
        "route": "/match/me",
        "at": 1,
        "queryParams": { "a": "[0-9]+" },
        "responseCode": 400
    });

    let store = RuleStore::new();
    store.add(rule(with_header.clone()));
    store.add(rule(without_header.clone()));

    let winner = store
        .match_request(
            "/match/me?a=1234",
            None,
            Some(&headers(&[("Cookie", "Y=abcd")])),
        )
        .unwrap();
    assert_eq!(winner.response_code, Some(200));

    store.flush();
    store.add(rule(with_header));
    store.add(rule(without_header));

    // No cookie: the header-requiring rule is disqualified outright.
    let winner = store.match_request("/match/me?a=1234", None, None).unwrap();
    assert_eq!(winner.response_code, Some(400));
}

#[test]
fn full_tie_falls_back_to_first_registered() {
    let store = RuleStore::new();
    store.add(rule(json!({ "route": "/dup", "responseCode": 200 })));
    store.add(rule(json!({ "route": "/dup", "responseCode": 500 })));

    let winner = store.match_request("/dup", None, None).unwrap();
    assert_eq!(winner.response_code, Some(200));
}

#[test]
fn invalid_matcher_regex_fails_only_that_rule() {
    let store = RuleStore::new();
    store.add(rule(json!({
        "route": "/match/me",
        "queryParams": { "a": "[broken" },
        "responseCode": 500
    })));
    store.add(rule(json!({ "route": "/match/me", "responseCode": 200 })));

    let winner = store.match_request("/match/me?a=1", None, None).unwrap();
    assert_eq!(winner.response_code, Some(200));
}

#[test]
fn response_headers_pass_through_verbatim() {
    let store = RuleStore::new();
    store.add(rule(json!({
        "route": "/match/me",
        "responseCode": 200,
        "responseHeaders": { "Content-Type": "application/json" }
    })));

    let winner = store.match_request("/match/me", None, None).unwrap();
    assert_eq!(
        winner.response_headers.unwrap().get("Content-Type"),
        Some(&"application/json".to_string())
    );
}
