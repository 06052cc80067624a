//! Decoy core: a mock-response rule store and matching engine.
//!
//! Test harnesses register [`Rule`]s — a route regex plus optional
//! constraints on query parameters, request payload, and headers, mapped to
//! a canned response — and ask the [`RuleStore`] which rule best matches an
//! incoming request descriptor. Ambiguity is resolved by specificity
//! scoring, with an occurrence-based `at` override for scripting the Nth
//! response of a route.
//!
//! ```
//! use decoy_core::RuleStore;
//! use serde_json::json;
//!
//! let store = RuleStore::new();
//! store.add(serde_json::from_value(json!({
//!     "route": "/users/.*",
//!     "queryParams": { "verbose": "true" },
//!     "responseCode": 200,
//!     "responseBody": { "name": "Fabio" }
//! })).unwrap());
//!
//! let hit = store.match_request("/users/42?verbose=true", None, None);
//! assert_eq!(hit.unwrap().response_code, Some(200));
//! ```
//!
//! Rule definitions can also be preloaded from a directory of JSON files via
//! [`loader::preload`].

pub mod field_path;
pub mod loader;
pub mod matcher;
pub mod rule;
pub mod store;
pub mod value_match;

pub use loader::{preload, LoadError};
pub use rule::{MatcherMap, Rule};
pub use store::RuleStore;
