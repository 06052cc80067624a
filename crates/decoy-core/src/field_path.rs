//! Dot/bracket field-path traversal over JSON payloads.
//!
//! Payload constraints address nested members with paths like
//! `outer[0].inner`: dots separate object members, brackets hold numeric
//! array indices. Missing intermediate nodes mean "not found", never an
//! error, so a rule declaring a path the request payload lacks is simply
//! disqualified for that request.

use serde_json::Value;

/// One accessor step of a parsed field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Object-member access (`.inner`).
    Key(String),
    /// Array-index access (`[0]`).
    Index(usize),
}

/// Parse a field path into its accessor sequence.
///
/// Bracket groups holding something other than an unsigned integer are kept
/// as key segments, so odd-but-flat keys still address object members.
pub fn parse(path: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars().peekable();

    let flush = |current: &mut String, segments: &mut Vec<Segment>| {
        if !current.is_empty() {
            segments.push(Segment::Key(std::mem::take(current)));
        }
    };

    while let Some(c) = chars.next() {
        match c {
            '.' => flush(&mut current, &mut segments),
            '[' => {
                let mut inner = String::new();
                let mut closed = false;
                for b in chars.by_ref() {
                    if b == ']' {
                        closed = true;
                        break;
                    }
                    inner.push(b);
                }
                if closed {
                    flush(&mut current, &mut segments);
                    match inner.parse::<usize>() {
                        Ok(idx) => segments.push(Segment::Index(idx)),
                        Err(_) => segments.push(Segment::Key(inner)),
                    }
                } else {
                    // Unterminated bracket: keep the raw text as part of the key.
                    current.push('[');
                    current.push_str(&inner);
                }
            }
            _ => current.push(c),
        }
    }
    flush(&mut current, &mut segments);
    segments
}

/// Resolve a field path against a JSON tree.
///
/// Returns `None` when any segment is absent or of the wrong shape (index
/// into a non-array, key into a non-object).
pub fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut node = root;
    for segment in parse(path) {
        node = match segment {
            Segment::Key(key) => node.as_object()?.get(&key)?,
            Segment::Index(idx) => node.as_array()?.get(idx)?,
        };
    }
    Some(node)
}
