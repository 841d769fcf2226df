//! Candidate reference matches and their tolerant parsing.
//!
//! Upstream tooling writes `predicted_candidates` in whatever shape it had at
//! hand: a JSON array, a JSON-encoded string, or the `repr()` of a Python
//! list of dicts. [`parse_candidates`] accepts all of them and falls back to
//! an empty list instead of failing.

pub mod lenient;
pub mod literal;

use serde_json::{Map, Value};
use tracing::debug;

/// Title shown when a candidate record carries none.
pub const MISSING_TITLE: &str = "N/A";

/// A predicted reference match for a query.
#[derive(Debug, Clone, PartialEq)]
pub enum Candidate {
    /// A bare title string.
    TitleOnly(String),
    /// A record with an optional confidence score and reasoning.
    Detailed {
        title: String,
        /// Raw confidence value; see [`crate::confidence::format_confidence`].
        confidence: Option<Value>,
        reasoning: Option<String>,
    },
}

impl Candidate {
    /// Build a candidate from one list element.
    ///
    /// Strings become [`Candidate::TitleOnly`], objects become
    /// [`Candidate::Detailed`]. Numbers and booleans are kept as titles;
    /// `null` and nested arrays are dropped.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(title) => Some(Candidate::TitleOnly(title.clone())),
            Value::Number(n) => Some(Candidate::TitleOnly(n.to_string())),
            Value::Bool(b) => Some(Candidate::TitleOnly(b.to_string())),
            Value::Object(record) => Some(Candidate::from_record(record)),
            Value::Null | Value::Array(_) => None,
        }
    }

    fn from_record(record: &Map<String, Value>) -> Self {
        let title = record
            .get("reference")
            .and_then(|reference| reference.get("title"))
            .and_then(display_text)
            .or_else(|| record.get("title").and_then(display_text))
            .unwrap_or_else(|| MISSING_TITLE.to_string());

        let confidence = ["confidence", "score"]
            .iter()
            .filter_map(|key| record.get(*key))
            .find(|v| !v.is_null())
            .cloned();

        let reasoning = record
            .get("reasoning")
            .and_then(Value::as_str)
            .filter(|r| !r.is_empty())
            .map(String::from);

        Candidate::Detailed {
            title,
            confidence,
            reasoning,
        }
    }

    /// The resolved title.
    pub fn title(&self) -> &str {
        match self {
            Candidate::TitleOnly(title) | Candidate::Detailed { title, .. } => title,
        }
    }

    /// The raw confidence value, if any.
    pub fn confidence(&self) -> Option<&Value> {
        match self {
            Candidate::TitleOnly(_) => None,
            Candidate::Detailed { confidence, .. } => confidence.as_ref(),
        }
    }

    /// The reasoning text, if any.
    pub fn reasoning(&self) -> Option<&str> {
        match self {
            Candidate::TitleOnly(_) => None,
            Candidate::Detailed { reasoning, .. } => reasoning.as_deref(),
        }
    }
}

/// Non-empty strings and numbers count as a title.
fn display_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Resolve a raw `predicted_candidates` value into candidates.
///
/// Arrays are converted element by element, strings are parsed with
/// [`parse_candidates_str`], and anything else yields an empty list.
pub fn parse_candidates(raw: &Value) -> Vec<Candidate> {
    match raw {
        Value::Array(items) => convert_items(items),
        Value::String(s) => parse_candidates_str(s),
        Value::Null => Vec::new(),
        other => {
            debug!(kind = value_kind(other), "Ignoring non-list candidate value");
            Vec::new()
        }
    }
}

/// Parse a candidate list from text, never failing.
///
/// Tried in order: strict JSON, JSON after rewriting Python-style literals,
/// then the literal parser (only for input passing its character allow-list).
/// If none yields a list, the result is empty.
pub fn parse_candidates_str(raw: &str) -> Vec<Candidate> {
    match parse_list_text(raw) {
        Some(items) => convert_items(&items),
        None => Vec::new(),
    }
}

fn parse_list_text(raw: &str) -> Option<Vec<Value>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(items) = serde_json::from_str(trimmed).ok().and_then(into_items) {
        return Some(items);
    }
    debug!("Candidate text is not strict JSON, trying lenient rewrite");

    let rewritten = lenient::rewrite(trimmed);
    if let Some(items) = serde_json::from_str(&rewritten).ok().and_then(into_items) {
        return Some(items);
    }
    debug!("Lenient rewrite failed, trying literal parser");

    if !literal::is_literal_safe(trimmed) {
        debug!("Candidate text rejected by literal allow-list");
        return None;
    }

    let items = literal::parse_literal(trimmed).and_then(into_items);
    if items.is_none() {
        debug!(len = trimmed.len(), "Unparseable candidate text, using empty list");
    }
    items
}

/// Accept an array as a list, or an object as a single-element list.
fn into_items(value: Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(_) => Some(vec![value]),
        _ => None,
    }
}

fn convert_items(items: &[Value]) -> Vec<Candidate> {
    items.iter().filter_map(Candidate::from_value).collect()
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
