//! The paper/artifact/query dataset and its defensive loader.
//!
//! Records are read field by field from untyped JSON because the exports
//! disagree on key names (`id` vs `arxiv_id`, `text` vs `artifact_text`, ...).
//! Missing fields fall back to empty strings; only a file that is not a JSON
//! array, or holds no usable paper, is an error.

pub mod convert;

use crate::candidates::{parse_candidates, Candidate};
use crate::error::{DatasetError, Result};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

const PAPER_ID_KEYS: [&str; 3] = ["id", "arxiv_id", "paper_id"];
const PAPER_TITLE_KEYS: [&str; 2] = ["title", "arxiv_title"];
const ARTIFACT_ID_KEYS: [&str; 2] = ["id", "artifact_id"];
const ARTIFACT_TEXT_KEYS: [&str; 2] = ["text", "artifact_text"];

/// The whole dataset, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    papers: Vec<Paper>,
}

/// A paper and its extracted artifacts.
#[derive(Debug, Clone, PartialEq)]
pub struct Paper {
    pub id: String,
    pub title: String,
    pub artifacts: Vec<Artifact>,
}

/// A theorem-like statement extracted from a paper.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub id: String,
    /// Raw LaTeX/plain text.
    pub text: String,
    pub queries: Vec<Query>,
}

/// A generated query with its predicted reference candidates.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub category: String,
    /// Raw LaTeX/plain text.
    pub query: String,
    pub candidates: Vec<Candidate>,
}

impl Dataset {
    /// Build a dataset from already constructed papers.
    pub fn new(papers: Vec<Paper>) -> Self {
        Self { papers }
    }

    /// Parse a dataset from JSON text.
    pub fn from_json_str(input: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(input).map_err(DatasetError::Json)?;
        Self::from_value(&value)
    }

    /// Read and parse a dataset file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Build a dataset from a JSON array of paper records.
    ///
    /// Records without an id are skipped, and a repeated paper id keeps its
    /// first occurrence.
    pub fn from_value(value: &Value) -> Result<Self> {
        let records = value.as_array().ok_or(DatasetError::NotAnArray)?;

        let mut seen = HashSet::new();
        let mut papers = Vec::with_capacity(records.len());

        for (index, record) in records.iter().enumerate() {
            let Some(record) = record.as_object() else {
                warn!(index, "Skipping paper record that is not an object");
                continue;
            };
            let Some(paper) = Paper::from_record(record) else {
                warn!(index, "Skipping paper record without an id");
                continue;
            };
            if !seen.insert(paper.id.clone()) {
                warn!(id = %paper.id, "Skipping duplicate paper id");
                continue;
            }
            papers.push(paper);
        }

        if papers.is_empty() {
            return Err(DatasetError::Empty.into());
        }

        let dataset = Self { papers };
        info!(
            papers = dataset.len(),
            artifacts = dataset.artifact_count(),
            "Loaded dataset"
        );
        Ok(dataset)
    }

    pub fn papers(&self) -> &[Paper] {
        &self.papers
    }

    pub fn paper(&self, index: usize) -> Option<&Paper> {
        self.papers.get(index)
    }

    /// Index of the paper with the given id.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.papers.iter().position(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.papers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }

    /// Total number of artifacts across all papers.
    pub fn artifact_count(&self) -> usize {
        self.papers.iter().map(|p| p.artifacts.len()).sum()
    }
}

impl Paper {
    fn from_record(record: &Map<String, Value>) -> Option<Self> {
        let id = first_text(record, &PAPER_ID_KEYS)?;
        let title = first_text(record, &PAPER_TITLE_KEYS).unwrap_or_default();

        let mut seen = HashSet::new();
        let artifacts = record
            .get("artifacts")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .enumerate()
            .filter_map(|(index, value)| {
                let Some(record) = value.as_object() else {
                    warn!(paper = %id, index, "Skipping artifact record that is not an object");
                    return None;
                };
                Some(Artifact::from_record(record, index))
            })
            .filter(|artifact| {
                let fresh = seen.insert(artifact.id.clone());
                if !fresh {
                    warn!(paper = %id, artifact = %artifact.id, "Skipping duplicate artifact id");
                }
                fresh
            })
            .collect();

        Some(Self {
            id,
            title,
            artifacts,
        })
    }

    /// Index of the artifact with the given id.
    pub fn artifact_position(&self, id: &str) -> Option<usize> {
        self.artifacts.iter().position(|a| a.id == id)
    }
}

impl Artifact {
    /// An artifact without an id is named after its 1-based position.
    fn from_record(record: &Map<String, Value>, index: usize) -> Self {
        let raw_queries = record
            .get("queries")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let id = first_text(record, &ARTIFACT_ID_KEYS).unwrap_or_else(|| (index + 1).to_string());

        let text = first_text(record, &ARTIFACT_TEXT_KEYS)
            .or_else(|| {
                raw_queries
                    .first()
                    .and_then(Value::as_object)
                    .and_then(|q| first_text(q, &["artifact_text"]))
            })
            .unwrap_or_default();

        let queries = raw_queries
            .iter()
            .filter_map(Value::as_object)
            .map(Query::from_record)
            .collect();

        Self { id, text, queries }
    }
}

impl Query {
    fn from_record(record: &Map<String, Value>) -> Self {
        Self {
            category: first_text(record, &["category"]).unwrap_or_default(),
            query: first_text(record, &["query"]).unwrap_or_default(),
            candidates: record
                .get("predicted_candidates")
                .map(parse_candidates)
                .unwrap_or_default(),
        }
    }
}

/// The first key holding a non-empty string or a number, as text.
fn first_text(record: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match record.get(*key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}
