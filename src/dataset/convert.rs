//! Conversion of flat CSV exports into the nested dataset JSON.
//!
//! Each CSV row is one query. Rows are grouped by `arxiv_id`, then by
//! `artifact_id`, both in order of first appearance.

use crate::error::{ConvertError, Result};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, info};

const REQUIRED_COLUMNS: [&str; 3] = ["arxiv_id", "artifact_id", "artifact_text"];

struct PaperGroup {
    id: String,
    title: String,
    artifacts: Vec<ArtifactGroup>,
    artifact_index: HashMap<String, usize>,
}

struct ArtifactGroup {
    id: String,
    text: String,
    queries: Vec<Value>,
}

/// Read CSV rows and group them into a JSON array of papers.
pub fn convert_csv<R: Read>(reader: R) -> Result<Value> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader
        .headers()
        .map_err(|e| ConvertError::Csv(e.to_string()))?
        .clone();

    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(ConvertError::MissingColumn(column.to_string()).into());
        }
    }

    let mut papers: Vec<PaperGroup> = Vec::new();
    let mut paper_index: HashMap<String, usize> = HashMap::new();

    for record in csv_reader.records() {
        let record = record.map_err(|e| ConvertError::Csv(e.to_string()))?;
        let row: Map<String, Value> = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.to_string(), Value::String(v.to_string())))
            .collect();

        let field = |name: &str| row.get(name).and_then(Value::as_str).unwrap_or_default().to_string();
        let paper_id = field("arxiv_id");
        let artifact_id = field("artifact_id");
        let title = field("arxiv_title");
        let text = field("artifact_text");

        let slot = *paper_index.entry(paper_id.clone()).or_insert_with(|| {
            papers.push(PaperGroup {
                id: paper_id.clone(),
                title: title.clone(),
                artifacts: Vec::new(),
                artifact_index: HashMap::new(),
            });
            papers.len() - 1
        });
        let paper = &mut papers[slot];

        if paper.title.trim().is_empty() && !title.trim().is_empty() {
            debug!(paper = %paper.id, "Filling empty paper title from a later row");
            paper.title = title;
        }

        let artifact_slot = *paper.artifact_index.entry(artifact_id.clone()).or_insert_with(|| {
            paper.artifacts.push(ArtifactGroup {
                id: artifact_id,
                text,
                queries: Vec::new(),
            });
            paper.artifacts.len() - 1
        });
        paper.artifacts[artifact_slot].queries.push(Value::Object(row));
    }

    Ok(Value::Array(papers.into_iter().map(paper_to_json).collect()))
}

fn paper_to_json(paper: PaperGroup) -> Value {
    let artifacts: Vec<Value> = paper
        .artifacts
        .into_iter()
        .map(|a| json!({ "id": a.id, "text": a.text, "queries": a.queries }))
        .collect();

    json!({ "id": paper.id, "title": paper.title, "artifacts": artifacts })
}

/// Convert a CSV file into a pretty-printed dataset JSON file.
///
/// Returns the number of papers written.
pub fn convert_csv_file(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<usize> {
    let input = input.as_ref();
    let output = output.as_ref();

    let data = convert_csv(File::open(input)?)?;
    let papers = data.as_array().map_or(0, Vec::len);

    let mut writer = BufWriter::new(File::create(output)?);
    serde_json::to_writer_pretty(&mut writer, &data)
        .map_err(|e| ConvertError::Json(e.to_string()))?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    info!(
        input = %input.display(),
        output = %output.display(),
        papers,
        "Converted CSV to dataset JSON"
    );
    Ok(papers)
}
