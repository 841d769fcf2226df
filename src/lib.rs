//! # artifact-viewer
//!
//! Safe, LaTeX-aware HTML rendering for browsing theorem-like artifacts
//! extracted from papers, together with the generated queries and predicted
//! reference candidates attached to them.
//!
//! Artifact and query text comes from an untrusted JSON dataset and mixes
//! prose, HTML-sensitive characters and TeX math. The rendering pipeline
//! escapes everything outside math, passes math through byte for byte for a
//! client-side typesetter (MathJax or KaTeX), and never fails: malformed
//! input degrades to escaped plain text.
//!
//! ## Quick Start
//!
//! ```rust
//! use artifact_viewer::{render, ViewerConfig};
//!
//! let json = r#"[{
//!     "id": "2401.00001",
//!     "title": "On Bounds",
//!     "artifacts": [{
//!         "id": "thm1",
//!         "text": "\\begin{equation}a<b\\label{eq:1}\\end{equation}",
//!         "queries": [{
//!             "category": "direct",
//!             "query": "Why is $a<b$?",
//!             "predicted_candidates": "[{'title': 'Bounds', 'confidence': 0.87}]"
//!         }]
//!     }]
//! }]"#;
//!
//! let config = ViewerConfig { standalone: false, ..Default::default() };
//! let html = render(json, "#paper=2401.00001", Some(&config));
//!
//! assert!(html.contains(r"\[a&lt;b\]"));
//! assert!(html.contains("87%"));
//! ```
//!
//! ## Pipeline
//!
//! - [`latex::normalize`] turns display environments into `\[...\]`, drops
//!   `\label`/`\ref`/`\eqref`/`\cite`, flattens `itemize`/`enumerate` lists
//!   and collapses whitespace.
//! - [`latex::render_math_aware`] splits the result into math spans
//!   (`\(...\)`, `\[...\]`, `$$...$$`, `$...$`) and plain spans, and escapes
//!   the plain ones.
//! - [`candidates::parse_candidates`] reads candidate lists that may be JSON,
//!   near-JSON with single quotes and `None`/`True`/`False`, or garbage.
//! - [`confidence::format_confidence`] shows scores in `[0, 1]` as percentages.
//!
//! ## Features
//!
//! - `wasm`: WebAssembly bindings for the browser page
//! - `cli`: the `artifact-convert` binary (CSV export to dataset JSON)

pub mod candidates;
pub mod confidence;
pub mod config;
pub mod dataset;
pub mod error;
pub mod escape;
pub mod latex;
pub mod render;
pub mod selection;

// WASM module (only with feature)
#[cfg(feature = "wasm")]
pub mod wasm;

// Convenience re-exports
pub use candidates::{parse_candidates, parse_candidates_str, Candidate};
pub use confidence::format_confidence;
pub use config::ViewerConfig;
pub use dataset::{Artifact, Dataset, Paper, Query};
pub use error::{ConfigError, ConvertError, DatasetError, Error, Result};
pub use escape::escape_html;
pub use latex::{normalize, render_math_aware, render_text};
pub use render::{render_page, MathBackend};
pub use selection::{FragmentParams, Selection};

/// Load a dataset from JSON and render the page for an address fragment in
/// one step.
///
/// Load failures render as a status page, so this never fails.
pub fn render(json: &str, fragment: &str, config: Option<&ViewerConfig>) -> String {
    match config {
        Some(config) => render::render_document(json, fragment, config),
        None => render::render_document(json, fragment, &ViewerConfig::default()),
    }
}
