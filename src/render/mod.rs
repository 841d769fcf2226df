//! Rendering layer: the browser page and the typesetter head content.

pub mod html;
pub mod math;

pub use html::{
    render_artifact, render_candidates, render_page, render_paper_selector, render_queries,
    render_status, render_status_page,
};
pub use math::MathBackend;

use crate::config::ViewerConfig;
use crate::dataset::Dataset;
use crate::selection::Selection;
use tracing::warn;

/// Load a dataset from JSON text and render the page for an address fragment.
///
/// A dataset that fails to load renders as a status page carrying the error.
pub fn render_document(json: &str, fragment: &str, config: &ViewerConfig) -> String {
    match Dataset::from_json_str(json) {
        Ok(dataset) => {
            let selection =
                Selection::from_fragment(&dataset, fragment, config.default_paper.as_deref());
            render_page(&dataset, selection, config)
        }
        Err(e) => {
            warn!(error = %e, "Failed to load dataset");
            render_status_page(&format!("Failed to load data: {}", e), config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_document_reports_errors() {
        let config = ViewerConfig::default();
        let html = render_document("{\"not\": \"a list\"}", "", &config);
        assert!(html.contains("Failed to load data: Dataset error: Top-level value is not an array of papers"));

        let html = render_document("[]", "", &config);
        assert!(html.contains("No papers found in data"));
    }

    #[test]
    fn test_render_document_follows_fragment() {
        let config = ViewerConfig {
            standalone: false,
            ..Default::default()
        };
        let json = r#"[{"id": "a", "artifacts": [{"id": "1", "text": "first"}]},
                       {"id": "b", "artifacts": [{"id": "1", "text": "second"}]}]"#;
        let html = render_document(json, "#paper=b", &config);
        assert!(html.contains("<option value=\"b\" selected>"));
        assert!(html.contains("second"));
    }
}
