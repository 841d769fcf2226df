//! HTML renderer for the artifact browser page.

use crate::candidates::Candidate;
use crate::confidence::format_confidence;
use crate::config::ViewerConfig;
use crate::dataset::{Artifact, Dataset, Paper};
use crate::escape::escape_html;
use crate::latex::render_text;
use crate::selection::Selection;

/// Render the browser page for the current selection.
///
/// `None` means there is nothing to select, and the page shows a status
/// message instead of the browser.
pub fn render_page(dataset: &Dataset, selection: Option<Selection>, config: &ViewerConfig) -> String {
    let mut renderer = PageRenderer::new(config);
    match selection {
        Some(selection) => renderer.render_browser(dataset, selection),
        None => renderer.render_status("No papers found in data"),
    }
    renderer.finish()
}

/// Render a page holding only a status message.
pub fn render_status_page(message: &str, config: &ViewerConfig) -> String {
    let mut renderer = PageRenderer::new(config);
    renderer.render_status(message);
    renderer.finish()
}

/// The paper `<select>`, with the selected paper marked.
pub fn render_paper_selector(dataset: &Dataset, selection: Selection, config: &ViewerConfig) -> String {
    let mut renderer = PageRenderer::new(config);
    renderer.render_paper_selector(dataset, selection);
    renderer.output
}

/// Position header, prev/next links and text of the selected artifact.
pub fn render_artifact(dataset: &Dataset, selection: Selection, config: &ViewerConfig) -> String {
    let mut renderer = PageRenderer::new(config);
    renderer.render_artifact(dataset, selection);
    renderer.output
}

/// Query list of an artifact; `selected` carries the active class.
pub fn render_queries(artifact: &Artifact, selected: usize, config: &ViewerConfig) -> String {
    let mut renderer = PageRenderer::new(config);
    renderer.render_queries(artifact, selected);
    renderer.output
}

pub fn render_candidates(candidates: &[Candidate], config: &ViewerConfig) -> String {
    let mut renderer = PageRenderer::new(config);
    renderer.render_candidates(candidates);
    renderer.output
}

/// An escaped status message block, used for load failures and empty data.
pub fn render_status(message: &str, config: &ViewerConfig) -> String {
    let mut renderer = PageRenderer::new(config);
    renderer.render_status(message);
    renderer.output
}

struct PageRenderer<'a> {
    config: &'a ViewerConfig,
    output: String,
}

impl<'a> PageRenderer<'a> {
    fn new(config: &'a ViewerConfig) -> Self {
        Self {
            config,
            output: String::new(),
        }
    }

    fn prefix(&self) -> &'a str {
        &self.config.class_prefix
    }

    /// Wrap the rendered body according to the standalone setting.
    fn finish(self) -> String {
        let p = self.prefix();
        let body = format!("<main class=\"{p}viewer\">\n{}</main>\n", self.output);
        if !self.config.standalone {
            return body;
        }

        let mut page = String::with_capacity(body.len() + 4096);
        page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        page.push_str("<meta charset=\"UTF-8\">\n");
        page.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
        page.push_str(&format!("<title>{}</title>\n", escape_html(&self.config.title)));

        page.push_str(self.config.math_backend.head_content());
        page.push('\n');

        page.push_str(&default_styles(p));

        if let Some(ref css) = self.config.custom_css {
            page.push_str("<style>\n");
            page.push_str(css);
            page.push_str("\n</style>\n");
        }

        page.push_str("</head>\n<body>\n");
        page.push_str(&format!(
            "<h1 class=\"{p}title\">{}</h1>\n",
            escape_html(&self.config.title)
        ));
        page.push_str(&body);
        page.push_str("</body>\n</html>");
        page
    }

    fn render_browser(&mut self, dataset: &Dataset, selection: Selection) {
        self.render_paper_selector(dataset, selection);
        self.render_artifact(dataset, selection);

        match selection.artifact(dataset) {
            Some(artifact) => {
                self.render_queries(artifact, selection.query_index());
                let candidates = selection
                    .query(dataset)
                    .map(|q| q.candidates.as_slice())
                    .unwrap_or_default();
                self.render_candidates(candidates);
            }
            None => self.render_status("This paper has no artifacts"),
        }
    }

    fn render_paper_selector(&mut self, dataset: &Dataset, selection: Selection) {
        let p = self.prefix();
        self.output
            .push_str(&format!("<select class=\"{p}paper-select\" id=\"{p}paper-select\">\n"));

        for (index, paper) in dataset.papers().iter().enumerate() {
            let selected = if index == selection.paper_index() {
                " selected"
            } else {
                ""
            };
            self.output.push_str(&format!(
                "<option value=\"{}\"{}>{}</option>\n",
                escape_html(&paper.id),
                selected,
                escape_html(&paper_label(paper))
            ));
        }

        self.output.push_str("</select>\n");
    }

    fn render_artifact(&mut self, dataset: &Dataset, selection: Selection) {
        let p = self.prefix();
        let Some(paper) = selection.paper(dataset) else {
            return;
        };
        let Some(artifact) = selection.artifact(dataset) else {
            return;
        };

        self.output
            .push_str(&format!("<section class=\"{p}artifact\" data-artifact=\"{}\">\n", escape_html(&artifact.id)));
        self.output.push_str(&format!("<nav class=\"{p}nav\">\n"));

        if let Some(prev) = selection.prev(dataset) {
            self.output.push_str(&format!(
                "<a class=\"{p}prev\" href=\"#{}\">&larr; Prev</a>\n",
                escape_html(&prev.to_fragment(dataset))
            ));
        }

        self.output.push_str(&format!(
            "<span class=\"{p}position\">Artifact {} / {}</span>\n",
            selection.artifact_index() + 1,
            paper.artifacts.len()
        ));

        if let Some(next) = selection.next(dataset) {
            self.output.push_str(&format!(
                "<a class=\"{p}next\" href=\"#{}\">Next &rarr;</a>\n",
                escape_html(&next.to_fragment(dataset))
            ));
        }

        self.output.push_str("</nav>\n");
        self.output.push_str(&format!(
            "<div class=\"{p}artifact-text\">{}</div>\n",
            render_text(Some(&artifact.text))
        ));
        self.output.push_str("</section>\n");
    }

    fn render_queries(&mut self, artifact: &Artifact, selected: usize) {
        let p = self.prefix();
        self.output.push_str(&format!("<section class=\"{p}queries\">\n"));

        if artifact.queries.is_empty() {
            self.output.push_str(&format!("<p class=\"{p}empty\">No queries</p>\n"));
        } else {
            self.output.push_str("<ol>\n");
            for (index, query) in artifact.queries.iter().enumerate() {
                let active = if index == selected { " active" } else { "" };
                self.output.push_str(&format!(
                    "<li class=\"{p}query{active}\" data-query=\"{index}\">\
                     <span class=\"{p}category\">{}</span> \
                     <span class=\"{p}query-text\">{}</span></li>\n",
                    escape_html(&query.category),
                    render_text(Some(&query.query))
                ));
            }
            self.output.push_str("</ol>\n");
        }

        self.output.push_str("</section>\n");
    }

    fn render_candidates(&mut self, candidates: &[Candidate]) {
        let p = self.prefix();
        self.output.push_str(&format!("<section class=\"{p}candidates\">\n"));

        if candidates.is_empty() {
            self.output.push_str(&format!("<p class=\"{p}empty\">No candidates</p>\n"));
            self.output.push_str("</section>\n");
            return;
        }

        self.output.push_str("<ol>\n");
        for candidate in candidates {
            self.output.push_str(&format!(
                "<li class=\"{p}candidate\"><span class=\"{p}candidate-title\">{}</span>",
                render_text(Some(candidate.title()))
            ));

            if let Some(confidence) = candidate.confidence() {
                self.output.push_str(&format!(
                    " <span class=\"{p}confidence\">{}</span>",
                    escape_html(&format_confidence(confidence))
                ));
            }

            if let Some(reasoning) = candidate.reasoning() {
                self.output.push_str(&format!(
                    "<div class=\"{p}reasoning\">{}</div>",
                    render_text(Some(reasoning))
                ));
            }

            self.output.push_str("</li>\n");
        }
        self.output.push_str("</ol>\n");
        self.output.push_str("</section>\n");
    }

    fn render_status(&mut self, message: &str) {
        let p = self.prefix();
        self.output.push_str(&format!(
            "<p class=\"{p}status\" role=\"status\">{}</p>\n",
            escape_html(message)
        ));
    }
}

/// `id: title`, or just the id for untitled papers.
fn paper_label(paper: &Paper) -> String {
    if paper.title.is_empty() {
        paper.id.clone()
    } else {
        format!("{}: {}", paper.id, paper.title)
    }
}

fn default_styles(p: &str) -> String {
    format!(
        r#"<style>
body {{ margin: 0; font-family: Georgia, serif; line-height: 1.6; background: #fafafa; }}
.{p}title {{ max-width: 900px; margin: 1em auto 0; padding: 0 1em; font-size: 1.5em; }}
.{p}viewer {{ max-width: 900px; margin: 0 auto; padding: 1em; }}
.{p}paper-select {{ width: 100%; padding: 0.4em; font-size: 1em; }}
.{p}artifact {{ margin: 1.5em 0; padding: 1em; background: #fff; border-left: 3px solid #333; }}
.{p}nav {{ display: flex; justify-content: space-between; align-items: center; margin-bottom: 1em; }}
.{p}position {{ color: #666; }}
.{p}prev, .{p}next {{ color: #0066cc; text-decoration: none; }}
.{p}queries ol, .{p}candidates ol {{ padding-left: 1.5em; }}
.{p}query {{ cursor: pointer; padding: 0.3em; border-radius: 4px; }}
.{p}query.active {{ background: #e8f0fe; }}
.{p}category {{ font-size: 0.8em; color: #fff; background: #555; padding: 0.1em 0.4em; border-radius: 3px; }}
.{p}candidate {{ margin: 0.5em 0; }}
.{p}confidence {{ color: #0a7d32; font-weight: bold; }}
.{p}reasoning {{ font-size: 0.9em; color: #555; }}
.{p}empty, .{p}status {{ color: #666; font-style: italic; }}
</style>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fragment_config() -> ViewerConfig {
        ViewerConfig {
            standalone: false,
            ..Default::default()
        }
    }

    fn dataset() -> Dataset {
        Dataset::from_json_str(
            r#"[
                {"id": "p1", "title": "A & B", "artifacts": [
                    {"id": "t1", "text": "Let $a<b$ and <i>x</i>.", "queries": [
                        {"category": "direct", "query": "Why $x>0$?",
                         "predicted_candidates": "[{'title': 'Ref <1>', 'confidence': 0.873, 'reasoning': 'Uses $\\\\alpha$'}, 'Bare']"},
                        {"category": "<cat>", "query": "second", "predicted_candidates": null}
                    ]},
                    {"id": "t2", "text": "two"}
                ]},
                {"id": "p2", "artifacts": [{"id": "u1", "text": "three"}]}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_paper_selector() {
        let ds = dataset();
        let sel = Selection::at_paper(&ds, 1).unwrap();
        let html = render_paper_selector(&ds, sel, &fragment_config());
        assert!(html.contains("<option value=\"p1\">p1: A &amp; B</option>"));
        assert!(html.contains("<option value=\"p2\" selected>p2</option>"));
    }

    #[test]
    fn test_artifact_header_and_links() {
        let ds = dataset();
        let sel = Selection::first(&ds).unwrap();
        let html = render_artifact(&ds, sel, &fragment_config());

        assert!(html.contains("Artifact 1 / 2"));
        assert!(!html.contains("av-prev"));
        assert!(html.contains("href=\"#paper=p1&amp;artifact=t2\""));
        assert!(html.contains("Let $a&lt;b$ and &lt;i&gt;x&lt;/i&gt;."));
    }

    #[test]
    fn test_last_artifact_has_no_next() {
        let ds = dataset();
        let sel = Selection::at_paper(&ds, 1).unwrap();
        let html = render_artifact(&ds, sel, &fragment_config());
        assert!(html.contains("Artifact 1 / 1"));
        assert!(html.contains("href=\"#paper=p1&amp;artifact=t2\""));
        assert!(!html.contains("av-next"));
    }

    #[test]
    fn test_queries_mark_active() {
        let ds = dataset();
        let artifact = &ds.papers()[0].artifacts[0];
        let html = render_queries(artifact, 1, &fragment_config());

        assert!(html.contains("<li class=\"av-query\" data-query=\"0\">"));
        assert!(html.contains("<li class=\"av-query active\" data-query=\"1\">"));
        assert!(html.contains("Why $x&gt;0$?"));
        assert!(html.contains("&lt;cat&gt;"));
    }

    #[test]
    fn test_candidates() {
        let ds = dataset();
        let candidates = &ds.papers()[0].artifacts[0].queries[0].candidates;
        let html = render_candidates(candidates, &fragment_config());

        assert!(html.contains("Ref &lt;1&gt;"));
        assert!(html.contains("<span class=\"av-confidence\">87%</span>"));
        assert!(html.contains("Uses $\\alpha$"));
        assert!(html.contains(">Bare</span></li>"));
    }

    #[test]
    fn test_no_candidates() {
        let html = render_candidates(&[], &fragment_config());
        assert!(html.contains("No candidates"));
    }

    #[test]
    fn test_status_is_escaped() {
        let html = render_status("Failed: <oops>", &fragment_config());
        assert_eq!(
            html,
            "<p class=\"av-status\" role=\"status\">Failed: &lt;oops&gt;</p>\n"
        );
    }

    #[test]
    fn test_standalone_document() {
        let ds = dataset();
        let config = ViewerConfig {
            title: "Browse <All>".to_string(),
            custom_css: Some(".x { color: red; }".to_string()),
            ..Default::default()
        };
        let html = render_page(&ds, Selection::first(&ds), &config);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Browse &lt;All&gt;</title>"));
        assert!(html.contains("MathJax"));
        assert!(html.contains(".x { color: red; }"));
        assert!(html.ends_with("</html>"));
    }

    #[test]
    fn test_fragment_mode_and_prefix() {
        let ds = dataset();
        let config = ViewerConfig {
            standalone: false,
            class_prefix: "ts-".to_string(),
            ..Default::default()
        };
        let html = render_page(&ds, Selection::first(&ds), &config);

        assert!(html.starts_with("<main class=\"ts-viewer\">"));
        assert!(!html.contains("<!DOCTYPE"));
        assert!(html.contains("ts-candidates"));
    }

    #[test]
    fn test_page_without_selection() {
        let html = render_page(&Dataset::default(), None, &fragment_config());
        assert!(html.contains("No papers found in data"));
        assert!(!html.contains("<select"));
    }
}
