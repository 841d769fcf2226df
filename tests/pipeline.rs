//! End-to-end tests: load a dataset, resolve a selection, navigate and render.

use artifact_viewer::dataset::convert::convert_csv_file;
use artifact_viewer::render::{render_document, render_page};
use artifact_viewer::{Dataset, MathBackend, Selection, ViewerConfig};
use pretty_assertions::assert_eq;

const DATASET: &str = r#"[
    {
        "arxiv_id": "2401.00001",
        "arxiv_title": "Sharp <Bounds>",
        "artifacts": [
            {
                "artifact_id": "thm:main",
                "artifact_text": "\\begin{theorem}For all $n$, \\begin{align*}f(n) &< g(n)\\label{eq:fg}\\end{align*} holds~\\cite{knuth}.\\end{theorem}",
                "queries": [
                    {
                        "category": "direct",
                        "query": "Is $f<g$ everywhere?",
                        "predicted_candidates": "[{'reference': {'title': 'Growth of $f$'}, 'score': 0.5, 'reasoning': None}, {'title': '', 'confidence': 3}]"
                    },
                    {
                        "category": "paraphrase",
                        "query": "Compare \\(f\\) and \\(g\\).",
                        "predicted_candidates": [{"title": "Orders", "confidence": "0.125"}]
                    }
                ]
            },
            {
                "artifact_id": "lem:aux",
                "artifact_text": "Auxiliary \\begin{enumerate}[(i)]\\item first\\item second\\end{enumerate}",
                "queries": []
            }
        ]
    },
    {
        "id": "2402.00002",
        "title": "Unterminated",
        "artifacts": [
            {"id": "1", "text": "Price is $5 and <b>bold</b>", "queries": [{"query": "q", "predicted_candidates": "not a list at all"}]}
        ]
    }
]"#;

fn fragment_config() -> ViewerConfig {
    ViewerConfig {
        standalone: false,
        ..Default::default()
    }
}

#[test]
fn loads_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.json");
    std::fs::write(&path, DATASET).unwrap();

    let dataset = Dataset::load(&path).unwrap();
    assert_eq!(dataset.len(), 2);
    assert_eq!(dataset.artifact_count(), 3);
    assert_eq!(dataset.papers()[0].title, "Sharp <Bounds>");
}

#[test]
fn renders_selected_artifact() {
    let dataset = Dataset::from_json_str(DATASET).unwrap();
    let selection =
        Selection::from_fragment(&dataset, "#paper=2401.00001&artifact=thm%3Amain", None);
    let html = render_page(&dataset, selection, &fragment_config());

    assert!(html.contains("<option value=\"2401.00001\" selected>2401.00001: Sharp &lt;Bounds&gt;</option>"));
    assert!(html.contains("Artifact 1 / 2"));
    assert!(html.contains(r"For all $n$, \[f(n) &&lt; g(n)\] holds ."));
    assert!(html.contains("Is $f&lt;g$ everywhere?"));
    assert!(html.contains("Growth of $f$"));
    assert!(html.contains("<span class=\"av-confidence\">50%</span>"));
    assert!(html.contains("<span class=\"av-candidate-title\">N/A</span> <span class=\"av-confidence\">3</span>"));
    assert!(!html.contains("av-reasoning"));
}

#[test]
fn query_selection_switches_candidates() {
    let dataset = Dataset::from_json_str(DATASET).unwrap();
    let selection = Selection::first(&dataset)
        .and_then(|s| s.with_query(&dataset, 1));
    let html = render_page(&dataset, selection, &fragment_config());

    assert!(html.contains("data-query=\"1\">"));
    assert!(html.contains("<li class=\"av-query active\" data-query=\"1\">"));
    assert!(html.contains(r"Compare \(f\) and \(g\)."));
    assert!(html.contains("Orders</span> <span class=\"av-confidence\">13%</span>"));
}

#[test]
fn navigation_walks_the_dataset() {
    let dataset = Dataset::from_json_str(DATASET).unwrap();
    let first = Selection::first(&dataset).unwrap();

    let second = first.next(&dataset).unwrap();
    assert_eq!(second.to_fragment(&dataset), "paper=2401.00001&artifact=lem%3Aaux");

    let html = render_page(&dataset, Some(second), &fragment_config());
    assert!(html.contains("Auxiliary <br>• first<br>• second"));
    assert!(html.contains("No queries"));
    assert!(html.contains("No candidates"));

    let third = second.next(&dataset).unwrap();
    assert_eq!(third.to_fragment(&dataset), "paper=2402.00002&artifact=1");
    assert_eq!(third.next(&dataset), None);
    assert_eq!(third.prev(&dataset), Some(second));
    assert_eq!(first.prev(&dataset), None);
}

#[test]
fn unterminated_math_is_escaped_text() {
    let dataset = Dataset::from_json_str(DATASET).unwrap();
    let selection = Selection::at_paper(&dataset, 1);
    let html = render_page(&dataset, selection, &fragment_config());

    assert!(html.contains("Price is $5 and &lt;b&gt;bold&lt;/b&gt;"));
    assert!(html.contains("No candidates"));
}

#[test]
fn fragment_fallbacks() {
    let dataset = Dataset::from_json_str(DATASET).unwrap();

    let sel = Selection::from_fragment(&dataset, "paper=missing&artifact=zzz", Some("2402.00002")).unwrap();
    assert_eq!(sel.to_fragment(&dataset), "paper=2402.00002&artifact=1");

    let sel = Selection::from_fragment(&dataset, "paper=missing", Some("also-missing")).unwrap();
    assert_eq!(sel.to_fragment(&dataset), "paper=2401.00001&artifact=thm%3Amain");

    let sel = Selection::from_fragment(&dataset, "paper=2401.00001&artifact=zzz", None).unwrap();
    assert_eq!(sel.artifact_index(), 0);
}

#[test]
fn configured_default_paper_and_backend() {
    let config = ViewerConfig::from_toml_str(
        "default_paper = \"2402.00002\"\nmath_backend = \"katex\"\ntitle = \"Artifacts\"",
    )
    .unwrap();
    assert_eq!(config.math_backend, MathBackend::KaTeX);

    let html = render_document(DATASET, "", &config);
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>Artifacts</title>"));
    assert!(html.contains("renderMathInElement"));
    assert!(html.contains("<option value=\"2402.00002\" selected>"));
}

#[test]
fn csv_export_renders() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("export.csv");
    let output = dir.path().join("data.json");
    std::fs::write(
        &input,
        "arxiv_id,arxiv_title,artifact_id,artifact_text,category,query,predicted_candidates\n\
         2403.1,CSV Paper,a,Let $x<1$.,direct,Why?,\"['From CSV']\"\n",
    )
    .unwrap();

    assert_eq!(convert_csv_file(&input, &output).unwrap(), 1);

    let json = std::fs::read_to_string(&output).unwrap();
    let html = render_document(&json, "#paper=2403.1", &fragment_config());
    assert!(html.contains("Let $x&lt;1$."));
    assert!(html.contains("From CSV"));
}
