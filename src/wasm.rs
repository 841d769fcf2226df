//! WebAssembly bindings for the browser page.
//!
//! The page fetches the dataset, hands it to a [`Viewer`] and re-renders on
//! every navigation event. The text transforms are exported on their own as
//! well.
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { Viewer, RenderOptions, renderText } from './artifact_viewer.js';
//!
//! await init();
//!
//! const options = new RenderOptions();
//! options.setStandalone(false);
//! options.setDefaultPaper('2401.00001');
//!
//! const root = document.getElementById('app');
//! try {
//!     const viewer = new Viewer(await (await fetch('data.json')).text(), options);
//!     const show = (query) => {
//!         root.innerHTML = viewer.render(location.hash, query);
//!         history.replaceState(null, '', '#' + viewer.fragment(location.hash));
//!         typesetMath(root);
//!     };
//!     window.addEventListener('hashchange', () => show());
//!     show();
//! } catch (err) {
//!     root.innerHTML = renderStatus(String(err), options);
//! }
//! ```

#![cfg(feature = "wasm")]

use crate::candidates::{parse_candidates, Candidate};
use crate::config::ViewerConfig;
use crate::confidence::format_confidence;
use crate::dataset::Dataset;
use crate::escape::escape_html;
use crate::latex::{normalize, render_math_aware, render_text};
use crate::render::{self, MathBackend};
use crate::selection::Selection;
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;

// Initialize panic hook for better error messages in console
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

// ============================================================================
// Text transforms
// ============================================================================

#[wasm_bindgen(js_name = escapeHtml)]
pub fn escape_html_js(input: &str) -> String {
    escape_html(input)
}

#[wasm_bindgen(js_name = normalizeLatex)]
pub fn normalize_latex(input: &str) -> String {
    normalize(input)
}

#[wasm_bindgen(js_name = renderMathAware)]
pub fn render_math_aware_js(input: &str) -> String {
    render_math_aware(input)
}

/// Normalize and render raw text; `null` and `undefined` render as `""`.
#[wasm_bindgen(js_name = renderText)]
pub fn render_text_js(input: Option<String>) -> String {
    render_text(input.as_deref())
}

/// Parse a raw candidate payload into `{title, confidence, reasoning}`
/// objects. Anything unusable yields an empty array.
#[wasm_bindgen(js_name = parseCandidates)]
pub fn parse_candidates_js(raw: JsValue) -> Result<JsValue, JsError> {
    let value = js_to_json(raw);
    let views: Vec<CandidateView<'_>> = parse_candidates(&value)
        .iter()
        .map(CandidateView::from)
        .collect();

    to_js(&views)
}

#[wasm_bindgen(js_name = formatConfidence)]
pub fn format_confidence_js(value: JsValue) -> String {
    format_confidence(&js_to_json(value))
}

// ============================================================================
// Page rendering
// ============================================================================

/// One-shot render of the page for a dataset and address fragment.
///
/// Load failures render as a status page.
#[wasm_bindgen(js_name = renderPage)]
pub fn render_page(json: &str, fragment: &str, options: Option<RenderOptions>) -> String {
    let config = options.map(|o| o.to_config()).unwrap_or_default();
    render::render_document(json, fragment, &config)
}

#[wasm_bindgen(js_name = renderStatus)]
pub fn render_status(message: &str, options: Option<RenderOptions>) -> String {
    let config = options.map(|o| o.to_config()).unwrap_or_default();
    render::render_status_page(message, &config)
}

/// A loaded dataset kept across navigation events.
#[wasm_bindgen]
pub struct Viewer {
    dataset: Dataset,
    config: ViewerConfig,
}

#[wasm_bindgen]
impl Viewer {
    /// Load the dataset. Fails on invalid JSON or when no paper is usable.
    #[wasm_bindgen(constructor)]
    pub fn new(json: &str, options: Option<RenderOptions>) -> Result<Viewer, JsError> {
        let dataset = Dataset::from_json_str(json).map_err(|e| JsError::new(&e.to_string()))?;
        let config = options.map(|o| o.to_config()).unwrap_or_default();
        Ok(Self { dataset, config })
    }

    /// Render the page for a fragment, optionally selecting a query of the
    /// current artifact.
    pub fn render(&self, fragment: &str, query: Option<usize>) -> String {
        let selection = self
            .select(fragment)
            .map(|s| query.and_then(|q| s.with_query(&self.dataset, q)).unwrap_or(s));
        render::render_page(&self.dataset, selection, &self.config)
    }

    /// The canonical fragment (without `#`) for a possibly partial one.
    pub fn fragment(&self, fragment: &str) -> String {
        self.select(fragment)
            .map(|s| s.to_fragment(&self.dataset))
            .unwrap_or_default()
    }

    #[wasm_bindgen(js_name = paperCount)]
    pub fn paper_count(&self) -> usize {
        self.dataset.len()
    }

    fn select(&self, fragment: &str) -> Option<Selection> {
        Selection::from_fragment(&self.dataset, fragment, self.config.default_paper.as_deref())
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Configuration options for rendering.
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct RenderOptions {
    math_backend: MathBackend,
    standalone: bool,
    title: Option<String>,
    custom_css: Option<String>,
    class_prefix: Option<String>,
    default_paper: Option<String>,
}

#[wasm_bindgen]
impl RenderOptions {
    /// Create a new options object with defaults.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        let defaults = ViewerConfig::default();
        Self {
            math_backend: defaults.math_backend,
            standalone: defaults.standalone,
            title: None,
            custom_css: None,
            class_prefix: None,
            default_paper: None,
        }
    }

    /// Set the typesetter: "mathjax" or "katex".
    #[wasm_bindgen(js_name = setMathBackend)]
    pub fn set_math_backend(&mut self, backend: &str) -> Result<(), JsError> {
        self.math_backend = backend
            .parse::<MathBackend>()
            .map_err(|e| JsError::new(&e.to_string()))?;
        Ok(())
    }

    #[wasm_bindgen(js_name = getMathBackend)]
    pub fn get_math_backend(&self) -> String {
        self.math_backend.to_string()
    }

    #[wasm_bindgen(js_name = setStandalone)]
    pub fn set_standalone(&mut self, standalone: bool) {
        self.standalone = standalone;
    }

    #[wasm_bindgen(js_name = setTitle)]
    pub fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    #[wasm_bindgen(js_name = setCustomCss)]
    pub fn set_custom_css(&mut self, css: &str) {
        self.custom_css = Some(css.to_string());
    }

    #[wasm_bindgen(js_name = setClassPrefix)]
    pub fn set_class_prefix(&mut self, prefix: &str) {
        self.class_prefix = Some(prefix.to_string());
    }

    /// Paper shown when the fragment names no known paper.
    #[wasm_bindgen(js_name = setDefaultPaper)]
    pub fn set_default_paper(&mut self, id: &str) {
        self.default_paper = Some(id.to_string());
    }

    fn to_config(&self) -> ViewerConfig {
        let defaults = ViewerConfig::default();
        ViewerConfig {
            default_paper: self.default_paper.clone(),
            math_backend: self.math_backend,
            standalone: self.standalone,
            title: self.title.clone().unwrap_or(defaults.title),
            custom_css: self.custom_css.clone(),
            class_prefix: self.class_prefix.clone().unwrap_or(defaults.class_prefix),
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Helpers
// ============================================================================

#[derive(Serialize)]
struct CandidateView<'a> {
    title: &'a str,
    confidence: Option<&'a Value>,
    reasoning: Option<&'a str>,
}

impl<'a> From<&'a Candidate> for CandidateView<'a> {
    fn from(candidate: &'a Candidate) -> Self {
        Self {
            title: candidate.title(),
            confidence: candidate.confidence(),
            reasoning: candidate.reasoning(),
        }
    }
}

/// `undefined` and values that do not map onto JSON become `null`.
fn js_to_json(value: JsValue) -> Value {
    if value.is_undefined() {
        return Value::Null;
    }
    serde_wasm_bindgen::from_value(value).unwrap_or(Value::Null)
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Get the library version.
#[wasm_bindgen(js_name = getVersion)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
