//! LaTeX normalization and math-aware HTML escaping.
//!
//! Raw artifact and query text goes through two stages:
//!
//! 1. [`normalize`] rewrites display environments into `\[...\]`, drops
//!    cross-reference commands and list scaffolding, and collapses whitespace.
//! 2. [`render_math_aware`] splits the normalized text into math and plain
//!    spans, escapes the plain spans and hands math spans through for the
//!    client-side typesetter.
//!
//! [`render_text`] runs both stages.
//!
//! ```rust
//! use artifact_viewer::latex::render_text;
//!
//! let html = render_text(Some("If $a<b$ then <b>x</b>"));
//! assert_eq!(html, "If $a&lt;b$ then &lt;b&gt;x&lt;/b&gt;");
//! ```

pub mod normalize;
pub mod segment;

pub use normalize::{normalize, normalize_opt};
pub use segment::{render_math_aware, segments, Span};

/// Marker left by [`normalize`] where a list item starts a new line.
///
/// A private-use code point: it is stripped from raw input before
/// normalization, so only the normalizer can produce it.
pub const LINE_BREAK_MARKER: char = '\u{E000}';

/// Normalize and render raw LaTeX/plain text to safe HTML.
///
/// `None` renders as the empty string.
pub fn render_text(input: Option<&str>) -> String {
    render_math_aware(&normalize_opt(input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_none() {
        assert_eq!(render_text(None), "");
        assert_eq!(render_text(Some("")), "");
    }

    #[test]
    fn test_render_equation_environment() {
        let html = render_text(Some(
            "\\begin{equation}E=mc^2\\label{eq:1}\\end{equation}",
        ));
        assert_eq!(html, "\\[E=mc^2\\]");
    }

    #[test]
    fn test_render_itemize() {
        let html = render_text(Some(
            "Either \\begin{itemize} \\item $x<0$, or \\item $x>1$. \\end{itemize}",
        ));
        assert_eq!(html, "Either <br>• $x&lt;0$, or <br>• $x&gt;1$.");
    }

    #[test]
    fn test_render_escapes_markup_outside_math() {
        let html = render_text(Some("<script>alert('x')</script> and $a & b$"));
        assert_eq!(
            html,
            "&lt;script&gt;alert(&apos;x&apos;)&lt;/script&gt; and $a & b$"
        );
    }

    #[test]
    fn test_reserved_characters_in_input_are_dropped() {
        let html = render_text(Some("a\u{E000}b\u{E001}br\u{E001}c"));
        assert_eq!(html, "abbrc");
    }
}
