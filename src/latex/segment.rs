//! Split normalized text into math and plain spans and render them safely.

use super::LINE_BREAK_MARKER;
use crate::escape::escape_html;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_until},
    combinator::recognize,
    sequence::tuple,
    IResult,
};

/// Private-use character the sentinel is built from.
pub(crate) const LINE_BREAK_SENTINEL_CHAR: char = '\u{E001}';

/// Stand-in for [`LINE_BREAK_MARKER`] while spans are escaped.
pub const LINE_BREAK_SENTINEL: &str = "\u{E001}br\u{E001}";

/// A classified substring of normalized text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Span<'a> {
    /// Delimited TeX math, delimiters included.
    Math(&'a str),
    /// Anything outside a math span.
    Plain(&'a str),
}

impl<'a> Span<'a> {
    /// The source text of this span.
    pub fn as_str(&self) -> &'a str {
        match self {
            Span::Math(s) | Span::Plain(s) => s,
        }
    }

    /// Append the HTML for this span to `out`.
    pub fn render_into(&self, out: &mut String) {
        match self {
            Span::Plain(text) => out.push_str(&escape_html(text)),
            Span::Math(math) => out.push_str(&repair_math(math)),
        }
    }
}

/// Render normalized text to HTML that is safe to insert into the page.
///
/// Plain spans are fully escaped. Math spans keep their TeX source so the
/// typesetter can pick them up; only `<`/`>` are escaped and broken
/// `\hspace` commands are replaced by a thin space. Line-break markers become
/// `<br>`.
pub fn render_math_aware(normalized: &str) -> String {
    let text = normalized.replace(LINE_BREAK_MARKER, LINE_BREAK_SENTINEL);
    let mut out = String::with_capacity(text.len() + text.len() / 8);

    for span in segments(&text) {
        span.render_into(&mut out);
    }

    out.replace(LINE_BREAK_SENTINEL, "<br>")
}

/// Split `input` into alternating plain and math spans.
///
/// Scanning is leftmost-first. At each position the delimiters are tried in
/// the order `\(...\)`, `\[...\]`, `$$...$$`, `$...$`, each closing at the
/// nearest closer. An opener without a closer is plain text.
pub fn segments(input: &str) -> Vec<Span<'_>> {
    let mut spans = Vec::new();
    let mut plain_start = 0;
    let mut pos = 0;

    while pos < input.len() {
        let rest = &input[pos..];

        if rest.starts_with('\\') || rest.starts_with('$') {
            if let Ok((after, math)) = math_span(rest) {
                if plain_start < pos {
                    spans.push(Span::Plain(&input[plain_start..pos]));
                }
                spans.push(Span::Math(math));
                pos = input.len() - after.len();
                plain_start = pos;
                continue;
            }
        }

        pos += rest.chars().next().map_or(1, char::len_utf8);
    }

    if plain_start < input.len() {
        spans.push(Span::Plain(&input[plain_start..]));
    }

    spans
}

/// Match one math span at the start of `input`, delimiters included.
pub fn math_span(input: &str) -> IResult<&str, &str> {
    alt((
        delimited_math("\\(", "\\)"),
        delimited_math("\\[", "\\]"),
        delimited_math("$$", "$$"),
        delimited_math("$", "$"),
    ))(input)
}

fn delimited_math<'a>(
    open: &'static str,
    close: &'static str,
) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    recognize(tuple((tag(open), take_until(close), tag(close))))
}

/// Apply the in-math repairs: broken `\hspace` and bare angle brackets.
fn repair_math(math: &str) -> String {
    repair_hspace(math).replace('<', "&lt;").replace('>', "&gt;")
}

/// Replace `\hspace{}` and an argument-less `\hspace` with `\,`.
fn repair_hspace(math: &str) -> String {
    const COMMAND: &str = "\\hspace";

    let mut out = String::with_capacity(math.len());
    let mut remaining = math;

    while let Some(pos) = remaining.find(COMMAND) {
        out.push_str(&remaining[..pos]);
        let after_name = &remaining[pos + COMMAND.len()..];
        let after_star = after_name.strip_prefix('*').unwrap_or(after_name);
        let argument = after_star.trim_start();

        if let Some(inner) = argument.strip_prefix('{') {
            match inner.find('}') {
                Some(close) if inner[..close].trim().is_empty() => {
                    out.push_str("\\,");
                    remaining = &inner[close + 1..];
                }
                _ => {
                    out.push_str(COMMAND);
                    remaining = after_name;
                }
            }
        } else {
            out.push_str("\\,");
            remaining = after_star;
        }
    }

    out.push_str(remaining);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_math_span_priority() {
        assert_eq!(math_span("\\(x\\) y"), Ok((" y", "\\(x\\)")));
        assert_eq!(math_span("\\[x\\]"), Ok(("", "\\[x\\]")));
        assert_eq!(math_span("$$x$$ y"), Ok((" y", "$$x$$")));
        assert_eq!(math_span("$x$ y"), Ok((" y", "$x$")));
        assert!(math_span("\\alpha").is_err());
        assert!(math_span("$x").is_err());
    }

    #[test]
    fn test_double_dollar_without_closer_is_empty_inline() {
        assert_eq!(math_span("$$x$"), Ok(("x$", "$$")));
    }

    #[test]
    fn test_segments_mixed() {
        assert_eq!(
            segments("Let $x$ be \\(y\\) in \\[z\\]."),
            vec![
                Span::Plain("Let "),
                Span::Math("$x$"),
                Span::Plain(" be "),
                Span::Math("\\(y\\)"),
                Span::Plain(" in "),
                Span::Math("\\[z\\]"),
                Span::Plain("."),
            ]
        );
    }

    #[test]
    fn test_leftmost_match_wins() {
        // The `$` inside the display block does not start inline math.
        assert_eq!(
            segments("\\[a $ b\\] $c$"),
            vec![Span::Math("\\[a $ b\\]"), Span::Plain(" "), Span::Math("$c$")]
        );
        // An unclosed `\(` before a `$` pair leaves the `$` pair as math.
        assert_eq!(
            segments("\\( $c$"),
            vec![Span::Plain("\\( "), Span::Math("$c$")]
        );
    }

    #[test]
    fn test_segments_reconstruct_input() {
        let input = "a $b$ \\(c $$d$$ e $ f";
        let joined: String = segments(input).iter().map(Span::as_str).collect();
        assert_eq!(joined, input);
    }

    #[test]
    fn test_unterminated_delimiters_are_escaped() {
        assert_eq!(render_math_aware("cost $5 <b>"), "cost $5 &lt;b&gt;");
        assert_eq!(render_math_aware("\\(a<b"), "\\(a&lt;b");
    }

    #[test]
    fn test_math_keeps_ampersand_and_quotes() {
        assert_eq!(
            render_math_aware("\\[a & b \\text{\"q\"}\\]"),
            "\\[a & b \\text{\"q\"}\\]"
        );
    }

    #[test]
    fn test_math_angle_brackets_escaped() {
        assert_eq!(render_math_aware("$0<x>1$"), "$0&lt;x&gt;1$");
    }

    #[test]
    fn test_plain_markup_escaped() {
        assert_eq!(
            render_math_aware("<b>evil</b>"),
            "&lt;b&gt;evil&lt;/b&gt;"
        );
    }

    #[test]
    fn test_hspace_repairs() {
        assert_eq!(repair_hspace("a\\hspace{}b"), "a\\,b");
        assert_eq!(repair_hspace("a\\hspace{ }b"), "a\\,b");
        assert_eq!(repair_hspace("a\\hspace b"), "a\\, b");
        assert_eq!(repair_hspace("a\\hspace"), "a\\,");
        assert_eq!(repair_hspace("a\\hspace{1em}b"), "a\\hspace{1em}b");
        assert_eq!(repair_hspace("a\\hspace*{2pt}b"), "a\\hspace*{2pt}b");
        assert_eq!(repair_hspace("a\\hspace*{}b"), "a\\,b");
    }

    #[test]
    fn test_hspace_only_repaired_inside_math() {
        assert_eq!(
            render_math_aware("\\hspace{} $a\\hspace{}b$"),
            "\\hspace{} $a\\,b$"
        );
    }

    #[test]
    fn test_line_break_marker() {
        let input = format!("Cases:{m}• $x<0${m}• done", m = LINE_BREAK_MARKER);
        assert_eq!(
            render_math_aware(&input),
            "Cases:<br>• $x&lt;0$<br>• done"
        );
    }

    #[test]
    fn test_multiline_math() {
        assert_eq!(render_math_aware("$$a\nb$$"), "$$a\nb$$");
    }

    #[test]
    fn test_non_ascii_text() {
        assert_eq!(render_math_aware("Poincaré's $\\pi$"), "Poincaré&apos;s $\\pi$");
    }
}
