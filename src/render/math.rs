//! Client-side typesetter integration.
//!
//! Math is never rendered here: spans are emitted as TeX with their
//! delimiters and the page loads MathJax or KaTeX to typeset them. This
//! module provides the `<head>` markup that configures the chosen engine for
//! the four delimiter pairs recognized by [`crate::latex::segments`].

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Typesetting engine loaded by the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MathBackend {
    /// MathJax 3 with `$`, `$$`, `\(` and `\[` delimiters.
    #[default]
    MathJax,
    /// KaTeX auto-render with the same delimiters.
    KaTeX,
}

impl MathBackend {
    /// Scripts and styles for the document head.
    ///
    /// Typesetting failures are caught and reported with `console.error`; the
    /// inserted HTML stays as is.
    pub fn head_content(&self) -> &'static str {
        match self {
            MathBackend::MathJax => MATHJAX_HEAD,
            MathBackend::KaTeX => KATEX_HEAD,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MathBackend::MathJax => "mathjax",
            MathBackend::KaTeX => "katex",
        }
    }
}

impl FromStr for MathBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mathjax" => Ok(MathBackend::MathJax),
            "katex" => Ok(MathBackend::KaTeX),
            other => Err(ConfigError::UnknownMathBackend(other.to_string())),
        }
    }
}

impl fmt::Display for MathBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const MATHJAX_HEAD: &str = r#"<script>
window.MathJax = {
    tex: {
        inlineMath: [['\\(', '\\)'], ['$', '$']],
        displayMath: [['\\[', '\\]'], ['$$', '$$']]
    },
    startup: {
        pageReady: function () {
            return MathJax.startup.defaultPageReady().catch(function (err) {
                console.error('MathJax typeset failed:', err);
            });
        }
    }
};
function typesetMath(root) {
    if (!window.MathJax || !MathJax.typesetPromise) return;
    MathJax.typesetPromise(root ? [root] : undefined).catch(function (err) {
        console.error('MathJax typeset failed:', err);
    });
}
</script>
<script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>"#;

const KATEX_HEAD: &str = r#"<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/katex@0.16.9/dist/katex.min.css" crossorigin="anonymous">
<script defer src="https://cdn.jsdelivr.net/npm/katex@0.16.9/dist/katex.min.js" crossorigin="anonymous"></script>
<script>
function typesetMath(root) {
    if (!window.renderMathInElement) return;
    try {
        renderMathInElement(root || document.body, {
            delimiters: [
                {left: '$$', right: '$$', display: true},
                {left: '\\[', right: '\\]', display: true},
                {left: '\\(', right: '\\)', display: false},
                {left: '$', right: '$', display: false}
            ],
            throwOnError: false
        });
    } catch (err) {
        console.error('KaTeX typeset failed:', err);
    }
}
</script>
<script defer src="https://cdn.jsdelivr.net/npm/katex@0.16.9/dist/contrib/auto-render.min.js" crossorigin="anonymous"
    onload="typesetMath();"></script>"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("MathJax".parse::<MathBackend>().unwrap(), MathBackend::MathJax);
        assert_eq!(" katex ".parse::<MathBackend>().unwrap(), MathBackend::KaTeX);
        assert!(matches!(
            "mathml".parse::<MathBackend>(),
            Err(ConfigError::UnknownMathBackend(name)) if name == "mathml"
        ));
    }

    #[test]
    fn test_head_content_catches_failures() {
        for backend in [MathBackend::MathJax, MathBackend::KaTeX] {
            let head = backend.head_content();
            assert!(head.contains("console.error"));
            assert!(head.contains("function typesetMath"));
        }
    }

    #[test]
    fn test_mathjax_delimiters() {
        let head = MathBackend::MathJax.head_content();
        assert!(head.contains(r"['\\(', '\\)']"));
        assert!(head.contains("['$$', '$$']"));
    }
}
