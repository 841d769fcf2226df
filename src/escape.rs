//! HTML entity escaping.

/// Escape the five HTML-sensitive characters.
///
/// `&`, `<`, `>`, `"` and `'` become `&amp;`, `&lt;`, `&gt;`, `&quot;` and
/// `&apos;`. Everything else is copied through.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Inverse of [`escape_html`] for exactly the five entities it produces.
///
/// Any other `&...;` sequence is left alone.
pub fn unescape_html(s: &str) -> String {
    const ENTITIES: [(&str, char); 5] = [
        ("&amp;", '&'),
        ("&lt;", '<'),
        ("&gt;", '>'),
        ("&quot;", '"'),
        ("&apos;", '\''),
    ];

    let mut out = String::with_capacity(s.len());
    let mut remaining = s;

    while let Some(pos) = remaining.find('&') {
        out.push_str(&remaining[..pos]);
        let rest = &remaining[pos..];
        match ENTITIES.iter().find(|(entity, _)| rest.starts_with(entity)) {
            Some((entity, c)) => {
                out.push(*c);
                remaining = &rest[entity.len()..];
            }
            None => {
                out.push('&');
                remaining = &rest[1..];
            }
        }
    }

    out.push_str(remaining);
    out
}
