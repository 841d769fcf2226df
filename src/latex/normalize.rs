//! Rewrite raw LaTeX into the canonical form the segmenter expects.

use super::segment::LINE_BREAK_SENTINEL_CHAR;
use super::LINE_BREAK_MARKER;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_until, take_while, take_while1},
    character::complete::{alpha1, char, satisfy},
    combinator::{map, not, opt, verify},
    sequence::{delimited, terminated, tuple},
    IResult,
};

/// Environments rewritten to `\[...\]`.
const DISPLAY_ENVIRONMENTS: [&str; 4] = ["equation", "equation*", "align", "align*"];

/// Commands removed together with their argument.
const REFERENCE_COMMANDS: [&str; 4] = ["label", "ref", "eqref", "cite"];

/// Environments whose begin/end tags are dropped but whose content is kept.
const LIST_ENVIRONMENTS: [&str; 2] = ["enumerate", "itemize"];

/// Normalize raw LaTeX/plain text.
///
/// The steps run in a fixed order; each is a total string transform:
///
/// 1. `\begin{equation}...\end{equation}` and `align` blocks (starred too)
///    become `\[...\]` with the inner content trimmed.
/// 2. `\label`, `\ref`, `\eqref` and `\cite` are removed with their argument.
/// 3. `enumerate`/`itemize` tags are removed, their content is kept.
/// 4. `\item` becomes a line-break marker followed by a bullet.
/// 5. `~` becomes a space.
/// 6. Whitespace runs of two or more collapse to one space; the result is
///    trimmed.
pub fn normalize(input: &str) -> String {
    let text = strip_reserved(input);
    let text = replace_matches(&text, "\\begin{", display_environment);
    let text = replace_matches(&text, "\\", reference_command);
    let text = replace_matches(&text, "\\", list_tag);
    let text = replace_matches(&text, "\\item", list_item);
    let text = text.replace('~', " ");
    collapse_whitespace(&text)
}

/// Normalize optional text; `None` is treated as the empty string.
pub fn normalize_opt(input: Option<&str>) -> String {
    normalize(input.unwrap_or_default())
}

fn strip_reserved(input: &str) -> String {
    input
        .chars()
        .filter(|&c| c != LINE_BREAK_MARKER && c != LINE_BREAK_SENTINEL_CHAR)
        .collect()
}

/// Walk `input` and offer every occurrence of `trigger` to `parser`.
///
/// On success the matched text is replaced by the parser's output; on failure
/// the trigger is copied and scanning resumes right after it.
fn replace_matches<'a, P>(input: &'a str, trigger: &str, mut parser: P) -> String
where
    P: FnMut(&'a str) -> IResult<&'a str, String>,
{
    let mut out = String::with_capacity(input.len());
    let mut remaining = input;

    while let Some(pos) = remaining.find(trigger) {
        out.push_str(&remaining[..pos]);
        let rest = &remaining[pos..];
        match parser(rest) {
            Ok((after, replacement)) if after.len() < rest.len() => {
                out.push_str(&replacement);
                remaining = after;
            }
            _ => {
                out.push_str(trigger);
                remaining = &rest[trigger.len()..];
            }
        }
    }

    out.push_str(remaining);
    out
}

/// Parse `\begin{name}` and return `name`.
fn begin_tag(input: &str) -> IResult<&str, &str> {
    delimited(tag("\\begin{"), take_while1(|c| c != '}'), char('}'))(input)
}

/// Parse `\end{name}` and return `name`.
fn end_tag(input: &str) -> IResult<&str, &str> {
    delimited(tag("\\end{"), take_while1(|c| c != '}'), char('}'))(input)
}

/// Parse a whole display block and render it as `\[inner\]`.
fn display_environment(input: &str) -> IResult<&str, String> {
    let (input, name) = verify(begin_tag, |name: &str| DISPLAY_ENVIRONMENTS.contains(&name))(input)?;
    let closing = format!("\\end{{{}}}", name);
    let (input, inner) = take_until(closing.as_str())(input)?;
    let (input, _) = tag(closing.as_str())(input)?;
    Ok((input, format!("\\[{}\\]", inner.trim())))
}

/// Parse `\label{...}` and friends; the replacement is empty.
fn reference_command(input: &str) -> IResult<&str, String> {
    let (input, _) = char('\\')(input)?;
    let (input, _) = verify(alpha1, |name: &str| REFERENCE_COMMANDS.contains(&name))(input)?;
    let (input, _) = brace_group(input)?;
    Ok((input, String::new()))
}

/// Parse a list environment tag, with an optional `[...]` modifier on begin.
fn list_tag(input: &str) -> IResult<&str, String> {
    let is_list = |name: &str| LIST_ENVIRONMENTS.contains(&name);
    alt((
        map(
            tuple((
                verify(begin_tag, is_list),
                opt(delimited(char('['), take_while(|c| c != ']' && c != '\n'), char(']'))),
            )),
            |_| String::new(),
        ),
        map(verify(end_tag, is_list), |_| String::new()),
    ))(input)
}

/// Parse `\item` plus trailing whitespace. `\itemsep` and similar are not items.
fn list_item(input: &str) -> IResult<&str, String> {
    let (input, _) = terminated(tag("\\item"), not(satisfy(|c| c.is_ascii_alphabetic())))(input)?;
    let (input, _) = take_while(char::is_whitespace)(input)?;
    Ok((input, format!("{}• ", LINE_BREAK_MARKER)))
}

/// Parse one `{...}` group with balanced nested braces and return its content.
fn brace_group(input: &str) -> IResult<&str, &str> {
    let (_, _) = char('{')(input)?;
    let mut depth = 0usize;

    for (i, c) in input.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok((&input[i + 1..], &input[1..i]));
                }
            }
            _ => {}
        }
    }

    Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::TakeUntil,
    )))
}

fn collapse_whitespace(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut run = String::new();

    for c in input.chars() {
        if c.is_whitespace() {
            run.push(c);
            continue;
        }
        flush_whitespace(&mut out, &mut run);
        out.push(c);
    }
    flush_whitespace(&mut out, &mut run);

    out.trim().to_string()
}

fn flush_whitespace(out: &mut String, run: &mut String) {
    if run.chars().nth(1).is_some() {
        out.push(' ');
    } else {
        out.push_str(run);
    }
    run.clear();
}
