//! Confidence score formatting.

use serde_json::Value;

/// Format a confidence value for display.
///
/// The value is coerced to a number the way a browser's `Number()` does.
/// Probabilities (finite values up to 1) become a rounded percentage such as
/// `87%`. Larger finite values are shown as given, and anything that is not
/// a finite number is shown as its original text.
///
/// ```rust
/// use artifact_viewer::confidence::format_confidence;
/// use serde_json::json;
///
/// assert_eq!(format_confidence(&json!(0.873)), "87%");
/// assert_eq!(format_confidence(&json!(3)), "3");
/// assert_eq!(format_confidence(&json!("abc")), "abc");
/// ```
pub fn format_confidence(value: &Value) -> String {
    let number = coerce_number(value);
    if number.is_finite() && number <= 1.0 {
        percentage(number)
    } else {
        display_value(value)
    }
}

/// Format an already numeric confidence.
pub fn format_confidence_f64(number: f64) -> String {
    if number.is_finite() && number <= 1.0 {
        percentage(number)
    } else {
        display_number(number)
    }
}

fn percentage(number: f64) -> String {
    // Half-way cases round up, as Math.round does.
    let rounded = (number * 100.0 + 0.5).floor();
    format!("{}%", rounded as i64)
}

/// Numeric coercion following `Number(value)`.
fn coerce_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => coerce_str(s),
        Value::Array(_) => coerce_str(&display_value(value)),
        Value::Object(_) => f64::NAN,
    }
}

fn coerce_str(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }

    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = s.strip_prefix(prefix) {
            return u64::from_str_radix(digits, radix)
                .map(|n| n as f64)
                .unwrap_or(f64::NAN);
        }
    }

    // Rust accepts "inf" and "nan" spellings that Number() rejects.
    if !s.chars().all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')) {
        return f64::NAN;
    }

    s.parse().unwrap_or(f64::NAN)
}

/// String conversion following `String(value)`.
fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_i64() {
            Some(i) => i.to_string(),
            None => n.as_f64().map(display_number).unwrap_or_else(|| n.to_string()),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => display_value(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn display_number(number: f64) -> String {
    if number.is_nan() {
        "NaN".to_string()
    } else if number == f64::INFINITY {
        "Infinity".to_string()
    } else if number == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        number.to_string()
    }
}
