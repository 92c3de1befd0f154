//! Operator spacing for `calc()`, `clamp()`, `min()` and `max()` values.
//!
//! Bracket values cannot contain spaces, so `_` stands in for one. Both entry
//! points are idempotent.

use regex::Regex;
use std::sync::LazyLock;

static MATH_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^A-Za-z0-9])(calc|clamp|min|max)\(").expect("hard-coded pattern compiles")
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("hard-coded pattern compiles"));

/// Normalize a value that *starts with* a math function call.
///
/// ```
/// use valcss::math::normalize_calc_expression;
/// assert_eq!(normalize_calc_expression("calc(100%-50px+20px)"), "calc(100% - 50px + 20px)");
/// assert_eq!(normalize_calc_expression("10px"), "10px");
/// ```
pub fn normalize_calc_expression(value: &str) -> String {
    match find_call(value, 0) {
        Some((0, open_end)) => {
            let (call, consumed) = normalize_call(value, 0, open_end);
            format!("{}{}", call, &value[consumed..])
        }
        _ => value.to_string(),
    }
}

/// Normalize every math function call found anywhere in the value.
pub fn normalize_css_math(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut cursor = 0;

    while let Some((start, open_end)) = find_call(value, cursor) {
        out.push_str(&value[cursor..start]);
        let (call, consumed) = normalize_call(value, start, open_end);
        out.push_str(&call);
        cursor = consumed;
    }

    out.push_str(&value[cursor..]);
    out
}

/// Start of the next function name at or after `from`, and the offset just past its `(`.
fn find_call(value: &str, from: usize) -> Option<(usize, usize)> {
    let caps = MATH_CALL.captures_at(value, from)?;
    let name = caps.get(1)?;
    let whole = caps.get(0)?;
    Some((name.start(), whole.end()))
}

/// Normalize the call spanning from `start` (its name) through its closing parenthesis.
///
/// Returns the rewritten call and the byte offset just past it. Unbalanced
/// input is returned untouched.
fn normalize_call(value: &str, start: usize, open_end: usize) -> (String, usize) {
    let Some(close) = matching_paren(value, open_end) else {
        return (value[start..].to_string(), value.len());
    };

    let name = &value[start..open_end];
    let inner = space_operators(&value[open_end..close]);
    (format!("{}{})", name, inner), close + 1)
}

/// Byte offset of the `)` balancing the `(` that ends just before `from`.
fn matching_paren(value: &str, from: usize) -> Option<usize> {
    let mut depth = 1usize;
    for (offset, ch) in value[from..].char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(from + offset);
                }
            }
            _ => {}
        }
    }
    None
}

fn space_operators(expr: &str) -> String {
    let mut spaced = String::with_capacity(expr.len() * 2);
    for ch in expr.chars() {
        match ch {
            '_' => spaced.push(' '),
            '+' | '-' | '*' | '/' => {
                spaced.push(' ');
                spaced.push(ch);
                spaced.push(' ');
            }
            _ => spaced.push(ch),
        }
    }
    WHITESPACE.replace_all(&spaced, " ").trim().to_string()
}
