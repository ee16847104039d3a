//! Value escaping for TeamCity service messages.
//!
//! Values are embedded between single quotes, so every character that could
//! end the value, the message, or the line is prefixed with `|`.

/// Escape character of the service-message format.
pub const ESCAPE_CHAR: char = '|';

/// Escape `value` for use inside a single-quoted service-message field.
///
/// This is a single left-to-right pass: a `|` produced by one substitution is
/// never examined again, so `|'` becomes `|||'` and not `|||||'`.
#[must_use]
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + value.len() / 8);
    for c in value.chars() {
        match escape_code(c) {
            Some(code) => {
                out.push(ESCAPE_CHAR);
                out.push(code);
            }
            None => out.push(c),
        }
    }
    out
}

/// The character written after `|` for `c`, or `None` when `c` is literal.
fn escape_code(c: char) -> Option<char> {
    match c {
        '|' => Some('|'),
        '\'' => Some('\''),
        '\n' => Some('n'),
        '\r' => Some('r'),
        '\u{0086}' => Some('x'),
        '\u{2028}' => Some('l'),
        '\u{2029}' => Some('p'),
        '[' => Some('['),
        ']' => Some(']'),
        _ => None,
    }
}

/// True when `escape(value)` would differ from `value`.
#[must_use]
pub fn needs_escaping(value: &str) -> bool {
    value.chars().any(|c| escape_code(c).is_some())
}
