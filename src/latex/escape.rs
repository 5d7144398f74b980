//! Escaping of characters LaTeX treats as markup.

/// Characters that must be preceded by a backslash in running text.
pub const SPECIAL_CHARS: [char; 7] = ['&', '%', '$', '#', '_', '{', '}'];

/// Check whether `c` needs escaping.
pub fn is_special(c: char) -> bool {
    SPECIAL_CHARS.contains(&c)
}

/// Escape LaTeX special characters by prefixing them with a backslash.
///
/// A character that already follows a backslash is left alone, so escaping
/// is idempotent: `escape_special_chars(escape_special_chars(s))` equals
/// `escape_special_chars(s)`.
pub fn escape_special_chars(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + text.len() / 8);
    let mut prev = None;
    for c in text.chars() {
        if is_special(c) && prev != Some('\\') {
            result.push('\\');
        }
        result.push(c);
        prev = Some(c);
    }
    result
}
