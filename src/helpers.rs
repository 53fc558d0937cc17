//! Helper utility functions for the Jolly transpiler
//!
//! Small scanning primitives shared by the segmenter, the string shield and
//! the diagnostic formatter:
//! - Identifier validation
//! - String literal boundary detection
//! - Whole-word search with JavaScript identifier boundaries

/// Check if a string is a plain ASCII identifier (`[A-Za-z_][A-Za-z0-9_]*`)
pub fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(is_word_char)
}

/// Characters allowed in a dialect keyword
pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Characters that continue a JavaScript identifier. `$fun` and `free$` are
/// single identifiers, so `$` counts here even though keywords never use it.
pub fn is_identifier_char(c: char) -> bool {
    is_word_char(c) || c == '$'
}

/// True when `haystack[start..end]` is not glued to identifier characters
/// on either side
pub fn stands_alone(haystack: &str, start: usize, end: usize) -> bool {
    let before_ok = haystack[..start].chars().next_back().map_or(true, |c| !is_identifier_char(c));
    let after_ok = haystack[end..].chars().next().map_or(true, |c| !is_identifier_char(c));
    before_ok && after_ok
}

/// Given a quote at `start`, return the byte index just past its closing quote.
///
/// Backslash escapes the next character. Returns `None` when the literal is
/// not closed on this line, in which case the quote is ordinary code.
pub fn string_literal_end(line: &str, start: usize) -> Option<usize> {
    let bytes = line.as_bytes();
    let quote = *bytes.get(start)?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }

    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return Some(i + 1),
            _ => i += 1,
        }
    }
    None
}

/// Byte offset of the first whole-word occurrence of `word` in `haystack`
pub fn find_word(haystack: &str, word: &str) -> Option<usize> {
    if word.is_empty() {
        return None;
    }

    let mut from = 0;
    while let Some(rel) = haystack[from..].find(word) {
        let pos = from + rel;
        if stands_alone(haystack, pos, pos + word.len()) {
            return Some(pos);
        }
        from = pos + haystack[pos..].chars().next().map_or(1, char::len_utf8);
    }
    None
}
