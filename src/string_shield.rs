//! String Shield
//!
//! Keyword matching must never see the inside of a string literal. `shield`
//! swaps every single- or double-quoted literal of a code segment for a
//! placeholder `<marker><index><marker>`; `Shielded::restore` puts the
//! original literals back after substitution.
//!
//! The marker is a private-use character absent from the segment, so a
//! placeholder can never collide with text the author wrote.

use crate::helpers::string_literal_end;

const MARKER_RANGE: std::ops::RangeInclusive<char> = '\u{E000}'..='\u{F8FF}';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shielded {
    text: String,
    literals: Vec<String>,
    marker: char,
    /// `(end in text, end in code)` of each placeholder, in order
    ends: Vec<(usize, usize)>,
}

impl Shielded {
    /// Code with every string literal replaced by a placeholder
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn literals(&self) -> &[String] {
        &self.literals
    }

    /// Map a byte offset in `text()` back to the unshielded code.
    ///
    /// Offsets inside a placeholder map past the literal's start; keyword
    /// matches never land there.
    pub fn original_offset(&self, pos: usize) -> usize {
        match self.ends.iter().rev().find(|(text_end, _)| *text_end <= pos) {
            Some((text_end, code_end)) => pos - text_end + code_end,
            None => pos,
        }
    }

    /// Replace placeholders in `text` with the original literals.
    ///
    /// Anything that looks like a placeholder but does not name a known
    /// literal is left untouched.
    pub fn restore(&self, text: &str) -> String {
        if self.literals.is_empty() {
            return text.to_string();
        }

        let marker_len = self.marker.len_utf8();
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(pos) = rest.find(self.marker) {
            out.push_str(&rest[..pos]);
            let after = &rest[pos + marker_len..];

            let literal = after.find(self.marker).and_then(|end| {
                let idx = after[..end].parse::<usize>().ok()?;
                self.literals.get(idx).map(|lit| (end, lit))
            });

            match literal {
                Some((end, lit)) => {
                    out.push_str(lit);
                    rest = &after[end + marker_len..];
                }
                None => {
                    out.push(self.marker);
                    rest = after;
                }
            }
        }

        out.push_str(rest);
        out
    }
}

/// Shield all string literals of `code`.
pub fn shield(code: &str) -> Shielded {
    let marker = MARKER_RANGE
        .clone()
        .find(|c| !code.contains(*c))
        .unwrap_or(char::REPLACEMENT_CHARACTER);

    let bytes = code.as_bytes();
    let mut text = String::with_capacity(code.len());
    let mut literals = Vec::new();
    let mut ends = Vec::new();
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'"' || bytes[i] == b'\'' {
            if let Some(end) = string_literal_end(code, i) {
                text.push_str(&code[copied..i]);
                text.push(marker);
                text.push_str(&literals.len().to_string());
                text.push(marker);
                literals.push(code[i..end].to_string());
                ends.push((text.len(), end));
                copied = end;
                i = end;
                continue;
            }
        }
        i += 1;
    }
    text.push_str(&code[copied..]);

    Shielded { text, literals, marker, ends }
}
