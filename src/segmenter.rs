//! Line Segmenter
//!
//! Splits one source line into an ordered list of code and comment pieces.
//! Block-comment state is carried from line to line by the caller: the
//! segmenter takes the state on entry and reports the state on exit.
//!
//! Comment markers inside single- or double-quoted string literals are not
//! treated as markers. Pieces are kept in source order so that joining them
//! back reproduces the line byte for byte.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Piece<'a> {
    Code(&'a str),
    Comment(&'a str),
}

/// One segmented line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRecord<'a> {
    pub raw: &'a str,
    pub pieces: Vec<Piece<'a>>,
    pub in_block_comment_before: bool,
    pub in_block_comment_after: bool,
}

impl<'a> LineRecord<'a> {
    /// Code pieces joined with a single space where a comment separated them
    pub fn code_segment(&self) -> String {
        self.pieces
            .iter()
            .filter_map(|p| match p {
                Piece::Code(code) => Some(*code),
                Piece::Comment(_) => None,
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// All comment text on the line, in order
    pub fn comment_segment(&self) -> String {
        self.pieces
            .iter()
            .filter_map(|p| match p {
                Piece::Comment(comment) => Some(*comment),
                Piece::Code(_) => None,
            })
            .collect()
    }

    /// Map a byte offset in `code_segment()` to a byte offset in `raw`.
    ///
    /// Pieces tile the raw line in order, so each code piece's raw start is
    /// the total length of the pieces before it. Offsets that fall on a
    /// joining space have no raw position.
    pub fn raw_offset(&self, code_offset: usize) -> Option<usize> {
        let mut raw_pos = 0;
        let mut seg_pos = 0;
        let mut seen_code = false;

        for piece in &self.pieces {
            match piece {
                Piece::Code(code) => {
                    if seen_code {
                        seg_pos += 1;
                    }
                    seen_code = true;
                    if (seg_pos..seg_pos + code.len()).contains(&code_offset) {
                        return Some(raw_pos + code_offset - seg_pos);
                    }
                    seg_pos += code.len();
                    raw_pos += code.len();
                }
                Piece::Comment(comment) => raw_pos += comment.len(),
            }
        }
        None
    }

    pub fn has_code(&self) -> bool {
        self.pieces
            .iter()
            .any(|p| matches!(p, Piece::Code(code) if !code.trim().is_empty()))
    }
}

/// Split `line` into code and comment pieces.
pub fn split_line(line: &str, in_block_comment: bool) -> LineRecord<'_> {
    let bytes = line.as_bytes();
    let len = bytes.len();
    let mut pieces = Vec::new();
    let mut in_comment = in_block_comment;
    let mut start = 0;
    let mut i = 0;

    while i < len {
        if in_comment {
            match line[i..].find("*/") {
                Some(rel) => {
                    let end = i + rel + 2;
                    pieces.push(Piece::Comment(&line[start..end]));
                    start = end;
                    i = end;
                    in_comment = false;
                }
                None => {
                    pieces.push(Piece::Comment(&line[start..]));
                    start = len;
                    break;
                }
            }
            continue;
        }

        match bytes[i] {
            b'"' | b'\'' => {
                i = crate::helpers::string_literal_end(line, i).unwrap_or(i + 1);
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                if i > start {
                    pieces.push(Piece::Code(&line[start..i]));
                }
                pieces.push(Piece::Comment(&line[i..]));
                start = len;
                break;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                if i > start {
                    pieces.push(Piece::Code(&line[start..i]));
                }
                start = i;
                i += 2;
                in_comment = true;
            }
            _ => i += 1,
        }
    }

    if start < len {
        if in_comment {
            pieces.push(Piece::Comment(&line[start..]));
        } else {
            pieces.push(Piece::Code(&line[start..]));
        }
    }

    LineRecord {
        raw: line,
        pieces,
        in_block_comment_before: in_block_comment,
        in_block_comment_after: in_comment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejoin(record: &LineRecord<'_>) -> String {
        record
            .pieces
            .iter()
            .map(|p| match p {
                Piece::Code(s) | Piece::Comment(s) => *s,
            })
            .collect()
    }

    #[test]
    fn test_plain_code() {
        let rec = split_line("free x = 1;", false);
        assert_eq!(rec.pieces, vec![Piece::Code("free x = 1;")]);
        assert!(!rec.in_block_comment_after);
    }

    #[test]
    fn test_line_comment() {
        let rec = split_line("free value = 42; // lock is here", false);
        assert_eq!(rec.code_segment(), "free value = 42; ");
        assert_eq!(rec.comment_segment(), "// lock is here");
    }

    #[test]
    fn test_inline_block_comment_keeps_order() {
        let line = "a /* fun */ b // c";
        let rec = split_line(line, false);
        assert_eq!(
            rec.pieces,
            vec![
                Piece::Code("a "),
                Piece::Comment("/* fun */"),
                Piece::Code(" b "),
                Piece::Comment("// c"),
            ]
        );
        assert_eq!(rejoin(&rec), line);
        assert!(!rec.in_block_comment_after);
    }

    #[test]
    fn test_block_comment_opens() {
        let rec = split_line("lock x = 1; /* start", false);
        assert_eq!(rec.code_segment(), "lock x = 1; ");
        assert_eq!(rec.comment_segment(), "/* start");
        assert!(rec.in_block_comment_after);
    }

    #[test]
    fn test_inside_block_comment_without_close() {
        let rec = split_line("  - fun", true);
        assert_eq!(rec.pieces, vec![Piece::Comment("  - fun")]);
        assert!(!rec.has_code());
        assert!(rec.in_block_comment_after);
    }

    #[test]
    fn test_block_comment_closes() {
        let rec = split_line("  end */ free y = 2;", true);
        assert_eq!(rec.pieces, vec![Piece::Comment("  end */"), Piece::Code(" free y = 2;")]);
        assert!(!rec.in_block_comment_after);
    }

    #[test]
    fn test_earliest_marker_wins() {
        let rec = split_line("x // a /* b", false);
        assert_eq!(rec.comment_segment(), "// a /* b");
        assert!(!rec.in_block_comment_after);

        let rec = split_line("x /* a // b", false);
        assert_eq!(rec.comment_segment(), "/* a // b");
        assert!(rec.in_block_comment_after);
    }

    #[test]
    fn test_markers_inside_strings_ignored() {
        let rec = split_line(r#"pls fetch("https://api.example.com");"#, false);
        assert_eq!(rec.comment_segment(), "");
        assert!(rec.has_code());

        let rec = split_line(r#"lock s = '/* not a comment */'; // real"#, false);
        assert_eq!(rec.comment_segment(), "// real");
    }

    #[test]
    fn test_unterminated_quote_is_code() {
        let rec = split_line("it's // fun", false);
        assert_eq!(rec.code_segment(), "it's ");
        assert_eq!(rec.comment_segment(), "// fun");
    }

    #[test]
    fn test_raw_offset_skips_comments() {
        let line = "free a = 1; /* fun */ lock fun = 2;";
        let rec = split_line(line, false);
        let code = rec.code_segment();
        let pos = code.rfind("fun").unwrap();
        assert_eq!(rec.raw_offset(pos), Some(27));
        assert_eq!(rec.raw_offset(0), Some(0));
        assert_eq!(rec.raw_offset(code.len()), None);

        let rec = split_line("  end */ yay 1;", true);
        assert_eq!(rec.raw_offset(1), Some(9));
    }

    #[test]
    fn test_close_marker_needs_distinct_star() {
        let rec = split_line("/*/ still comment", false);
        assert!(rec.in_block_comment_after);
        assert_eq!(rec.comment_segment(), "/*/ still comment");
    }
}
