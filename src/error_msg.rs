//! Jolly Error Message System
//!
//! Compile failures are structured values first and text second. A
//! `CompileError` carries a `Diagnostic` (file, 1-based line, offending line,
//! keyword and where it sits) that callers can inspect; `CompileError::render` turns it into a
//! rustc-style report for humans.
//!
//! ## Error Code Format
//!
//! - `JLY001`: placement error, a dependent keyword outside its parent block
//! - `JLY002`: reserved keyword used as an identifier

use std::fmt;

use thiserror::Error;

pub mod ansi {
    pub const RED: &str = "\x1b[31m";
    pub const BOLD_RED: &str = "\x1b[1;31m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const BOLD: &str = "\x1b[1m";
    pub const RESET: &str = "\x1b[0m";
}

//=============================================================================
// MISUSE KINDS
//=============================================================================

/// How a reserved keyword was misused as an identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MisuseKind {
    /// `<kw> = ...`
    VariableName,
    /// `<kw>(...)`
    FunctionName,
    /// `{ <kw>: ... }`
    PropertyKey,
}

impl fmt::Display for MisuseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MisuseKind::VariableName => write!(f, "variable name"),
            MisuseKind::FunctionName => write!(f, "function name"),
            MisuseKind::PropertyKey => write!(f, "object literal key"),
        }
    }
}

//=============================================================================
// DIAGNOSTIC
//=============================================================================

/// Where and why a compile call failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub file: String,
    /// 1-indexed
    pub line: usize,
    pub source_line: String,
    pub keyword: String,
    /// Byte offset of the offending keyword in `source_line`
    pub offset: Option<usize>,
}

impl Diagnostic {
    pub fn new(
        message: impl Into<String>,
        file: &str,
        line: usize,
        source_line: &str,
        keyword: &str,
        offset: Option<usize>,
    ) -> Self {
        let source_line = source_line.trim_end();
        // An offset that does not point at the keyword is dropped
        let offset = offset.filter(|&pos| {
            source_line.get(pos..pos + keyword.len()) == Some(keyword)
        });

        Diagnostic {
            message: message.into(),
            file: file.to_string(),
            line,
            source_line: source_line.to_string(),
            keyword: keyword.to_string(),
            offset,
        }
    }

    /// 1-indexed character column of the keyword in the offending line
    pub fn column(&self) -> Option<usize> {
        self.offset.map(|pos| self.source_line[..pos].chars().count() + 1)
    }

    fn render_with_code(&self, code: &str, color: bool) -> String {
        let paint = |style: &str, text: &str| {
            if color {
                format!("{}{}{}", style, text, ansi::RESET)
            } else {
                text.to_string()
            }
        };

        let mut output = String::new();

        output.push_str(&format!(
            "{}: {}\n",
            paint(ansi::BOLD_RED, &format!("error[{}]", code)),
            paint(ansi::BOLD, &self.message)
        ));

        let column = self.column().unwrap_or(1);
        output.push_str(&format!(
            "  --> {}:{}:{}\n",
            paint(ansi::CYAN, &self.file),
            paint(ansi::YELLOW, &self.line.to_string()),
            column
        ));

        let line_label = self.line.to_string();
        let gutter = " ".repeat(line_label.len());
        output.push_str(&format!("{} |\n", gutter));

        match self.offset {
            Some(pos) => {
                let end = pos + self.keyword.len();
                output.push_str(&format!(
                    "{} | {}{}{}\n",
                    line_label,
                    &self.source_line[..pos],
                    paint(ansi::BOLD_RED, &self.keyword),
                    &self.source_line[end..]
                ));

                // Tabs are mirrored so the carets stay under the keyword
                let padding: String = self.source_line[..pos]
                    .chars()
                    .map(|c| if c == '\t' { '\t' } else { ' ' })
                    .collect();
                let carets = "^".repeat(self.keyword.chars().count());
                output.push_str(&format!("{} | {}{}\n", gutter, padding, paint(ansi::RED, &carets)));
            }
            None => {
                output.push_str(&format!("{} | {}\n", line_label, self.source_line));
            }
        }

        output.push_str(&format!("{} |\n", gutter));
        output.push_str(&format!(
            "{} = help: ensure the keyword \"{}\" is used in the correct context\n",
            gutter,
            paint(ansi::BLUE, &self.keyword)
        ));

        output
    }
}

//=============================================================================
// COMPILE ERROR
//=============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// A dependent keyword outside the block it belongs to
    #[error("{}", .diagnostic.message)]
    Placement {
        required_parent: String,
        diagnostic: Diagnostic,
    },

    /// A reserved keyword used as a variable, function, or property name
    #[error("{}", .diagnostic.message)]
    ReservedKeywordMisuse {
        kind: MisuseKind,
        diagnostic: Diagnostic,
    },
}

impl CompileError {
    pub fn placement(
        keyword: &str,
        parent: &str,
        file: &str,
        line: usize,
        source_line: &str,
        offset: Option<usize>,
    ) -> Self {
        let message = format!(
            "The keyword \"{}\" cannot be used outside a {} block.",
            keyword, parent
        );
        CompileError::Placement {
            required_parent: parent.to_string(),
            diagnostic: Diagnostic::new(message, file, line, source_line, keyword, offset),
        }
    }

    pub fn misuse(
        keyword: &str,
        kind: MisuseKind,
        file: &str,
        line: usize,
        source_line: &str,
        offset: Option<usize>,
    ) -> Self {
        let message = format!("The keyword \"{}\" cannot be used as a {}.", keyword, kind);
        CompileError::ReservedKeywordMisuse {
            kind,
            diagnostic: Diagnostic::new(message, file, line, source_line, keyword, offset),
        }
    }

    pub fn diagnostic(&self) -> &Diagnostic {
        match self {
            CompileError::Placement { diagnostic, .. } => diagnostic,
            CompileError::ReservedKeywordMisuse { diagnostic, .. } => diagnostic,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            CompileError::Placement { .. } => "JLY001",
            CompileError::ReservedKeywordMisuse { .. } => "JLY002",
        }
    }

    /// Human-readable report; `color` adds ANSI styling
    pub fn render(&self, color: bool) -> String {
        self.diagnostic().render_with_code(self.code(), color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_message() {
        let err = CompileError::placement("maybe", "when", "a.jolly", 2, "maybe (x > 0) {", Some(0));
        assert_eq!(err.to_string(), "The keyword \"maybe\" cannot be used outside a when block.");
        assert_eq!(err.code(), "JLY001");
        assert!(matches!(&err, CompileError::Placement { required_parent, .. } if required_parent == "when"));
    }

    #[test]
    fn test_misuse_message() {
        let err = CompileError::misuse("fam", MisuseKind::PropertyKey, "a.jolly", 1, "free o = { fam: 1 };", Some(11));
        assert_eq!(err.to_string(), "The keyword \"fam\" cannot be used as a object literal key.");
        assert_eq!(err.code(), "JLY002");
        assert_eq!(err.diagnostic().keyword, "fam");
    }

    #[test]
    fn test_column_from_offset() {
        let diag = Diagnostic::new("m", "f", 1, "lock s = \"fun\"; lock fun = 1;", "fun", Some(21));
        assert_eq!(diag.column(), Some(22));

        let diag = Diagnostic::new("m", "f", 1, "é fun", "fun", Some(3));
        assert_eq!(diag.column(), Some(3));
    }

    #[test]
    fn test_offset_must_point_at_keyword() {
        let diag = Diagnostic::new("m", "f", 1, "lock funny = 1;", "fun", Some(0));
        assert_eq!(diag.offset, None);
        assert_eq!(diag.column(), None);

        let text = CompileError::misuse("fun", MisuseKind::VariableName, "f", 1, "x", None).render(false);
        assert!(text.contains("--> f:1:1"));
        assert!(!text.contains('^'));
    }

    #[test]
    fn test_render_plain() {
        let err = CompileError::misuse("fun", MisuseKind::VariableName, "test.jolly", 3, "    lock fun = 42;   ", Some(9));
        let text = err.render(false);
        let expected = "\
error[JLY002]: The keyword \"fun\" cannot be used as a variable name.
  --> test.jolly:3:10
  |
3 |     lock fun = 42;
  |          ^^^
  |
  = help: ensure the keyword \"fun\" is used in the correct context
";
        assert_eq!(text, expected);
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn test_render_color_highlights_keyword() {
        let err = CompileError::placement("meh", "when", "x.jolly", 12, "meh {", Some(0));
        let text = err.render(true);
        assert!(text.contains(&format!("{}meh{}", ansi::BOLD_RED, ansi::RESET)));
        assert!(text.contains("12 | "));
    }
}
