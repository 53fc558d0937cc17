//! Placement Validator
//!
//! Decides, per line, whether the dialect keywords on it are used in a legal
//! position. Rules run in a fixed order and the first one that applies wins:
//!
//! 1. Lines without code are skipped.
//! 2. Context patterns, in table order. An opener match makes the line valid
//!    and reports the label to push. A dependent match is valid only while
//!    its parent is the innermost open block.
//! 3. Reserved-identifier misuse: a keyword followed by `=`, `(` or `:`.
//!
//! Rule 2 must run before rule 3 because openers and dependents are
//! legitimately followed by `(`, `{` or `:`.
//!
//! Matching runs on the shielded code segment. Diagnostics point back into
//! the raw line through the shield and segment offset maps.

use tracing::debug;

use crate::block_context::BlockContextStack;
use crate::error_msg::CompileError;
use crate::helpers::{find_word, stands_alone};
use crate::keywords::{KeywordKind, KeywordTable};
use crate::segmenter::LineRecord;
use crate::string_shield::Shielded;

/// Outcome of validating one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineVerdict<'t> {
    /// Nothing to check
    Skipped,
    /// Valid; does not open a block
    Valid,
    /// Valid block opener with this label
    OpensBlock(&'t str),
}

pub struct PlacementValidator<'t> {
    table: &'t KeywordTable,
}

impl<'t> PlacementValidator<'t> {
    pub fn new(table: &'t KeywordTable) -> Self {
        PlacementValidator { table }
    }

    /// Validate one line. `shielded` must be the shielded `code_segment()`
    /// of `record`.
    pub fn validate(
        &self,
        record: &LineRecord<'_>,
        shielded: &Shielded,
        file: &str,
        line_number: usize,
        blocks: &BlockContextStack,
    ) -> Result<LineVerdict<'t>, CompileError> {
        let code = shielded.text();
        if code.trim().is_empty() {
            return Ok(LineVerdict::Skipped);
        }

        let source_line = record.raw;
        let locate = |pos: usize| record.raw_offset(shielded.original_offset(pos));

        let table = self.table;
        for (keyword, spec) in table.iter() {
            if !spec.matches_context(code) {
                continue;
            }

            return match spec.kind() {
                KeywordKind::Opener => Ok(LineVerdict::OpensBlock(keyword)),
                KeywordKind::Dependent { parent } => {
                    if blocks.top() == Some(parent.as_str()) {
                        Ok(LineVerdict::Valid)
                    } else {
                        debug!(file, line = line_number, keyword, parent = parent.as_str(), "placement violation");
                        let offset = find_word(code, keyword).and_then(locate);
                        Err(CompileError::placement(keyword, parent, file, line_number, source_line, offset))
                    }
                }
                KeywordKind::Plain => Ok(LineVerdict::Valid),
            };
        }

        for (kind, pattern) in table.misuse_patterns() {
            let hit = pattern
                .captures_iter(code)
                .filter_map(|caps| caps.get(1))
                .find(|m| stands_alone(code, m.start(), m.end()));

            if let Some(m) = hit {
                let keyword = m.as_str();
                debug!(file, line = line_number, keyword, %kind, "reserved keyword misuse");
                return Err(CompileError::misuse(
                    keyword,
                    *kind,
                    file,
                    line_number,
                    source_line,
                    locate(m.start()),
                ));
            }
        }

        Ok(LineVerdict::Valid)
    }
}
