//! Jolly → JavaScript transpiler
//!
//! Jolly is JavaScript with renamed keywords (`free` for `let`, `when` for
//! `if`, `meh` for `else`, ...). Compilation is line oriented: each line is
//! split into code and comment pieces, its code is checked for keyword
//! placement against a stack of open blocks, and dialect keywords are
//! substituted outside string literals. The first violation aborts the
//! whole unit.
//!
//! ```
//! use jolly::JollyCompiler;
//!
//! let compiler = JollyCompiler::new();
//! let js = compiler.compile("free pi = 3.14; // fun", "demo.jolly").unwrap();
//! assert_eq!(js, "let pi = 3.14; // fun");
//! ```

// Core modules
pub mod keywords;
pub mod error_msg;
pub mod validator;
pub mod transformer;

// Line scanning
pub mod helpers;
pub mod segmenter;
pub mod string_shield;

// Per-call state
pub mod block_context;
pub mod transpiler_state;


pub use block_context::BlockContextStack;
pub use error_msg::{CompileError, Diagnostic, MisuseKind};
pub use keywords::{KeywordKind, KeywordRule, KeywordSpec, KeywordTable, TableError};
pub use segmenter::{split_line, LineRecord, Piece};
pub use string_shield::{shield, Shielded};
pub use transformer::Transformer;
pub use validator::{LineVerdict, PlacementValidator};

use tracing::debug;

use transpiler_state::TranspilerState;

//===========================================================================
// COMPILER
//===========================================================================

/// The compilation engine. Owns one immutable keyword table and nothing
/// else, so a single instance can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct JollyCompiler {
    table: KeywordTable,
}

impl JollyCompiler {
    /// Compiler with the built-in Jolly keyword table
    pub fn new() -> Self {
        Self::with_table(KeywordTable::jolly())
    }

    pub fn with_table(table: KeywordTable) -> Self {
        JollyCompiler { table }
    }

    pub fn table(&self) -> &KeywordTable {
        &self.table
    }

    /// Compile one unit of Jolly source.
    ///
    /// `file` labels diagnostics only. The output has the same number of
    /// lines as the input; on error no output is produced.
    pub fn compile(&self, source: &str, file: &str) -> Result<String, CompileError> {
        let validator = PlacementValidator::new(&self.table);
        let transformer = Transformer::new(&self.table);
        let mut state = TranspilerState::new();
        let mut compiled_lines = Vec::new();

        debug!(file, bytes = source.len(), "compiling");

        for (idx, line) in source.split('\n').enumerate() {
            let line_number = idx + 1;
            let record = split_line(line, state.in_block_comment);
            state.in_block_comment = record.in_block_comment_after;

            let code = record.code_segment();
            let shielded = shield(&code);
            let verdict = validator.validate(&record, &shielded, file, line_number, &state.blocks)?;

            let mut compiled = String::with_capacity(line.len());
            for piece in &record.pieces {
                match piece {
                    Piece::Code(text) => compiled.push_str(&transformer.transform_code(text)),
                    Piece::Comment(text) => compiled.push_str(text),
                }
            }
            compiled_lines.push(compiled);

            state.apply_line(code.trim(), verdict, line_number);
        }

        debug!(
            file,
            lines = compiled_lines.len(),
            open_blocks = state.blocks.depth(),
            "compiled"
        );

        Ok(compiled_lines.join("\n"))
    }
}
