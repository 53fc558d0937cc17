//! Transpiler State Management
//!
//! Holds everything that lives for exactly one `compile` call: the block
//! context stack and the block-comment flag carried between lines. Nothing
//! in here survives the call, so one compiler can serve many threads.

use tracing::trace;

use crate::block_context::BlockContextStack;
use crate::validator::LineVerdict;

#[derive(Debug, Default)]
pub struct TranspilerState {
    pub blocks: BlockContextStack,
    pub in_block_comment: bool,
}

impl TranspilerState {
    pub fn new() -> Self {
        TranspilerState {
            blocks: BlockContextStack::new(),
            in_block_comment: false,
        }
    }

    /// Update the block stack once a line has validated.
    ///
    /// A line whose code is exactly `}` closes one block; an opener pushes
    /// its label. Anything else leaves the stack alone, including
    /// `} maybe (...) {`, which keeps the `when` block open.
    pub fn apply_line(&mut self, trimmed_code: &str, verdict: LineVerdict<'_>, line_number: usize) {
        if trimmed_code == "}" {
            let closed = self.blocks.pop();
            trace!(line = line_number, closed = ?closed, depth = self.blocks.depth(), "block closed");
        } else if let LineVerdict::OpensBlock(label) = verdict {
            self.blocks.push(label);
            trace!(line = line_number, label, depth = self.blocks.depth(), "block opened");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_line() {
        let mut state = TranspilerState::new();
        state.apply_line("when (x) {", LineVerdict::OpensBlock("when"), 1);
        assert_eq!(state.blocks.top(), Some("when"));

        state.apply_line("} maybe (y) {", LineVerdict::Valid, 2);
        assert_eq!(state.blocks.top(), Some("when"));

        state.apply_line("}", LineVerdict::Valid, 3);
        assert!(state.blocks.is_empty());

        // Unbalanced closers are tolerated
        state.apply_line("}", LineVerdict::Valid, 4);
        assert!(state.blocks.is_empty());
    }
}
