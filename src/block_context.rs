//! Block context tracking
//!
//! A stack of open block labels. A label is pushed when a block-opener line
//! validates and popped when a line's code is exactly `}`.
//!
//! This is a line-level approximation, not a brace matcher: target-language
//! braces that open and close on other kinds of lines (object literals,
//! callbacks) can leave the stack out of step with the real nesting.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockContextStack {
    stack: Vec<String>,
}

impl BlockContextStack {
    pub fn new() -> Self {
        BlockContextStack { stack: Vec::new() }
    }

    pub fn push(&mut self, label: impl Into<String>) {
        self.stack.push(label.into());
    }

    /// Close the innermost block. Popping an empty stack is a no-op.
    pub fn pop(&mut self) -> Option<String> {
        self.stack.pop()
    }

    pub fn top(&self) -> Option<&str> {
        self.stack.last().map(String::as_str)
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}
