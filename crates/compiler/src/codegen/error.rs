//! Codegen's own error type. Every emitter fails with one of these;
//! `lib.rs` converts it into a [`crate::error::CompileError::Semantic`]
//! at the pipeline boundary.

use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct CodeGenError {
    pub file: Rc<str>,
    pub line: usize,
    pub message: String,
}

impl CodeGenError {
    pub fn new(file: Rc<str>, line: usize, message: impl Into<String>) -> Self {
        CodeGenError {
            file,
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for CodeGenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.file, self.line, self.message)
    }
}

impl std::error::Error for CodeGenError {}
