//! The top-level error type returned by every public entry point, with
//! the exit-code mapping the CLI uses to signal which stage failed.

use std::fmt;
use std::rc::Rc;

use crate::codegen::error::CodeGenError;

#[derive(Debug, Clone)]
pub enum CompileError {
    Io { file: Rc<str>, message: String },
    Lex { file: Rc<str>, line: usize, message: String },
    Parse { file: Rc<str>, line: usize, message: String },
    Semantic { file: Rc<str>, line: usize, message: String },
}

impl CompileError {
    /// 1 for an unopenable source file, 2 lexical, 3 grammar, 4
    /// semantic/codegen. 0 is reserved for success and never produced here.
    pub fn exit_code(&self) -> i32 {
        match self {
            CompileError::Io { .. } => 1,
            CompileError::Lex { .. } => 2,
            CompileError::Parse { .. } => 3,
            CompileError::Semantic { .. } => 4,
        }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::Io { file, message } => write!(f, "{file}: {message}"),
            CompileError::Lex { file, line, message } => {
                write!(f, "{file}:{line}: lexical error: {message}")
            }
            CompileError::Parse { file, line, message } => {
                write!(f, "{file}:{line}: parse error: {message}")
            }
            CompileError::Semantic { file, line, message } => {
                write!(f, "{file}:{line}: {message}")
            }
        }
    }
}

impl std::error::Error for CompileError {}

impl From<CodeGenError> for CompileError {
    fn from(e: CodeGenError) -> Self {
        CompileError::Semantic {
            file: e.file,
            line: e.line,
            message: e.message,
        }
    }
}
