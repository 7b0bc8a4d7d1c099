//! Code generation: walks the parsed `Module`/function table and emits a
//! single self-contained target program, with the `PBString` runtime
//! stitched in verbatim.
//!
//! Split into focused submodules the way the evaluator's per-construct
//! emitters naturally fall out of the grammar:
//!
//! - [`state`] — the `CompilationContext` threaded through every emitter.
//! - [`rvalue`] — `RValue`/`FunctionCall` emitters (expression position,
//!   no trailing semicolon).
//! - [`statements`] — `CodeBlock`/`Statement` emitters (statement
//!   position, own trailing semicolon and newline).
//! - [`runtime`] — the embedded C-family runtime text and the builtin
//!   name/arity table.
//! - [`program`] — final assembly: preamble, runtime, declarations,
//!   globals, function bodies, entry point.
//! - [`error`] — `CodeGenError`, codegen's own fallible-stage error type.

pub mod error;
pub mod program;
pub mod runtime;
pub mod rvalue;
pub mod state;
pub mod statements;

pub use error::CodeGenError;
pub use program::generate_program;
