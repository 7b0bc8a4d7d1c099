//! Whole-program compiler for PoiBoi, a small statically-untyped,
//! string-only toy language.
//!
//! The pipeline is strictly forward, leaves-first: source text is
//! [`lexer::lex`]ed into a token stream, [`parser::parse_module`] expands
//! the grammar in [`cst`] into a concrete syntax tree per source file,
//! [`functions::extract_functions`] flattens every file's tree into one
//! name-to-function table, and [`codegen::generate_program`] walks each
//! function's body emitting a single self-contained target-language
//! program with the `PBString` runtime (`runtime_c/`) stitched in
//! verbatim. See `SPEC_FULL.md` for the full design.

pub mod codegen;
pub mod config;
pub mod cst;
pub mod error;
pub mod functions;
pub mod lexer;
pub mod parser;
pub mod token;

use std::fs;
use std::path::Path;
use std::rc::Rc;

pub use config::{CompilerConfig, OutputTarget};
pub use error::CompileError;
pub use functions::{build_function_table, extract_functions, validate_main};

/// Compiles already-loaded sources (`(file_name, text)` pairs, in the
/// order they should appear in the function table) into the emitted
/// target-language program text.
///
/// All input files form one program (spec §1 Non-goals: no separate
/// compilation units), so every `Module` contributes to a single
/// function table before code generation begins.
pub fn compile_sources(sources: &[(Rc<str>, String)]) -> Result<String, CompileError> {
    let mut modules = Vec::with_capacity(sources.len());
    for (file, text) in sources {
        let tokens = lexer::lex(text, file)?;
        modules.push(parser::parse_module(&tokens)?);
    }

    let functions = extract_functions(&modules);
    let table = build_function_table(functions.clone())?;
    let fallback_file = sources
        .first()
        .map(|(f, _)| f.clone())
        .unwrap_or_else(|| Rc::from("<no input>"));
    validate_main(&table, &fallback_file)?;

    let program = codegen::generate_program(&functions, &table)?;
    Ok(program)
}

/// Reads each path as a PoiBoi source file and compiles them together as
/// one program. Exit code 1 (spec §6) is signalled by
/// [`CompileError::Io`] when a file can't be opened.
pub fn compile_paths(paths: &[impl AsRef<Path>]) -> Result<String, CompileError> {
    let mut sources = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        let file: Rc<str> = Rc::from(path.to_string_lossy().as_ref());
        let text = fs::read_to_string(path).map_err(|e| CompileError::Io {
            file: file.clone(),
            message: e.to_string(),
        })?;
        sources.push((file, text));
    }
    compile_sources(&sources)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile_one(source: &str) -> Result<String, CompileError> {
        compile_sources(&[(Rc::from("t.pb"), source.to_string())])
    }

    #[test]
    fn hello_world_end_to_end() {
        let out = compile_one(r#"Main() { PRINT("Hello World!"); }"#).unwrap();
        assert!(out.contains("Builtin_Print(\"Hello World!\")"));
        assert!(out.contains("int main(int, char**)"));
    }

    #[test]
    fn multi_file_program_shares_one_function_table() {
        let main_src = r#"Main() { GLOBAL g = "x"; Helper(); PRINT(g); }"#.to_string();
        let helper_src = r#"Helper() { GLOBAL g = "y"; }"#.to_string();
        let out = compile_sources(&[
            (Rc::from("main.pb"), main_src),
            (Rc::from("helper.pb"), helper_src),
        ])
        .unwrap();
        assert!(out.contains("Helper_poiboi_fn"));
        assert_eq!(out.matches("PBString GLOBAL_VAR_g;").count(), 1);
    }

    #[test]
    fn missing_main_is_a_semantic_error_with_exit_code_four() {
        let err = compile_one(r#"Helper() { RETURN "x"; }"#).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn unterminated_comment_is_a_lex_error_with_exit_code_two() {
        let err = compile_one("Main() { } # oops").unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn stray_brace_is_a_parse_error_with_exit_code_three() {
        let err = compile_one("Main() }").unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn unopenable_file_is_an_io_error_with_exit_code_one() {
        let err = compile_paths(&["/does/not/exist.pb"]).unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }
}
