//! `poiboic`: the PoiBoi compiler CLI.
//!
//! Takes one or more source files, compiles them together as one
//! program (spec §1 Non-goals: no separate compilation units), and
//! writes the emitted target-language text to stdout or, with
//! `-o`/`--output`, to a file.

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser as ClapParser;
use poiboic::{CompileError, CompilerConfig, OutputTarget};

#[derive(ClapParser)]
#[command(name = "poiboic")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Whole-program compiler for the PoiBoi toy language")]
struct Cli {
    /// PoiBoi source files to compile together as one program.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Write the emitted program here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Names the pipeline stage an error occurred in, for the
/// "Compilation failed while <stage> <file>" diagnostic prefix.
fn stage_name(err: &CompileError) -> &'static str {
    match err {
        CompileError::Io { .. } => "opening",
        CompileError::Lex { .. } => "scanning",
        CompileError::Parse { .. } => "parsing",
        CompileError::Semantic { .. } => "generating code for",
    }
}

fn error_file(err: &CompileError) -> &str {
    match err {
        CompileError::Io { file, .. }
        | CompileError::Lex { file, .. }
        | CompileError::Parse { file, .. }
        | CompileError::Semantic { file, .. } => file,
    }
}

fn main() {
    let cli = Cli::parse();
    let config = match cli.output {
        Some(path) => CompilerConfig::new().with_output_file(path),
        None => CompilerConfig::new(),
    };

    let program = match poiboic::compile_paths(&cli.inputs) {
        Ok(program) => program,
        Err(err) => {
            eprintln!(
                "Compilation failed while {} {}: {err}",
                stage_name(&err),
                error_file(&err)
            );
            process::exit(err.exit_code());
        }
    };

    match config.output {
        OutputTarget::File(path) => {
            if let Err(e) = fs::write(&path, program) {
                eprintln!("error writing {}: {e}", path.display());
                process::exit(1);
            }
        }
        OutputTarget::Stdout => {
            print!("{program}");
        }
    }
}
