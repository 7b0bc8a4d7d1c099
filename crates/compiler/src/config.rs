//! Compiler configuration.
//!
//! The driver has exactly two knobs worth a builder for: where the
//! emitted program goes, and whether that destination is a file or
//! stdout. There is no file-loading path here (spec §6: no env vars,
//! no persisted state) — a `CompilerConfig` is always built directly
//! from CLI flags.

use std::path::PathBuf;

/// Where `compile_paths`'s emitted text should end up.
#[derive(Debug, Clone, Default)]
pub enum OutputTarget {
    /// Write the emitted program to standard output (the default).
    #[default]
    Stdout,
    /// Write the emitted program to the given path.
    File(PathBuf),
}

#[derive(Debug, Clone, Default)]
pub struct CompilerConfig {
    pub output: OutputTarget,
}

impl CompilerConfig {
    pub fn new() -> Self {
        CompilerConfig::default()
    }

    /// Builder: direct the emitted program to a file instead of stdout.
    pub fn with_output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = OutputTarget::File(path.into());
        self
    }
}
