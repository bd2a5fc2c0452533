use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use grammar::{GrammarError, GrammarSource};
use pda::codegen::CodegenOptions;
use pda::Automaton;
use thiserror::Error;
use tracing::info;

pub use pda::codegen::Target;

pub mod report;

#[derive(Debug, Clone)]
pub struct ParseOptions {
  pub output_file_path: PathBuf,
  /// Include guard of the C++ header. Empty for none.
  pub ifdef_guard: String,
  /// C++ namespace or Rust module path. Empty for none.
  pub namespace: String,
  /// Byte that signals end of input, written `\$` in the grammar.
  pub termination_sentinel: u8,
  /// Fail instead of overwriting when two rules claim the same transition.
  pub strict: bool,
  pub target: Target,
}

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Grammar(#[from] GrammarError),
  #[error(transparent)]
  Table(#[from] pda::Error),
  #[error("cannot write {}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Parses the grammar and builds its table, without rendering it.
pub fn build(source: &GrammarSource, options: &ParseOptions) -> Result<Automaton, Error> {
  let rules = grammar::parse(source)?;
  let automaton = pda::build(&rules, options.termination_sentinel, options.strict)?;
  Ok(automaton)
}

/// Compiles the grammar into the text of the generated table.
pub fn compile(source: &GrammarSource, options: &ParseOptions) -> Result<String, Error> {
  let automaton = build(source, options)?;
  Ok(pda::codegen::gen(&automaton, &options.codegen()))
}

/// Reads the grammar at `grammar_path` and writes the generated table to
/// `options.output_file_path`. Nothing is written if any step fails.
pub fn parse_rules_and_generate_table(
  grammar_path: impl AsRef<Path>,
  options: &ParseOptions,
) -> Result<(), Error> {
  let source = GrammarSource::from_path(grammar_path)?;
  let artifact = compile(&source, options)?;

  fs::write(&options.output_file_path, artifact).map_err(|source| Error::Io {
    path: options.output_file_path.clone(),
    source,
  })?;

  info!(output = %options.output_file_path.display(), "table written");

  Ok(())
}

impl ParseOptions {
  fn codegen(&self) -> CodegenOptions {
    CodegenOptions {
      ifdef_guard: self.ifdef_guard.clone(),
      namespace: self.namespace.clone(),
      target: self.target,
    }
  }
}

impl Default for ParseOptions {
  fn default() -> Self {
    Self {
      output_file_path: PathBuf::from("parse_table.h"),
      ifdef_guard: String::new(),
      namespace: String::new(),
      termination_sentinel: 0,
      strict: false,
      target: Target::Cpp,
    }
  }
}
