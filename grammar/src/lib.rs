use std::io;
use std::path::PathBuf;
use thiserror::Error;

mod charset;
mod lex;
mod parser;
mod reader;
mod rule;

pub use parser::{parse, parse_line};
pub use reader::{GrammarSource, Lines};
pub use rule::{CharSet, Input, Rule, NUM_BYTES};

#[derive(Debug, Error)]
pub enum GrammarError {
  #[error("malformed rule at line {line}, column {column}: {kind}")]
  MalformedRule {
    line: usize,
    column: usize,
    text: String,
    kind: RuleErrorKind,
  },
  #[error("cannot read grammar {}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RuleErrorKind {
  #[error("expected a state name")]
  MissingState,
  #[error("expected an input character class")]
  MissingInput,
  #[error("expected `->` or `=>`")]
  MissingArrow,
  #[error("unclosed character class")]
  UnclosedCharClass,
  #[error("invalid escape sequence")]
  InvalidEscape,
  #[error("invalid character range")]
  InvalidRange,
  #[error("byte outside the ascii range 0..=126")]
  NonAscii,
  #[error("invalid character")]
  InvalidChar,
  #[error("`^` must directly follow the arrow")]
  MisplacedPop,
  #[error("expected a callback name after `@`")]
  MissingCallbackName,
  #[error("unexpected token")]
  UnexpectedToken,
}

/// Parses a whole grammar held in memory.
pub fn build(input: &str) -> Result<Vec<Rule>, GrammarError> {
  parse(&GrammarSource::new(input))
}
