use std::fmt;
use grammar::Rule;
use thiserror::Error;
use tracing::info;

pub mod codegen;
mod encode;
mod indent_writer;
mod symbols;
mod table;
mod word;

pub use encode::encode_rule;
pub use symbols::{Registry, SymbolTable, MAX_SYMBOLS, NONE};
pub use table::{Row, Table, TableBuilder};
pub use word::ControlWord;

/// A compiled grammar: the transition table plus the codes it refers to.
#[derive(Debug, Clone)]
pub struct Automaton {
  pub registry: Registry,
  pub table: Table,
  pub termination_sentinel: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
  State,
  Callback,
}

/// A code field of the control word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
  State,
  ShiftState,
  Callback,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  #[error("more than 255 distinct {kind} names, `{name}` does not fit")]
  TooManySymbols {
    kind: SymbolKind,
    name: String,
  },
  #[error("{field} code {value} does not fit the control word")]
  EncodingOverflow {
    field: Field,
    value: u8,
  },
  #[error("push is {push} but the shift state is {shift_state:?}")]
  PushMismatch {
    push: bool,
    shift_state: Option<u8>,
  },
  #[error("{kind}s `{first}` and `{second}` would both be emitted as `{constant}`")]
  DuplicateConstant {
    kind: SymbolKind,
    constant: String,
    first: String,
    second: String,
  },
  #[error("{kind} `{name}` was never interned")]
  UnknownSymbol {
    kind: SymbolKind,
    name: String,
  },
  #[error("rule at line {line} matches the termination sentinel {sentinel}, which is outside 0..=126")]
  SentinelOutOfRange {
    sentinel: u8,
    line: usize,
  },
  #[error("state `{state}` matches byte {byte} at line {first_line} and again at line {second_line}")]
  Collision {
    state: String,
    byte: u8,
    first_line: usize,
    second_line: usize,
  },
}

/// Interns every symbol of `rules`, then encodes them into a table.
pub fn build(
  rules: &[Rule],
  termination_sentinel: u8,
  strict: bool,
) -> Result<Automaton, Error> {
  let registry = Registry::populate(rules)?;
  codegen::check_const_names(&registry)?;
  let table = TableBuilder::new(&registry, termination_sentinel)
    .strict(strict)
    .build(rules)?;

  info!(
    states = registry.states.len(),
    callbacks = registry.callbacks.len(),
    entries = table.len(),
    "table built");

  Ok(Automaton {
    registry,
    table,
    termination_sentinel,
  })
}

impl fmt::Display for SymbolKind {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      Self::State => write!(f, "state"),
      Self::Callback => write!(f, "callback"),
    }
  }
}

impl fmt::Display for Field {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      Self::State => write!(f, "state"),
      Self::ShiftState => write!(f, "shift state"),
      Self::Callback => write!(f, "callback"),
    }
  }
}
