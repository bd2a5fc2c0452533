use std::fmt::{self, Write};
use std::str::FromStr;
use fnv::FnvHashMap;
use heck::ShoutySnakeCase;
use itertools::Itertools;
use crate::indent_writer::IndentWriter;
use crate::symbols::{Registry, SymbolTable, NONE};
use crate::word::ControlWord;
use crate::{Automaton, Error};

mod cpp;
mod rust;

const GENERATED_NOTICE: &str = "// Generated by tablegen from a grammar file. Do not edit.";

/// Cell value of bytes without a transition. No packed word is ever zero.
const PARSE_ERROR: u32 = 0;

const CELL_WIDTH: usize = 10;
const NUM_COLUMNS: usize = 80 / (CELL_WIDTH + 2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
  /// C++ header wrapped in an include guard and a namespace.
  Cpp,
  /// Rust module named after the namespace. The include guard is unused.
  Rust,
}

#[derive(Debug, Clone)]
pub struct CodegenOptions {
  pub ifdef_guard: String,
  pub namespace: String,
  pub target: Target,
}

/// Renders the whole artifact. Equal inputs give byte-identical output.
pub fn gen(automaton: &Automaton, options: &CodegenOptions) -> String {
  let mut w = IndentWriter::new(String::new());

  let result = match options.target {
    Target::Cpp => cpp::gen(&mut w, automaton, options),
    Target::Rust => rust::gen(&mut w, automaton, options),
  };
  result.expect("formatting into a String");

  w.into_inner()
}

/// Declarations shared by every target, in output order.
enum Decl {
  Comment(&'static str),
  U8(String, u8),
  U32(String, String),
  Blank,
}

fn decls(automaton: &Automaton) -> Vec<Decl> {
  let registry = &automaton.registry;
  let mut decls = vec![Decl::Comment("States.")];

  decls.extend(registry.states.iter()
    .map(|(code, name)| Decl::U8(state_const(name), code)));
  decls.push(Decl::Blank);

  if !registry.callbacks.is_empty() {
    decls.push(Decl::Comment("Callbacks."));
    decls.extend(registry.callbacks.iter()
      .map(|(code, name)| Decl::U8(callback_const(name), code)));
    decls.push(Decl::Blank);
  }

  decls.push(Decl::Comment("Code of an absent shift state or callback."));
  decls.push(Decl::U8("NONE".to_owned(), NONE));
  decls.push(Decl::U8("TERMINATION_SENTINEL".to_owned(), automaton.termination_sentinel));
  decls.push(Decl::Blank);

  decls.push(Decl::Comment("Control word layout."));
  let layout = [
    ("SHIFT_BIT", ControlWord::SHIFT_BIT),
    ("POP_BIT", ControlWord::POP_BIT),
    ("PUSH_BIT", ControlWord::PUSH_BIT),
  ];
  for &(name, bit) in &layout {
    decls.push(Decl::U32(name.to_owned(), format!("{:#x}", bit)));
  }
  let offsets = [
    ("STATE_OFFSET", ControlWord::STATE_OFFSET),
    ("SHIFT_STATE_OFFSET", ControlWord::SHIFT_STATE_OFFSET),
    ("CALLBACK_OFFSET", ControlWord::CALLBACK_OFFSET),
  ];
  for &(name, offset) in &offsets {
    decls.push(Decl::U32(name.to_owned(), offset.to_string()));
  }
  decls.push(Decl::U32("PARSE_ERROR".to_owned(), PARSE_ERROR.to_string()));
  decls.push(Decl::Blank);

  decls
}

fn state_const(name: &str) -> String {
  format!("STATE_{}", name.to_shouty_snake_case())
}

fn callback_const(name: &str) -> String {
  format!("CALLBACK_{}", name.to_shouty_snake_case())
}

/// Fails if two names of the registry would be emitted as the same constant.
pub(crate) fn check_const_names(registry: &Registry) -> Result<(), Error> {
  check_table(&registry.states, state_const)?;
  check_table(&registry.callbacks, callback_const)
}

fn check_table(table: &SymbolTable, const_name: fn(&str) -> String) -> Result<(), Error> {
  let mut seen = FnvHashMap::default();

  for (_, name) in table.iter() {
    let constant = const_name(name);
    if let Some(first) = seen.insert(constant.clone(), name) {
      return Err(Error::DuplicateConstant {
        kind: table.kind(),
        constant,
        first: first.to_owned(),
        second: name.to_owned(),
      });
    }
  }

  Ok(())
}

/// Writes one `open ... close,` block per state, 127 cells each.
fn write_rows<W: Write>(
  w: &mut IndentWriter<W>,
  automaton: &Automaton,
  open: &str,
  close: &str,
) -> fmt::Result {
  for (code, row) in automaton.table.rows().iter().enumerate() {
    let name = automaton.registry.states.name(code as u8).unwrap_or_default();
    writeln!(w, "// {}", name)?;
    writeln!(w, "{}", open)?;

    let cells = row.iter().map(|word| cell(*word)).chunks(NUM_COLUMNS);
    w.indented(|w| {
      for mut line in &cells {
        writeln!(w, "{},", line.join(", "))?;
      }
      Ok(())
    })?;

    writeln!(w, "{},", close)?;
  }

  Ok(())
}

fn cell(word: Option<ControlWord>) -> String {
  format!("{:#010x}", word.map_or(PARSE_ERROR, ControlWord::bits))
}

impl Default for Target {
  fn default() -> Self {
    Self::Cpp
  }
}

impl FromStr for Target {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, String> {
    match s.to_ascii_lowercase().as_str() {
      "cpp" | "c++" => Ok(Self::Cpp),
      "rust" | "rs" => Ok(Self::Rust),
      _ => Err(format!("unknown target `{}`, expected cpp or rust", s)),
    }
  }
}

impl Default for CodegenOptions {
  fn default() -> Self {
    Self {
      ifdef_guard: String::new(),
      namespace: String::new(),
      target: Target::default(),
    }
  }
}
