use std::fmt::{self, Write};
use grammar::NUM_BYTES;
use crate::indent_writer::IndentWriter;
use crate::Automaton;
use super::{decls, write_rows, CodegenOptions, Decl, GENERATED_NOTICE};

/// `a::b` becomes nested `pub mod a { pub mod b { .. } }`.
pub(super) fn gen<W: Write>(
  w: &mut IndentWriter<W>,
  automaton: &Automaton,
  options: &CodegenOptions,
) -> fmt::Result {
  let modules = options.namespace.split("::")
    .map(str::trim)
    .filter(|name| !name.is_empty())
    .collect::<Vec<_>>();

  writeln!(w, "{}", GENERATED_NOTICE)?;
  writeln!(w)?;

  for (i, module) in modules.iter().enumerate() {
    if i == 0 {
      writeln!(w, "#[allow(dead_code)]")?;
    }
    writeln!(w, "pub mod {} {{", module)?;
    w.indent();
  }

  for decl in decls(automaton) {
    match decl {
      Decl::Comment(text) => writeln!(w, "// {}", text)?,
      Decl::U8(name, value) => writeln!(w, "pub const {}: u8 = {};", name, value)?,
      Decl::U32(name, value) => writeln!(w, "pub const {}: u32 = {};", name, value)?,
      Decl::Blank => writeln!(w)?,
    }
  }

  writeln!(w,
    "pub static PARSE_TABLE: [[u32; {}]; {}] = [",
    NUM_BYTES,
    automaton.table.num_states())?;
  w.indented(|w| write_rows(w, automaton, "[", "]"))?;
  writeln!(w, "];")?;

  for _ in &modules {
    w.dedent();
    writeln!(w, "}}")?;
  }

  Ok(())
}
