use std::fmt::{self, Write};
use grammar::NUM_BYTES;
use crate::indent_writer::IndentWriter;
use crate::Automaton;
use super::{decls, write_rows, CodegenOptions, Decl, GENERATED_NOTICE};

pub(super) fn gen<W: Write>(
  w: &mut IndentWriter<W>,
  automaton: &Automaton,
  options: &CodegenOptions,
) -> fmt::Result {
  let guard = options.ifdef_guard.trim();
  let namespace = options.namespace.trim();

  writeln!(w, "{}", GENERATED_NOTICE)?;
  writeln!(w)?;

  if !guard.is_empty() {
    writeln!(w, "#ifndef {}", guard)?;
    writeln!(w, "#define {}", guard)?;
    writeln!(w)?;
  }

  writeln!(w, "#include <cstdint>")?;
  writeln!(w)?;

  if !namespace.is_empty() {
    writeln!(w, "namespace {} {{", namespace)?;
    writeln!(w)?;
  }

  for decl in decls(automaton) {
    match decl {
      Decl::Comment(text) => writeln!(w, "// {}", text)?,
      Decl::U8(name, value) => {
        writeln!(w, "inline constexpr uint8_t {} = {};", name, value)?;
      }
      Decl::U32(name, value) => {
        writeln!(w, "inline constexpr uint32_t {} = {};", name, value)?;
      }
      Decl::Blank => writeln!(w)?,
    }
  }

  let num_states = automaton.table.num_states();
  if num_states == 0 {
    writeln!(w, "// The grammar has no states, so there is no parse table.")?;
  } else {
    writeln!(w, "inline constexpr uint32_t PARSE_TABLE[{}][{}] = {{", num_states, NUM_BYTES)?;
    w.indented(|w| write_rows(w, automaton, "{", "}"))?;
    writeln!(w, "}};")?;
  }

  if !namespace.is_empty() {
    writeln!(w)?;
    writeln!(w, "}}  // namespace {}", namespace)?;
  }

  if !guard.is_empty() {
    writeln!(w)?;
    writeln!(w, "#endif  // {}", guard)?;
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use crate::codegen::{gen, CodegenOptions, Target};
  use insta::assert_snapshot;

  fn header(source: &str, ifdef_guard: &str, namespace: &str) -> String {
    let rules = grammar::build(source).unwrap();
    let automaton = crate::build(&rules, 0, false).unwrap();
    gen(&automaton, &CodegenOptions {
      ifdef_guard: ifdef_guard.to_owned(),
      namespace: namespace.to_owned(),
      target: Target::Cpp,
    })
  }

  #[test]
  fn wrapper_and_constants() {
    let out = header("START [{] -> OBJECT @begin_object\nOBJECT [}] -> ^ @end_object",
      "JSON_TABLE_H_", "json::grammar");
    let preamble = out.lines()
      .take_while(|line| !line.starts_with("inline constexpr uint32_t PARSE_TABLE"))
      .collect::<Vec<_>>()
      .join("\n")
      .trim_end()
      .to_owned();

    assert_snapshot!(preamble, @r###"
    // Generated by tablegen from a grammar file. Do not edit.

    #ifndef JSON_TABLE_H_
    #define JSON_TABLE_H_

    #include <cstdint>

    namespace json::grammar {

    // States.
    inline constexpr uint8_t STATE_START = 0;
    inline constexpr uint8_t STATE_OBJECT = 1;

    // Callbacks.
    inline constexpr uint8_t CALLBACK_BEGIN_OBJECT = 0;
    inline constexpr uint8_t CALLBACK_END_OBJECT = 1;

    // Code of an absent shift state or callback.
    inline constexpr uint8_t NONE = 255;
    inline constexpr uint8_t TERMINATION_SENTINEL = 0;

    // Control word layout.
    inline constexpr uint32_t SHIFT_BIT = 0x20;
    inline constexpr uint32_t POP_BIT = 0x40;
    inline constexpr uint32_t PUSH_BIT = 0x80;
    inline constexpr uint32_t STATE_OFFSET = 8;
    inline constexpr uint32_t SHIFT_STATE_OFFSET = 16;
    inline constexpr uint32_t CALLBACK_OFFSET = 24;
    inline constexpr uint32_t PARSE_ERROR = 0;
    "###);

    assert!(out.contains("inline constexpr uint32_t PARSE_TABLE[2][127] = {\n  // START\n  {\n"));
    assert!(out.contains("0x000100a0"));
    assert!(out.contains("0x01ff0160"));
    assert!(out.ends_with("};\n\n}  // namespace json::grammar\n\n#endif  // JSON_TABLE_H_\n"));
  }

  #[test]
  fn no_wrapper() {
    let out = header("A [a] -> ^", "", "");

    assert!(!out.contains("#ifndef"));
    assert!(!out.contains("namespace"));
    assert!(!out.contains("// Callbacks."));
    assert!(out.ends_with("  },\n};\n"));
  }

  #[test]
  fn empty_grammar() {
    let out = header("# nothing here", "G_H_", "");

    assert!(!out.contains("PARSE_TABLE"));
    assert!(out.contains("// The grammar has no states"));
  }
}
