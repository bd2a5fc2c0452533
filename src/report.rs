use grammar::GrammarError;
use std::fmt::Write;
use std::path::Path;

/// Renders a short message for the command line.
pub fn report(
  path: impl AsRef<Path>,
  err: &crate::Error
) -> String {
  match err {
    crate::Error::Grammar(err) => report_grammar_error(path, err),
    crate::Error::Table(err) => report_table_error(path, err),
    crate::Error::Io { path, source } => {
      let mut buf = String::new();
      writeln!(&mut buf, "cannot write {}", path.display()).unwrap();
      writeln!(&mut buf, "message: {}", source).unwrap();
      buf
    }
  }
}

fn report_grammar_error(
  path: impl AsRef<Path>,
  err: &GrammarError
) -> String {
  let mut buf = String::new();

  match err {
    GrammarError::MalformedRule { line, column, text, kind } => {
      writeln!(&mut buf,
        "malformed rule at {}:{}:{}",
        path.as_ref().display(),
        line,
        column
      ).unwrap();
      writeln!(&mut buf, "message: {}", kind).unwrap();
      writeln!(&mut buf, "\n  {}", text).unwrap();
    }
    GrammarError::Io { path, source } => {
      writeln!(&mut buf, "cannot read {}", path.display()).unwrap();
      writeln!(&mut buf, "message: {}", source).unwrap();
    }
  }

  buf
}

fn report_table_error(
  path: impl AsRef<Path>,
  err: &pda::Error
) -> String {
  let mut buf = String::new();

  let (error, line) = match err {
    pda::Error::TooManySymbols { .. } => ("too many symbols", None),
    pda::Error::EncodingOverflow { .. } => ("encoding overflow", None),
    pda::Error::PushMismatch { .. } => ("inconsistent control word", None),
    pda::Error::DuplicateConstant { .. } => ("duplicate constant", None),
    pda::Error::UnknownSymbol { .. } => ("unknown symbol", None),
    pda::Error::SentinelOutOfRange { line, .. } => ("termination sentinel out of range", Some(line)),
    pda::Error::Collision { second_line, .. } => ("transition conflict", Some(second_line)),
  };

  match line {
    Some(line) => {
      writeln!(&mut buf, "{} at {}:{}", error, path.as_ref().display(), line).unwrap();
    }
    None => {
      writeln!(&mut buf, "{} in {}", error, path.as_ref().display()).unwrap();
    }
  }
  writeln!(&mut buf, "message: {}", err).unwrap();

  buf
}

#[cfg(test)]
mod tests {
  use super::*;
  use grammar::GrammarSource;
  use insta::assert_snapshot;
  use crate::ParseOptions;

  fn report_of(source: &str, strict: bool) -> String {
    let options = ParseOptions {
      strict,
      termination_sentinel: 200,
      ..ParseOptions::default()
    };
    let err = crate::compile(&GrammarSource::new(source), &options).unwrap_err();
    report("json.grammar", &err)
  }

  #[test]
  fn malformed_rule() {
    assert_snapshot!(report_of("A [a] -> B\n  B -> C", false), @r###"
    malformed rule at json.grammar:2:3
    message: expected an input character class

      B -> C
    "###);
  }

  #[test]
  fn collision() {
    assert_snapshot!(report_of("A [ab] -> B\nA [b] -> C", true), @r###"
    transition conflict at json.grammar:2
    message: state `A` matches byte 98 at line 1 and again at line 2
    "###);
  }

  #[test]
  fn duplicate_constant() {
    assert_snapshot!(report_of("key [a] -> KEY", false), @r###"
    duplicate constant in json.grammar
    message: states `key` and `KEY` would both be emitted as `STATE_KEY`
    "###);
  }

  #[test]
  fn sentinel_out_of_range() {
    assert_snapshot!(report_of("A [\\$] -> ^", false), @r###"
    termination sentinel out of range at json.grammar:1
    message: rule at line 1 matches the termination sentinel 200, which is outside 0..=126
    "###);
  }
}
