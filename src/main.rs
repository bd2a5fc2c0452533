use std::env;
use std::path::{Path, PathBuf};
use std::process;
use getopts::Options;
use tablegen::{ParseOptions, Target};
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env()
      .unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(std::io::stderr)
    .init();

  let args = env::args().collect::<Vec<_>>();
  let prog = args[0].clone();
  let mut opts = Options::new();
  opts.optopt("o", "output",
    "Path of the generated table. Defaults to PATH with a .h or .rs extension",
    "FILE");
  opts.optopt("", "guard",
    "Include guard of the generated header. Defaults to one derived from the output file name",
    "NAME");
  opts.optopt("", "namespace",
    "C++ namespace or Rust module path of the generated table",
    "NAME");
  opts.optopt("", "sentinel",
    "Byte that terminates the input, decimal or 0x hex. Defaults to 0",
    "BYTE");
  opts.optflag("", "strict", "Fail when two rules claim the same state and byte");
  opts.optopt("", "target",
    "Language of the generated table. Defaults to cpp.\n\
      Supported targets: cpp, rust (case insensitive)",
    "TARGET");
  opts.optflag("h", "help", "Print this message");

  let matches = match opts.parse(&args[1..]) {
    Ok(m) => m,
    Err(err) => {
      eprintln!("{}", err);
      process::exit(1);
    }
  };

  if matches.opt_present("h") {
    print_usage(prog, opts);
    return;
  }

  let path = if matches.free.len() == 1 {
    PathBuf::from(&matches.free[0])
  } else {
    print_usage(prog, opts);
    process::exit(1);
  };

  let target = match matches.opt_str("target") {
    Some(target) => match target.parse::<Target>() {
      Ok(target) => target,
      Err(err) => {
        eprintln!("{}", err);
        process::exit(1);
      }
    },
    None => Target::Cpp,
  };

  let termination_sentinel = match matches.opt_str("sentinel") {
    Some(text) => match parse_byte(&text) {
      Some(byte) => byte,
      None => {
        eprintln!("invalid sentinel byte: {}", text);
        process::exit(1);
      }
    },
    None => 0,
  };

  let output_file_path = matches.opt_str("o")
    .map(PathBuf::from)
    .unwrap_or_else(|| path.with_extension(match target {
      Target::Cpp => "h",
      Target::Rust => "rs",
    }));

  let ifdef_guard = matches.opt_str("guard")
    .unwrap_or_else(|| guard_of(&output_file_path));

  let options = ParseOptions {
    output_file_path,
    ifdef_guard,
    namespace: matches.opt_str("namespace").unwrap_or_default(),
    termination_sentinel,
    strict: matches.opt_present("strict"),
    target,
  };

  debug!(?options, "compiling {}", path.display());

  if let Err(err) = tablegen::parse_rules_and_generate_table(&path, &options) {
    let path = dunce::canonicalize(&path).unwrap_or(path);
    eprint!("{}", tablegen::report::report(&path, &err));
    process::exit(1);
  }
}

fn parse_byte(text: &str) -> Option<u8> {
  let text = text.trim();
  if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
    u8::from_str_radix(hex, 16).ok()
  } else {
    text.parse().ok()
  }
}

/// `parse_table.h` gives `PARSE_TABLE_H_`. A leading digit gets a `_` prefix.
fn guard_of(output: &Path) -> String {
  let name = output.file_name()
    .map(|name| name.to_string_lossy().into_owned())
    .unwrap_or_default();

  let mut guard = String::new();
  if name.starts_with(|c: char| c.is_ascii_digit()) {
    guard.push('_');
  }

  guard.extend(name.chars()
    .map(|c| if c.is_ascii_alphanumeric() {
      c.to_ascii_uppercase()
    } else {
      '_'
    }));
  guard.push('_');
  guard
}

fn print_usage(prog: String, opts: Options) {
  let brief = format!("Usage: {} [options] PATH", prog);
  print!("{}", opts.usage(&brief));
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn sentinel_bytes() {
    assert_eq!(parse_byte("0"), Some(0));
    assert_eq!(parse_byte(" 10 "), Some(10));
    assert_eq!(parse_byte("0x1f"), Some(0x1f));
    assert_eq!(parse_byte("0XFF"), Some(255));
    assert_eq!(parse_byte("256"), None);
    assert_eq!(parse_byte("0x"), None);
    assert_eq!(parse_byte("nul"), None);
  }

  #[test]
  fn guards() {
    assert_eq!(guard_of(Path::new("parse_table.h")), "PARSE_TABLE_H_");
    assert_eq!(guard_of(Path::new("out/json-table.hpp")), "JSON_TABLE_HPP_");
    assert_eq!(guard_of(Path::new("1.h")), "_1_H_");
  }
}
