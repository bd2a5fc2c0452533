use std::fmt::{self, Write};

const UNIT: &str = "  ";

/// Prefixes every non-empty line with the current indentation.
pub struct IndentWriter<W> {
  inner: W,
  prefix: String,
  line_start: bool,
}

impl<W: Write> IndentWriter<W> {
  pub fn new(inner: W) -> Self {
    Self {
      inner,
      prefix: String::new(),
      line_start: true,
    }
  }

  pub fn indent(&mut self) {
    self.prefix.push_str(UNIT);
  }

  pub fn dedent(&mut self) {
    let len = self.prefix.len().saturating_sub(UNIT.len());
    self.prefix.truncate(len);
  }

  /// Runs `f` one level deeper.
  pub fn indented<F>(&mut self, f: F) -> fmt::Result
  where
    F: FnOnce(&mut Self) -> fmt::Result,
  {
    self.indent();
    let result = f(self);
    self.dedent();
    result
  }

  pub fn into_inner(self) -> W {
    self.inner
  }
}

impl<W: Write> Write for IndentWriter<W> {
  fn write_str(&mut self, s: &str) -> fmt::Result {
    for piece in s.split_inclusive('\n') {
      if self.line_start && piece != "\n" {
        self.inner.write_str(&self.prefix)?;
      }
      self.inner.write_str(piece)?;
      self.line_start = piece.ends_with('\n');
    }
    Ok(())
  }
}
