use std::fs;
use std::iter::Enumerate;
use std::path::{Path, PathBuf};
use std::str;
use super::GrammarError;

/// Grammar text plus where it came from.
#[derive(Debug, Clone)]
pub struct GrammarSource {
  path: Option<PathBuf>,
  text: String,
}

/// Lines of a grammar, numbered from 1, leading whitespace removed.
///
/// Comments and blank lines are yielded too; the rule parser skips them.
pub struct Lines<'a> {
  inner: Enumerate<str::Lines<'a>>,
}

impl GrammarSource {
  pub fn new(text: impl Into<String>) -> Self {
    Self {
      path: None,
      text: text.into(),
    }
  }

  pub fn from_path(path: impl AsRef<Path>) -> Result<Self, GrammarError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| GrammarError::Io {
      path: path.to_owned(),
      source,
    })?;

    Ok(Self {
      path: Some(path.to_owned()),
      text,
    })
  }

  pub fn path(&self) -> Option<&Path> {
    self.path.as_deref()
  }

  pub fn text(&self) -> &str {
    &self.text
  }

  /// Starts over from the first line on every call.
  pub fn lines(&self) -> Lines {
    Lines {
      inner: self.text.lines().enumerate(),
    }
  }
}

impl<'a> Iterator for Lines<'a> {
  type Item = (usize, &'a str);

  fn next(&mut self) -> Option<Self::Item> {
    let (i, line) = self.inner.next()?;
    Some((i + 1, line.trim_start()))
  }
}
