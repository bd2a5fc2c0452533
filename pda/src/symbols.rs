use fnv::FnvBuildHasher;
use indexmap::IndexSet;
use grammar::Rule;
use tracing::debug;
use crate::{Error, SymbolKind};

/// Code reserved for "no state" / "no callback".
pub const NONE: u8 = u8::MAX;

/// Codes `0..MAX_SYMBOLS` are available, `NONE` is not.
pub const MAX_SYMBOLS: usize = NONE as usize;

/// Interns names into dense codes in first-seen order.
#[derive(Debug, Clone)]
pub struct SymbolTable {
  kind: SymbolKind,
  names: IndexSet<String, FnvBuildHasher>,
}

/// State and callback codes of one compilation.
#[derive(Debug, Clone)]
pub struct Registry {
  pub states: SymbolTable,
  pub callbacks: SymbolTable,
}

impl SymbolTable {
  pub fn new(kind: SymbolKind) -> Self {
    Self {
      kind,
      names: IndexSet::default(),
    }
  }

  pub fn kind(&self) -> SymbolKind {
    self.kind
  }

  pub fn intern(&mut self, name: &str) -> Result<u8, Error> {
    if let Some(code) = self.names.get_index_of(name) {
      return Ok(code as u8);
    }

    if self.names.len() >= MAX_SYMBOLS {
      return Err(Error::TooManySymbols {
        kind: self.kind,
        name: name.to_owned(),
      });
    }

    let (code, _) = self.names.insert_full(name.to_owned());
    Ok(code as u8)
  }

  pub fn code(&self, name: &str) -> Option<u8> {
    self.names.get_index_of(name).map(|code| code as u8)
  }

  pub fn name(&self, code: u8) -> Option<&str> {
    self.names.get_index(code as usize).map(|name| name.as_str())
  }

  pub fn len(&self) -> usize {
    self.names.len()
  }

  pub fn is_empty(&self) -> bool {
    self.names.is_empty()
  }

  /// `(code, name)` pairs in code order.
  pub fn iter(&self) -> impl Iterator<Item=(u8, &str)> {
    self.names.iter()
      .enumerate()
      .map(|(code, name)| (code as u8, name.as_str()))
  }
}

impl Registry {
  pub fn new() -> Self {
    Self {
      states: SymbolTable::new(SymbolKind::State),
      callbacks: SymbolTable::new(SymbolKind::Callback),
    }
  }

  /// Interns the names of every rule before anything is encoded, so that
  /// transitions to states declared further down resolve.
  pub fn populate<'r>(
    rules: impl IntoIterator<Item=&'r Rule>,
  ) -> Result<Self, Error> {
    let mut registry = Self::new();
    for rule in rules {
      registry.add_rule(rule)?;
    }

    debug!(
      states = registry.states.len(),
      callbacks = registry.callbacks.len(),
      "symbols interned");

    Ok(registry)
  }

  pub fn add_rule(&mut self, rule: &Rule) -> Result<(), Error> {
    self.states.intern(&rule.state)?;
    for name in &rule.transition {
      self.states.intern(name)?;
    }
    if let Some(callback) = &rule.callback {
      self.callbacks.intern(callback)?;
    }
    Ok(())
  }
}

impl Default for Registry {
  fn default() -> Self {
    Self::new()
  }
}
