use grammar::{Rule, NUM_BYTES};
use tracing::{debug, trace, warn};
use crate::encode::encode_rule;
use crate::symbols::Registry;
use crate::word::ControlWord;
use crate::Error;

/// Control words of one state, indexed by input byte. `None` is a parse error.
pub type Row = [Option<ControlWord>; NUM_BYTES];

/// One row per state code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
  rows: Vec<Row>,
}

pub struct TableBuilder<'r> {
  registry: &'r Registry,
  termination_sentinel: u8,
  strict: bool,
}

impl<'r> TableBuilder<'r> {
  pub fn new(registry: &'r Registry, termination_sentinel: u8) -> Self {
    Self {
      registry,
      termination_sentinel,
      strict: false,
    }
  }

  /// In strict mode two rules claiming the same (state, byte) pair are an
  /// error. Otherwise the later rule wins.
  pub fn strict(mut self, strict: bool) -> Self {
    self.strict = strict;
    self
  }

  pub fn build(&self, rules: &[Rule]) -> Result<Table, Error> {
    let num_states = self.registry.states.len();
    let mut rows = vec![[None; NUM_BYTES]; num_states];
    // line of the rule that filled each cell
    let mut lines = vec![[0usize; NUM_BYTES]; num_states];

    for rule in rules {
      for (byte, word) in encode_rule(rule, self.registry, self.termination_sentinel)? {
        let state = word.state() as usize;
        let cell = &mut rows[state][byte as usize];
        let line = &mut lines[state][byte as usize];

        if let Some(old) = *cell {
          if self.strict {
            return Err(Error::Collision {
              state: rule.state.clone(),
              byte,
              first_line: *line,
              second_line: rule.line,
            });
          }

          if old == word {
            trace!(state = %rule.state, byte, first_line = *line, second_line = rule.line,
              "duplicate transition");
          } else {
            warn!(state = %rule.state, byte, first_line = *line, second_line = rule.line,
              "transition overwritten by a later rule");
          }
        }

        *cell = Some(word);
        *line = rule.line;
      }
    }

    let table = Table { rows };

    for state in table.unterminated_states(self.termination_sentinel) {
      debug!(
        state = self.registry.states.name(state).unwrap_or_default(),
        sentinel = self.termination_sentinel,
        "no transition on the termination sentinel");
    }

    Ok(table)
  }
}

impl Table {
  pub fn num_states(&self) -> usize {
    self.rows.len()
  }

  pub fn rows(&self) -> &[Row] {
    &self.rows
  }

  pub fn row(&self, state: u8) -> Option<&Row> {
    self.rows.get(state as usize)
  }

  pub fn get(&self, state: u8, byte: u8) -> Option<ControlWord> {
    self.row(state)?.get(byte as usize).copied().flatten()
  }

  /// `(state, byte, word)` for every filled cell, ordered by state then byte.
  pub fn entries(&self) -> impl Iterator<Item=(u8, u8, ControlWord)> + '_ {
    self.rows.iter().enumerate().flat_map(|(state, row)| {
      row.iter().enumerate().filter_map(move |(byte, word)| {
        word.map(|word| (state as u8, byte as u8, word))
      })
    })
  }

  pub fn len(&self) -> usize {
    self.rows.iter()
      .map(|row| row.iter().filter(|word| word.is_some()).count())
      .sum()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Bytes on which `state` has no transition.
  pub fn error_bytes(&self, state: u8) -> impl Iterator<Item=u8> + '_ {
    self.row(state).into_iter().flat_map(|row| {
      row.iter().enumerate()
        .filter(|(_, word)| word.is_none())
        .map(|(byte, _)| byte as u8)
    })
  }

  /// States without a transition on the termination sentinel. Those states
  /// report a parse error at end of input.
  pub fn unterminated_states(&self, termination_sentinel: u8) -> Vec<u8> {
    (0..self.rows.len() as u8)
      .filter(|&state| self.get(state, termination_sentinel).is_none())
      .collect()
  }
}
