use grammar::{Rule, NUM_BYTES};
use crate::symbols::{Registry, SymbolTable};
use crate::word::ControlWord;
use crate::Error;

/// Computes the control word of `rule` for every byte it matches.
///
/// `registry` must already hold every name of the grammar.
pub fn encode_rule(
  rule: &Rule,
  registry: &Registry,
  termination_sentinel: u8,
) -> Result<Vec<(u8, ControlWord)>, Error> {
  if rule.input.terminal && termination_sentinel as usize >= NUM_BYTES {
    return Err(Error::SentinelOutOfRange {
      sentinel: termination_sentinel,
      line: rule.line,
    });
  }

  let state = lookup(&registry.states, &rule.state)?;
  let shift_state = rule.transition.first()
    .map(|name| lookup(&registry.states, name))
    .transpose()?;
  let callback = rule.callback.as_deref()
    .map(|name| lookup(&registry.callbacks, name))
    .transpose()?;

  let word = ControlWord::pack(
    callback,
    shift_state,
    state,
    rule.push(),
    rule.pop,
    rule.shift)?;

  Ok(rule.input.bytes(termination_sentinel).map(|byte| (byte, word)).collect())
}

fn lookup(table: &SymbolTable, name: &str) -> Result<u8, Error> {
  table.code(name).ok_or_else(|| Error::UnknownSymbol {
    kind: table.kind(),
    name: name.to_owned(),
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::SymbolKind;
  use pretty_assertions::assert_eq;

  fn encode(source: &str, sentinel: u8) -> Result<Vec<Vec<(u8, ControlWord)>>, Error> {
    let rules = grammar::build(source).unwrap();
    let registry = Registry::populate(&rules)?;
    rules.iter()
      .map(|rule| encode_rule(rule, &registry, sentinel))
      .collect()
  }

  #[test]
  fn push_and_shift() {
    let words = encode("START [{] -> OBJECT @begin_object", 0).unwrap();

    assert_eq!(words, vec![vec![
      (b'{', ControlWord::pack(Some(0), Some(1), 0, true, false, true).unwrap()),
    ]]);
  }

  #[test]
  fn first_transition_is_shift_state() {
    let words = encode("A [a] => ^ B C", 0).unwrap();
    let (_, word) = words[0][0];

    assert_eq!(word.state(), 0);
    assert_eq!(word.shift_state(), Some(1));
    assert_eq!(word.callback(), None);
    assert!(word.push());
    assert!(word.pop());
    assert!(!word.shift());
  }

  #[test]
  fn same_word_for_every_byte() {
    let words = encode("A ![a] -> @skip", 0).unwrap();

    assert_eq!(words[0].len(), NUM_BYTES - 1);
    assert!(words[0].iter().all(|&(_, word)| word == words[0][0].1));
    assert!(words[0].iter().all(|&(byte, _)| byte != b'a'));
  }

  #[test]
  fn terminal_bytes() {
    let words = encode("A [\\$] -> ^ @done", 3).unwrap();
    assert_eq!(words[0].iter().map(|&(b, _)| b).collect::<Vec<_>>(), vec![3]);

    assert_eq!(encode("A [\\$] -> ^ @done", 200).unwrap_err(), Error::SentinelOutOfRange {
      sentinel: 200,
      line: 1,
    });
  }

  #[test]
  fn unknown_symbol() {
    let rules = grammar::build("A [a] -> B @cb").unwrap();
    let registry = Registry::new();

    assert_eq!(encode_rule(&rules[0], &registry, 0).unwrap_err(), Error::UnknownSymbol {
      kind: SymbolKind::State,
      name: "A".to_owned(),
    });
  }
}
