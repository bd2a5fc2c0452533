use pda::Automaton;

/// Drives the table over `input` the way a runtime parser would and records
/// every callback that fires.
pub fn run(automaton: &Automaton, start: &str, input: &str) -> Vec<String> {
  let registry = &automaton.registry;
  let sentinel = automaton.termination_sentinel;
  let bytes = input.as_bytes();
  let mut events = vec![];
  let mut stack = vec![registry.states.code(start).unwrap()];
  let mut pos = 0;

  // every byte is visited a bounded number of times by a sane grammar
  for _ in 0..(bytes.len() + 1) * 8 {
    let byte = bytes.get(pos).copied().unwrap_or(sentinel);
    let state = match stack.last() {
      Some(&state) => state,
      None => {
        events.push(format!("error: empty stack at {}", pos));
        return events;
      }
    };

    let word = match automaton.table.get(state, byte) {
      Some(word) => word,
      None => {
        events.push(format!(
          "error: unexpected {:?} at {} in {}",
          byte as char,
          pos,
          registry.states.name(state).unwrap()));
        return events;
      }
    };
    assert_eq!(word.state(), state);

    if let Some(callback) = word.callback() {
      events.push(registry.callbacks.name(callback).unwrap().to_owned());
    }
    if word.pop() {
      stack.pop();
    }
    if word.push() {
      stack.push(word.shift_state().unwrap());
    }
    if word.shift() {
      if pos == bytes.len() {
        return events;
      }
      pos += 1;
    }
  }

  events.push("error: no progress".to_owned());
  events
}
