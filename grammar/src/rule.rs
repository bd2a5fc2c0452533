use bitvec::prelude::*;
use std::fmt;

/// Number of byte values covered by a table row, `0..=126`.
pub const NUM_BYTES: usize = 127;

#[derive(Clone, Copy)]
pub struct CharSet(BitArray<[u64; 2], Lsb0>);

/// Which bytes trigger a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Input {
  /// Matches every byte *not* in the set.
  pub exclude: bool,
  pub charset: CharSet,
  /// The set also holds the termination sentinel, whose value is only known
  /// when the table is built.
  pub terminal: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
  pub line: usize,
  pub state: String,
  pub input: Input,
  /// Consume the matched byte. False for zero-width (`=>`) rules.
  pub shift: bool,
  pub pop: bool,
  /// States to push, outermost first.
  pub transition: Vec<String>,
  pub callback: Option<String>,
}

impl CharSet {
  pub fn new() -> Self {
    Self(BitArray::ZERO)
  }

  /// # Panics
  ///
  /// Panics if `byte` is outside `0..=126`.
  pub fn insert(&mut self, byte: u8) {
    assert!((byte as usize) < NUM_BYTES);
    self.0.set(byte as usize, true);
  }

  /// Inserts `lo..=hi`.
  ///
  /// # Panics
  ///
  /// Panics if `lo > hi` or `hi` is outside `0..=126`.
  pub fn insert_range(&mut self, lo: u8, hi: u8) {
    assert!(lo <= hi && (hi as usize) < NUM_BYTES);
    self.0[lo as usize..=hi as usize].fill(true);
  }

  pub fn contains(&self, byte: u8) -> bool {
    self.0.get(byte as usize).map_or(false, |bit| *bit)
  }

  pub fn len(&self) -> usize {
    self.0.count_ones()
  }

  pub fn is_empty(&self) -> bool {
    self.0.not_any()
  }

  pub fn iter(&self) -> impl Iterator<Item=u8> + '_ {
    self.0.iter_ones().map(|i| i as u8)
  }
}

impl Default for CharSet {
  fn default() -> Self {
    Self::new()
  }
}

impl PartialEq for CharSet {
  fn eq(&self, other: &Self) -> bool {
    self.0.as_raw_slice() == other.0.as_raw_slice()
  }
}

impl Eq for CharSet {}

impl fmt::Debug for CharSet {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.debug_set().entries(self.iter().map(|b| b as char)).finish()
  }
}

/// Panics on bytes outside `0..=126`, like `CharSet::insert`.
impl std::iter::FromIterator<u8> for CharSet {
  fn from_iter<I: IntoIterator<Item=u8>>(iter: I) -> Self {
    let mut set = Self::new();
    for byte in iter {
      set.insert(byte);
    }
    set
  }
}

impl Input {
  pub fn matches(&self, byte: u8, sentinel: u8) -> bool {
    if byte as usize >= NUM_BYTES {
      return false;
    }

    let hit = self.charset.contains(byte) || (self.terminal && byte == sentinel);
    hit != self.exclude
  }

  /// All bytes in `0..=126` matched by this input, in ascending order.
  pub fn bytes(&self, sentinel: u8) -> impl Iterator<Item=u8> + '_ {
    (0..NUM_BYTES as u8).filter(move |&b| self.matches(b, sentinel))
  }
}

impl Rule {
  pub fn push(&self) -> bool {
    !self.transition.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  fn input(exclude: bool, chars: &str) -> Input {
    Input {
      exclude,
      charset: chars.bytes().collect(),
      terminal: false,
    }
  }

  #[test]
  fn match_charset() {
    let input = input(false, "AB");
    assert_eq!(input.bytes(0).collect::<Vec<_>>(), vec![b'A', b'B']);
  }

  #[test]
  fn match_excluded_charset() {
    let input = input(true, "AB");
    let bytes = input.bytes(0).collect::<Vec<_>>();

    assert_eq!(bytes.len(), NUM_BYTES - 2);
    assert!(!bytes.contains(&b'A'));
    assert!(!bytes.contains(&b'B'));
    assert!(bytes.contains(&0));
    assert!(bytes.contains(&126));
  }

  #[test]
  fn never_match_del() {
    let input = input(true, "");
    assert!(!input.matches(127, 0));
    assert!(!input.matches(255, 0));
  }

  #[test]
  fn terminal_follows_sentinel() {
    let mut input = input(false, "x");
    input.terminal = true;

    assert_eq!(input.bytes(3).collect::<Vec<_>>(), vec![3, b'x']);
    assert_eq!(input.bytes(b'x').collect::<Vec<_>>(), vec![b'x']);

    input.exclude = true;
    assert!(!input.matches(3, 3));
    assert!(input.matches(4, 3));
  }

  #[test]
  #[should_panic]
  fn insert_del() {
    CharSet::new().insert(127);
  }

  #[test]
  #[should_panic]
  fn insert_range_past_ascii() {
    CharSet::new().insert_range(b'a', 200);
  }

  #[test]
  #[should_panic]
  fn collect_non_ascii() {
    let _ = b"a\xff".iter().copied().collect::<CharSet>();
  }

  #[test]
  fn charset_set_semantics() {
    let mut set = CharSet::new();
    set.insert(b'a');
    set.insert(b'a');
    set.insert_range(b'a', b'c');

    assert_eq!(set.len(), 3);
    assert_eq!(format!("{:?}", set), "{'a', 'b', 'c'}");
  }
}
