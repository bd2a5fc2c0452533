use super::lex::LexError;
use super::rule::{CharSet, Input, NUM_BYTES};
use super::RuleErrorKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
  Digit,
  Word,
  Space,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Item {
  Char(u8),
  Class(CharClass),
  Sentinel,
}

impl CharClass {
  fn ranges(&self) -> impl Iterator<Item=(u8, u8)> {
    let f = |&(a, b): &'static (u8, u8)| (a, b);

    match self {
      Self::Digit => {
        [(b'0', b'9')].iter().map(f)
      }
      Self::Word => {
        [(b'0', b'9'), (b'a', b'z'), (b'A', b'Z'), (b'_', b'_')].iter().map(f)
      }
      Self::Space => {
        [(b'\t', b'\r'), (b' ', b' ')].iter().map(f)
      }
    }
  }
}

/// Expands the body of a character class into an `Input`.
///
/// `offset` is the position of the body within its line, used for error spans.
pub fn expand(body: &str, exclude: bool, offset: usize) -> Result<Input, LexError> {
  let bytes = body.as_bytes();
  let mut charset = CharSet::new();
  let mut terminal = false;
  let mut i = 0;

  while i < bytes.len() {
    let (item, next) = read_item(bytes, i, offset)?;

    if let Item::Char(lo) = item {
      if next + 1 < bytes.len() && bytes[next] == b'-' {
        let (hi, after) = read_item(bytes, next + 1, offset)?;
        match hi {
          Item::Char(hi) if lo <= hi => {
            charset.insert_range(lo, hi);
            i = after;
            continue;
          }
          _ => {
            return Err(LexError {
              kind: RuleErrorKind::InvalidRange,
              span: (offset + i, offset + after),
            });
          }
        }
      }
    }

    match item {
      Item::Char(c) => charset.insert(c),
      Item::Class(class) => {
        for (lo, hi) in class.ranges() {
          charset.insert_range(lo, hi);
        }
      }
      Item::Sentinel => terminal = true,
    }
    i = next;
  }

  Ok(Input {
    exclude,
    charset,
    terminal,
  })
}

fn read_item(bytes: &[u8], i: usize, offset: usize) -> Result<(Item, usize), LexError> {
  let b = bytes[i];

  if b as usize >= NUM_BYTES {
    return Err(LexError {
      kind: RuleErrorKind::NonAscii,
      span: (offset + i, offset + i + 1),
    });
  }

  if b != b'\\' {
    return Ok((Item::Char(b), i + 1));
  }

  let item = match bytes.get(i + 1) {
    Some(&(c@(b'\\' | b']' | b'[' | b'-' | b'^' | b'!' | b'@' | b'#'))) => Item::Char(c),
    Some(b't') => Item::Char(b'\t'),
    Some(b'n') => Item::Char(b'\n'),
    Some(b'r') => Item::Char(b'\r'),
    Some(b'0') => Item::Char(0),
    Some(b'd') => Item::Class(CharClass::Digit),
    Some(b'w') => Item::Class(CharClass::Word),
    Some(b's') => Item::Class(CharClass::Space),
    Some(b'$') => Item::Sentinel,
    _ => {
      return Err(LexError {
        kind: RuleErrorKind::InvalidEscape,
        span: (offset + i, offset + (i + 2).min(bytes.len())),
      });
    }
  };

  Ok((item, i + 2))
}
