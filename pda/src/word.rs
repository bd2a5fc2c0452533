use std::fmt;
use crate::symbols::NONE;
use crate::{Error, Field};

/// Packed transition for one (state, byte) pair.
///
/// ```text
/// 0b11111111  11111111   11111111   1      1      1      11111
/// ----------  --------   --------   -      -      -      -----
///     |           |         |       |      |      |        |
///  callback  shift state  state    push   pop   shift   reserved
/// ```
///
/// Runtime parsers depend on this exact layout.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlWord(u32);

impl ControlWord {
  pub const RESERVED_MASK: u32 = 0b1_1111;
  pub const SHIFT_BIT: u32 = 1 << 5;
  pub const POP_BIT: u32 = 1 << 6;
  pub const PUSH_BIT: u32 = 1 << 7;
  pub const STATE_OFFSET: u32 = 8;
  pub const SHIFT_STATE_OFFSET: u32 = 16;
  pub const CALLBACK_OFFSET: u32 = 24;

  /// `None` codes are stored as `NONE`. `push` must be set exactly when a
  /// shift state is given, so no packed word is ever zero.
  pub fn pack(
    callback: Option<u8>,
    shift_state: Option<u8>,
    state: u8,
    push: bool,
    pop: bool,
    shift: bool,
  ) -> Result<Self, Error> {
    let callback = optional_code(Field::Callback, callback)?;
    let shift_state = optional_code(Field::ShiftState, shift_state)?;
    let state = code(Field::State, state)?;

    if push != (shift_state != NONE) {
      return Err(Error::PushMismatch {
        push,
        shift_state: some_code(shift_state),
      });
    }

    let mut bits = (callback as u32) << Self::CALLBACK_OFFSET
      | (shift_state as u32) << Self::SHIFT_STATE_OFFSET
      | (state as u32) << Self::STATE_OFFSET;

    if push {
      bits |= Self::PUSH_BIT;
    }
    if pop {
      bits |= Self::POP_BIT;
    }
    if shift {
      bits |= Self::SHIFT_BIT;
    }

    Ok(Self(bits))
  }

  /// Returns `None` if any reserved bit is set.
  pub fn from_bits(bits: u32) -> Option<Self> {
    if bits & Self::RESERVED_MASK == 0 {
      Some(Self(bits))
    } else {
      None
    }
  }

  pub fn bits(self) -> u32 {
    self.0
  }

  pub fn shift(self) -> bool {
    self.0 & Self::SHIFT_BIT != 0
  }

  pub fn pop(self) -> bool {
    self.0 & Self::POP_BIT != 0
  }

  pub fn push(self) -> bool {
    self.0 & Self::PUSH_BIT != 0
  }

  pub fn state(self) -> u8 {
    (self.0 >> Self::STATE_OFFSET) as u8
  }

  pub fn shift_state(self) -> Option<u8> {
    some_code((self.0 >> Self::SHIFT_STATE_OFFSET) as u8)
  }

  pub fn callback(self) -> Option<u8> {
    some_code((self.0 >> Self::CALLBACK_OFFSET) as u8)
  }
}

fn code(field: Field, value: u8) -> Result<u8, Error> {
  if value == NONE {
    Err(Error::EncodingOverflow { field, value })
  } else {
    Ok(value)
  }
}

fn optional_code(field: Field, value: Option<u8>) -> Result<u8, Error> {
  value.map_or(Ok(NONE), |value| code(field, value))
}

fn some_code(value: u8) -> Option<u8> {
  if value == NONE {
    None
  } else {
    Some(value)
  }
}

impl fmt::Debug for ControlWord {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.debug_struct("ControlWord")
      .field("bits", &format_args!("{:#010x}", self.0))
      .field("state", &self.state())
      .field("shift_state", &self.shift_state())
      .field("callback", &self.callback())
      .field("push", &self.push())
      .field("pop", &self.pop())
      .field("shift", &self.shift())
      .finish()
  }
}
