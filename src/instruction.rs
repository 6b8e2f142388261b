use std::fmt;

use crate::opcode::Opcode;

/// Four hex digits fetched from two adjacent cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Word(u16);

impl Word {
  pub fn new(high: u8, low: u8) -> Self {
    Self(u16::from_be_bytes([high, low]))
  }

  pub fn raw(self) -> u16 {
    self.0
  }

  /// Hex digit at `position`, 0 being the leftmost (the opcode)
  pub fn digit(self, position: usize) -> u8 {
    debug_assert!(position < 4);
    // digit 0 lives in the top nibble
    ((self.0 >> (4 * (3 - position))) & 0xF) as u8
  }

  /// The last two digits read as one byte, the `XY` field
  pub fn xy(self) -> u8 {
    self.0.to_be_bytes()[1]
  }
}

impl fmt::Display for Word {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:04x}", self.0)
  }
}

/// A decoded instruction, operands already pulled out of the word
///
/// Register operands are raw hex digits and are only checked against the
/// register bank when the instruction executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
  Load { r: u8, address: u8 },
  LoadImmediate { r: u8, value: u8 },
  Store { r: u8, address: u8 },
  Move { from: u8, to: u8 },
  AddComplement { r: u8, s: u8, t: u8 },
  AddFloat { r: u8, s: u8, t: u8 },
  Or { r: u8, s: u8, t: u8 },
  And { r: u8, s: u8, t: u8 },
  Xor { r: u8, s: u8, t: u8 },
  Rotate { r: u8, x: u8 },
  Jump { r: u8, address: u8 },
  Halt,
}

impl Instruction {
  /// Decode a word, `None` when the leading digit is not an opcode
  pub fn decode(word: Word) -> Option<Self> {
    let op = Opcode::from_nibble(word.digit(0))?;
    let (d1, d2, d3) = (word.digit(1), word.digit(2), word.digit(3));
    let xy = word.xy();
    let instruction = match op {
      Opcode::Load => Self::Load { r: d1, address: xy },
      Opcode::LoadImmediate => Self::LoadImmediate { r: d1, value: xy },
      Opcode::Store => Self::Store { r: d1, address: xy },
      Opcode::Move => Self::Move { from: d2, to: d3 },
      Opcode::AddComplement => Self::AddComplement { r: d1, s: d2, t: d3 },
      Opcode::AddFloat => Self::AddFloat { r: d1, s: d2, t: d3 },
      Opcode::Or => Self::Or { r: d1, s: d2, t: d3 },
      Opcode::And => Self::And { r: d1, s: d2, t: d3 },
      Opcode::Xor => Self::Xor { r: d1, s: d2, t: d3 },
      Opcode::Rotate => Self::Rotate { r: d1, x: d3 },
      Opcode::Jump => Self::Jump { r: d1, address: xy },
      Opcode::Halt => Self::Halt,
    };
    Some(instruction)
  }
}
