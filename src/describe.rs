//! Plain-English descriptions of instruction words, for the state dump.

use crate::instruction::{Instruction, Word};

/// Explain the instruction made of `high` followed by `low`
///
/// Operand digits are shown in hex. Returns `None` when the leading digit is
/// not an opcode.
pub fn describe(high: u8, low: u8) -> Option<String> {
  let text = match Instruction::decode(Word::new(high, low))? {
    Instruction::Load { r, address } => {
      format!("LOAD register {r:x} with the value in memory cell {address:02x}")
    }
    Instruction::LoadImmediate { r, value } => {
      format!("LOAD register {r:x} with the value {value:02x}")
    }
    Instruction::Store { r, address } => {
      format!("STORE the value in register {r:x} in memory cell {address:02x}")
    }
    Instruction::Move { from, to } => {
      format!("MOVE the value in register {from:x} to register {to:x}")
    }
    Instruction::AddComplement { r, s, t } | Instruction::AddFloat { r, s, t } => format!(
      "ADD the values in registers {s:x} and {t:x} in twos complement notation \
       and place the result in register {r:x}"
    ),
    Instruction::Or { r, s, t } => bitwise("OR", r, s, t),
    Instruction::And { r, s, t } => bitwise("AND", r, s, t),
    Instruction::Xor { r, s, t } => bitwise("XOR", r, s, t),
    Instruction::Rotate { r, x } => format!(
      "ROTATE the bit pattern in register {r:x} right by the value in register {x:x}"
    ),
    Instruction::Jump { r, address } => format!(
      "JUMP to the instruction at memory cell {address:02x} if the bit pattern \
       in register {r:x} is equal to the bit pattern in register 0"
    ),
    Instruction::Halt => "HALT execution".to_owned(),
  };
  Some(text)
}

fn bitwise(name: &str, r: u8, s: u8, t: u8) -> String {
  format!("{name} the values in registers {s:x} and {t:x} and place the result in register {r:x}")
}
