/// The leading hex digit of an instruction word
///
/// Operand digits are not laid out the same way for every opcode, the tables
/// below give the exact position of each one.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
  /// Loads a register from a memory cell.
  ///
  /// | Operation | Semantics/RTL | Word   |
  /// |-----------|---------------|--------|
  /// | Load      | `r[R] ← m[XY]` | `1RXY` |
  Load = 0x1,

  /// Loads a register with the literal byte in the instruction.
  ///
  /// | Operation      | Semantics/RTL | Word   |
  /// |----------------|---------------|--------|
  /// | Load Immediate | `r[R] ← XY`   | `2RXY` |
  LoadImmediate = 0x2,

  /// Stores a register into a memory cell.
  ///
  /// | Operation | Semantics/RTL  | Word   |
  /// |-----------|----------------|--------|
  /// | Store     | `m[XY] ← r[R]` | `3RXY` |
  Store = 0x3,

  /// Copies one register into another. The second digit is ignored.
  ///
  /// | Operation | Semantics/RTL | Word   |
  /// |-----------|---------------|--------|
  /// | Move      | `r[S] ← r[R]` | `4*RS` |
  Move = 0x4,

  /// Adds two registers, treating bytes above `0x7f` as negative.
  ///
  /// | Operation      | Semantics/RTL        | Word   |
  /// |----------------|----------------------|--------|
  /// | Add Complement | `r[R] ← r[S] + r[T]` | `5RST` |
  ///
  /// The sign handling is not plain 8-bit wraparound, see
  /// [`crate::vm::add_complement`].
  AddComplement = 0x5,

  /// Reserved for a floating point add, currently the same as
  /// [`Opcode::AddComplement`].
  ///
  /// | Operation | Semantics/RTL        | Word   |
  /// |-----------|----------------------|--------|
  /// | Add Float | `r[R] ← r[S] + r[T]` | `6RST` |
  AddFloat = 0x6,

  /// | Operation  | Semantics/RTL         | Word   |
  /// |------------|-----------------------|--------|
  /// | Logical OR | `r[R] ← r[S] \| r[T]` | `7RST` |
  Or = 0x7,

  /// | Operation   | Semantics/RTL        | Word   |
  /// |-------------|----------------------|--------|
  /// | Logical AND | `r[R] ← r[S] & r[T]` | `8RST` |
  And = 0x8,

  /// | Operation   | Semantics/RTL        | Word   |
  /// |-------------|----------------------|--------|
  /// | Logical XOR | `r[R] ← r[S] ^ r[T]` | `9RST` |
  Xor = 0x9,

  /// Rotates a register right, bits falling off the low end come back in at
  /// the high end. The shift count is taken from register `X`, modulo 8.
  ///
  /// | Operation    | Semantics/RTL               | Word   |
  /// |--------------|-----------------------------|--------|
  /// | Rotate Right | `r[R] ← r[R] ⟳ (r[X] mod 8)` | `AR*X` |
  Rotate = 0xA,

  /// Jumps to an absolute address when a register matches register 0.
  ///
  /// | Operation | Semantics/RTL                 | Word   |
  /// |-----------|-------------------------------|--------|
  /// | Jump      | `if r[R] == r[0] : pc ← XY`   | `BRXY` |
  Jump = 0xB,

  /// Stops the machine. The remaining digits are ignored.
  ///
  /// | Operation | Semantics/RTL      | Word   |
  /// |-----------|--------------------|--------|
  /// | Halt      | `(stop execution)` | `C***` |
  Halt = 0xC,
}

impl Opcode {
  /// Decode the low nibble of `maybe_nibble`, `None` for `0`, `d`, `e`, `f`
  pub fn from_nibble(maybe_nibble: u8) -> Option<Self> {
    let op = match maybe_nibble & 0x0F {
      0x1 => Self::Load,
      0x2 => Self::LoadImmediate,
      0x3 => Self::Store,
      0x4 => Self::Move,
      0x5 => Self::AddComplement,
      0x6 => Self::AddFloat,
      0x7 => Self::Or,
      0x8 => Self::And,
      0x9 => Self::Xor,
      0xA => Self::Rotate,
      0xB => Self::Jump,
      0xC => Self::Halt,
      _ => return None,
    };
    Some(op)
  }
}
