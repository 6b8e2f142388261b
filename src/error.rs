use std::fmt;

/// Which of the two banks an address refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BankKind {
  Memory,
  Registers,
}

impl BankKind {
  /// Largest bank this kind may be constructed with
  pub const fn max_len(self) -> usize {
    match self {
      Self::Memory => 256,
      Self::Registers => 16,
    }
  }
}

impl fmt::Display for BankKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Memory => f.write_str("memory cell"),
      Self::Registers => f.write_str("register"),
    }
  }
}

/// Anything that can go wrong while editing or executing the machine
///
/// Unknown opcodes and running off the end of memory are deliberately not in
/// here, they are ordinary cycle outcomes (see [`crate::vm::Cycle`]).
#[derive(thiserror::Error, Debug)]
pub enum Error {
  #[error("`{input}` is not a valid hex byte")]
  Format { input: String },

  #[error("{kind} {index:#x} is out of range (bank holds {len})")]
  Address {
    kind: BankKind,
    index: usize,
    len: usize,
  },

  #[error("cannot build a {kind} bank of {requested} cells (allowed 1..={max})")]
  BankSize {
    kind: BankKind,
    requested: usize,
    max: usize,
  },

  #[error(transparent)]
  Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Parse a 1-2 digit hex byte, case insensitive, without any `0x` prefix
pub fn parse_byte(input: &str) -> Result<u8> {
  let digits = input.trim();
  let well_formed = (1..=2).contains(&digits.len())
    && digits.bytes().all(|b| b.is_ascii_hexdigit());
  if !well_formed {
    return Err(Error::Format {
      input: input.to_owned(),
    });
  }
  u8::from_str_radix(digits, 16).map_err(|_| Error::Format {
    input: input.to_owned(),
  })
}

/// Split a run of hex digits into bytes, two digits at a time
///
/// A trailing odd digit becomes its own single-digit byte.
pub fn parse_bytes(input: &str) -> Result<Vec<u8>> {
  let digits = input.trim();
  if digits.is_empty() || !digits.is_ascii() {
    return Err(Error::Format {
      input: input.to_owned(),
    });
  }
  digits
    .as_bytes()
    .chunks(2)
    .map(|pair| {
      // ascii was checked above, so chunk boundaries are char boundaries
      let text = std::str::from_utf8(pair).map_err(|_| Error::Format {
        input: input.to_owned(),
      })?;
      parse_byte(text)
    })
    .collect()
}
