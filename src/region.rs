use crate::error::{parse_byte, parse_bytes, BankKind, Error, Result};

/// Placeholder shown for a cell nobody has written yet
///
/// Unset cells read as zero, and the instruction word is built from the
/// rendered form, so they render as zero too.
pub const UNSET: &str = "00";

/// A single byte-sized slot, either a memory cell or a register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
  id: usize,
  value: Option<u8>,
}

impl Cell {
  fn new(id: usize) -> Self {
    Self { id, value: None }
  }

  pub fn id(&self) -> usize {
    self.id
  }

  /// The stored byte, unset reads as zero
  pub fn value(&self) -> u8 {
    self.value.unwrap_or(0)
  }

  pub fn is_set(&self) -> bool {
    self.value.is_some()
  }

  /// Two lowercase hex digits, `00` when unset
  pub fn render(&self) -> String {
    match self.value {
      Some(value) => format!("{value:02x}"),
      None => UNSET.to_owned(),
    }
  }
}

/// A read-only view over a run of cells
pub trait Region {
  fn cells(&self) -> &[Cell];

  fn len(&self) -> usize {
    self.cells().len()
  }

  fn is_empty(&self) -> bool {
    self.cells().is_empty()
  }
}

/// A fixed-length bank of cells, used for both main memory and the register
/// file
///
/// The length never changes after construction, and every access is checked
/// against it.
#[derive(Debug, Clone)]
pub struct Bank {
  kind: BankKind,
  cells: Vec<Cell>,
}

impl Bank {
  /// Create `count` unset cells with ids `0..count`
  pub fn new(kind: BankKind, count: usize) -> Result<Self> {
    let max = kind.max_len();
    if !(1..=max).contains(&count) {
      return Err(Error::BankSize {
        kind,
        requested: count,
        max,
      });
    }
    Ok(Self {
      kind,
      cells: (0..count).map(Cell::new).collect(),
    })
  }

  /// Check that `address` is inside the bank
  pub fn check(&self, address: usize) -> Result<usize> {
    if address < self.cells.len() {
      Ok(address)
    } else {
      Err(Error::Address {
        kind: self.kind,
        index: address,
        len: self.cells.len(),
      })
    }
  }

  pub fn cell(&self, address: usize) -> Result<&Cell> {
    let address = self.check(address)?;
    Ok(&self.cells[address])
  }

  pub fn read(&self, address: usize) -> Result<u8> {
    self.cell(address).map(Cell::value)
  }

  pub fn render(&self, address: usize) -> Result<String> {
    self.cell(address).map(Cell::render)
  }

  pub fn write(&mut self, address: usize, value: u8) -> Result<()> {
    let address = self.check(address)?;
    self.cells[address].value = Some(value);
    Ok(())
  }

  /// Write a single byte given as 1-2 hex digits
  pub fn write_hex(&mut self, address: usize, value: &str) -> Result<()> {
    let address = self.check(address)?;
    let value = parse_byte(value)?;
    self.cells[address].value = Some(value);
    Ok(())
  }

  /// Write a run of hex bytes into consecutive cells starting at `address`
  ///
  /// Nothing is written unless every byte parses and fits in the bank.
  pub fn write_run(&mut self, address: usize, run: &str) -> Result<usize> {
    let bytes = parse_bytes(run)?;
    self.write_bytes(address, &bytes)?;
    Ok(bytes.len())
  }

  /// Write raw bytes into consecutive cells starting at `address`, all or
  /// nothing
  pub fn write_bytes(&mut self, address: usize, bytes: &[u8]) -> Result<()> {
    let Some(last) = bytes.len().checked_sub(1) else {
      return Ok(());
    };
    self.check(address)?;
    self.check(address + last)?;
    for (cell, &byte) in self.cells[address..=address + last].iter_mut().zip(bytes) {
      cell.value = Some(byte);
    }
    Ok(())
  }
}

impl Region for Bank {
  fn cells(&self) -> &[Cell] {
    &self.cells
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn new_bank_is_unset() {
    let bank = Bank::new(BankKind::Memory, 4).unwrap();
    assert_eq!(bank.len(), 4);
    for (i, cell) in bank.cells().iter().enumerate() {
      assert_eq!(cell.id(), i);
      assert!(!cell.is_set());
      assert_eq!(cell.value(), 0);
      assert_eq!(cell.render(), UNSET);
    }
  }

  #[test]
  fn bank_size_bounds() {
    assert!(Bank::new(BankKind::Memory, 256).is_ok());
    assert!(Bank::new(BankKind::Registers, 16).is_ok());
    assert!(matches!(
      Bank::new(BankKind::Memory, 0),
      Err(Error::BankSize { requested: 0, .. })
    ));
    assert!(matches!(
      Bank::new(BankKind::Memory, 257),
      Err(Error::BankSize { max: 256, .. })
    ));
    assert!(matches!(
      Bank::new(BankKind::Registers, 17),
      Err(Error::BankSize { max: 16, .. })
    ));
  }

  #[test]
  fn read_write_render() {
    let mut bank = Bank::new(BankKind::Registers, 2).unwrap();
    bank.write(1, 0x0A).unwrap();
    assert_eq!(bank.read(1).unwrap(), 0x0A);
    assert_eq!(bank.render(1).unwrap(), "0a");
    bank.write_hex(0, "FF").unwrap();
    assert_eq!(bank.render(0).unwrap(), "ff");
    bank.write(0, 0).unwrap();
    assert!(bank.cell(0).unwrap().is_set());
    assert_eq!(bank.render(0).unwrap(), "00");
  }

  #[test]
  fn out_of_range_is_an_address_error() {
    let mut bank = Bank::new(BankKind::Memory, 2).unwrap();
    assert!(matches!(
      bank.read(2),
      Err(Error::Address {
        kind: BankKind::Memory,
        index: 2,
        len: 2
      })
    ));
    assert!(matches!(bank.write(5, 1), Err(Error::Address { .. })));
    assert!(matches!(bank.write_hex(5, "zz"), Err(Error::Address { .. })));
  }

  #[test]
  fn write_hex_rejects_bad_value() {
    let mut bank = Bank::new(BankKind::Memory, 2).unwrap();
    assert!(matches!(bank.write_hex(0, "123"), Err(Error::Format { .. })));
    assert!(!bank.cell(0).unwrap().is_set());
  }

  #[test]
  fn write_run_fills_consecutive_cells() {
    let mut bank = Bank::new(BankKind::Memory, 8).unwrap();
    assert_eq!(bank.write_run(2, "2105c0").unwrap(), 3);
    assert_eq!(bank.read(2).unwrap(), 0x21);
    assert_eq!(bank.read(3).unwrap(), 0x05);
    assert_eq!(bank.read(4).unwrap(), 0xC0);
    assert!(!bank.cell(5).unwrap().is_set());
  }

  #[test]
  fn write_run_is_all_or_nothing() {
    let mut bank = Bank::new(BankKind::Memory, 4).unwrap();
    assert!(matches!(bank.write_run(2, "112233"), Err(Error::Address { index: 4, .. })));
    assert!(matches!(bank.write_run(0, "11zz"), Err(Error::Format { .. })));
    assert!(bank.cells().iter().all(|cell| !cell.is_set()));
  }
}
