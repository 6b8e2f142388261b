use std::fmt;

use crate::describe::describe;
use crate::region::Region;
use crate::vm::Machine;

/// Human-readable dump of a machine: memory with descriptions, registers,
/// and the instruction counter
///
/// Every even memory address that has a successor is described as the first
/// half of an instruction, whether or not it actually is one.
#[derive(Debug, Clone, Copy)]
pub struct Listing<'vm> {
  vm: &'vm Machine,
}

impl<'vm> Listing<'vm> {
  pub fn new(vm: &'vm Machine) -> Self {
    Self { vm }
  }
}

impl fmt::Display for Listing<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let cells = self.vm.memory().cells();
    writeln!(f, "Memory Cells")?;
    for (i, cell) in cells.iter().enumerate() {
      write!(f, "{:x}  {}", cell.id(), cell.render())?;
      if i % 2 == 0 {
        let description = cells.get(i + 1).and_then(|low| describe(cell.value(), low.value()));
        if let Some(description) = description {
          write!(f, "  {description}")?;
        }
      }
      writeln!(f)?;
    }

    writeln!(f, "Registers")?;
    for cell in self.vm.registers().cells() {
      writeln!(f, "{:x}  {}", cell.id(), cell.render())?;
    }

    writeln!(f, "Instruction counter: {:x}", self.vm.instruction_counter())
  }
}
