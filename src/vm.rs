use tracing::{debug, trace, warn};

use crate::error::{BankKind, Result};
use crate::instruction::{Instruction, Word};
use crate::region::{Bank, Region};

/// Cycles a plain [`Machine::run`] is allowed before handing control back
pub const DEFAULT_BUDGET: usize = 1 << 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
  Active,
  Halted,
}

/// What a single call to [`Machine::step`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cycle {
  /// The instruction ran to completion
  Executed(Instruction),
  /// The leading digit was not an opcode, only the counter moved
  UnknownOpcode { address: usize, word: Word },
  /// There are not two cells left to fetch from, nothing happened
  EndOfProgram,
  /// The machine was already halted, nothing happened
  Halted,
}

/// Why a run request handed control back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stop {
  Halted,
  EndOfProgram,
  BudgetExhausted,
}

/// Outcome of [`Machine::run`] and [`Machine::run_with_budget`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
  pub cycles: usize,
  pub stop: Stop,
  /// Every unknown opcode hit along the way, as `(address, word)`
  pub unknown: Vec<(usize, Word)>,
}

/// The whole machine: memory, registers, instruction counter and the halted
/// flag.
///
/// Memory and registers are separate address spaces built from the same
/// [`Bank`]. Every fetch, read and write is checked against the bank it
/// touches, so a stray operand becomes an [`crate::Error::Address`] instead
/// of a panic.
#[derive(Debug, Clone)]
pub struct Machine {
  // address of the next instruction to fetch
  ic: usize,
  memory: Bank,
  registers: Bank,
  state: State,
}

impl Machine {
  /// Create a machine with every cell unset
  pub fn new(memory_size: usize, register_count: usize, counter: usize) -> Result<Self> {
    let memory = Bank::new(BankKind::Memory, memory_size)?;
    let registers = Bank::new(BankKind::Registers, register_count)?;
    let ic = memory.check(counter)?;
    Ok(Self {
      ic,
      memory,
      registers,
      state: State::Active,
    })
  }

  pub fn memory(&self) -> &Bank {
    &self.memory
  }

  pub fn registers(&self) -> &Bank {
    &self.registers
  }

  pub fn instruction_counter(&self) -> usize {
    self.ic
  }

  pub fn set_instruction_counter(&mut self, address: usize) -> Result<()> {
    self.ic = self.memory.check(address)?;
    Ok(())
  }

  /// Write a run of hex bytes into memory starting at `address`, returning
  /// how many cells were written
  pub fn write_memory(&mut self, address: usize, run: &str) -> Result<usize> {
    self.memory.write_run(address, run)
  }

  /// Write a run of hex bytes into the registers starting at `address`
  pub fn write_register(&mut self, address: usize, run: &str) -> Result<usize> {
    self.registers.write_run(address, run)
  }

  /// Copy raw bytes into memory starting at `address`
  pub fn load(&mut self, address: usize, program: &[u8]) -> Result<()> {
    self.memory.write_bytes(address, program)
  }

  pub fn is_halted(&self) -> bool {
    self.state == State::Halted
  }

  /// Let a halted machine run again
  pub fn clear_halt(&mut self) {
    self.state = State::Active;
  }

  /// The word at the instruction counter, if two cells remain to read
  pub fn fetch(&self) -> Option<Word> {
    let high = self.memory.cells().get(self.ic)?;
    let low = self.memory.cells().get(self.ic.checked_add(1)?)?;
    Some(Word::new(high.value(), low.value()))
  }

  /// Run exactly one fetch/decode/execute cycle
  ///
  /// The counter moves past the instruction before it executes, so a taken
  /// jump is the last word on where it points. An address error leaves every
  /// cell untouched but the counter has still moved.
  pub fn step(&mut self) -> Result<Cycle> {
    if self.is_halted() {
      return Ok(Cycle::Halted);
    }
    let Some(word) = self.fetch() else {
      trace!(ic = self.ic, "end of program");
      return Ok(Cycle::EndOfProgram);
    };
    let address = self.ic;
    self.ic += 2;

    let Some(instruction) = Instruction::decode(word) else {
      warn!(address, %word, "instruction could not be completed: unknown opcode");
      return Ok(Cycle::UnknownOpcode { address, word });
    };
    trace!(address, %word, ?instruction, "execute");
    self.execute(instruction)?;
    Ok(Cycle::Executed(instruction))
  }

  /// Run until halted or out of program, giving up after [`DEFAULT_BUDGET`]
  /// cycles
  pub fn run(&mut self) -> Result<RunSummary> {
    self.run_with_budget(DEFAULT_BUDGET)
  }

  /// Run until halted, out of program, or `budget` cycles have executed
  ///
  /// The first cycle only needs a fetchable word. After that the run goes on
  /// only while at least three cells remain from the counter onwards, so a
  /// word in the last two cells is left for an explicit [`Machine::step`].
  pub fn run_with_budget(&mut self, budget: usize) -> Result<RunSummary> {
    let mut cycles = 0;
    let mut unknown = Vec::new();
    let stop = loop {
      if self.is_halted() {
        break Stop::Halted;
      }
      if cycles >= budget {
        break Stop::BudgetExhausted;
      }
      if cycles > 0 && !self.can_continue() {
        break Stop::EndOfProgram;
      }
      match self.step()? {
        Cycle::Executed(_) => cycles += 1,
        Cycle::UnknownOpcode { address, word } => {
          cycles += 1;
          unknown.push((address, word));
        }
        Cycle::EndOfProgram => break Stop::EndOfProgram,
        Cycle::Halted => break Stop::Halted,
      }
    };
    debug!(cycles, ?stop, "run finished");
    Ok(RunSummary {
      cycles,
      stop,
      unknown,
    })
  }

  fn execute(&mut self, instruction: Instruction) -> Result<()> {
    match instruction {
      Instruction::Load { r, address } => load(self, r, address),
      Instruction::LoadImmediate { r, value } => load_immediate(self, r, value),
      Instruction::Store { r, address } => store(self, r, address),
      Instruction::Move { from, to } => mov(self, from, to),
      Instruction::AddComplement { r, s, t } => add(self, r, s, t),
      // no floating point format yet, so this is the same add
      Instruction::AddFloat { r, s, t } => add(self, r, s, t),
      Instruction::Or { r, s, t } => binary(self, r, s, t, |a, b| a | b),
      Instruction::And { r, s, t } => binary(self, r, s, t, |a, b| a & b),
      Instruction::Xor { r, s, t } => binary(self, r, s, t, |a, b| a ^ b),
      Instruction::Rotate { r, x } => rotate(self, r, x),
      Instruction::Jump { r, address } => jump(self, r, address),
      Instruction::Halt => halt(self),
    }
  }

  fn can_continue(&self) -> bool {
    self.ic.saturating_add(3) <= self.memory.len()
  }

  fn reg(&self, index: u8) -> Result<u8> {
    self.registers.read(usize::from(index))
  }

  fn set_reg(&mut self, index: u8, value: u8) -> Result<()> {
    self.registers.write(usize::from(index), value)
  }
}

/// Two's complement add with the sign handling this machine has always had
///
/// A byte above `0x7f` is negated as a whole (so `0xff` counts as -255, not
/// -1), and a sum above `0x7f` is negated once more. The result is stored as
/// the low byte of that number. This only agrees with ordinary 8-bit
/// wraparound for some inputs.
pub fn add_complement(s: u8, t: u8) -> u8 {
  let signed = |v: u8| {
    if v > 0x7F {
      -i16::from(v)
    } else {
      i16::from(v)
    }
  };
  let mut sum = signed(s) + signed(t);
  if sum > 0x7F {
    sum = -sum;
  }
  sum as u8
}

/// Rotate right within eight bits
pub fn rotate_right(value: u8, count: u8) -> u8 {
  value.rotate_right(u32::from(count % 8))
}

// r[R] ← m[XY]
fn load(vm: &mut Machine, r: u8, address: u8) -> Result<()> {
  let value = vm.memory.read(usize::from(address))?;
  vm.set_reg(r, value)
}

// r[R] ← XY
fn load_immediate(vm: &mut Machine, r: u8, value: u8) -> Result<()> {
  vm.set_reg(r, value)
}

// m[XY] ← r[R]
fn store(vm: &mut Machine, r: u8, address: u8) -> Result<()> {
  let value = vm.reg(r)?;
  vm.memory.write(usize::from(address), value)
}

// r[S] ← r[R]
fn mov(vm: &mut Machine, from: u8, to: u8) -> Result<()> {
  let value = vm.reg(from)?;
  vm.set_reg(to, value)
}

// r[R] ← r[S] + r[T]
fn add(vm: &mut Machine, r: u8, s: u8, t: u8) -> Result<()> {
  let value = add_complement(vm.reg(s)?, vm.reg(t)?);
  vm.set_reg(r, value)
}

// r[R] ← r[S] op r[T]
fn binary(vm: &mut Machine, r: u8, s: u8, t: u8, op: impl Fn(u8, u8) -> u8) -> Result<()> {
  let value = op(vm.reg(s)?, vm.reg(t)?);
  vm.set_reg(r, value)
}

// r[R] ← r[R] ⟳ (r[X] mod 8)
fn rotate(vm: &mut Machine, r: u8, x: u8) -> Result<()> {
  let count = vm.reg(x)?;
  let value = rotate_right(vm.reg(r)?, count);
  vm.set_reg(r, value)
}

// if r[R] == r[0] : pc ← XY
fn jump(vm: &mut Machine, r: u8, address: u8) -> Result<()> {
  if vm.reg(r)? == vm.reg(0)? {
    vm.ic = vm.memory.check(usize::from(address))?;
    debug!(to = vm.ic, "jump taken");
  }
  Ok(())
}

// (stop execution)
fn halt(vm: &mut Machine) -> Result<()> {
  vm.state = State::Halted;
  debug!(ic = vm.ic, "halted");
  Ok(())
}
