//! The interactive front end: prompts for the machine's shape, then loops
//! showing the state and letting the operator edit cells, step, or run.

use std::io::{BufRead, Write};

use tracing::{debug, info};

use crate::config::{parse_address, Cli};
use crate::display::Listing;
use crate::error::{BankKind, Result};
use crate::region::Region;
use crate::vm::{Cycle, Machine, RunSummary, Stop};

const MENU: &str = "Type r to edit a register, m to edit a memory cell, \n\
                    e to execute, i to edit the instruction counter, \n\
                    enter to step, or anything else to quit. ";

const UNKNOWN: &str = "instruction could not be completed.";

const COUNTER_PROMPT: &str = "What hex value would you like to set the instruction counter at? ";

/// Shape used by [`batch`] for anything not given on the command line
const BATCH_MEMORY: usize = 256;
const BATCH_REGISTERS: usize = 16;

/// Line-oriented question and answer over any reader and writer
#[derive(Debug)]
pub struct Prompter<R, W> {
  input: R,
  output: W,
}

impl<R, W> Prompter<R, W>
where
  R: BufRead,
  W: Write,
{
  pub fn new(input: R, output: W) -> Self {
    Self { input, output }
  }

  pub fn output(&mut self) -> &mut W {
    &mut self.output
  }

  /// Print `prompt` and read one line without its line ending, `None` at end
  /// of input
  pub fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
    write!(self.output, "{prompt}")?;
    self.output.flush()?;
    let mut line = String::new();
    if self.input.read_line(&mut line)? == 0 {
      return Ok(None);
    }
    let trimmed = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(trimmed);
    Ok(Some(line))
  }

  /// Keep asking until `accept` takes the answer
  fn ask_until<T>(&mut self, prompt: &str, accept: impl Fn(&str) -> Option<T>) -> Result<Option<T>> {
    loop {
      let Some(answer) = self.ask(prompt)? else {
        return Ok(None);
      };
      if let Some(value) = accept(&answer) {
        return Ok(Some(value));
      }
    }
  }
}

/// Build the machine described by `cli`, asking for anything it leaves out
///
/// Returns `None` if input runs out before the machine is fully described.
pub fn configure<R, W>(cli: &Cli, prompt: &mut Prompter<R, W>) -> Result<Option<Machine>>
where
  R: BufRead,
  W: Write,
{
  let memory = match cli.memory {
    Some(memory) => usize::from(memory),
    None => {
      let asked = prompt.ask_until("How many memory cells would you like to have? ", |s| {
        s.trim().parse::<usize>().ok().filter(|n| (1..=BankKind::Memory.max_len()).contains(n))
      })?;
      let Some(memory) = asked else { return Ok(None) };
      memory
    }
  };

  let registers = match cli.registers {
    Some(registers) => usize::from(registers),
    None => {
      let asked = prompt.ask_until("How many registers would you like to have? ", |s| {
        s.trim().parse::<usize>().ok().filter(|n| (1..=BankKind::Registers.max_len()).contains(n))
      })?;
      let Some(registers) = asked else { return Ok(None) };
      registers
    }
  };

  let counter = match cli.counter {
    Some(counter) => counter,
    None => {
      let asked = prompt.ask_until(COUNTER_PROMPT, |s| {
        parse_address(s).ok().filter(|&address| address < memory)
      })?;
      let Some(counter) = asked else { return Ok(None) };
      counter
    }
  };

  let mut vm = Machine::new(memory, registers, counter)?;
  if let Some(program) = &cli.program {
    vm.load(0, &program.0)?;
  }
  info!(memory, registers, counter, "machine ready");
  Ok(Some(vm))
}

/// Non-interactive mode: build, run once, dump the final state
pub fn batch<W: Write>(cli: &Cli, output: &mut W) -> Result<RunSummary> {
  let memory = cli.memory.map_or(BATCH_MEMORY, usize::from);
  let registers = cli.registers.map_or(BATCH_REGISTERS, usize::from);
  let mut vm = Machine::new(memory, registers, cli.counter.unwrap_or(0))?;
  if let Some(program) = &cli.program {
    vm.load(0, &program.0)?;
  }
  writeln!(output, "-----EXECUTION-----")?;
  let summary = vm.run_with_budget(cli.budget)?;
  report(output, &summary)?;
  if vm.is_halted() {
    writeln!(output, "---PROGRAM HALTED--")?;
  }
  writeln!(output, "---END EXECUTION---")?;
  write!(output, "{}", Listing::new(&vm))?;
  Ok(summary)
}

fn report<W: Write>(output: &mut W, summary: &RunSummary) -> Result<()> {
  for _ in &summary.unknown {
    writeln!(output, "{UNKNOWN}")?;
  }
  if summary.stop == Stop::BudgetExhausted {
    writeln!(output, "stopped after {} cycles without halting", summary.cycles)?;
  }
  Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
  Continue,
  Quit,
}

/// The edit/step/run loop around one machine
#[derive(Debug)]
pub struct Session<R, W> {
  prompt: Prompter<R, W>,
  vm: Machine,
  budget: usize,
}

impl<R, W> Session<R, W>
where
  R: BufRead,
  W: Write,
{
  pub fn new(vm: Machine, prompt: Prompter<R, W>, budget: usize) -> Self {
    Self { prompt, vm, budget }
  }

  pub fn machine(&self) -> &Machine {
    &self.vm
  }

  /// Loop until the operator quits or input runs out
  pub fn run(&mut self) -> Result<()> {
    loop {
      write!(self.prompt.output(), "{}", Listing::new(&self.vm))?;
      let Some(choice) = self.prompt.ask(MENU)? else {
        break;
      };
      let flow = match choice.trim() {
        "r" => self.edit(BankKind::Registers)?,
        "m" => self.edit(BankKind::Memory)?,
        "i" => self.edit_counter()?,
        "e" => self.execute()?,
        "" => self.step()?,
        _ => Flow::Quit,
      };
      if flow == Flow::Quit {
        break;
      }
    }
    debug!("session over");
    Ok(())
  }

  fn edit(&mut self, kind: BankKind) -> Result<Flow> {
    let (which, len) = match kind {
      BankKind::Memory => ("Which memory cell would you like to edit? ", self.vm.memory().len()),
      BankKind::Registers => ("Which register would you like to edit? ", self.vm.registers().len()),
    };
    let asked = self
      .prompt
      .ask_until(which, |s| parse_address(s).ok().filter(|&address| address < len))?;
    let Some(address) = asked else {
      return Ok(Flow::Quit);
    };

    let question = format!("What value would you like to put into {kind} {address:x}? ");
    let Some(run) = self.prompt.ask(&question)? else {
      return Ok(Flow::Quit);
    };
    let written = match kind {
      BankKind::Memory => self.vm.write_memory(address, &run),
      BankKind::Registers => self.vm.write_register(address, &run),
    };
    if let Err(e) = written {
      writeln!(self.prompt.output(), "{e}")?;
    }
    Ok(Flow::Continue)
  }

  fn edit_counter(&mut self) -> Result<Flow> {
    let Some(answer) = self.prompt.ask(COUNTER_PROMPT)? else {
      return Ok(Flow::Quit);
    };
    let set = parse_address(&answer).and_then(|address| self.vm.set_instruction_counter(address));
    if let Err(e) = set {
      writeln!(self.prompt.output(), "{e}")?;
    }
    Ok(Flow::Continue)
  }

  fn execute(&mut self) -> Result<Flow> {
    let out = self.prompt.output();
    writeln!(out, "-----EXECUTION-----")?;
    match self.vm.run_with_budget(self.budget) {
      Ok(summary) => report(out, &summary)?,
      Err(e) => writeln!(out, "{e}")?,
    }
    self.acknowledge_halt()?;
    writeln!(self.prompt.output(), "---END EXECUTION---")?;
    Ok(Flow::Continue)
  }

  fn step(&mut self) -> Result<Flow> {
    match self.vm.step() {
      Ok(Cycle::UnknownOpcode { .. }) => writeln!(self.prompt.output(), "{UNKNOWN}")?,
      Ok(_) => {}
      Err(e) => writeln!(self.prompt.output(), "{e}")?,
    }
    self.acknowledge_halt()?;
    Ok(Flow::Continue)
  }

  // the halted flag is ours to reset once it has been reported
  fn acknowledge_halt(&mut self) -> Result<()> {
    if self.vm.is_halted() {
      writeln!(self.prompt.output(), "---PROGRAM HALTED--")?;
      self.vm.clear_halt();
    }
    Ok(())
  }
}
