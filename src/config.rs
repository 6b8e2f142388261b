use clap::Parser;

use crate::error::{parse_bytes, Error, Result};
use crate::vm::DEFAULT_BUDGET;

/// Command-line configuration
///
/// Anything about the machine's shape that is left out here gets asked for
/// interactively.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "brookshear", about = "Simulator for a minimal 8-bit teaching machine")]
pub struct Cli {
  /// Number of memory cells (1-256).
  #[arg(long, value_parser = clap::value_parser!(u16).range(1..=256))]
  pub memory: Option<u16>,

  /// Number of registers (1-16).
  #[arg(long, value_parser = clap::value_parser!(u8).range(1..=16))]
  pub registers: Option<u8>,

  /// Starting instruction counter, in hex.
  #[arg(long, value_name = "HEX", value_parser = parse_counter)]
  pub counter: Option<usize>,

  /// Run of hex bytes to load into memory at address 0 (e.g. 2105c000).
  #[arg(long, value_name = "HEX", value_parser = parse_program)]
  pub program: Option<Program>,

  /// Maximum cycles per run request.
  #[arg(long, default_value_t = DEFAULT_BUDGET)]
  pub budget: usize,

  /// Load, run once, print the final state and exit without prompting.
  #[arg(long, default_value_t = false)]
  pub run: bool,
}

/// A run of bytes given on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program(pub Vec<u8>);

/// Parse an address typed in hex, with or without a `0x` prefix
pub fn parse_address(input: &str) -> Result<usize> {
  let trimmed = input.trim();
  let digits = trimmed
    .strip_prefix("0x")
    .or_else(|| trimmed.strip_prefix("0X"))
    .unwrap_or(trimmed);
  if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
    return Err(Error::Format {
      input: input.to_owned(),
    });
  }
  usize::from_str_radix(digits, 16).map_err(|_| Error::Format {
    input: input.to_owned(),
  })
}

fn parse_counter(input: &str) -> Result<usize, String> {
  parse_address(input).map_err(|e| e.to_string())
}

// wrapped so clap does not read `Vec<u8>` as a repeated argument
fn parse_program(input: &str) -> Result<Program, String> {
  parse_bytes(input).map(Program).map_err(|e| e.to_string())
}
