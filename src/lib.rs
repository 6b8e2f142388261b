//! Simulator for a minimal 8-bit teaching machine
//!
//! Up to 256 memory cells, up to 16 registers, a single instruction counter,
//! and twelve opcodes encoded as four hex digits spread over two cells.
//!
//! the whole thing fits on an index card, which is sort of the point...

pub mod config;
pub mod describe;
pub mod display;
pub mod error;
pub mod instruction;
pub mod opcode;
pub mod region;
pub mod session;
pub mod vm;

pub use error::{Error, Result};
