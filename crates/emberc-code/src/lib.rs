//! emberc-code — the opcode catalogue and instruction encoding shared by
//! `emberc-compile` (which emits it) and `emberc-vm` (which executes it),
//! spec §4.3.
//!
//! This is the narrowest possible contract between compiler and VM: an
//! [`Opcode`] byte, a fixed number of big-endian operands per the
//! [`opcode::Definition`] table, and nothing else. Neither side reaches
//! past this crate to agree on encoding.

mod instructions;
mod opcode;

pub use instructions::{make, read_operands, read_u16, read_u8, Instructions};
pub use opcode::{Definition, Opcode};
