//! emberc-vm — a stack-based bytecode interpreter (spec §4.6).

mod error;
mod frame;
mod vm;

pub use error::VmError;
pub use vm::{Vm, GLOBAL_SIZE, MAX_FRAMES, STACK_SIZE};
