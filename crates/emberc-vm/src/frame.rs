//! A single call's execution context (spec §4.4): which function is
//! running, where its instruction pointer is, and where its locals start
//! on the shared operand stack.

use std::rc::Rc;

use emberc_object::CompiledFunction;

pub struct Frame {
    pub func: Rc<CompiledFunction>,
    pub ip: isize,
    /// Index into the VM's operand stack where this call's locals begin.
    pub base_pointer: usize,
}

impl Frame {
    pub fn new(func: Rc<CompiledFunction>, base_pointer: usize) -> Self {
        Self { func, ip: -1, base_pointer }
    }
}
