//! Stack-based bytecode interpreter (spec §4.6): a flat operand stack, a
//! call-frame stack for function invocations, and a flat globals array.

use std::rc::Rc;

use emberc_code::{read_u16, read_u8, Instructions, Opcode};
use emberc_object::{CompiledFunction, HashPair, Value};
use rustc_hash::FxHashMap;

use crate::error::{VmError, VmResult};
use crate::frame::Frame;

pub const STACK_SIZE: usize = 2048;
pub const GLOBAL_SIZE: usize = 65536;
pub const MAX_FRAMES: usize = 1024;

pub struct Vm {
    constants: Vec<Value>,
    stack: Vec<Value>,
    stack_size: usize,
    sp: usize,
    globals: Vec<Value>,
    frames: Vec<Frame>,
    max_frames: usize,
}

impl Vm {
    pub fn new(instructions: Instructions, constants: Vec<Value>) -> Self {
        Self::new_with_global_store(instructions, constants, vec![Value::Null; GLOBAL_SIZE])
    }

    /// Resumes execution with globals carried over from a previous run —
    /// the REPL's "each line sees every earlier line's bindings"
    /// requirement (spec §5/§6).
    pub fn new_with_global_store(instructions: Instructions, constants: Vec<Value>, globals: Vec<Value>) -> Self {
        Self::with_limits(instructions, constants, globals, STACK_SIZE, MAX_FRAMES)
    }

    /// Builds a VM with caller-chosen `stack_size`/`max_frames` instead of
    /// the spec defaults — the override knob `embert`'s optional
    /// `embert.toml` exposes for experimentation (SPEC_FULL §1.3).
    /// `Vm::new`/`Vm::new_with_global_store` always use the spec constants;
    /// this constructor is the only place defaults can be changed.
    pub fn with_limits(
        instructions: Instructions,
        constants: Vec<Value>,
        globals: Vec<Value>,
        stack_size: usize,
        max_frames: usize,
    ) -> Self {
        let main_fn = Rc::new(CompiledFunction {
            instructions,
            num_locals: 0,
            num_params: 0,
        });
        let main_frame = Frame::new(main_fn, 0);
        Self {
            constants,
            stack: vec![Value::Null; stack_size],
            stack_size,
            sp: 0,
            globals,
            frames: vec![main_frame],
            max_frames,
        }
    }

    pub fn into_globals(self) -> Vec<Value> {
        self.globals
    }

    /// The value on top of the stack, if any — used by tests and the
    /// REPL to inspect results without popping.
    pub fn stack_top(&self) -> Option<&Value> {
        if self.sp == 0 {
            None
        } else {
            Some(&self.stack[self.sp - 1])
        }
    }

    /// The most recently popped value. A `pop` only decrements `sp`; the
    /// slot it vacated is still there until the next `push` overwrites it
    /// (spec §4.6: "the popped value remains inspectable").
    pub fn last_popped_stack_element(&self) -> &Value {
        &self.stack[self.sp]
    }

    pub fn run(&mut self) -> VmResult<()> {
        while self.current_frame().ip + 1 < self.current_frame().func.instructions.len() as isize {
            self.current_frame_mut().ip += 1;
            let ip = self.current_frame().ip as usize;
            let op = Opcode::from_byte(self.current_frame().func.instructions[ip])
                .expect("the compiler never emits an unknown opcode");

            match op {
                Opcode::Constant => {
                    let const_index = self.read_u16_operand();
                    self.push(self.constants[const_index].clone())?;
                }
                Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Div => self.exec_binary_op(op)?,
                Opcode::Equal | Opcode::NotEqual | Opcode::GreaterThan => self.exec_comparison(op)?,
                Opcode::Bang => self.exec_bang()?,
                Opcode::Minus => self.exec_minus()?,
                Opcode::Pop => {
                    self.pop();
                }
                Opcode::True => self.push(Value::Boolean(true))?,
                Opcode::False => self.push(Value::Boolean(false))?,
                Opcode::Null => self.push(Value::Null)?,
                Opcode::JumpNotTruthy => {
                    let target = read_u16(&self.current_frame().func.instructions[ip + 1..]) as isize;
                    self.current_frame_mut().ip += 2;
                    let condition = self.pop();
                    if !is_vm_truthy(&condition) {
                        self.current_frame_mut().ip = target - 1;
                    }
                }
                Opcode::Jump => {
                    let target = read_u16(&self.current_frame().func.instructions[ip + 1..]) as isize;
                    self.current_frame_mut().ip = target - 1;
                }
                Opcode::SetGlobal => {
                    let index = self.read_u16_operand();
                    let value = self.pop();
                    self.globals[index] = value;
                }
                Opcode::GetGlobal => {
                    let index = self.read_u16_operand();
                    self.push(self.globals[index].clone())?;
                }
                Opcode::SetLocal => {
                    let index = self.read_u8_operand();
                    let base = self.current_frame().base_pointer;
                    let value = self.pop();
                    self.stack[base + index] = value;
                }
                Opcode::GetLocal => {
                    let index = self.read_u8_operand();
                    let base = self.current_frame().base_pointer;
                    self.push(self.stack[base + index].clone())?;
                }
                Opcode::Array => {
                    let len = self.read_u16_operand();
                    let elements = self.stack[self.sp - len..self.sp].to_vec();
                    self.sp -= len;
                    self.push(Value::Array(Rc::new(elements)))?;
                }
                Opcode::Hash => {
                    let len = self.read_u16_operand();
                    let mut pairs = FxHashMap::default();
                    let start = self.sp - len;
                    let mut i = start;
                    while i < self.sp {
                        let key = self.stack[i].clone();
                        let value = self.stack[i + 1].clone();
                        let hash_key = key
                            .hash_key()
                            .ok_or_else(|| VmError::UnusableHashKey(key.type_name()))?;
                        pairs.insert(hash_key, HashPair { key, value });
                        i += 2;
                    }
                    self.sp = start;
                    self.push(Value::Hash(Rc::new(pairs)))?;
                }
                Opcode::Index => {
                    let index = self.pop();
                    let left = self.pop();
                    self.exec_index(left, index)?;
                }
                Opcode::Call => {
                    let num_args = self.read_u8_operand();
                    self.call_function(num_args)?;
                }
                Opcode::ReturnValue => {
                    let return_value = self.pop();
                    let frame = self.pop_frame();
                    self.sp = frame.base_pointer - 1;
                    self.push(return_value)?;
                }
                Opcode::Return => {
                    let frame = self.pop_frame();
                    self.sp = frame.base_pointer - 1;
                    self.push(Value::Null)?;
                }
            }
        }
        Ok(())
    }

    fn call_function(&mut self, num_args: usize) -> VmResult<()> {
        let func = match &self.stack[self.sp - 1 - num_args] {
            Value::CompiledFunction(func) => Rc::clone(func),
            _ => return Err(VmError::NotCallable),
        };
        if num_args != func.num_params {
            return Err(VmError::WrongArgumentCount { want: func.num_params, got: num_args });
        }
        if self.frames.len() >= self.max_frames {
            return Err(VmError::CallStackExceeded);
        }

        let base_pointer = self.sp - num_args;
        let num_locals = func.num_locals;
        self.frames.push(Frame::new(func, base_pointer));
        self.sp = base_pointer + num_locals;
        Ok(())
    }

    fn exec_binary_op(&mut self, op: Opcode) -> VmResult<()> {
        let right = self.pop();
        let left = self.pop();
        match (&left, &right) {
            (Value::Integer(l), Value::Integer(r)) => {
                let result = match op {
                    Opcode::Add => *l + *r,
                    Opcode::Sub => *l - *r,
                    Opcode::Mul => *l * *r,
                    Opcode::Div => {
                        if *r == 0 {
                            return Err(VmError::DivisionByZero);
                        }
                        l / r
                    }
                    _ => unreachable!("exec_binary_op only called for arithmetic opcodes"),
                };
                self.push(Value::Integer(result))
            }
            (Value::String(l), Value::String(r)) if op == Opcode::Add => {
                let mut s = String::with_capacity(l.len() + r.len());
                s.push_str(l);
                s.push_str(r);
                self.push(Value::String(s.into()))
            }
            _ => Err(VmError::UnsupportedBinaryOperation(left.type_name(), right.type_name())),
        }
    }

    fn exec_comparison(&mut self, op: Opcode) -> VmResult<()> {
        let right = self.pop();
        let left = self.pop();
        match (&left, &right) {
            (Value::Integer(l), Value::Integer(r)) => {
                let result = match op {
                    Opcode::Equal => l == r,
                    Opcode::NotEqual => l != r,
                    Opcode::GreaterThan => l > r,
                    _ => unreachable!("exec_comparison only called for comparison opcodes"),
                };
                self.push(Value::Boolean(result))
            }
            _ => match op {
                Opcode::Equal => self.push(Value::Boolean(values_equal(&left, &right))),
                Opcode::NotEqual => self.push(Value::Boolean(!values_equal(&left, &right))),
                _ => Err(VmError::UnsupportedBinaryOperation(left.type_name(), right.type_name())),
            },
        }
    }

    fn exec_bang(&mut self) -> VmResult<()> {
        let operand = self.pop();
        let result = !is_vm_truthy(&operand);
        self.push(Value::Boolean(result))
    }

    fn exec_minus(&mut self) -> VmResult<()> {
        let operand = self.pop();
        match operand {
            Value::Integer(n) => self.push(Value::Integer(-n)),
            other => Err(VmError::UnsupportedNegation(other.type_name())),
        }
    }

    fn exec_index(&mut self, left: Value, index: Value) -> VmResult<()> {
        match (&left, &index) {
            (Value::Array(elems), Value::Integer(i)) => {
                if *i < 0 || *i as usize >= elems.len() {
                    self.push(Value::Null)
                } else {
                    self.push(elems[*i as usize].clone())
                }
            }
            (Value::Hash(pairs), key) => match key.hash_key() {
                Some(hash_key) => match pairs.get(&hash_key) {
                    Some(pair) => self.push(pair.value.clone()),
                    None => self.push(Value::Null),
                },
                None => Err(VmError::UnusableHashKey(key.type_name())),
            },
            _ => Err(VmError::IndexNotSupported(left.type_name())),
        }
    }

    fn push(&mut self, value: Value) -> VmResult<()> {
        if self.sp >= self.stack_size {
            return Err(VmError::StackOverflow);
        }
        self.stack[self.sp] = value;
        self.sp += 1;
        Ok(())
    }

    fn pop(&mut self) -> Value {
        let value = self.stack[self.sp - 1].clone();
        self.sp -= 1;
        value
    }

    fn current_frame(&self) -> &Frame {
        self.frames.last().expect("the main frame is never popped")
    }

    fn current_frame_mut(&mut self) -> &mut Frame {
        self.frames.last_mut().expect("the main frame is never popped")
    }

    fn pop_frame(&mut self) -> Frame {
        self.frames.pop().expect("ReturnValue/Return never run in the main frame")
    }

    fn read_u16_operand(&mut self) -> usize {
        let ip = self.current_frame().ip as usize;
        let value = read_u16(&self.current_frame().func.instructions[ip + 1..]) as usize;
        self.current_frame_mut().ip += 2;
        value
    }

    fn read_u8_operand(&mut self) -> usize {
        let ip = self.current_frame().ip as usize;
        let value = read_u8(&self.current_frame().func.instructions[ip + 1..]) as usize;
        self.current_frame_mut().ip += 1;
        value
    }
}

/// The VM's truthiness rule: only `false` and `null` are falsy, unlike
/// the evaluator-style rule on [`emberc_object::Value::is_truthy`] which
/// also treats `0` as falsy (spec §4.7 — the two rules deliberately
/// disagree).
fn is_vm_truthy(value: &Value) -> bool {
    !matches!(value, Value::Boolean(false) | Value::Null)
}

fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Boolean(l), Value::Boolean(r)) => l == r,
        (Value::Null, Value::Null) => true,
        (Value::String(l), Value::String(r)) => l == r,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emberc_code::make;

    fn program(chunks: &[Vec<u8>], constants: Vec<Value>) -> Vm {
        let mut instructions = Instructions::new();
        for chunk in chunks {
            instructions.extend(chunk);
        }
        Vm::new(instructions, constants)
    }

    #[test]
    fn push_then_pop_leaves_value_inspectable_as_last_popped() {
        let mut vm = program(
            &[make(Opcode::Constant, &[0]), make(Opcode::Pop, &[])],
            vec![Value::Integer(42)],
        );
        vm.run().unwrap();
        assert!(vm.stack_top().is_none());
        assert!(matches!(vm.last_popped_stack_element(), Value::Integer(42)));
    }

    #[test]
    fn arithmetic_computes_expected_result() {
        let mut vm = program(
            &[
                make(Opcode::Constant, &[0]),
                make(Opcode::Constant, &[1]),
                make(Opcode::Add, &[]),
                make(Opcode::Pop, &[]),
            ],
            vec![Value::Integer(2), Value::Integer(3)],
        );
        vm.run().unwrap();
        assert!(matches!(vm.last_popped_stack_element(), Value::Integer(5)));
    }

    #[test]
    fn stack_overflow_is_reported_rather_than_panicking() {
        let mut chunks = Vec::new();
        for _ in 0..(STACK_SIZE + 1) {
            chunks.push(make(Opcode::Constant, &[0]));
        }
        let mut vm = program(&chunks, vec![Value::Integer(1)]);
        assert!(matches!(vm.run(), Err(VmError::StackOverflow)));
    }
}
