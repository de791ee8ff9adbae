//! Tree-walking compiler: turns an [`emberc_ast::Program`] into flat
//! bytecode plus a constant pool (spec §4.5).

use emberc_ast::{Block, Expr, Program, Statement};
use emberc_code::{make, Instructions, Opcode};
use emberc_object::{CompiledFunction, Value};

use crate::error::{CompileError, CompileResult};
use crate::symbol_table::{Scope, SymbolTable};

/// The last two opcodes emitted into the current scope, tracked so the
/// compiler can rewrite a trailing `OpPop` into `OpReturnValue` when a
/// function body's final statement is an expression statement (spec §4.5:
/// "implicit return of the last expression statement's value").
#[derive(Clone, Copy, Debug)]
struct EmittedInstruction {
    opcode: Opcode,
    position: usize,
}

/// One function body's worth of in-progress instructions. The compiler
/// pushes a new scope on every function literal and pops it back off when
/// the literal is fully compiled (spec §4.4/§4.5).
struct CompilationScope {
    instructions: Instructions,
    last_instruction: Option<EmittedInstruction>,
    previous_instruction: Option<EmittedInstruction>,
}

impl CompilationScope {
    fn new() -> Self {
        Self {
            instructions: Instructions::new(),
            last_instruction: None,
            previous_instruction: None,
        }
    }
}

/// Constants and instructions produced by a finished compilation — what
/// the VM loads to run (spec §4.1).
#[derive(Clone, Debug, Default)]
pub struct Bytecode {
    pub instructions: Instructions,
    pub constants: Vec<Value>,
}

pub struct Compiler {
    constants: Vec<Value>,
    symbol_table: SymbolTable,
    scopes: Vec<CompilationScope>,
}

impl Compiler {
    pub fn new() -> Self {
        Self {
            constants: Vec::new(),
            symbol_table: SymbolTable::new(),
            scopes: vec![CompilationScope::new()],
        }
    }

    /// Resumes compilation with state carried over from a previous run —
    /// the REPL's "each line sees every earlier line's globals and
    /// bindings" requirement (spec §5/§6).
    pub fn new_with_state(symbol_table: SymbolTable, constants: Vec<Value>) -> Self {
        Self {
            constants,
            symbol_table,
            scopes: vec![CompilationScope::new()],
        }
    }

    pub fn constants(&self) -> &[Value] {
        &self.constants
    }

    pub fn compile_program(&mut self, program: &Program) -> CompileResult<()> {
        for stmt in &program.statements {
            self.compile_statement(stmt)?;
        }
        Ok(())
    }

    pub fn bytecode(self) -> Bytecode {
        self.into_parts().0
    }

    /// Like [`Compiler::bytecode`], but also hands back the symbol table —
    /// a REPL driver needs both: the bytecode to run this line, and the
    /// updated bindings to seed the next line's compiler with (spec §5:
    /// "a REPL-style driver may reuse the symbol table ... across
    /// invocations"). `bytecode()` alone would drop the symbol table on
    /// the floor.
    pub fn into_parts(self) -> (Bytecode, SymbolTable) {
        let mut scopes = self.scopes;
        let scope = scopes.pop().expect("compiler always has at least one scope");
        let bytecode = Bytecode {
            instructions: scope.instructions,
            constants: self.constants,
        };
        (bytecode, self.symbol_table)
    }

    fn compile_statement(&mut self, stmt: &Statement) -> CompileResult<()> {
        match stmt {
            Statement::Expression(s) => {
                self.compile_expr(&s.expr)?;
                self.emit(Opcode::Pop, &[]);
            }
            Statement::Let(s) => {
                self.compile_expr(&s.value)?;
                let symbol = self.symbol_table.define(s.name.name);
                match symbol.scope {
                    Scope::Global => self.emit(Opcode::SetGlobal, &[symbol.index]),
                    Scope::Local => self.emit(Opcode::SetLocal, &[symbol.index]),
                };
            }
            Statement::Return(s) => {
                self.compile_expr(&s.value)?;
                self.emit(Opcode::ReturnValue, &[]);
            }
            Statement::Block(b) => self.compile_block(b)?,
        }
        Ok(())
    }

    fn compile_block(&mut self, block: &Block) -> CompileResult<()> {
        for stmt in &block.statements {
            self.compile_statement(stmt)?;
        }
        Ok(())
    }

    fn compile_expr(&mut self, expr: &Expr) -> CompileResult<()> {
        match expr {
            Expr::IntegerLiteral(lit) => {
                let constant = self.add_constant(Value::Integer(lit.value));
                self.emit(Opcode::Constant, &[constant]);
            }
            Expr::StringLiteral(lit) => {
                let constant = self.add_constant(Value::String(lit.value.as_str().into()));
                self.emit(Opcode::Constant, &[constant]);
            }
            Expr::BooleanLiteral(lit) => {
                self.emit(if lit.value { Opcode::True } else { Opcode::False }, &[]);
            }
            Expr::Identifier(ident) => {
                let symbol = self
                    .symbol_table
                    .resolve(ident.name)
                    .ok_or_else(|| CompileError::UndefinedVariable(ident.name.to_string()))?;
                match symbol.scope {
                    Scope::Global => self.emit(Opcode::GetGlobal, &[symbol.index]),
                    Scope::Local => self.emit(Opcode::GetLocal, &[symbol.index]),
                };
            }
            Expr::Prefix(p) => {
                self.compile_expr(&p.right)?;
                match p.operator.as_str() {
                    "!" => self.emit(Opcode::Bang, &[]),
                    "-" => self.emit(Opcode::Minus, &[]),
                    other => return Err(CompileError::UnknownOperator(other.to_string())),
                };
            }
            Expr::Infix(infix) => {
                // `a < b` has no dedicated opcode; compile it as `b > a`
                // instead (spec §4.5 redesign note).
                if infix.operator == "<" {
                    self.compile_expr(&infix.right)?;
                    self.compile_expr(&infix.left)?;
                    self.emit(Opcode::GreaterThan, &[]);
                    return Ok(());
                }
                self.compile_expr(&infix.left)?;
                self.compile_expr(&infix.right)?;
                match infix.operator.as_str() {
                    "+" => self.emit(Opcode::Add, &[]),
                    "-" => self.emit(Opcode::Sub, &[]),
                    "*" => self.emit(Opcode::Mul, &[]),
                    "/" => self.emit(Opcode::Div, &[]),
                    ">" => self.emit(Opcode::GreaterThan, &[]),
                    "==" => self.emit(Opcode::Equal, &[]),
                    "!=" => self.emit(Opcode::NotEqual, &[]),
                    other => return Err(CompileError::UnknownOperator(other.to_string())),
                };
            }
            Expr::If(if_expr) => {
                self.compile_expr(&if_expr.condition)?;

                let jump_not_truthy_pos = self.emit(Opcode::JumpNotTruthy, &[9999]);
                self.compile_block(&if_expr.consequence)?;
                if self.last_instruction_is(Opcode::Pop) {
                    self.remove_last_pop();
                }

                let jump_pos = self.emit(Opcode::Jump, &[9999]);
                let after_consequence_pos = self.current_instructions().len();
                self.change_operand(jump_not_truthy_pos, after_consequence_pos);

                match &if_expr.alternative {
                    Some(alt) => {
                        self.compile_block(alt)?;
                        if self.last_instruction_is(Opcode::Pop) {
                            self.remove_last_pop();
                        }
                    }
                    None => {
                        self.emit(Opcode::Null, &[]);
                    }
                }
                let after_alternative_pos = self.current_instructions().len();
                self.change_operand(jump_pos, after_alternative_pos);
            }
            Expr::ArrayLiteral(arr) => {
                for elem in &arr.elements {
                    self.compile_expr(elem)?;
                }
                self.emit(Opcode::Array, &[arr.elements.len()]);
            }
            Expr::HashLiteral(hash) => {
                // Sorted by rendered key text so disassembly/tests are
                // deterministic regardless of source order (spec §4.5).
                let mut pairs: Vec<&(Expr, Expr)> = hash.pairs.iter().collect();
                pairs.sort_by_key(|(k, _)| k.to_string());
                for (key, value) in pairs {
                    self.compile_expr(key)?;
                    self.compile_expr(value)?;
                }
                self.emit(Opcode::Hash, &[hash.pairs.len() * 2]);
            }
            Expr::Index(index) => {
                self.compile_expr(&index.left)?;
                self.compile_expr(&index.index)?;
                self.emit(Opcode::Index, &[]);
            }
            Expr::FunctionLiteral(func) => {
                self.enter_scope();

                for param in &func.params {
                    self.symbol_table.define(param.name);
                }

                self.compile_block(&func.body)?;

                if self.last_instruction_is(Opcode::Pop) {
                    self.replace_last_pop_with_return();
                }
                if !self.last_instruction_is(Opcode::ReturnValue) {
                    self.emit(Opcode::Return, &[]);
                }

                let num_locals = self.symbol_table.num_definitions;
                let instructions = self.leave_scope();

                let compiled_fn = CompiledFunction {
                    instructions,
                    num_locals,
                    num_params: func.params.len(),
                };
                let constant = self.add_constant(Value::CompiledFunction(std::rc::Rc::new(compiled_fn)));
                self.emit(Opcode::Constant, &[constant]);
            }
            Expr::Call(call) => {
                self.compile_expr(&call.function)?;
                for arg in &call.args {
                    self.compile_expr(arg)?;
                }
                self.emit(Opcode::Call, &[call.args.len()]);
            }
        }
        Ok(())
    }

    fn add_constant(&mut self, value: Value) -> usize {
        self.constants.push(value);
        self.constants.len() - 1
    }

    fn emit(&mut self, op: Opcode, operands: &[usize]) -> usize {
        let instruction = make(op, operands);
        let position = self.current_instructions().len();
        self.current_instructions_mut().extend(&instruction);

        let scope = self.scopes.last_mut().expect("at least one scope");
        scope.previous_instruction = scope.last_instruction;
        scope.last_instruction = Some(EmittedInstruction { opcode: op, position });
        position
    }

    fn current_instructions(&self) -> &Instructions {
        &self.scopes.last().expect("at least one scope").instructions
    }

    fn current_instructions_mut(&mut self) -> &mut Instructions {
        &mut self.scopes.last_mut().expect("at least one scope").instructions
    }

    fn last_instruction_is(&self, op: Opcode) -> bool {
        match self.scopes.last().unwrap().last_instruction {
            Some(emitted) => emitted.opcode == op,
            None => false,
        }
    }

    fn remove_last_pop(&mut self) {
        let scope = self.scopes.last_mut().unwrap();
        let last = scope.last_instruction.expect("caller checked last_instruction_is");
        scope.instructions.0.truncate(last.position);
        scope.last_instruction = scope.previous_instruction;
    }

    /// Rewrites a trailing `OpPop` into `OpReturnValue`, same width (both
    /// are one byte, no operands) so no other offsets shift.
    fn replace_last_pop_with_return(&mut self) {
        let scope = self.scopes.last_mut().unwrap();
        let last = scope.last_instruction.expect("caller checked last_instruction_is");
        let new_instruction = make(Opcode::ReturnValue, &[]);
        scope.instructions.replace(last.position, &new_instruction);
        scope.last_instruction = Some(EmittedInstruction {
            opcode: Opcode::ReturnValue,
            position: last.position,
        });
    }

    fn change_operand(&mut self, pos: usize, operand: usize) {
        let op = Opcode::from_byte(self.current_instructions()[pos]).expect("position points at an opcode byte");
        let new_instruction = make(op, &[operand]);
        self.current_instructions_mut().replace(pos, &new_instruction);
    }

    fn enter_scope(&mut self) {
        self.scopes.push(CompilationScope::new());
        let outer = std::mem::replace(&mut self.symbol_table, SymbolTable::new());
        self.symbol_table = SymbolTable::new_enclosed(outer);
    }

    fn leave_scope(&mut self) -> Instructions {
        let scope = self.scopes.pop().expect("enter_scope always pairs with leave_scope");
        let outer = std::mem::replace(&mut self.symbol_table, SymbolTable::new());
        self.symbol_table = outer.into_outer().expect("leave_scope only called after enter_scope");
        scope.instructions
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}
