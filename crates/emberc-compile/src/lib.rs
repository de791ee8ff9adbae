//! emberc-compile — the tree-walking compiler from [`emberc_ast::Program`]
//! to flat bytecode (spec §4.4, §4.5).

mod compiler;
mod error;
mod symbol_table;

pub use compiler::{Bytecode, Compiler};
pub use error::{CompileError, CompileResult};
pub use symbol_table::{Scope, Symbol, SymbolTable};
