//! `embert repl` — an interactive loop that reuses the symbol table,
//! constant pool, and globals array across lines, grounded on
//! `original_source/pkg/repl/repl.go`: read a line, compile and run it
//! against persistent state, print the inspected result, `quit` to exit
//! (spec §5 explicitly allows this reuse pattern for a REPL-style driver).

use std::io::{self, BufRead, Write};

use emberc_compile::{Compiler, SymbolTable};
use emberc_object::Value;
use emberc_vm::Vm;

use crate::config::Config;
use crate::error::Result;
use crate::pipeline;

#[derive(Debug, Clone, Default)]
pub struct ReplArgs {
    pub verbose: bool,
}

pub fn run_repl(args: ReplArgs, config: Config) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    let mut symbol_table = SymbolTable::new();
    let mut constants = Vec::new();
    let mut globals = vec![Value::Null; config.global_size];

    println!("embert REPL — type `quit` to exit");
    let mut line = String::new();
    loop {
        print!(">> ");
        stdout.flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let text = line.trim();
        if text == "quit" {
            break;
        }
        if text.is_empty() {
            continue;
        }

        let program = match pipeline::parse(text) {
            Ok(program) => program,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };

        let mut compiler = Compiler::new_with_state(symbol_table, constants);
        let compile_result = compiler.compile_program(&program);
        let (bytecode, next_symbol_table) = compiler.into_parts();
        symbol_table = next_symbol_table;
        constants = bytecode.constants.clone();

        if let Err(e) = compile_result {
            eprintln!("compile error: {e}");
            continue;
        }

        let mut vm = Vm::with_limits(
            bytecode.instructions,
            bytecode.constants,
            globals,
            config.stack_size,
            config.max_frames,
        );
        match vm.run() {
            Ok(()) => println!("{}", vm.last_popped_stack_element()),
            Err(e) if args.verbose => eprintln!("runtime error: {e:?}"),
            Err(e) => eprintln!("runtime error: {e}"),
        }
        globals = vm.into_globals();
    }

    println!("exiting repl");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repl_args_default_is_not_verbose() {
        assert!(!ReplArgs::default().verbose);
    }
}
