//! `embert run <path>` — compile a file and execute it once (spec §6
//! external interface: "given source text, obtain a compiled artifact,
//! run it, and inspect the last popped stack element").

use std::path::PathBuf;

use emberc_compile::Compiler;
use emberc_object::Value;
use emberc_vm::Vm;

use crate::config::Config;
use crate::error::Result;
use crate::pipeline;

#[derive(Debug, Clone)]
pub struct RunArgs {
    pub path: PathBuf,
    pub verbose: bool,
}

pub fn run_run(args: RunArgs, config: Config) -> Result<()> {
    let source = std::fs::read_to_string(&args.path)?;

    let program = {
        let _span = tracing::info_span!("parse", path = %args.path.display()).entered();
        pipeline::parse(&source)?
    };

    let bytecode = {
        let _span = tracing::info_span!("compile").entered();
        let mut compiler = Compiler::new();
        compiler.compile_program(&program)?;
        compiler.bytecode()
    };

    let result = {
        let _span = tracing::info_span!("run").entered();
        let globals = vec![Value::Null; config.global_size];
        let mut vm = Vm::with_limits(
            bytecode.instructions,
            bytecode.constants,
            globals,
            config.stack_size,
            config.max_frames,
        );
        vm.run()?;
        vm.last_popped_stack_element().clone()
    };

    if args.verbose {
        tracing::info!(%result, "program finished");
    }
    println!("{result}");
    Ok(())
}
