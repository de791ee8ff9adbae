use emberc_compile::Compiler;
use emberc_object::Value;
use emberc_parse::Parser;
use emberc_util::Handler;
use emberc_vm::Vm;

fn run(source: &str) -> Value {
    let mut handler = Handler::new();
    let program = Parser::new(source, &mut handler).parse_program();
    assert!(!handler.has_errors(), "parse errors: {:?}", handler.diagnostics());

    let mut compiler = Compiler::new();
    compiler.compile_program(&program).expect("compile should succeed");
    let bytecode = compiler.bytecode();

    let mut vm = Vm::new(bytecode.instructions, bytecode.constants);
    vm.run().expect("vm should run without error");
    vm.last_popped_stack_element().clone()
}

fn run_err(source: &str) -> emberc_vm::VmError {
    let mut handler = Handler::new();
    let program = Parser::new(source, &mut handler).parse_program();
    assert!(!handler.has_errors());

    let mut compiler = Compiler::new();
    compiler.compile_program(&program).expect("compile should succeed");
    let bytecode = compiler.bytecode();

    let mut vm = Vm::new(bytecode.instructions, bytecode.constants);
    vm.run().expect_err("vm should report an error")
}

fn assert_int(value: &Value, expected: i64) {
    match value {
        Value::Integer(n) => assert_eq!(*n, expected),
        other => panic!("expected integer {expected}, got {other:?}"),
    }
}

fn assert_bool(value: &Value, expected: bool) {
    match value {
        Value::Boolean(b) => assert_eq!(*b, expected),
        other => panic!("expected boolean {expected}, got {other:?}"),
    }
}

#[test]
fn integer_arithmetic() {
    let cases = [
        ("1", 1),
        ("2", 2),
        ("1 + 2", 3),
        ("1 - 2", -1),
        ("1 * 2", 2),
        ("4 / 2", 2),
        ("50 / 2 * 2 + 10 - 5", 55),
        ("5 + 5 + 5 + 5 - 10", 10),
        ("2 * 2 * 2 * 2 * 2", 32),
        ("5 * 2 + 10", 20),
        ("5 + 2 * 10", 25),
        ("5 * (2 + 10)", 60),
        ("-5", -5),
        ("-10", -10),
        ("-50 + 100 + -50", 0),
        ("(5 + 10 * 2 + 15 / 3) * 2 + -10", 50),
    ];
    for (input, expected) in cases {
        assert_int(&run(input), expected);
    }
}

#[test]
fn boolean_expressions() {
    let cases = [
        ("true", true),
        ("false", false),
        ("1 < 2", true),
        ("1 > 2", false),
        ("1 < 1", false),
        ("1 == 1", true),
        ("1 != 1", false),
        ("true == true", true),
        ("true == false", false),
        ("(1 < 2) == true", true),
        ("(1 < 2) == false", false),
        ("!true", false),
        ("!false", true),
        ("!5", false),
        ("!!true", true),
        ("!!5", true),
    ];
    for (input, expected) in cases {
        assert_bool(&run(input), expected);
    }
}

#[test]
fn conditionals() {
    assert_int(&run("if (true) { 10 }"), 10);
    assert_int(&run("if (true) { 10 } else { 20 }"), 10);
    assert_int(&run("if (false) { 10 } else { 20 }"), 20);
    assert_int(&run("if (1) { 10 }"), 10);
    assert_int(&run("if (1 < 2) { 10 }"), 10);
    assert_int(&run("if (1 < 2) { 10 } else { 20 }"), 10);
    assert!(matches!(run("if (false) { 10 }"), Value::Null));
    assert!(matches!(run("if (1 > 2) { 10 }"), Value::Null));
    assert_int(&run("if ((if (false) { 10 })) { 10 } else { 20 }"), 20);
}

#[test]
fn global_let_statements() {
    assert_int(&run("let one = 1; one"), 1);
    assert_int(&run("let one = 1; let two = one + one; one + two"), 3);
}

#[test]
fn string_expressions() {
    match run(r#""monkey""#) {
        Value::String(s) => assert_eq!(&*s, "monkey"),
        other => panic!("expected string, got {other:?}"),
    }
    match run(r#""mon" + "key""#) {
        Value::String(s) => assert_eq!(&*s, "monkey"),
        other => panic!("expected string, got {other:?}"),
    }
}

#[test]
fn array_literals() {
    match run("[]") {
        Value::Array(elems) => assert!(elems.is_empty()),
        other => panic!("expected array, got {other:?}"),
    }
    match run("[1, 2, 3]") {
        Value::Array(elems) => {
            assert_eq!(elems.len(), 3);
            assert_int(&elems[0], 1);
            assert_int(&elems[2], 3);
        }
        other => panic!("expected array, got {other:?}"),
    }
    match run("[1 + 2, 3 * 4, 5 + 6]") {
        Value::Array(elems) => {
            assert_int(&elems[0], 3);
            assert_int(&elems[1], 12);
            assert_int(&elems[2], 11);
        }
        other => panic!("expected array, got {other:?}"),
    }
}

#[test]
fn array_index_expressions() {
    assert_int(&run("[1, 2, 3][1]"), 2);
    assert_int(&run("[1, 2, 3][0 + 2]"), 3);
    assert_int(&run("[[1, 1, 1]][0][0]"), 1);
    assert!(matches!(run("[][0]"), Value::Null));
    assert!(matches!(run("[1, 2, 3][99]"), Value::Null));
    assert!(matches!(run("[1][-1]"), Value::Null));
}

#[test]
fn hash_literals() {
    match run(r#"{"one": 1, "two": 2}"#) {
        Value::Hash(pairs) => assert_eq!(pairs.len(), 2),
        other => panic!("expected hash, got {other:?}"),
    }
}

#[test]
fn hash_index_expressions() {
    assert_int(&run(r#"{"foo": 5}["foo"]"#), 5);
    assert!(matches!(run(r#"{"foo": 5}["bar"]"#), Value::Null));
    assert_int(&run(r#"let key = "foo"; {"foo": 5}[key]"#), 5);
    assert!(matches!(run("{}[\"foo\"]"), Value::Null));
}

#[test]
fn calling_functions_without_arguments() {
    assert_int(&run("let fivePlusTen = fn() { 5 + 10; }; fivePlusTen();"), 15);
    assert_int(
        &run("let one = fn() { 1; }; let two = fn() { 2; }; one() + two();"),
        3,
    );
    assert_int(
        &run(
            "let a = fn() { 1 }; let b = fn() { a() + 1 }; let c = fn() { b() + 1 }; c();",
        ),
        3,
    );
}

#[test]
fn functions_with_return_statement() {
    assert_int(&run("let earlyExit = fn() { return 99; 100; }; earlyExit();"), 99);
}

#[test]
fn functions_without_return_value_yield_null() {
    assert!(matches!(run("let noReturn = fn() { }; noReturn();"), Value::Null));
}

#[test]
fn calling_functions_with_bindings() {
    assert_int(&run("let one = fn() { let one = 1; one }; one();"), 1);
    assert_int(
        &run("let oneAndTwo = fn() { let one = 1; let two = 2; one + two; }; oneAndTwo();"),
        3,
    );
    assert_int(
        &run(
            "let globalSeed = 50;
             let minusOne = fn() { let num = 1; globalSeed - num; };
             let minusTwo = fn() { let num = 2; globalSeed - num; };
             minusOne() + minusTwo();",
        ),
        97,
    );
}

#[test]
fn calling_functions_with_arguments_and_bindings() {
    assert_int(&run("let identity = fn(a) { a; }; identity(4);"), 4);
    assert_int(&run("let sum = fn(a, b) { a + b; }; sum(1, 2);"), 3);
    assert_int(
        &run(
            "let sum = fn(a, b) {
                let c = a + b;
                c;
            };
            sum(1, 2) + sum(3, 4);",
        ),
        10,
    );
}

#[test]
fn calling_function_with_wrong_number_of_arguments_is_an_error() {
    let err = run_err("fn() { 1; }(1);");
    assert!(matches!(err, emberc_vm::VmError::WrongArgumentCount { want: 0, got: 1 }));

    let err = run_err("fn(a, b) { a + b; }(1);");
    assert!(matches!(err, emberc_vm::VmError::WrongArgumentCount { want: 2, got: 1 }));
}

#[test]
fn negating_a_non_integer_is_an_error() {
    let err = run_err("-true");
    assert!(matches!(err, emberc_vm::VmError::UnsupportedNegation(_)));
}

#[test]
fn indexing_a_non_indexable_value_is_an_error() {
    let err = run_err("5[1]");
    assert!(matches!(err, emberc_vm::VmError::IndexNotSupported(_)));
}

#[test]
fn dividing_by_zero_is_an_error() {
    let err = run_err("4 / 0");
    assert!(matches!(err, emberc_vm::VmError::DivisionByZero));
}

#[test]
fn globals_survive_across_repl_style_vm_reuse() {
    let mut handler = Handler::new();
    let program1 = Parser::new("let x = 5;", &mut handler).parse_program();
    let mut compiler = Compiler::new();
    compiler.compile_program(&program1).unwrap();
    let bytecode1 = compiler.bytecode();

    let mut vm = emberc_vm::Vm::new(bytecode1.instructions, bytecode1.constants);
    vm.run().unwrap();
    let globals = vm.into_globals();

    let mut handler2 = Handler::new();
    let program2 = Parser::new("x + 1;", &mut handler2).parse_program();
    let mut symbol_table = emberc_compile::SymbolTable::new();
    symbol_table.define(emberc_util::Symbol::intern("x"));
    let mut compiler2 = Compiler::new_with_state(symbol_table, Vec::new());
    compiler2.compile_program(&program2).unwrap();
    let bytecode2 = compiler2.bytecode();

    let mut vm2 = emberc_vm::Vm::new_with_global_store(bytecode2.instructions, bytecode2.constants, globals);
    vm2.run().unwrap();
    assert_int(vm2.last_popped_stack_element(), 6);
}
