use super::{Binding, Interpreter, RuntimeError, Value};
use crate::config::Config;
use crate::error::Error;
use crate::parser::Operator;

fn run_all(interpreter: &mut Interpreter, inputs: &[&str]) -> Result<Value, Error> {
    let mut result = Value::Unit;
    for input in inputs {
        result = interpreter.run(input)?;
    }
    Ok(result)
}

fn assert_evaluates_to(inputs: &[&str], expected: Value) {
    let mut interpreter = Interpreter::default();
    match run_all(&mut interpreter, inputs) {
        Ok(value) => assert_eq!(value, expected, "\nwhile evaluating {inputs:?}\n"),
        Err(err) => panic!("\n{inputs:?} failed with \"{err}\", expected {expected:?}\n"),
    }
}

fn assert_raises_error(inputs: &[&str], expected: RuntimeError) {
    let mut interpreter = Interpreter::default();
    match run_all(&mut interpreter, inputs) {
        Err(Error::Runtime(err)) => assert_eq!(err, expected),
        other => panic!("\n{inputs:?} returned {other:?}, expected {expected:?}\n"),
    }
}

fn variable(interpreter: &Interpreter, name: &str) -> Option<Value> {
    match interpreter.environment().get(name) {
        Some(Binding::Value(value)) => Some(value.clone()),
        _ => None,
    }
}

#[test]
fn test_arithmetic() {
    assert_evaluates_to(&["10 - 3 - 2"], Value::Integer(5));
    assert_evaluates_to(&["2 + 3 * 4"], Value::Integer(14));
    assert_evaluates_to(&["(2 + 3) * 4"], Value::Integer(20));
    assert_evaluates_to(&["0 - 7"], Value::Integer(-7));
}

#[test]
fn test_division_is_real() {
    assert_evaluates_to(&["10 / 2"], Value::Real(5.0));
    assert_evaluates_to(&["7 / 2"], Value::Real(3.5));
    assert_evaluates_to(&["7 / 2 * 2 + 1"], Value::Real(8.0));
    assert_eq!(Value::Real(5.0).to_string(), "5.0");
}

#[test]
fn test_division_by_zero() {
    assert_raises_error(&["1 / 0"], RuntimeError::DivisionByZero);
    assert_raises_error(&["1 / (2 / 4 - 1 / 2)"], RuntimeError::DivisionByZero);
}

#[test]
fn test_integer_overflow() {
    assert_raises_error(
        &["9223372036854775807 + 1"],
        RuntimeError::ArithmeticOverflow(Operator::Plus),
    );
}

#[test]
fn test_assignment_returns_value() {
    assert_evaluates_to(&["x = 5"], Value::Integer(5));
    assert_evaluates_to(&["x = 5", "x"], Value::Integer(5));
    assert_evaluates_to(&["x = 5", "y = x + 3", "y * 2"], Value::Integer(16));
}

#[test]
fn test_comparisons() {
    assert_evaluates_to(&["x = 5", "x < 10"], Value::Boolean(true));
    assert_evaluates_to(&["x = 5", "x > 10"], Value::Boolean(false));
    assert_evaluates_to(&["3 <= 3"], Value::Boolean(true));
    assert_evaluates_to(&["3 >= 4"], Value::Boolean(false));
    assert_evaluates_to(&["3 != 4"], Value::Boolean(true));
    assert_evaluates_to(&["10 / 2 == 5"], Value::Boolean(true));
    assert_evaluates_to(&["1 / 2 < 1"], Value::Boolean(true));
}

#[test]
fn test_boolean_operands() {
    let define = "fun lt(a, b) a < b";
    assert_evaluates_to(&[define, "lt(1, 2) == lt(0, 5)"], Value::Boolean(true));
    assert_evaluates_to(&[define, "lt(1, 2) != lt(5, 0)"], Value::Boolean(true));
    assert_raises_error(
        &[define, "lt(1, 2) < lt(0, 5)"],
        RuntimeError::TypeError {
            operator: Operator::Less,
            found: "boolean",
        },
    );
    assert_raises_error(
        &[define, "lt(1, 2) + 1"],
        RuntimeError::TypeError {
            operator: Operator::Plus,
            found: "boolean",
        },
    );
}

#[test]
fn test_unit_operands() {
    assert_raises_error(
        &["fun nothing() {}", "nothing() * 2"],
        RuntimeError::TypeError {
            operator: Operator::Star,
            found: "unit",
        },
    );
}

#[test]
fn test_block_returns_last_value() {
    assert_evaluates_to(&["{ x = 10 \n y = 20 \n x + y }"], Value::Integer(30));
    assert_evaluates_to(&["{}"], Value::Unit);
}

#[test]
fn test_while_reports_iterations() {
    let mut interpreter = Interpreter::default();
    let result = run_all(&mut interpreter, &["x = 0", "while (x < 5) { x = x + 1 }"]).unwrap();
    assert_eq!(result, Value::Loop(5));
    assert_eq!(result.to_string(), "Loop completed after 5 iterations.");
    assert_eq!(interpreter.run("x").unwrap(), Value::Integer(5));
    assert_eq!(
        interpreter.run("while (x < 5) { x = x + 1 }").unwrap(),
        Value::Loop(0)
    );
}

#[test]
fn test_loop_ceiling() {
    let mut interpreter = Interpreter::default();
    let result = run_all(&mut interpreter, &["x = 0", "while (x < 2000) { x = x + 1 }"]);
    assert_eq!(result, Err(Error::Runtime(RuntimeError::InfiniteLoop(1000))));
    // Iterations that already ran keep their effect.
    assert_eq!(variable(&interpreter, "x"), Some(Value::Integer(1000)));

    // Exactly at the ceiling the loop still finishes normally.
    let result = run_all(&mut interpreter, &["x = 0", "while (x < 1000) { x = x + 1 }"]);
    assert_eq!(result, Ok(Value::Loop(1000)));
}

#[test]
fn test_loop_ceiling_is_configurable() {
    let config = Config {
        max_iterations: 3,
        ..Config::default()
    };
    let mut interpreter = Interpreter::new(config);
    let result = run_all(&mut interpreter, &["x = 0", "while (x < 10) { x = x + 1 }"]);
    assert_eq!(result, Err(Error::Runtime(RuntimeError::InfiniteLoop(3))));
    assert_eq!(variable(&interpreter, "x"), Some(Value::Integer(3)));
}

#[test]
fn test_if_else() {
    let setup = "x = 5";
    assert_evaluates_to(
        &[setup, "if (x == 5) { x + 10 } else { x - 10 }"],
        Value::Integer(15),
    );
    assert_evaluates_to(
        &[setup, "if (x > 5) { x + 10 } else { x - 10 }"],
        Value::Integer(-5),
    );
    assert_evaluates_to(&[setup, "if (x > 5) { x + 10 }"], Value::Unit);
}

#[test]
fn test_function_definition_and_call() {
    let mut interpreter = Interpreter::default();
    assert_eq!(interpreter.run("fun sq(n) { n * n }").unwrap(), Value::Unit);
    assert!(matches!(
        interpreter.environment().get("sq"),
        Some(Binding::Function(f)) if f.params == ["n"]
    ));
    assert_eq!(interpreter.run("sq(4)").unwrap(), Value::Integer(16));
    assert_eq!(interpreter.run("sq(sq(2)) + 1").unwrap(), Value::Integer(17));
    assert_eq!(interpreter.run("fun soma(a, b) { a + b }").unwrap(), Value::Unit);
    assert_eq!(interpreter.run("soma(3, 7)").unwrap(), Value::Integer(10));
}

#[test]
fn test_definition_does_not_evaluate_body() {
    assert_evaluates_to(&["fun broken() undefined_name"], Value::Unit);
    assert_raises_error(
        &["fun broken() undefined_name", "broken()"],
        RuntimeError::UndefinedVariable("undefined_name".to_string()),
    );
}

#[test]
fn test_arity_mismatch() {
    assert_raises_error(
        &["fun sq(n) { n * n }", "sq(1, 2)"],
        RuntimeError::ArityMismatch {
            name: "sq".to_string(),
            expected: 1,
            found: 2,
        },
    );
    assert_raises_error(
        &["fun sq(n) { n * n }", "sq()"],
        RuntimeError::ArityMismatch {
            name: "sq".to_string(),
            expected: 1,
            found: 0,
        },
    );
}

#[test]
fn test_undefined_lookups() {
    assert_raises_error(&["y + 1"], RuntimeError::UndefinedVariable("y".to_string()));
    assert_raises_error(&["g(1)"], RuntimeError::UndefinedFunction("g".to_string()));
    assert_raises_error(&["x = 1", "x(1)"], RuntimeError::NotAFunction("x".to_string()));
    assert_raises_error(
        &["fun f() 1", "f + 1"],
        RuntimeError::FunctionAsValue("f".to_string()),
    );
}

#[test]
fn test_assignment_replaces_function() {
    assert_raises_error(
        &["fun f() 1", "f = 2", "f()"],
        RuntimeError::NotAFunction("f".to_string()),
    );
    assert_evaluates_to(&["f = 2", "fun f() 1", "f()"], Value::Integer(1));
}

#[test]
fn test_call_rolls_back_environment() {
    let mut interpreter = Interpreter::default();
    run_all(
        &mut interpreter,
        &[
            "x = 1",
            "fun peek() x",
            "fun poke(n) { x = n \n inner = peek() \n inner * 10 }",
        ],
    )
    .unwrap();
    // The nested call sees the caller's reassignment...
    assert_eq!(interpreter.run("poke(7)").unwrap(), Value::Integer(70));
    // ...which is gone once the call returns, together with its locals.
    assert_eq!(interpreter.run("x").unwrap(), Value::Integer(1));
    assert_eq!(variable(&interpreter, "inner"), None);
    assert_eq!(variable(&interpreter, "n"), None);
}

#[test]
fn test_call_rolls_back_on_error() {
    let mut interpreter = Interpreter::default();
    run_all(
        &mut interpreter,
        &["x = 1", "fun fail() { x = 99 \n helper = 1 \n x / 0 }"],
    )
    .unwrap();
    assert_eq!(
        interpreter.run("fail()"),
        Err(Error::Runtime(RuntimeError::DivisionByZero))
    );
    assert_eq!(variable(&interpreter, "x"), Some(Value::Integer(1)));
    assert_eq!(variable(&interpreter, "helper"), None);
}

#[test]
fn test_functions_defined_inside_calls_are_discarded() {
    assert_raises_error(
        &["fun outer() { fun inner() 1 \n inner() }", "outer()", "inner()"],
        RuntimeError::UndefinedFunction("inner".to_string()),
    );
}

#[test]
fn test_arguments_use_caller_scope() {
    assert_evaluates_to(
        &["n = 10", "fun add(n, m) n + m", "add(n + 1, n)"],
        Value::Integer(21),
    );
}

#[test]
fn test_dynamic_scope() {
    // The callee sees the caller's parameters, not the definition site's.
    assert_evaluates_to(
        &["fun show() n", "fun wrap(n) show()", "wrap(42)"],
        Value::Integer(42),
    );
}

#[test]
fn test_recursion() {
    assert_evaluates_to(
        &[
            "fun fact(n) if (n <= 1) 1 else n * fact(n - 1)",
            "fact(10)",
        ],
        Value::Integer(3628800),
    );
    assert_evaluates_to(
        &[
            "fun fib(n) { if (n < 2) n else fib(n - 1) + fib(n - 2) }",
            "fib(15)",
        ],
        Value::Integer(610),
    );
}

#[test]
fn test_recursion_limit() {
    let config = Config {
        max_call_depth: 16,
        ..Config::default()
    };
    let mut interpreter = Interpreter::new(config);
    run_all(&mut interpreter, &["x = 0", "fun forever(n) { x = n \n forever(n + 1) }"]).unwrap();
    assert_eq!(
        interpreter.run("forever(0)"),
        Err(Error::Runtime(RuntimeError::RecursionLimit(16)))
    );
    assert_eq!(variable(&interpreter, "x"), Some(Value::Integer(0)));
    assert!(interpreter.run("forever(0) + 1").is_err());
}

#[test]
fn test_errors_keep_committed_state() {
    let mut interpreter = Interpreter::default();
    assert!(interpreter.run("{ a = 1 \n b = missing }").is_err());
    assert_eq!(variable(&interpreter, "a"), Some(Value::Integer(1)));
    assert_eq!(variable(&interpreter, "b"), None);
}

#[test]
fn test_parse_errors_do_not_touch_environment() {
    let mut interpreter = Interpreter::default();
    interpreter.run("x = 1").unwrap();
    assert!(matches!(interpreter.run("x = 2 +"), Err(Error::Parse(_))));
    assert!(matches!(interpreter.run("x = 2 $"), Err(Error::Parse(_))));
    assert_eq!(interpreter.run("x").unwrap(), Value::Integer(1));
    assert_eq!(interpreter.environment().len(), 1);
}
