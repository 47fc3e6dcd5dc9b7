mod config;
pub use config::Config;

mod error;
pub use error::Error;

mod parser;
pub use parser::{
    check_input, parse, tokenize_string, Block, Comparison, Expression, InputState, Location,
    Operator, ParseError, Span, Statement, Token, TokenType, Tokenizer,
};

mod interpreter;
pub use interpreter::{Binding, Environment, FunctionDefinition, Interpreter, RuntimeError, Value};

/// Evaluates one statement against `environment` with the default limits.
///
/// On success the environment holds every binding the statement made. On
/// failure it keeps whatever was committed before the error; see
/// [`Interpreter::run`].
pub fn evaluate(source: &str, environment: &mut Environment) -> Result<Value, Error> {
    let mut interpreter =
        Interpreter::with_environment(std::mem::take(environment), Config::default());
    let result = interpreter.run(source);
    *environment = interpreter.into_environment();
    result
}
