mod environment;
mod error;
mod value;

use std::cmp::Ordering;

use log::debug;

use crate::config::Config;
use crate::error::Error;
use crate::parser::{parse, tokenize_string, Block, Comparison, Expression, Operator, Statement};

pub use environment::{Binding, Environment, FunctionDefinition};
pub use error::RuntimeError;
pub use value::Value;

/// Walks syntax trees against one session's environment.
#[derive(Debug, Default)]
pub struct Interpreter {
    environment: Environment,
    config: Config,
    depth: usize,
}

impl Interpreter {
    pub fn new(config: Config) -> Self {
        Self::with_environment(Environment::new(), config)
    }

    pub fn with_environment(environment: Environment, config: Config) -> Self {
        Self {
            environment,
            config,
            depth: 0,
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn into_environment(self) -> Environment {
        self.environment
    }

    /// Tokenizes, parses and evaluates a single statement.
    ///
    /// Lexical and syntax errors leave the environment untouched. Runtime
    /// errors keep whatever completed before the failure, except for changes
    /// made inside a function call, which are always rolled back.
    pub fn run(&mut self, source: &str) -> Result<Value, Error> {
        let tokens = tokenize_string(source)?;
        let statement = parse(&tokens, self.config.max_nesting)?;
        Ok(self.evaluate(&statement)?)
    }

    pub fn evaluate(&mut self, statement: &Statement) -> Result<Value, RuntimeError> {
        match statement {
            Statement::Assignment(name, expr) => {
                let value = self.evaluate_expr(expr)?;
                self.environment.assign(name, value.clone());
                Ok(value)
            }
            Statement::If(condition, then_stmt, else_stmt) => {
                if self.evaluate_comparison(condition)? {
                    self.evaluate(then_stmt)
                } else if let Some(else_stmt) = else_stmt {
                    self.evaluate(else_stmt)
                } else {
                    Ok(Value::Unit)
                }
            }
            Statement::While(condition, body) => self.evaluate_while(condition, body),
            Statement::FunctionDefinition(name, params, body) => {
                debug!("Defining function '{}' with parameters {:?}", name, params);
                self.environment.define_function(
                    name,
                    FunctionDefinition {
                        params: params.clone(),
                        body: body.clone(),
                    },
                );
                Ok(Value::Unit)
            }
            Statement::Block(block) => self.evaluate_block(block),
            Statement::Comparison(comparison) => {
                self.evaluate_comparison(comparison).map(Value::Boolean)
            }
            Statement::Expression(expr) => self.evaluate_expr(expr),
        }
    }

    fn evaluate_block(&mut self, block: &Block) -> Result<Value, RuntimeError> {
        let mut result = Value::Unit;
        for stmt in &block.0 {
            result = self.evaluate(stmt)?;
        }
        Ok(result)
    }

    fn evaluate_while(&mut self, condition: &Comparison, body: &Block) -> Result<Value, RuntimeError> {
        let mut iterations = 0;
        while self.evaluate_comparison(condition)? {
            if iterations >= self.config.max_iterations {
                return Err(RuntimeError::InfiniteLoop(iterations));
            }
            self.evaluate_block(body)?;
            iterations += 1;
        }
        debug!("Loop completed after {} iterations", iterations);
        Ok(Value::Loop(iterations))
    }

    fn evaluate_comparison(&mut self, comparison: &Comparison) -> Result<bool, RuntimeError> {
        let left = self.evaluate_expr(&comparison.left)?;
        let right = self.evaluate_expr(&comparison.right)?;
        compare(comparison.op, &left, &right)
    }

    pub fn evaluate_expr(&mut self, expression: &Expression) -> Result<Value, RuntimeError> {
        match expression {
            Expression::BinaryExpr(op, lhs, rhs) | Expression::BinaryTerm(op, lhs, rhs) => {
                let left = self.evaluate_expr(lhs)?;
                let right = self.evaluate_expr(rhs)?;
                arithmetic(*op, left, right)
            }
            Expression::Call(name, args) => self.call(name, args),
            Expression::Integer(value) => Ok(Value::Integer(*value)),
            Expression::Name(name) => self.environment.value(name),
            Expression::Paren(inner) => self.evaluate_expr(inner),
        }
    }

    // Calls are dynamically scoped: the body runs against the live
    // environment plus the parameters, and everything it changed is thrown
    // away afterwards, error or not.
    fn call(&mut self, name: &str, args: &[Expression]) -> Result<Value, RuntimeError> {
        let function = self.environment.function(name)?;
        let args = args
            .iter()
            .map(|arg| self.evaluate_expr(arg))
            .collect::<Result<Vec<_>, _>>()?;
        if args.len() != function.params.len() {
            return Err(RuntimeError::ArityMismatch {
                name: name.to_string(),
                expected: function.params.len(),
                found: args.len(),
            });
        }
        if self.depth >= self.config.max_call_depth {
            return Err(RuntimeError::RecursionLimit(self.config.max_call_depth));
        }

        debug!("Calling '{}' with {:?}", name, args);
        let snapshot = self.environment.clone();
        for (param, arg) in function.params.iter().zip(args) {
            self.environment.assign(param, arg);
        }
        self.depth += 1;
        let result = self.evaluate(&function.body);
        self.depth -= 1;
        self.environment = snapshot;
        debug!("Returned from '{}', environment restored", name);
        result
    }
}

fn arithmetic(op: Operator, left: Value, right: Value) -> Result<Value, RuntimeError> {
    if let (Value::Integer(a), Value::Integer(b)) = (&left, &right) {
        let result = match op {
            Operator::Plus => a.checked_add(*b),
            Operator::Minus => a.checked_sub(*b),
            Operator::Star => a.checked_mul(*b),
            Operator::Slash => return divide(*a as f64, *b as f64),
            _ => return Err(RuntimeError::UnknownOperator(op)),
        };
        return result
            .map(Value::Integer)
            .ok_or(RuntimeError::ArithmeticOverflow(op));
    }
    let (a, b) = (left.as_real(op)?, right.as_real(op)?);
    match op {
        Operator::Plus => Ok(Value::Real(a + b)),
        Operator::Minus => Ok(Value::Real(a - b)),
        Operator::Star => Ok(Value::Real(a * b)),
        Operator::Slash => divide(a, b),
        _ => Err(RuntimeError::UnknownOperator(op)),
    }
}

fn divide(a: f64, b: f64) -> Result<Value, RuntimeError> {
    if b == 0.0 {
        return Err(RuntimeError::DivisionByZero);
    }
    Ok(Value::Real(a / b))
}

fn compare(op: Operator, left: &Value, right: &Value) -> Result<bool, RuntimeError> {
    let ordering = match (left, right) {
        (Value::Boolean(a), Value::Boolean(b)) => {
            return match op {
                Operator::Equal => Ok(a == b),
                Operator::NotEqual => Ok(a != b),
                _ => Err(RuntimeError::TypeError {
                    operator: op,
                    found: left.type_name(),
                }),
            };
        }
        (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
        _ => left.as_real(op)?.partial_cmp(&right.as_real(op)?),
    };
    match op {
        Operator::Less => Ok(ordering == Some(Ordering::Less)),
        Operator::LessEqual => Ok(matches!(ordering, Some(Ordering::Less | Ordering::Equal))),
        Operator::Greater => Ok(ordering == Some(Ordering::Greater)),
        Operator::GreaterEqual => Ok(matches!(
            ordering,
            Some(Ordering::Greater | Ordering::Equal)
        )),
        Operator::Equal => Ok(ordering == Some(Ordering::Equal)),
        Operator::NotEqual => Ok(ordering != Some(Ordering::Equal)),
        _ => Err(RuntimeError::UnknownOperator(op)),
    }
}

#[cfg(test)]
mod test;
