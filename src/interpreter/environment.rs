use std::collections::HashMap;
use std::rc::Rc;

use crate::parser::Statement;

use super::error::RuntimeError;
use super::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDefinition {
    pub params: Vec<String>,
    pub body: Rc<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    Value(Value),
    Function(FunctionDefinition),
}

/// All names visible to a session.
///
/// There is exactly one flat scope. Cloning it is how a function call takes
/// its snapshot; function bodies are shared, not copied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    bindings: HashMap<String, Binding>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Binds `name` to `value`, replacing whatever was there before.
    pub fn assign(&mut self, name: &str, value: Value) {
        self.bindings.insert(name.to_string(), Binding::Value(value));
    }

    pub fn define_function(&mut self, name: &str, function: FunctionDefinition) {
        self.bindings
            .insert(name.to_string(), Binding::Function(function));
    }

    pub fn value(&self, name: &str) -> Result<Value, RuntimeError> {
        match self.bindings.get(name) {
            Some(Binding::Value(value)) => Ok(value.clone()),
            Some(Binding::Function(_)) => Err(RuntimeError::FunctionAsValue(name.to_string())),
            None => Err(RuntimeError::UndefinedVariable(name.to_string())),
        }
    }

    pub fn function(&self, name: &str) -> Result<FunctionDefinition, RuntimeError> {
        match self.bindings.get(name) {
            Some(Binding::Function(function)) => Ok(function.clone()),
            Some(Binding::Value(_)) => Err(RuntimeError::NotAFunction(name.to_string())),
            None => Err(RuntimeError::UndefinedFunction(name.to_string())),
        }
    }
}
