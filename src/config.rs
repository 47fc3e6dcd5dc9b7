use derivative::Derivative;

/// Resource limits applied by the parser and the evaluator.
#[derive(Derivative, Debug, Clone, Copy, PartialEq, Eq)]
#[derivative(Default)]
pub struct Config {
    /// A `while` loop whose condition still holds after this many iterations
    /// is reported as infinite.
    #[derivative(Default(value = "1000"))]
    pub max_iterations: usize,
    /// Deepest allowed nesting of function calls.
    #[derivative(Default(value = "256"))]
    pub max_call_depth: usize,
    /// Deepest allowed nesting of statements and expressions in one input.
    #[derivative(Default(value = "100"))]
    pub max_nesting: usize,
}
