use std::rc::Rc;

use super::tokenizer::{Token, TokenType as TT};

/// One parsed top-level or nested statement.
///
/// Trees are never mutated after parsing; function bodies are shared with the
/// environment through `Rc`.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Assignment(String, Expression),
    If(Comparison, Box<Statement>, Option<Box<Statement>>),
    While(Comparison, Block),
    FunctionDefinition(String, Vec<String>, Rc<Statement>),
    Block(Block),
    Comparison(Comparison),
    Expression(Expression),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block(pub Vec<Statement>);

#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub op: Operator,
    pub left: Expression,
    pub right: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// `+` and `-` chains.
    BinaryExpr(Operator, Box<Expression>, Box<Expression>),
    /// `*` and `/` chains.
    BinaryTerm(Operator, Box<Expression>, Box<Expression>),
    Call(String, Vec<Expression>),
    Integer(i64),
    Name(String),
    Paren(Box<Expression>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Plus,
    Minus,
    Star,
    Slash,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Equal,
    NotEqual,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::Equal => "==",
            Self::NotEqual => "!=",
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Token> for Operator {
    fn from(value: Token) -> Self {
        match value.typ {
            TT::PLUS => Self::Plus,
            TT::MINUS => Self::Minus,
            TT::STAR => Self::Star,
            TT::SLASH => Self::Slash,
            TT::LESS => Self::Less,
            TT::LESSEQUAL => Self::LessEqual,
            TT::GREATER => Self::Greater,
            TT::GREATEREQUAL => Self::GreaterEqual,
            TT::EQEQUAL => Self::Equal,
            TT::NOTEQUAL => Self::NotEqual,
            _ => unreachable!(),
        }
    }
}
