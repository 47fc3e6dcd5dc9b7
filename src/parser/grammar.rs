// stmt        := assignment | ifStmt | whileStmt | funcDef | block
//              | comparison | expr
// assignment  := IDENT '=' expr
// ifStmt      := 'if' '(' comparison ')' stmt ('else' stmt)?
// whileStmt   := 'while' '(' comparison ')' block
// funcDef     := 'fun' IDENT '(' paramList? ')' stmt
// block       := '{' stmt* '}'
// comparison  := expr ('<'|'<='|'>'|'>='|'=='|'!=') expr
// expr        := expr ('+'|'-') term | term
// term        := term ('*'|'/') factor | factor
// factor      := functionCall | atom
// atom        := INT | IDENT | '(' expr ')'
// functionCall:= IDENT '(' argList? ')'
// paramList   := IDENT (',' IDENT)*
// argList     := expr (',' expr)*
//
// The left-recursive `expr` and `term` rules are parsed as an operand followed
// by a repetition of (operator, operand) pairs and folded to the left.
//
// Every recursive path passes through `stmt` or `expr`, so those two count
// nesting levels and refuse to go deeper than the limit given to `parse`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::debug;

use super::ast::*;
use super::combinators::*;
use super::error::ParseError;
use super::tokenizer::{Token, TokenType as TT, KW_ELSE, KW_FUN, KW_IF, KW_WHILE};

/// Parses exactly one statement spanning the whole token sequence, nested
/// at most `max_nesting` levels deep.
pub fn parse(tokens: &[Token], max_nesting: usize) -> Result<Statement, ParseError> {
    let failure = RefCell::new(Failure::default());
    let depth = Cell::new(0);
    let input = ParserInput::new(tokens, ParserState::new(&failure, &depth, max_nesting));
    let parsed = match left(stmt, tok(TT::ENDMARKER)).parse(input) {
        ParseResult::Ok((statement, _)) => Some(statement),
        ParseResult::Err => None,
    };
    match parsed {
        Some(statement) => {
            debug!("Parsed {:?}", statement);
            Ok(statement)
        }
        None => Err(failure.take().into_error()),
    }
}

fn stmt<'a>(input: ParserInput<'a>) -> ParseResult<'a, Statement> {
    input.nested(|input| {
        assignment
            .or(if_stmt)
            .or(while_stmt)
            .or(func_def)
            .or(block.map(Statement::Block))
            .or(expression_stmt)
            .parse(input)
    })
}

fn assignment<'a>(input: ParserInput<'a>) -> ParseResult<'a, Statement> {
    pair(left(tok(TT::NAME), tok(TT::EQUAL)), expr)
        .map(|(name, value)| Statement::Assignment(name.lexeme, value))
        .parse(input)
}

fn if_stmt<'a>(input: ParserInput<'a>) -> ParseResult<'a, Statement> {
    pair(
        pair(
            right(token(TT::KEYWORD, KW_IF), parenthesized(comparison)),
            stmt,
        ),
        maybe(right(token(TT::KEYWORD, KW_ELSE), stmt)),
    )
    .map(|((condition, then_stmt), else_stmt)| {
        Statement::If(condition, Box::new(then_stmt), else_stmt.map(Box::new))
    })
    .parse(input)
}

fn while_stmt<'a>(input: ParserInput<'a>) -> ParseResult<'a, Statement> {
    pair(
        right(token(TT::KEYWORD, KW_WHILE), parenthesized(comparison)),
        block,
    )
    .map(|(condition, body)| Statement::While(condition, body))
    .parse(input)
}

fn func_def<'a>(input: ParserInput<'a>) -> ParseResult<'a, Statement> {
    pair(
        pair(
            right(token(TT::KEYWORD, KW_FUN), tok(TT::NAME)),
            parenthesized(maybe(sep_by(tok(TT::NAME), TT::COMMA))),
        ),
        stmt,
    )
    .map(|((name, params), body)| {
        let params = params
            .unwrap_or_default()
            .into_iter()
            .map(|param| param.lexeme)
            .collect();
        Statement::FunctionDefinition(name.lexeme, params, Rc::new(body))
    })
    .parse(input)
}

fn block<'a>(input: ParserInput<'a>) -> ParseResult<'a, Block> {
    left(right(tok(TT::LBRACE), zero_or_more(stmt)), tok(TT::RBRACE))
        .map(Block)
        .parse(input)
}

// A bare comparison is accepted as a statement; the operator is optional so
// the left operand is only parsed once.
fn expression_stmt<'a>(input: ParserInput<'a>) -> ParseResult<'a, Statement> {
    pair(expr, maybe(pair(comparison_op, expr)))
        .map(|(left, rest)| match rest {
            Some((op, right)) => Statement::Comparison(Comparison { op, left, right }),
            None => Statement::Expression(left),
        })
        .parse(input)
}

fn comparison<'a>(input: ParserInput<'a>) -> ParseResult<'a, Comparison> {
    pair(pair(expr, comparison_op), expr)
        .map(|((left, op), right)| Comparison { op, left, right })
        .parse(input)
}

fn comparison_op<'a>(input: ParserInput<'a>) -> ParseResult<'a, Operator> {
    tok(TT::LESS)
        .or(tok(TT::LESSEQUAL))
        .or(tok(TT::GREATER))
        .or(tok(TT::GREATEREQUAL))
        .or(tok(TT::EQEQUAL))
        .or(tok(TT::NOTEQUAL))
        .map(Operator::from)
        .parse(input)
}

fn expr<'a>(input: ParserInput<'a>) -> ParseResult<'a, Expression> {
    input.nested(|input| {
        let operator = tok(TT::PLUS).or(tok(TT::MINUS)).map(Operator::from);
        pair(term, zero_or_more(pair(operator, term)))
            .map(|(first, rest)| {
                rest.into_iter().fold(first, |lhs, (op, rhs)| {
                    Expression::BinaryExpr(op, Box::new(lhs), Box::new(rhs))
                })
            })
            .parse(input)
    })
}

fn term<'a>(input: ParserInput<'a>) -> ParseResult<'a, Expression> {
    let operator = tok(TT::STAR).or(tok(TT::SLASH)).map(Operator::from);
    pair(factor, zero_or_more(pair(operator, factor)))
        .map(|(first, rest)| {
            rest.into_iter().fold(first, |lhs, (op, rhs)| {
                Expression::BinaryTerm(op, Box::new(lhs), Box::new(rhs))
            })
        })
        .parse(input)
}

fn factor<'a>(input: ParserInput<'a>) -> ParseResult<'a, Expression> {
    function_call.or(atom).parse(input)
}

fn function_call<'a>(input: ParserInput<'a>) -> ParseResult<'a, Expression> {
    pair(
        tok(TT::NAME),
        parenthesized(maybe(sep_by(expr, TT::COMMA))),
    )
    .map(|(name, args)| Expression::Call(name.lexeme, args.unwrap_or_default()))
    .parse(input)
}

fn atom<'a>(input: ParserInput<'a>) -> ParseResult<'a, Expression> {
    integer
        .or(tok(TT::NAME).map(|name| Expression::Name(name.lexeme)))
        .or(parenthesized(expr).map(|inner| Expression::Paren(Box::new(inner))))
        .parse(input)
}

fn integer<'a>(input: ParserInput<'a>) -> ParseResult<'a, Expression> {
    tok(TT::NUMBER)
        .parse(input)
        .and_then(|(token, rest)| match token.lexeme.parse() {
            Ok(value) => ParseResult::Ok((Expression::Integer(value), rest)),
            Err(_) => {
                input.report_error(ParseError::InvalidInteger {
                    literal: token.lexeme,
                    location: token.span.start,
                });
                ParseResult::Err
            }
        })
}

fn parenthesized<'a, R>(parser: impl Parser<'a, R>) -> impl Parser<'a, R> {
    left(right(tok(TT::LPAR), parser), tok(TT::RPAR))
}
