use std::cell::{Cell, RefCell};

use super::error::ParseError;
use super::tokenizer::{Token, TokenType};

#[derive(Debug)]
pub enum ParseResult<'a, Output> {
    Ok((Output, ParserInput<'a>)),
    Err,
}

/// The furthest point any alternative got to before failing, and what it
/// would have accepted there.
#[derive(Debug, Default)]
pub struct Failure {
    fatal: Option<ParseError>,
    remaining: Option<usize>,
    found: Option<Token>,
    expected: Vec<String>,
}

impl Failure {
    fn record(&mut self, rest: &[Token], expected: &str) {
        if self.remaining.map_or(true, |r| rest.len() < r) {
            self.remaining = Some(rest.len());
            self.found = rest.first().cloned();
            self.expected.clear();
        }
        if self.remaining == Some(rest.len()) && !self.expected.iter().any(|e| e == expected) {
            self.expected.push(expected.to_string());
        }
    }

    pub(super) fn into_error(self) -> ParseError {
        if let Some(error) = self.fatal {
            return error;
        }
        let token = self.found.unwrap_or_default();
        ParseError::Syntax {
            found: token.describe(),
            expected: self.expected,
            location: token.span.start,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ParserState<'a> {
    failure: &'a RefCell<Failure>,
    depth: &'a Cell<usize>,
    max_depth: usize,
}

impl<'a> ParserState<'a> {
    pub fn new(failure: &'a RefCell<Failure>, depth: &'a Cell<usize>, max_depth: usize) -> Self {
        Self {
            failure,
            depth,
            max_depth,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ParserInput<'a>(&'a [Token], ParserState<'a>);

impl<'a> ParserInput<'a> {
    pub fn new(input: &'a [Token], state: ParserState<'a>) -> Self {
        Self(input, state)
    }

    fn skip(self) -> Self {
        Self(&self.0[1..], self.1)
    }

    fn report_failure(&self, expected: &str) {
        self.1.failure.borrow_mut().record(self.0, expected);
    }

    /// Records an error that wins over any plain mismatch.
    pub(super) fn report_error(&self, error: ParseError) {
        self.1.failure.borrow_mut().fatal.get_or_insert(error);
    }

    /// Runs `parser` one nesting level deeper, failing with `TooDeep` once
    /// the configured limit is reached.
    pub(super) fn nested<T>(
        self,
        parser: impl FnOnce(Self) -> ParseResult<'a, T>,
    ) -> ParseResult<'a, T> {
        let depth = self.1.depth.get();
        if depth >= self.1.max_depth {
            self.report_error(ParseError::TooDeep {
                limit: self.1.max_depth,
                location: self.0.first().map(|t| t.span.start).unwrap_or_default(),
            });
            return ParseResult::Err;
        }
        self.1.depth.set(depth + 1);
        let result = parser(self);
        self.1.depth.set(depth);
        result
    }
}

impl<'a, T> ParseResult<'a, T> {
    pub(super) fn or_else<O>(self, op: O) -> Self
    where
        O: FnOnce() -> Self,
    {
        match self {
            Self::Ok(inner) => Self::Ok(inner),
            Self::Err => op(),
        }
    }
    pub(super) fn map<U, F>(self, op: F) -> ParseResult<'a, U>
    where
        F: FnOnce((T, ParserInput<'a>)) -> (U, ParserInput<'a>),
    {
        match self {
            Self::Ok(inner) => ParseResult::Ok(op(inner)),
            Self::Err => ParseResult::Err,
        }
    }
    pub(super) fn and_then<U, F>(self, op: F) -> ParseResult<'a, U>
    where
        F: FnOnce((T, ParserInput<'a>)) -> ParseResult<'a, U>,
    {
        match self {
            Self::Ok(inner) => op(inner),
            Self::Err => ParseResult::Err,
        }
    }
}

pub(super) trait Parser<'a, Output> {
    fn parse(&self, input: ParserInput<'a>) -> ParseResult<'a, Output>;
    fn map<F, MappedOutput>(self, map_fn: F) -> BoxedParser<'a, MappedOutput>
    where
        Self: Sized + 'a,
        Output: 'a,
        MappedOutput: 'a,
        F: Fn(Output) -> MappedOutput + 'a,
    {
        BoxedParser::new(map(self, map_fn))
    }
    fn or(self, parser: impl Parser<'a, Output> + 'a) -> BoxedParser<'a, Output>
    where
        Self: Sized + 'a,
        Output: 'a,
    {
        let alternative =
            move |input: ParserInput<'a>| self.parse(input).or_else(|| parser.parse(input));
        BoxedParser::new(alternative)
    }
}

impl<'a, F, Output> Parser<'a, Output> for F
where
    F: Fn(ParserInput<'a>) -> ParseResult<'a, Output>,
{
    fn parse(&self, input: ParserInput<'a>) -> ParseResult<'a, Output> {
        self(input)
    }
}

pub(super) struct BoxedParser<'a, Output> {
    parser: Box<dyn Parser<'a, Output> + 'a>,
}

impl<'a, Output> BoxedParser<'a, Output> {
    fn new(parser: impl Parser<'a, Output> + 'a) -> Self {
        Self {
            parser: Box::new(parser),
        }
    }
}

impl<'a, Output> Parser<'a, Output> for BoxedParser<'a, Output> {
    fn parse(&self, input: ParserInput<'a>) -> ParseResult<'a, Output> {
        self.parser.parse(input)
    }
}

pub(super) fn pair<'a, R1, R2>(
    parser1: impl Parser<'a, R1>,
    parser2: impl Parser<'a, R2>,
) -> impl Parser<'a, (R1, R2)> {
    move |input: ParserInput<'a>| {
        parser1.parse(input).and_then(|(result1, next_input)| {
            parser2
                .parse(next_input)
                .map(|(result2, rest)| ((result1, result2), rest))
        })
    }
}

pub(super) fn map<'a, F, A, B>(parser: impl Parser<'a, A>, map_fn: F) -> impl Parser<'a, B>
where
    F: Fn(A) -> B,
{
    move |input: ParserInput<'a>| {
        parser
            .parse(input)
            .map(|(result, rest)| (map_fn(result), rest))
    }
}

pub(super) fn left<'a, A, B>(
    left_parser: impl Parser<'a, A>,
    right_parser: impl Parser<'a, B>,
) -> impl Parser<'a, A> {
    map(pair(left_parser, right_parser), |(left, _right)| left)
}

pub(super) fn right<'a, A, B>(
    left_parser: impl Parser<'a, A>,
    right_parser: impl Parser<'a, B>,
) -> impl Parser<'a, B> {
    map(pair(left_parser, right_parser), |(_left, right)| right)
}

pub(super) fn zero_or_more<'a, R>(parser: impl Parser<'a, R>) -> impl Parser<'a, Vec<R>> {
    move |input: ParserInput<'a>| {
        let mut result = Vec::new();
        let mut tmp_input = input;
        while let ParseResult::Ok((next, rest)) = parser.parse(tmp_input) {
            tmp_input = rest;
            result.push(next);
        }
        ParseResult::Ok((result, tmp_input))
    }
}

pub(super) fn maybe<'a, R>(parser: impl Parser<'a, R>) -> impl Parser<'a, Option<R>> {
    move |input: ParserInput<'a>| match parser.parse(input) {
        ParseResult::Ok((value, rest)) => ParseResult::Ok((Some(value), rest)),
        ParseResult::Err => ParseResult::Ok((None, input)),
    }
}

pub(super) fn tok<'a>(expected_type: TokenType) -> impl Parser<'a, Token> {
    move |input: ParserInput<'a>| match input.0.first() {
        Some(token) if token.typ == expected_type => {
            ParseResult::Ok((token.clone(), input.skip()))
        }
        _ => {
            input.report_failure(&expected_type.describe());
            ParseResult::Err
        }
    }
}

pub(super) fn token<'a>(
    expected_type: TokenType,
    expected_lexeme: &'static str,
) -> impl Parser<'a, ()> {
    move |input: ParserInput<'a>| match input.0.first() {
        Some(token) if token.typ == expected_type && token.lexeme.as_str() == expected_lexeme => {
            ParseResult::Ok(((), input.skip()))
        }
        _ => {
            input.report_failure(&format!("'{expected_lexeme}'"));
            ParseResult::Err
        }
    }
}

pub(super) fn sep_by<'a, R>(
    parser: impl Parser<'a, R>,
    sep: TokenType,
) -> impl Parser<'a, Vec<R>> {
    move |input: ParserInput<'a>| {
        if let ParseResult::Ok((first, rest)) = parser.parse(input) {
            let mut result = vec![first];
            let mut tmp_input = rest;
            while let ParseResult::Ok((next, rest)) =
                tok(sep).parse(tmp_input).and_then(|(_, s)| parser.parse(s))
            {
                tmp_input = rest;
                result.push(next)
            }
            return ParseResult::Ok((result, tmp_input));
        }
        ParseResult::Err
    }
}
