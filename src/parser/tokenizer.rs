use super::error::ParseError;
use super::locations::{Location, Span};
use const_format::concatcp;
use derivative::Derivative;
use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Derivative, Clone, Default, Debug)]
#[derivative(PartialEq)]
pub struct Token {
    pub(crate) typ: TokenType,
    pub(crate) lexeme: String,
    #[derivative(PartialEq = "ignore")]
    pub(crate) span: Span,
}

impl Token {
    #[cfg(test)]
    pub(crate) fn new(typ: TokenType, lexeme: &str) -> Self {
        Self {
            typ,
            lexeme: lexeme.to_string(),
            span: Span::default(),
        }
    }

    pub fn typ(&self) -> TokenType {
        self.typ
    }

    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    pub fn span(&self) -> Span {
        self.span
    }

    /// How the token is named in a syntax error.
    pub(crate) fn describe(&self) -> String {
        match self.typ {
            TokenType::ENDMARKER => "end of input".to_string(),
            _ => format!("'{}'", self.lexeme),
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}('{}')", self.typ, self.lexeme)
    }
}

#[allow(non_camel_case_types)]
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum TokenType {
    #[default]
    ENDMARKER,
    NAME,
    NUMBER,
    KEYWORD,
    LPAR,
    RPAR,
    LBRACE,
    RBRACE,
    COMMA,
    PLUS,
    MINUS,
    STAR,
    SLASH,
    LESS,
    GREATER,
    EQUAL,
    EQEQUAL,
    NOTEQUAL,
    LESSEQUAL,
    GREATEREQUAL,
}

impl TokenType {
    pub(crate) fn describe(self) -> String {
        match self {
            Self::ENDMARKER => "end of input".to_string(),
            Self::NAME => "identifier".to_string(),
            Self::NUMBER => "integer".to_string(),
            Self::KEYWORD => "keyword".to_string(),
            _ => SIMPLE_TOKENS
                .iter()
                .find(|(_, typ)| *typ == self)
                .map_or("symbol".to_string(), |(lexeme, _)| format!("'{lexeme}'")),
        }
    }
}

pub(crate) const KW_IF: &str = "if";
pub(crate) const KW_ELSE: &str = "else";
pub(crate) const KW_WHILE: &str = "while";
pub(crate) const KW_FUN: &str = "fun";

const EQEQUAL: (&str, TokenType) = ("==", TokenType::EQEQUAL);
const NOTEQUAL: (&str, TokenType) = ("!=", TokenType::NOTEQUAL);
const LESSEQUAL: (&str, TokenType) = ("<=", TokenType::LESSEQUAL);
const GREATEREQUAL: (&str, TokenType) = (">=", TokenType::GREATEREQUAL);
const LPAR: (&str, TokenType) = ("(", TokenType::LPAR);
const RPAR: (&str, TokenType) = (")", TokenType::RPAR);
const LBRACE: (&str, TokenType) = ("{", TokenType::LBRACE);
const RBRACE: (&str, TokenType) = ("}", TokenType::RBRACE);
const COMMA: (&str, TokenType) = (",", TokenType::COMMA);
const PLUS: (&str, TokenType) = ("+", TokenType::PLUS);
const MINUS: (&str, TokenType) = ("-", TokenType::MINUS);
const STAR: (&str, TokenType) = ("*", TokenType::STAR);
const SLASH: (&str, TokenType) = ("/", TokenType::SLASH);
const LESS: (&str, TokenType) = ("<", TokenType::LESS);
const GREATER: (&str, TokenType) = (">", TokenType::GREATER);
const EQUAL: (&str, TokenType) = ("=", TokenType::EQUAL);

// Two-character operators first, so that "<=" never lexes as "<" "=".
const SIMPLE_TOKENS: [(&str, TokenType); 16] = [
    EQEQUAL,
    NOTEQUAL,
    LESSEQUAL,
    GREATEREQUAL,
    LPAR,
    RPAR,
    LBRACE,
    RBRACE,
    COMMA,
    PLUS,
    MINUS,
    STAR,
    SLASH,
    LESS,
    GREATER,
    EQUAL,
];

macro_rules! alternative {
    ($t:expr) => {{
        $t
    }};
    ($t:expr, $($ts:expr),+) => {{
        concatcp!($t, "|", alternative!($($ts),+))
    }}
}

macro_rules! group {
    ($($ts:expr),+) => {{
        concatcp!(r"(", alternative!($($ts),+), ")")
    }}
}

const S_WHITESPACE: &str = r"^\s+";
const S_COMMENT: &str = r"^#[^\r\n]*";
const S_NAME: &str = r"^[A-Za-z_][A-Za-z0-9_]*";
const S_NUMBER: &str = r"^[0-9]+";
const S_KEYWORDS: &str = concatcp!("^", group!(KW_IF, KW_ELSE, KW_WHILE, KW_FUN), r"\b");

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(S_WHITESPACE).expect("Error compiling regex."));
static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(S_COMMENT).expect("Error compiling regex."));
static NAME: Lazy<Regex> = Lazy::new(|| Regex::new(S_NAME).expect("Error compiling regex."));
static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(S_NUMBER).expect("Error compiling regex."));
static KEYWORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(S_KEYWORDS).expect("Error compiling regex."));

/// Lazily splits a source string into tokens.
///
/// The last token produced is always an `ENDMARKER`. After an unrecognized
/// character the tokenizer reports the error once and then stops.
pub struct Tokenizer<'a> {
    source: &'a str,
    start: usize,
    location: Location,
    paren_lvl: isize,
    finished: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            start: 0,
            location: Location::new(1, 1),
            paren_lvl: 0,
            finished: false,
        }
    }

    fn rest(&self) -> &'a str {
        &self.source[self.start..]
    }

    fn advance(&mut self, len: usize) -> Span {
        let start = self.location;
        self.location = start.advanced_by(&self.source[self.start..self.start + len]);
        self.start += len;
        Span::new(start, self.location)
    }

    fn skip_trivia(&mut self) {
        while let Some(m) = WHITESPACE
            .find(self.rest())
            .or_else(|| COMMENT.find(self.rest()))
        {
            self.advance(m.end());
        }
    }

    fn push(&mut self, typ: TokenType, len: usize) -> Token {
        let lexeme = self.rest()[..len].to_string();
        let span = self.advance(len);
        match typ {
            TokenType::LPAR | TokenType::LBRACE => self.paren_lvl += 1,
            TokenType::RPAR | TokenType::RBRACE => self.paren_lvl -= 1,
            _ => {}
        }
        let token = Token { typ, lexeme, span };
        trace!("{} at {}", token, span);
        token
    }

    fn find_by_regex(&self, regex: &Regex) -> Option<usize> {
        regex.find(self.rest()).map(|m| m.end())
    }

    fn next_token(&mut self) -> Result<Token, ParseError> {
        self.skip_trivia();
        let Some(character) = self.rest().chars().next() else {
            self.finished = true;
            return Ok(Token {
                typ: TokenType::ENDMARKER,
                lexeme: String::new(),
                span: Span::new(self.location, self.location),
            });
        };

        if let Some(len) = self.find_by_regex(&KEYWORDS) {
            return Ok(self.push(TokenType::KEYWORD, len));
        }
        if let Some(len) = self.find_by_regex(&NUMBER) {
            return Ok(self.push(TokenType::NUMBER, len));
        }
        if let Some(len) = self.find_by_regex(&NAME) {
            return Ok(self.push(TokenType::NAME, len));
        }
        for (lexeme, typ) in SIMPLE_TOKENS {
            if self.rest().starts_with(lexeme) {
                return Ok(self.push(typ, lexeme.len()));
            }
        }

        self.finished = true;
        Err(ParseError::Lex {
            character,
            location: self.location,
        })
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Token, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        Some(self.next_token())
    }
}

pub fn tokenize_string(source: &str) -> Result<Vec<Token>, ParseError> {
    Tokenizer::new(source).collect()
}

/// Whether a chunk of input can be handed to the parser yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputState {
    /// Nothing but whitespace and comments.
    Empty,
    Complete,
    ContinuationNeeded,
}

/// Reports `ContinuationNeeded` while a `(` or `{` is still open.
///
/// Lexical errors count as complete so that the caller gets to see them.
pub fn check_input(source: &str) -> InputState {
    let mut tokenizer = Tokenizer::new(source);
    let mut tokens = 0;
    for token in tokenizer.by_ref() {
        match token {
            Err(_) => return InputState::Complete,
            Ok(token) if token.typ != TokenType::ENDMARKER => tokens += 1,
            Ok(_) => {}
        }
    }
    if tokens == 0 {
        InputState::Empty
    } else if tokenizer.paren_lvl > 0 {
        InputState::ContinuationNeeded
    } else {
        InputState::Complete
    }
}
