//! faxc-lex - Lexical Analyzer (Lexer/Tokenizer)
//!
//! Scans a source string into a flat vector of [`Token`]s. Single pass,
//! no backtracking: whitespace and comments are consumed and dropped,
//! everything else becomes exactly one token.

use faxc_util::diagnostic::{DiagnosticCode, Handler};
use faxc_util::{Span, Symbol};
use thiserror::Error;

/// The syntactic category of a [`Token`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenCategory {
    Punctuator,
    Keyword,
    Identifier,
    Operator,
    IntegerLiteral,
    FloatLiteral,
    BooleanLiteral,
    StringLiteral,
    LineComment,
    BlockComment,
    Unknown,
}

/// A single lexeme together with its category and source line.
///
/// `value` holds the literal text of the lexeme. For `Identifier` and
/// `StringLiteral` this is accompanied by the interned [`Symbol`] form;
/// every other category keeps only the owned `String` since it is read
/// once and discarded.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub category: TokenCategory,
    pub value: String,
    pub line: u32,
    pub symbol: Option<Symbol>,
}

impl Token {
    fn new(category: TokenCategory, value: impl Into<String>, line: u32) -> Self {
        Self {
            category,
            value: value.into(),
            line,
            symbol: None,
        }
    }

    fn interned(category: TokenCategory, value: String, line: u32) -> Self {
        let symbol = Symbol::intern(&value);
        Self {
            category,
            value,
            line,
            symbol: Some(symbol),
        }
    }
}

#[derive(Debug, Error)]
pub enum LexError {
    #[error("unexpected character '{ch}' on line {line}")]
    UnexpectedCharacter { ch: char, line: u32 },
    #[error("unterminated string literal starting on line {line}")]
    UnterminatedString { line: u32 },
}

pub type LexResult<T> = Result<T, LexError>;

const KEYWORDS: &[&str] = &[
    "uint8", "uint16", "uint32", "uint64", "int8", "int16", "int32", "int64", "float8", "float16",
    "float32", "float64", "bool", "string", "ptr", "ref", "as", "void", "static", "const", "if",
    "else", "for", "while", "return", "break", "continue", "use", "module", "class", "public",
    "protected", "private", "constructor", "destructor",
];

/// Operators, longest-first so greedy matching finds `==` before `=`.
const OPERATORS: &[&str] = &[
    "==", "!=", "<=", ">=", "+=", "-=", "*=", "/=", "%=", "=", "!", "+", "-", "*", "/", "%", "<",
    ">",
];

const PUNCTUATORS: &[&str] = &[";", ".", ",", "(", ")", "{", "}", "[", "]"];

/// Scans a source string into tokens, reporting the first unknown
/// character or unterminated string through the borrowed [`Handler`].
pub struct Lexer<'a> {
    source: Vec<char>,
    position: usize,
    line: u32,
    handler: &'a Handler,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &str, handler: &'a Handler) -> Self {
        Self {
            source: source.chars().collect(),
            position: 0,
            line: 1,
            handler,
        }
    }

    /// Tokenize the whole source. Returns `Ok(tokens)` with comments
    /// dropped, or the first [`LexError`] encountered.
    pub fn tokenize(mut self) -> LexResult<Vec<Token>> {
        let mut tokens = Vec::new();
        while !self.is_at_end() {
            self.skip_whitespace();
            if self.is_at_end() {
                break;
            }
            if let Some(token) = self.next_token()? {
                tokens.push(token);
            }
        }
        Ok(tokens)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.source.len()
    }

    fn peek(&self) -> Option<char> {
        self.source.get(self.position).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.source.get(self.position + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn next_token(&mut self) -> LexResult<Option<Token>> {
        let line = self.line;
        let c = self.peek().expect("checked by caller");

        if c == '/' && self.peek_at(1) == Some('/') {
            self.lex_line_comment();
            return Ok(None);
        }
        if c == '/' && self.peek_at(1) == Some('*') {
            self.lex_block_comment();
            return Ok(None);
        }
        if c == '"' {
            return self.lex_string(line).map(Some);
        }
        if c.is_ascii_digit() {
            return Ok(Some(self.lex_number(line)));
        }
        if c.is_alphabetic() || c == '_' {
            return Ok(Some(self.lex_identifier(line)));
        }
        if let Some(tok) = self.lex_operator(line) {
            return Ok(Some(tok));
        }
        if let Some(tok) = self.lex_punctuator(line) {
            return Ok(Some(tok));
        }

        self.advance();
        self.report_unexpected_char(line, c);
        Err(LexError::UnexpectedCharacter { ch: c, line })
    }

    fn lex_line_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    fn lex_block_comment(&mut self) {
        self.advance(); // '/'
        self.advance(); // '*'
        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_at(1) == Some('/') {
                self.advance();
                self.advance();
                return;
            }
            self.advance();
        }
    }

    fn lex_string(&mut self, line: u32) -> LexResult<Token> {
        self.advance(); // opening quote
        let mut value = String::new();
        loop {
            match self.peek() {
                Some('"') => {
                    self.advance();
                    return Ok(Token::interned(TokenCategory::StringLiteral, value, line));
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
                None => {
                    self.report_unterminated_string(line);
                    return Err(LexError::UnterminatedString { line });
                }
            }
        }
    }

    fn lex_number(&mut self, line: u32) -> Token {
        let mut value = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                value.push(c);
                self.advance();
            } else {
                break;
            }
        }
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            value.push('.');
            self.advance();
            while let Some(c) = self.peek() {
                if c.is_ascii_digit() {
                    value.push(c);
                    self.advance();
                } else {
                    break;
                }
            }
            return Token::new(TokenCategory::FloatLiteral, value, line);
        }
        Token::new(TokenCategory::IntegerLiteral, value, line)
    }

    fn lex_identifier(&mut self, line: u32) -> Token {
        let mut value = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                value.push(c);
                self.advance();
            } else {
                break;
            }
        }
        if value == "true" || value == "false" {
            return Token::new(TokenCategory::BooleanLiteral, value, line);
        }
        if KEYWORDS.contains(&value.as_str()) {
            return Token::new(TokenCategory::Keyword, value, line);
        }
        Token::interned(TokenCategory::Identifier, value, line)
    }

    /// Greedily grow the lexeme while it is still a member of [`OPERATORS`].
    fn lex_operator(&mut self, line: u32) -> Option<Token> {
        let mut best: Option<String> = None;
        let mut candidate = String::new();
        let mut offset = 0;
        loop {
            let Some(c) = self.peek_at(offset) else { break };
            candidate.push(c);
            if OPERATORS.contains(&candidate.as_str()) {
                best = Some(candidate.clone());
                offset += 1;
            } else {
                break;
            }
        }
        let lexeme = best?;
        for _ in 0..lexeme.chars().count() {
            self.advance();
        }
        Some(Token::new(TokenCategory::Operator, lexeme, line))
    }

    fn lex_punctuator(&mut self, line: u32) -> Option<Token> {
        let c = self.peek()?;
        let s = c.to_string();
        if PUNCTUATORS.contains(&s.as_str()) {
            self.advance();
            return Some(Token::new(TokenCategory::Punctuator, s, line));
        }
        None
    }

    fn report_unexpected_char(&self, line: u32, ch: char) {
        self.handler
            .build_error(
                Span::point(line, 0),
                format!("unexpected character '{ch}' while scanning"),
            )
            .code(DiagnosticCode::E_LEXER_UNEXPECTED_CHAR)
            .emit(self.handler);
    }

    fn report_unterminated_string(&self, line: u32) {
        self.handler
            .build_error(Span::point(line, 0), "unterminated string literal")
            .code(DiagnosticCode::E_LEXER_UNTERMINATED_STRING)
            .emit(self.handler);
    }
}
