//! Logos-based lexer for preprocessed COBOL text.
//!
//! Fast tokenization using the logos crate. Reserved words are remapped
//! from WORD tokens via [`keywords::keyword_kind`] because COBOL words
//! are case-insensitive and may contain hyphens.

use logos::Logos;
use rowan::TextSize;

use super::keywords;
use super::syntax_kind::SyntaxKind;

/// A token with its kind, text, and position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: TextSize,
}

/// Lexer wrapping the logos-generated tokenizer.
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    offset: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
            offset: 0,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let offset = TextSize::new(self.offset);
        self.offset += text.len() as u32;

        let kind = match logos_token {
            Ok(LogosToken::Word) => {
                keywords::keyword_kind(text).unwrap_or(SyntaxKind::WORD)
            }
            Ok(token) => token.into(),
            Err(()) => SyntaxKind::ERROR,
        };

        Some(Token { kind, text, offset })
    }
}

/// Tokenize an entire string into a Vec.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Logos token enum - maps to SyntaxKind.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    // A COBOL word: names, verbs, picture strings. May start with a digit
    // ("01" level numbers lex as Integer by priority; "9V99" stays a word).
    #[regex(r"[A-Za-z0-9][A-Za-z0-9_-]*", priority = 2)]
    Word,

    #[regex(r"[0-9]+", priority = 3)]
    Integer,

    #[regex(r"[0-9]+\.[0-9]+", priority = 4)]
    Decimal,

    #[regex(r#""([^"]|"")*""#)]
    #[regex(r"'([^']|'')*'")]
    String,

    #[token(".")]
    Period,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token("=")]
    Eq,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("**")]
    Power,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("<=")]
    Le,
    #[token(">=")]
    Ge,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("$")]
    Currency,
}

impl From<LogosToken> for SyntaxKind {
    fn from(token: LogosToken) -> Self {
        match token {
            LogosToken::Whitespace => SyntaxKind::WHITESPACE,
            LogosToken::Word => SyntaxKind::WORD,
            LogosToken::Integer => SyntaxKind::INTEGER,
            LogosToken::Decimal => SyntaxKind::DECIMAL,
            LogosToken::String => SyntaxKind::STRING,
            LogosToken::Period => SyntaxKind::PERIOD,
            LogosToken::LParen => SyntaxKind::LPAREN,
            LogosToken::RParen => SyntaxKind::RPAREN,
            LogosToken::Comma => SyntaxKind::COMMA,
            LogosToken::Semicolon => SyntaxKind::SEMICOLON,
            LogosToken::Colon => SyntaxKind::COLON,
            LogosToken::Eq => SyntaxKind::EQ,
            LogosToken::Plus => SyntaxKind::PLUS,
            LogosToken::Minus => SyntaxKind::MINUS,
            LogosToken::Power => SyntaxKind::POWER,
            LogosToken::Star => SyntaxKind::STAR,
            LogosToken::Slash => SyntaxKind::SLASH,
            LogosToken::Le => SyntaxKind::LE,
            LogosToken::Ge => SyntaxKind::GE,
            LogosToken::Lt => SyntaxKind::LT,
            LogosToken::Gt => SyntaxKind::GT,
            LogosToken::Currency => SyntaxKind::CURRENCY,
        }
    }
}
