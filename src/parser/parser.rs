//! Recursive descent parser for preprocessed COBOL-85 text.
//!
//! Builds a rowan GreenNode tree from tokens. Supports error recovery and
//! produces a lossless CST whose node kinds are the grammar productions
//! the ASG builder consumes.

use rowan::{GreenNode, GreenNodeBuilder, TextRange, TextSize};

use super::grammar;
use super::lexer::{Lexer, Token};
use super::syntax_kind::SyntaxKind;

/// Parse result containing the green tree and any errors.
#[derive(Debug, Clone)]
pub struct Parse {
    pub green: GreenNode,
    pub errors: Vec<ParseError>,
}

impl Parse {
    /// Get the root syntax node.
    pub fn syntax(&self) -> super::SyntaxNode {
        super::SyntaxNode::new_root(self.green.clone())
    }

    /// Check if parsing succeeded without errors.
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A syntax error with location and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub range: TextRange,
}

impl ParseError {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}

/// Parse preprocessed COBOL source into a CST.
pub fn parse_source(input: &str) -> Parse {
    let tokens: Vec<_> = Lexer::new(input).collect();
    let mut parser = Parser::new(&tokens);
    grammar::program::source_file(&mut parser);
    parser.finish()
}

/// The parser state.
pub(crate) struct Parser<'a> {
    tokens: &'a [Token<'a>],
    pos: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token<'a>]) -> Self {
        Self {
            tokens,
            pos: 0,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn finish(self) -> Parse {
        Parse {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    pub(crate) fn current(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    pub(crate) fn current_kind(&self) -> SyntaxKind {
        self.current().map(|t| t.kind).unwrap_or(SyntaxKind::ERROR)
    }

    pub(crate) fn current_text(&self) -> &str {
        self.current().map(|t| t.text).unwrap_or("")
    }

    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.current_kind() == kind
    }

    pub(crate) fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        kinds.contains(&self.current_kind())
    }

    pub(crate) fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Look ahead `n` non-trivia tokens (0 = current after trivia).
    pub(crate) fn nth(&self, n: usize) -> SyntaxKind {
        let mut idx = self.pos;
        let mut count = 0;
        while idx < self.tokens.len() {
            if !self.tokens[idx].kind.is_trivia() {
                if count == n {
                    return self.tokens[idx].kind;
                }
                count += 1;
            }
            idx += 1;
        }
        SyntaxKind::ERROR
    }

    /// A separator period: `.` followed by whitespace or end of input.
    /// Distinguishes the statement terminator from a `.` embedded in a
    /// picture string.
    pub(crate) fn at_separator_period(&self) -> bool {
        if !self.at(SyntaxKind::PERIOD) {
            return false;
        }
        match self.tokens.get(self.pos + 1) {
            None => true,
            Some(next) => next.kind.is_trivia(),
        }
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    pub(crate) fn bump(&mut self) {
        if let Some(token) = self.current() {
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    pub(crate) fn bump_any(&mut self) {
        self.bump();
    }

    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        self.skip_trivia();
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_any(&mut self, kinds: &[SyntaxKind]) -> bool {
        self.skip_trivia();
        if self.at_any(kinds) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            true
        } else {
            let found = self.current().map(|t| t.text).unwrap_or("end of file");
            self.error(format!("expected {}, found '{}'", kind_name(kind), found));
            false
        }
    }

    /// Expect a separator period and consume it.
    pub(crate) fn expect_period(&mut self) -> bool {
        self.skip_trivia();
        if self.at_separator_period() {
            self.bump();
            true
        } else {
            let found = self.current().map(|t| t.text).unwrap_or("end of file");
            self.error(format!("expected '.', found '{found}'"));
            false
        }
    }

    pub(crate) fn skip_trivia(&mut self) {
        while self.current().map(|t| t.kind.is_trivia()).unwrap_or(false) {
            self.bump();
        }
    }

    // =========================================================================
    // Error handling
    // =========================================================================

    pub(crate) fn error(&mut self, message: impl Into<String>) {
        let range = self
            .current()
            .map(|t| TextRange::at(t.offset, TextSize::of(t.text)))
            .unwrap_or_else(|| TextRange::empty(TextSize::new(0)));
        self.errors.push(ParseError::new(message, range));
    }

    pub(crate) fn error_recover(&mut self, message: impl Into<String>, recovery: &[SyntaxKind]) {
        self.error(message);
        self.builder.start_node(SyntaxKind::ERROR.into());
        let mut consumed = false;
        while !self.at_eof() && !self.at_any(recovery) && !self.at_separator_period() {
            self.bump_any();
            consumed = true;
        }
        // Consume one token if nothing else made progress, to prevent
        // infinite loops.
        if !consumed && !self.at_eof() && !self.at_any(recovery) && !self.at_separator_period() {
            self.bump_any();
        }
        self.builder.finish_node();
    }

    // =========================================================================
    // Node building helpers
    // =========================================================================

    pub(crate) fn start_node(&mut self, kind: SyntaxKind) {
        self.builder.start_node(kind.into());
    }

    pub(crate) fn finish_node(&mut self) {
        self.builder.finish_node();
    }
}

/// Human-readable name for error messages.
pub(crate) fn kind_name(kind: SyntaxKind) -> &'static str {
    match kind {
        SyntaxKind::WHITESPACE => "whitespace",
        SyntaxKind::WORD => "a name",
        SyntaxKind::INTEGER => "an integer",
        SyntaxKind::DECIMAL => "a number",
        SyntaxKind::STRING => "a literal",
        SyntaxKind::PERIOD => "'.'",
        SyntaxKind::LPAREN => "'('",
        SyntaxKind::RPAREN => "')'",
        SyntaxKind::EQ => "'='",
        SyntaxKind::DIVISION_KW => "'DIVISION'",
        SyntaxKind::SECTION_KW => "'SECTION'",
        SyntaxKind::PROGRAM_ID_KW => "'PROGRAM-ID'",
        SyntaxKind::PROGRAM_KW => "'PROGRAM'",
        SyntaxKind::TO_KW => "'TO'",
        SyntaxKind::FROM_KW => "'FROM'",
        SyntaxKind::BY_KW => "'BY'",
        SyntaxKind::INTO_KW => "'INTO'",
        SyntaxKind::KEY_KW => "'KEY'",
        SyntaxKind::STATUS_KW => "'STATUS'",
        SyntaxKind::UNTIL_KW => "'UNTIL'",
        SyntaxKind::END_EXEC_KW => "'END-EXEC'",
        SyntaxKind::END_PERFORM_KW => "'END-PERFORM'",
        SyntaxKind::RUN_KW => "'RUN'",
        _ => "token",
    }
}
