//! Directive-level token scanner.
//!
//! The preprocessor never parses COBOL proper; it only needs to see the
//! normalized stream as text-words so it can recognize directives and run
//! token-based replacement. The scanner honours both quote styles with
//! doubled-quote escapes, recognizes `==` pseudo-text delimiters, and
//! distinguishes the separator period (a `.` followed by whitespace or end
//! of input) from a `.` embedded in text.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PpTokenKind {
    /// A COBOL text-word: letters, digits, hyphens, underscores.
    Word,
    /// A quoted literal, including its quotes.
    Literal,
    /// `==`
    PseudoTextDelim,
    /// A separator period.
    Period,
    /// Any other single character.
    Punct,
}

/// One token of the normalized stream, with its byte range and 1-indexed
/// line/column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PpToken {
    pub kind: PpTokenKind,
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub column: u32,
}

impl PpToken {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

/// Tokenize `source` into preprocessor tokens. Whitespace is skipped; the
/// byte gaps between consecutive tokens let callers reproduce it verbatim.
pub(crate) fn scan(source: &str) -> Vec<PpToken> {
    let chars: Vec<(usize, char)> = source.char_indices().collect();
    let len = source.len();
    let at = |i: usize| chars.get(i).map(|&(_, c)| c);
    let offset = |i: usize| chars.get(i).map_or(len, |&(o, _)| o);

    let mut tokens = Vec::new();
    let mut i = 0;
    let mut line = 1u32;
    let mut column = 1u32;

    while i < chars.len() {
        let (start, c) = chars[i];
        let tok_line = line;
        let tok_column = column;
        match c {
            '\n' => {
                line += 1;
                column = 1;
                i += 1;
            }
            c if c.is_whitespace() => {
                column += 1;
                i += 1;
            }
            '\'' | '"' => {
                let quote = c;
                i += 1;
                column += 1;
                loop {
                    match at(i) {
                        None | Some('\n') => break,
                        Some(q) if q == quote => {
                            if at(i + 1) == Some(quote) {
                                i += 2;
                                column += 2;
                            } else {
                                i += 1;
                                column += 1;
                                break;
                            }
                        }
                        Some(_) => {
                            i += 1;
                            column += 1;
                        }
                    }
                }
                tokens.push(PpToken {
                    kind: PpTokenKind::Literal,
                    start,
                    end: offset(i),
                    line: tok_line,
                    column: tok_column,
                });
            }
            '=' if at(i + 1) == Some('=') => {
                i += 2;
                column += 2;
                tokens.push(PpToken {
                    kind: PpTokenKind::PseudoTextDelim,
                    start,
                    end: offset(i),
                    line: tok_line,
                    column: tok_column,
                });
            }
            '.' => {
                let kind = match at(i + 1) {
                    None => PpTokenKind::Period,
                    Some(next) if next.is_whitespace() => PpTokenKind::Period,
                    Some(_) => PpTokenKind::Punct,
                };
                i += 1;
                column += 1;
                tokens.push(PpToken {
                    kind,
                    start,
                    end: offset(i),
                    line: tok_line,
                    column: tok_column,
                });
            }
            c if is_word_start(c, at(i + 1)) => {
                while i < chars.len() && is_word_char(chars[i].1) {
                    i += 1;
                    column += 1;
                }
                tokens.push(PpToken {
                    kind: PpTokenKind::Word,
                    start,
                    end: offset(i),
                    line: tok_line,
                    column: tok_column,
                });
            }
            _ => {
                i += 1;
                column += 1;
                tokens.push(PpToken {
                    kind: PpTokenKind::Punct,
                    start,
                    end: offset(i),
                    line: tok_line,
                    column: tok_column,
                });
            }
        }
    }

    tokens
}

fn is_word_start(c: char, next: Option<char>) -> bool {
    c.is_ascii_alphanumeric()
        || (c == '-' && next.is_some_and(|n| n.is_ascii_alphanumeric()))
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<PpTokenKind> {
        scan(source).into_iter().map(|t| t.kind).collect()
    }

    fn texts(source: &str) -> Vec<String> {
        scan(source)
            .into_iter()
            .map(|t| t.text(source).to_string())
            .collect()
    }

    #[test]
    fn words_keep_hyphens() {
        assert_eq!(texts("MOVE CUST-REC TO OUT-REC"), [
            "MOVE", "CUST-REC", "TO", "OUT-REC"
        ]);
    }

    #[test]
    fn colon_splits_tagged_words() {
        assert_eq!(texts("01 :TAG:-REC."), ["01", ":", "TAG", ":", "-REC", "."]);
        assert_eq!(kinds("01 :TAG:-REC."), [
            PpTokenKind::Word,
            PpTokenKind::Punct,
            PpTokenKind::Word,
            PpTokenKind::Punct,
            PpTokenKind::Word,
            PpTokenKind::Period,
        ]);
    }

    #[test]
    fn literal_with_doubled_quote() {
        let src = "DISPLAY 'IT''S'.";
        assert_eq!(texts(src), ["DISPLAY", "'IT''S'", "."]);
        assert_eq!(kinds(src)[1], PpTokenKind::Literal);
    }

    #[test]
    fn directive_words_inside_literals_are_opaque() {
        let src = "DISPLAY \"COPY X.\".";
        assert_eq!(kinds(src), [
            PpTokenKind::Word,
            PpTokenKind::Literal,
            PpTokenKind::Period,
        ]);
    }

    #[test]
    fn period_inside_number_is_punct() {
        assert_eq!(kinds("MOVE 3.14 TO X."), [
            PpTokenKind::Word,
            PpTokenKind::Word,
            PpTokenKind::Punct,
            PpTokenKind::Word,
            PpTokenKind::Word,
            PpTokenKind::Word,
            PpTokenKind::Period,
        ]);
    }

    #[test]
    fn pseudo_text_delimiters() {
        assert_eq!(kinds("==:TAG:=="), [
            PpTokenKind::PseudoTextDelim,
            PpTokenKind::Punct,
            PpTokenKind::Word,
            PpTokenKind::Punct,
            PpTokenKind::PseudoTextDelim,
        ]);
    }

    #[test]
    fn positions_are_one_indexed() {
        let toks = scan("COPY X.\nCOPY Y.");
        assert_eq!((toks[0].line, toks[0].column), (1, 1));
        assert_eq!((toks[3].line, toks[3].column), (2, 1));
        assert_eq!((toks[4].line, toks[4].column), (2, 6));
    }
}
