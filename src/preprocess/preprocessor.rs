//! Directive preprocessor driver.
//!
//! Streams over the normalized source, expanding `COPY` directives
//! recursively, maintaining the active `REPLACE` phrase set, and copying
//! `EXEC ... END-EXEC` regions through untouched. Plain regions between
//! directives are rewritten by the active phrases and otherwise emitted
//! verbatim.

use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tracing::debug;

use crate::base::SourcePos;

use super::copybook::{CopybookResolver, DEFAULT_EXTENSIONS};
use super::error::PreprocessError;
use super::format::SourceFormat;
use super::normalizer::{detect_debugging_mode, normalize};
use super::replace::{
    ReplacePhrase, apply_phrases, apply_to_text, literal_pattern, pattern_from_tokens,
    word_pattern,
};
use super::scan::{PpToken, PpTokenKind, scan};

/// Configuration for one preprocessor invocation.
#[derive(Debug, Clone)]
pub struct PreprocessOptions {
    /// Physical layout of the input (and of its copybooks).
    pub format: SourceFormat,
    /// Ordered copybook search directories. When empty, the directory
    /// containing the input file is searched (or the current directory
    /// for in-memory sources).
    pub copy_dirs: Vec<PathBuf>,
    /// Allowed copybook extensions, with leading dot, in priority order.
    pub copy_extensions: Vec<String>,
    /// Maximum copybook nesting depth.
    pub max_copy_depth: usize,
    /// Include `D` indicator lines as source. `WITH DEBUGGING MODE` in
    /// the source turns this on as well.
    pub debugging_mode: bool,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            format: SourceFormat::default(),
            copy_dirs: Vec::new(),
            copy_extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            max_copy_depth: 50,
            debugging_mode: false,
        }
    }
}

/// The preprocessor's output artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreprocessedFile {
    /// The original source text, untouched.
    pub source: String,
    /// The normalized, fully expanded text handed to the parser.
    pub text: String,
    /// Copybooks spliced into `text`, in expansion order.
    pub copybooks: Vec<ExpandedCopybook>,
}

/// One copybook expansion recorded on the artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedCopybook {
    pub name: SmolStr,
    pub path: PathBuf,
}

/// Preprocess a source file on disk.
pub fn preprocess_file(
    path: &Path,
    options: &PreprocessOptions,
) -> Result<PreprocessedFile, PreprocessError> {
    let source = fs::read_to_string(path).map_err(|source| PreprocessError::Io {
        source,
        pos: SourcePos::new(Some(path.to_path_buf()), 1, 1),
    })?;
    preprocess_source(&source, Some(path), options)
}

/// Preprocess an in-memory source. `file` is used for copybook lookup
/// defaults and error positions.
pub fn preprocess_source(
    source: &str,
    file: Option<&Path>,
    options: &PreprocessOptions,
) -> Result<PreprocessedFile, PreprocessError> {
    let dirs = if options.copy_dirs.is_empty() {
        vec![default_copy_dir(file)]
    } else {
        options.copy_dirs.clone()
    };
    let resolver = CopybookResolver::new(dirs, options.copy_extensions.clone());

    let mut pp = Preprocessor {
        options,
        digest: resolver.search_digest(),
        resolver,
        stack: Vec::new(),
        cache: FxHashMap::default(),
        copybooks: Vec::new(),
    };

    // The debugging-mode toggle is decided once, from the options and from
    // a scan of the comment-stripped main source, then inherited by every
    // copybook expansion.
    let stripped = normalize(source, options.format, false, file)?;
    let debugging = options.debugging_mode || detect_debugging_mode(&stripped);

    let mut ambient: Vec<ReplacePhrase> = Vec::new();
    let text = pp.expand(source, file, 0, &mut ambient, debugging)?;

    Ok(PreprocessedFile {
        source: source.to_string(),
        text,
        copybooks: pp.copybooks,
    })
}

fn default_copy_dir(file: Option<&Path>) -> PathBuf {
    file.and_then(Path::parent)
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// A parsed `COPY` directive.
struct CopyDirective {
    name: SmolStr,
    library: Option<SmolStr>,
    phrases: Vec<ReplacePhrase>,
    /// Token index of the terminating period.
    end_tok: usize,
    /// Byte offset just past the terminating period.
    end_byte: usize,
    pos: SourcePos,
}

/// A parsed `REPLACE` directive.
enum ReplaceDirective {
    On(Vec<ReplacePhrase>),
    Off,
}

struct Preprocessor<'a> {
    options: &'a PreprocessOptions,
    resolver: CopybookResolver,
    digest: u64,
    /// Uppercased names of copybooks currently being expanded.
    stack: Vec<SmolStr>,
    /// (lowercased name/library, search digest) -> replacement-free expansion.
    cache: FxHashMap<(SmolStr, u64), String>,
    copybooks: Vec<ExpandedCopybook>,
}

impl Preprocessor<'_> {
    fn expand(
        &mut self,
        source: &str,
        file: Option<&Path>,
        depth: usize,
        ambient: &mut Vec<ReplacePhrase>,
        debugging: bool,
    ) -> Result<String, PreprocessError> {
        let text = normalize(source, self.options.format, debugging, file)?;
        let tokens = scan(&text);

        let mut out = String::with_capacity(text.len());
        let mut region_byte = 0usize;
        let mut region_tok = 0usize;
        let mut i = 0;

        let flush = |out: &mut String, upto_tok: usize, upto_byte: usize, region_tok: usize, region_byte: usize, ambient: &[ReplacePhrase]| {
            out.push_str(&apply_phrases(
                &text,
                region_byte..upto_byte,
                &tokens[region_tok..upto_tok],
                ambient,
            ));
        };

        while i < tokens.len() {
            let tok = tokens[i];
            if tok.kind != PpTokenKind::Word {
                i += 1;
                continue;
            }
            let word = tok.text(&text);
            if word.eq_ignore_ascii_case("COPY") {
                flush(&mut out, i, tok.start, region_tok, region_byte, ambient);
                let directive = parse_copy(&text, &tokens, i, file)?;
                let expansion = self.expand_copybook(&directive, depth, debugging)?;
                // REPLACING first, then the surrounding REPLACE block, so
                // inlining the copybook by hand gives the same stream.
                let expansion = apply_to_text(&expansion, &directive.phrases);
                let expansion = apply_to_text(&expansion, ambient);
                out.push_str(&expansion);
                i = directive.end_tok + 1;
                region_tok = i;
                region_byte = directive.end_byte;
            } else if word.eq_ignore_ascii_case("REPLACE") {
                flush(&mut out, i, tok.start, region_tok, region_byte, ambient);
                let (directive, end_tok, end_byte) = parse_replace(&text, &tokens, i, file)?;
                match directive {
                    ReplaceDirective::On(phrases) => *ambient = phrases,
                    ReplaceDirective::Off => ambient.clear(),
                }
                i = end_tok + 1;
                region_tok = i;
                region_byte = end_byte;
            } else if word.eq_ignore_ascii_case("EXEC") {
                flush(&mut out, i, tok.start, region_tok, region_byte, ambient);
                let (end_tok, end_byte) = find_end_exec(&text, &tokens, i, file)?;
                // Embedded text is opaque: no replacement applies inside.
                out.push_str(&text[tok.start..end_byte]);
                i = end_tok + 1;
                region_tok = i;
                region_byte = end_byte;
            } else {
                i += 1;
            }
        }
        flush(
            &mut out,
            tokens.len(),
            text.len(),
            region_tok,
            region_byte,
            ambient,
        );

        Ok(out)
    }

    fn expand_copybook(
        &mut self,
        directive: &CopyDirective,
        depth: usize,
        debugging: bool,
    ) -> Result<String, PreprocessError> {
        let upper: SmolStr = directive.name.to_ascii_uppercase().into();
        if self.stack.contains(&upper) {
            let mut stack = self.stack.clone();
            stack.push(upper.clone());
            return Err(PreprocessError::RecursiveCopybook {
                name: upper,
                stack,
                pos: directive.pos.clone(),
            });
        }
        if depth + 1 > self.options.max_copy_depth {
            return Err(PreprocessError::CopyDepthExceeded {
                limit: self.options.max_copy_depth,
                pos: directive.pos.clone(),
            });
        }

        let mut key = directive.name.to_ascii_lowercase();
        if let Some(lib) = &directive.library {
            key.push('/');
            key.push_str(&lib.to_ascii_lowercase());
        }
        let key = (SmolStr::new(key), self.digest);
        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached.clone());
        }

        let library = directive.library.as_deref();
        let Some(path) = self.resolver.resolve(&directive.name, library) else {
            return Err(PreprocessError::CopybookNotFound {
                name: directive.name.clone(),
                searched: self.resolver.search_roots(library),
                pos: directive.pos.clone(),
            });
        };
        debug!(name = %directive.name, path = %path.display(), depth, "expanding copybook");

        let text = fs::read_to_string(&path).map_err(|source| PreprocessError::Io {
            source,
            pos: directive.pos.clone(),
        })?;
        self.copybooks.push(ExpandedCopybook {
            name: upper.clone(),
            path: path.clone(),
        });

        self.stack.push(upper);
        // REPLACE state is scoped to the text that declares it; a copybook
        // starts with an empty phrase set of its own.
        let mut nested: Vec<ReplacePhrase> = Vec::new();
        let expanded = self.expand(&text, Some(&path), depth + 1, &mut nested, debugging);
        self.stack.pop();

        let expanded = expanded?;
        self.cache.insert(key, expanded.clone());
        Ok(expanded)
    }
}

fn token_pos(tok: &PpToken, file: Option<&Path>) -> SourcePos {
    SourcePos::new(file.map(Path::to_path_buf), tok.line, tok.column)
}

fn eof_pos(tokens: &[PpToken], file: Option<&Path>) -> SourcePos {
    tokens
        .last()
        .map(|tok| token_pos(tok, file))
        .unwrap_or_else(|| SourcePos::new(file.map(Path::to_path_buf), 1, 1))
}

/// Strip the quotes (and doubled-quote escapes) from a literal token.
fn literal_value(text: &str) -> String {
    let quote = text.chars().next().unwrap_or('\'');
    let inner = text
        .strip_prefix(quote)
        .map(|t| t.strip_suffix(quote).unwrap_or(t))
        .unwrap_or(text);
    inner.replace(&format!("{quote}{quote}"), &quote.to_string())
}

fn parse_copy(
    text: &str,
    tokens: &[PpToken],
    at: usize,
    file: Option<&Path>,
) -> Result<CopyDirective, PreprocessError> {
    let mut cursor = Cursor {
        text,
        tokens,
        i: at + 1,
        file,
    };

    let (name, pos) = match cursor.peek() {
        Some(tok) if tok.kind == PpTokenKind::Word => {
            let name = SmolStr::new(tok.text(text));
            let pos = token_pos(&tok, file);
            cursor.bump();
            (name, pos)
        }
        Some(tok) if tok.kind == PpTokenKind::Literal => {
            let name = SmolStr::new(literal_value(tok.text(text)));
            let pos = token_pos(&tok, file);
            cursor.bump();
            (name, pos)
        }
        other => {
            return Err(PreprocessError::syntax(
                "COPY requires a copybook name",
                other
                    .map(|tok| token_pos(&tok, file))
                    .unwrap_or_else(|| eof_pos(tokens, file)),
            ));
        }
    };

    let mut library = None;
    let mut phrases = Vec::new();
    loop {
        match cursor.peek() {
            Some(tok) if tok.kind == PpTokenKind::Period => {
                return Ok(CopyDirective {
                    name,
                    library,
                    phrases,
                    end_tok: cursor.i,
                    end_byte: tok.end,
                    pos,
                });
            }
            Some(tok) if tok.kind == PpTokenKind::Word => {
                let word = tok.text(text);
                if word.eq_ignore_ascii_case("OF") || word.eq_ignore_ascii_case("IN") {
                    cursor.bump();
                    library = Some(cursor.expect_name("library name")?);
                } else if word.eq_ignore_ascii_case("SUPPRESS") {
                    // Listing suppression only; the expansion is spliced
                    // regardless.
                    cursor.bump();
                } else if word.eq_ignore_ascii_case("REPLACING") {
                    cursor.bump();
                    phrases = parse_phrases(&mut cursor)?;
                } else {
                    return Err(PreprocessError::syntax(
                        format!("unexpected '{word}' in COPY directive"),
                        token_pos(&tok, file),
                    ));
                }
            }
            Some(tok) => {
                return Err(PreprocessError::syntax(
                    "unexpected token in COPY directive",
                    token_pos(&tok, file),
                ));
            }
            None => {
                return Err(PreprocessError::syntax(
                    "COPY directive is missing its terminating period",
                    eof_pos(tokens, file),
                ));
            }
        }
    }
}

fn parse_replace(
    text: &str,
    tokens: &[PpToken],
    at: usize,
    file: Option<&Path>,
) -> Result<(ReplaceDirective, usize, usize), PreprocessError> {
    let mut cursor = Cursor {
        text,
        tokens,
        i: at + 1,
        file,
    };

    if let Some(tok) = cursor.peek() {
        if tok.kind == PpTokenKind::Word && tok.text(text).eq_ignore_ascii_case("OFF") {
            cursor.bump();
            let period = cursor.expect_period()?;
            return Ok((ReplaceDirective::Off, period.0, period.1));
        }
    }

    let phrases = parse_phrases(&mut cursor)?;
    // parse_phrases stops with the cursor on the period.
    let period = cursor.expect_period()?;
    Ok((ReplaceDirective::On(phrases), period.0, period.1))
}

/// Parse `pattern BY replacement`+, leaving the cursor on the period.
fn parse_phrases(cursor: &mut Cursor<'_>) -> Result<Vec<ReplacePhrase>, PreprocessError> {
    let mut phrases = Vec::new();
    loop {
        let pattern = cursor.parse_pattern()?;
        cursor.expect_word("BY")?;
        let replacement = cursor.parse_replacement()?;
        phrases.push(ReplacePhrase {
            pattern,
            replacement,
        });
        match cursor.peek() {
            Some(tok) if tok.kind == PpTokenKind::Period => return Ok(phrases),
            Some(tok)
                if matches!(
                    tok.kind,
                    PpTokenKind::PseudoTextDelim | PpTokenKind::Word | PpTokenKind::Literal
                ) =>
            {
                continue;
            }
            Some(tok) => {
                return Err(PreprocessError::syntax(
                    "expected another replacement phrase or a period",
                    token_pos(&tok, cursor.file),
                ));
            }
            None => {
                return Err(PreprocessError::syntax(
                    "replacement phrases are missing their terminating period",
                    eof_pos(cursor.tokens, cursor.file),
                ));
            }
        }
    }
}

fn find_end_exec(
    text: &str,
    tokens: &[PpToken],
    at: usize,
    file: Option<&Path>,
) -> Result<(usize, usize), PreprocessError> {
    let mut j = at + 1;
    while j < tokens.len() {
        let tok = tokens[j];
        if tok.kind == PpTokenKind::Word && tok.text(text).eq_ignore_ascii_case("END-EXEC") {
            // Take the terminating period along when present.
            if let Some(period) = tokens.get(j + 1) {
                if period.kind == PpTokenKind::Period {
                    return Ok((j + 1, period.end));
                }
            }
            return Ok((j, tok.end));
        }
        j += 1;
    }
    Err(PreprocessError::syntax(
        "EXEC block is missing END-EXEC",
        token_pos(&tokens[at], file),
    ))
}

/// Token cursor for directive parsing.
struct Cursor<'a> {
    text: &'a str,
    tokens: &'a [PpToken],
    i: usize,
    file: Option<&'a Path>,
}

impl Cursor<'_> {
    fn peek(&self) -> Option<PpToken> {
        self.tokens.get(self.i).copied()
    }

    fn bump(&mut self) {
        self.i += 1;
    }

    fn expect_name(&mut self, what: &str) -> Result<SmolStr, PreprocessError> {
        match self.peek() {
            Some(tok) if tok.kind == PpTokenKind::Word => {
                let name = SmolStr::new(tok.text(self.text));
                self.bump();
                Ok(name)
            }
            Some(tok) if tok.kind == PpTokenKind::Literal => {
                let name = SmolStr::new(literal_value(tok.text(self.text)));
                self.bump();
                Ok(name)
            }
            Some(tok) => Err(PreprocessError::syntax(
                format!("expected {what}"),
                token_pos(&tok, self.file),
            )),
            None => Err(PreprocessError::syntax(
                format!("expected {what}"),
                eof_pos(self.tokens, self.file),
            )),
        }
    }

    fn expect_word(&mut self, word: &str) -> Result<(), PreprocessError> {
        match self.peek() {
            Some(tok)
                if tok.kind == PpTokenKind::Word
                    && tok.text(self.text).eq_ignore_ascii_case(word) =>
            {
                self.bump();
                Ok(())
            }
            Some(tok) => Err(PreprocessError::syntax(
                format!("expected {word}"),
                token_pos(&tok, self.file),
            )),
            None => Err(PreprocessError::syntax(
                format!("expected {word}"),
                eof_pos(self.tokens, self.file),
            )),
        }
    }

    /// Consume a period, returning (token index, end byte).
    fn expect_period(&mut self) -> Result<(usize, usize), PreprocessError> {
        match self.peek() {
            Some(tok) if tok.kind == PpTokenKind::Period => {
                let at = self.i;
                self.bump();
                Ok((at, tok.end))
            }
            Some(tok) => Err(PreprocessError::syntax(
                "expected a period",
                token_pos(&tok, self.file),
            )),
            None => Err(PreprocessError::syntax(
                "expected a period",
                eof_pos(self.tokens, self.file),
            )),
        }
    }

    /// Parse one replacement pattern: pseudo-text, a word, or a literal.
    fn parse_pattern(&mut self) -> Result<Vec<super::replace::MatchTok>, PreprocessError> {
        match self.peek() {
            Some(tok) if tok.kind == PpTokenKind::PseudoTextDelim => {
                let open = tok;
                self.bump();
                let first = self.i;
                while let Some(tok) = self.peek() {
                    if tok.kind == PpTokenKind::PseudoTextDelim {
                        let pattern =
                            pattern_from_tokens(self.text, &self.tokens[first..self.i]);
                        self.bump();
                        if pattern.is_empty() {
                            return Err(PreprocessError::syntax(
                                "pseudo-text pattern must not be empty",
                                token_pos(&open, self.file),
                            ));
                        }
                        return Ok(pattern);
                    }
                    self.bump();
                }
                Err(PreprocessError::syntax(
                    "unterminated pseudo-text",
                    token_pos(&open, self.file),
                ))
            }
            Some(tok) if tok.kind == PpTokenKind::Word => {
                let pattern = word_pattern(tok.text(self.text));
                self.bump();
                Ok(pattern)
            }
            Some(tok) if tok.kind == PpTokenKind::Literal => {
                let pattern = literal_pattern(tok.text(self.text));
                self.bump();
                Ok(pattern)
            }
            Some(tok) => Err(PreprocessError::syntax(
                "expected a pseudo-text, word, or literal pattern",
                token_pos(&tok, self.file),
            )),
            None => Err(PreprocessError::syntax(
                "expected a replacement pattern",
                eof_pos(self.tokens, self.file),
            )),
        }
    }

    /// Parse one replacement operand; pseudo-text may be empty (deletion).
    fn parse_replacement(&mut self) -> Result<String, PreprocessError> {
        match self.peek() {
            Some(tok) if tok.kind == PpTokenKind::PseudoTextDelim => {
                let open = tok;
                self.bump();
                while let Some(tok) = self.peek() {
                    if tok.kind == PpTokenKind::PseudoTextDelim {
                        let raw = self.text[open.end..tok.start].trim().to_string();
                        self.bump();
                        return Ok(raw);
                    }
                    self.bump();
                }
                Err(PreprocessError::syntax(
                    "unterminated pseudo-text",
                    token_pos(&open, self.file),
                ))
            }
            Some(tok)
                if matches!(tok.kind, PpTokenKind::Word | PpTokenKind::Literal) =>
            {
                let raw = tok.text(self.text).to_string();
                self.bump();
                Ok(raw)
            }
            Some(tok) => Err(PreprocessError::syntax(
                "expected a pseudo-text, word, or literal replacement",
                token_pos(&tok, self.file),
            )),
            None => Err(PreprocessError::syntax(
                "expected a replacement operand",
                eof_pos(self.tokens, self.file),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pp(source: &str) -> PreprocessedFile {
        preprocess_source(source, None, &PreprocessOptions::default()).unwrap()
    }

    #[test]
    fn plain_text_streams_through() {
        let out = pp("000100 MOVE A TO B.");
        assert_eq!(out.text, "MOVE A TO B.");
        assert!(out.copybooks.is_empty());
    }

    #[test]
    fn replace_block_rewrites_until_off() {
        let src = [
            "000100 REPLACE ==OLD-NAME== BY ==NEW-NAME==.",
            "000200 MOVE OLD-NAME TO B.",
            "000300 REPLACE OFF.",
            "000400 MOVE OLD-NAME TO C.",
        ]
        .join("\n");
        let out = pp(&src);
        assert!(out.text.contains("MOVE NEW-NAME TO B."));
        assert!(out.text.contains("MOVE OLD-NAME TO C."));
    }

    #[test]
    fn replace_word_phrase() {
        let src = [
            "000100 REPLACE AMOUNT BY TOTAL.",
            "000200 ADD AMOUNT TO GRAND-AMOUNT.",
        ]
        .join("\n");
        let out = pp(&src);
        // Word patterns match whole text-words only.
        assert!(out.text.contains("ADD TOTAL TO GRAND-AMOUNT."));
    }

    #[test]
    fn exec_blocks_are_opaque_to_replace() {
        let src = [
            "000100 REPLACE ==DUAL== BY ==REAL==.",
            "000200 EXEC SQL SELECT 1 FROM DUAL END-EXEC.",
            "000300 MOVE DUAL TO X.",
        ]
        .join("\n");
        let out = pp(&src);
        assert!(out.text.contains("SELECT 1 FROM DUAL END-EXEC"));
        assert!(out.text.contains("MOVE REAL TO X."));
    }

    #[test]
    fn missing_end_exec_is_a_syntax_error() {
        let err =
            preprocess_source("000100 EXEC SQL SELECT 1", None, &PreprocessOptions::default())
                .unwrap_err();
        assert!(matches!(err, PreprocessError::Syntax { .. }));
    }

    #[test]
    fn copy_without_copybook_reports_searched_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let options = PreprocessOptions {
            copy_dirs: vec![dir.path().to_path_buf()],
            ..PreprocessOptions::default()
        };
        let err = preprocess_source("000100 COPY NOPE.", None, &options).unwrap_err();
        match err {
            PreprocessError::CopybookNotFound { name, searched, .. } => {
                assert_eq!(name, "NOPE");
                assert_eq!(searched, vec![dir.path().to_path_buf()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn copy_splices_and_records_the_copybook() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("REC.cpy"), "000100 01 REC-A PIC X.").unwrap();
        let options = PreprocessOptions {
            copy_dirs: vec![dir.path().to_path_buf()],
            ..PreprocessOptions::default()
        };
        let out = preprocess_source("000100 COPY REC.", None, &options).unwrap();
        assert_eq!(out.text, "01 REC-A PIC X.");
        assert_eq!(out.copybooks.len(), 1);
        assert_eq!(out.copybooks[0].name, "REC");
    }

    #[test]
    fn malformed_copy_is_a_syntax_error() {
        let err = preprocess_source("000100 COPY .", None, &PreprocessOptions::default())
            .unwrap_err();
        assert!(matches!(err, PreprocessError::Syntax { .. }));
    }
}
