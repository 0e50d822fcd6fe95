//! Token-based replacement engine.
//!
//! Shared by `COPY ... REPLACING` and free-standing `REPLACE` blocks. A
//! phrase matches a window of text-words; matched windows are spliced out
//! and the replacement text emitted in their place. Unmatched byte ranges
//! are copied verbatim, so a run with no matches reproduces its input.

use std::ops::Range;

use super::scan::{PpToken, PpTokenKind, scan};

/// One token of a replacement pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MatchTok {
    pub kind: PpTokenKind,
    pub text: String,
}

/// `pattern BY replacement`.
///
/// The pattern is a token sequence (a single word, a single literal, or
/// the contents of a pseudo-text); the replacement is raw text spliced in
/// verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReplacePhrase {
    pub pattern: Vec<MatchTok>,
    pub replacement: String,
}

impl ReplacePhrase {
    fn matches_at(&self, source: &str, tokens: &[PpToken], at: usize) -> bool {
        if at + self.pattern.len() > tokens.len() {
            return false;
        }
        self.pattern
            .iter()
            .zip(&tokens[at..])
            .all(|(pat, tok)| token_matches(pat, tok, source))
    }
}

/// Words compare case-insensitively, literals and punctuation exactly.
/// A pattern period only ever matches a separator period, so phrases
/// without one cannot cross a statement boundary.
fn token_matches(pat: &MatchTok, tok: &PpToken, source: &str) -> bool {
    if pat.kind != tok.kind {
        return false;
    }
    let text = tok.text(source);
    match pat.kind {
        PpTokenKind::Word => pat.text.eq_ignore_ascii_case(text),
        PpTokenKind::Literal | PpTokenKind::Punct => pat.text == text,
        PpTokenKind::Period | PpTokenKind::PseudoTextDelim => true,
    }
}

/// Apply `phrases` to the tokens of `region`, first-declared phrase wins,
/// consume-and-advance. Returns the rewritten text of the region.
pub(crate) fn apply_phrases(
    source: &str,
    region: Range<usize>,
    tokens: &[PpToken],
    phrases: &[ReplacePhrase],
) -> String {
    if phrases.is_empty() || tokens.is_empty() {
        return source[region].to_string();
    }

    let mut out = String::with_capacity(region.len());
    let mut emitted = region.start;
    let mut i = 0;
    while i < tokens.len() {
        let hit = phrases
            .iter()
            .find(|phrase| phrase.matches_at(source, tokens, i));
        match hit {
            Some(phrase) => {
                let len = phrase.pattern.len();
                out.push_str(&source[emitted..tokens[i].start]);
                out.push_str(&phrase.replacement);
                emitted = tokens[i + len - 1].end;
                i += len;
            }
            None => i += 1,
        }
    }
    out.push_str(&source[emitted..region.end]);
    out
}

/// Apply `phrases` to an entire text.
pub(crate) fn apply_to_text(text: &str, phrases: &[ReplacePhrase]) -> String {
    if phrases.is_empty() {
        return text.to_string();
    }
    let tokens = scan(text);
    apply_phrases(text, 0..text.len(), &tokens, phrases)
}

/// Build pattern tokens from a scanned pseudo-text body.
pub(crate) fn pattern_from_tokens(source: &str, tokens: &[PpToken]) -> Vec<MatchTok> {
    tokens
        .iter()
        .map(|tok| MatchTok {
            kind: tok.kind,
            text: tok.text(source).to_string(),
        })
        .collect()
}

/// A single-word pattern (case-insensitive match).
pub(crate) fn word_pattern(text: &str) -> Vec<MatchTok> {
    vec![MatchTok {
        kind: PpTokenKind::Word,
        text: text.to_string(),
    }]
}

/// A single-literal pattern (case-sensitive match, quotes included).
pub(crate) fn literal_pattern(text: &str) -> Vec<MatchTok> {
    vec![MatchTok {
        kind: PpTokenKind::Literal,
        text: text.to_string(),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phrase(pattern: Vec<MatchTok>, replacement: &str) -> ReplacePhrase {
        ReplacePhrase {
            pattern,
            replacement: replacement.to_string(),
        }
    }

    fn pseudo(text: &str) -> Vec<MatchTok> {
        pattern_from_tokens(text, &scan(text))
    }

    #[test]
    fn word_match_is_case_insensitive() {
        let out = apply_to_text("move amount to x.", &[phrase(word_pattern("AMOUNT"), "TOTAL")]);
        assert_eq!(out, "move TOTAL to x.");
    }

    #[test]
    fn literal_match_is_case_sensitive() {
        let phrases = [phrase(literal_pattern("'abc'"), "'xyz'")];
        assert_eq!(apply_to_text("DISPLAY 'abc'.", &phrases), "DISPLAY 'xyz'.");
        assert_eq!(apply_to_text("DISPLAY 'ABC'.", &phrases), "DISPLAY 'ABC'.");
    }

    #[test]
    fn tag_pseudo_text_replaces_inside_words() {
        let phrases = [phrase(pseudo(":TAG:"), "CUST")];
        let out = apply_to_text("01 :TAG:-REC. 05 :TAG:-NAME PIC X(20).", &phrases);
        assert_eq!(out, "01 CUST-REC. 05 CUST-NAME PIC X(20).");
    }

    #[test]
    fn first_declared_phrase_wins() {
        let phrases = [
            phrase(word_pattern("A"), "FIRST"),
            phrase(word_pattern("A"), "SECOND"),
        ];
        assert_eq!(apply_to_text("A B A.", &phrases), "FIRST B FIRST.");
    }

    #[test]
    fn matches_do_not_overlap_themselves() {
        // Replacement text is never rescanned: A BY A B would loop forever
        // otherwise.
        let phrases = [phrase(word_pattern("A"), "A B")];
        assert_eq!(apply_to_text("A A.", &phrases), "A B A B.");
    }

    #[test]
    fn multi_token_pattern_does_not_cross_period() {
        let phrases = [phrase(pseudo("A B"), "X")];
        assert_eq!(apply_to_text("A B C.", &phrases), "X C.");
        // The period between A and B blocks the window.
        assert_eq!(apply_to_text("A. B C.", &phrases), "A. B C.");
    }

    #[test]
    fn pattern_with_period_crosses_it() {
        let phrases = [phrase(pseudo("A. B"), "X")];
        assert_eq!(apply_to_text("A. B C.", &phrases), "X C.");
    }

    #[test]
    fn untouched_text_is_verbatim() {
        let text = "  MOVE   X  TO    Y.\n  DISPLAY Z.";
        assert_eq!(apply_to_text(text, &[phrase(word_pattern("Q"), "R")]), text);
    }

    #[test]
    fn empty_replacement_deletes() {
        let phrases = [phrase(word_pattern("NOISE"), "")];
        assert_eq!(apply_to_text("A NOISE B.", &phrases), "A  B.");
    }
}
