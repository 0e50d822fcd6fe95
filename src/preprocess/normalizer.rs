//! Source normalizer.
//!
//! Converts fixed-, variable-, or tandem-format source into a uniform
//! character stream with indicator-area semantics applied. Comment lines
//! are replaced by blank lines and continuation lines are joined into the
//! line they continue (leaving a blank line behind), so physical line
//! numbering survives into the normalized stream.

use std::path::Path;

use crate::base::SourcePos;

use super::error::PreprocessError;
use super::format::SourceFormat;

/// Normalize `source` according to `format`.
///
/// `debugging_mode` decides whether `D` indicator lines are included as
/// source or blanked like comments.
pub(crate) fn normalize(
    source: &str,
    format: SourceFormat,
    debugging_mode: bool,
    file: Option<&Path>,
) -> Result<String, PreprocessError> {
    let mut out: Vec<String> = Vec::new();
    // Index into `out` of the line a `-` indicator would continue.
    let mut last_content: Option<usize> = None;
    // Quote character of a literal left open by the continued line.
    let mut open_literal: Option<char> = None;

    for (line_idx, raw) in source.lines().enumerate() {
        let chars: Vec<char> = raw.chars().collect();
        let (indicator, content) = split_line(&chars, format);

        let pos = || {
            SourcePos::new(
                file.map(Path::to_path_buf),
                line_idx as u32 + 1,
                format.indicator_column(),
            )
        };

        match indicator {
            '*' | '/' => out.push(String::new()),
            'D' | 'd' if !debugging_mode => out.push(String::new()),
            '-' => {
                let Some(prev) = last_content else {
                    return Err(PreprocessError::syntax(
                        "continuation line without a preceding source line",
                        pos(),
                    ));
                };
                let resumed = content.trim_start();
                match open_literal {
                    Some(quote) => {
                        // Quote continuation rule: the literal resumes at the
                        // quote and the text after it joins verbatim.
                        let Some(rest) = resumed.strip_prefix(quote) else {
                            return Err(PreprocessError::syntax(
                                format!(
                                    "continuation of a literal must resume with {quote}"
                                ),
                                pos(),
                            ));
                        };
                        out[prev].push_str(rest);
                    }
                    None => out[prev].push_str(resumed),
                }
                open_literal = literal_state(&out[prev]);
                out.push(String::new());
            }
            ' ' | 'D' | 'd' => {
                let content = content.trim_end();
                if content.trim_start().is_empty() {
                    out.push(String::new());
                } else {
                    out.push(content.to_string());
                    last_content = Some(out.len() - 1);
                    open_literal = literal_state(content);
                }
            }
            other => {
                return Err(PreprocessError::syntax(
                    format!("unrecognized indicator '{other}'"),
                    pos(),
                ));
            }
        }
    }

    Ok(out.join("\n"))
}

/// Split one physical line into (indicator, program text) per format.
fn split_line(chars: &[char], format: SourceFormat) -> (char, String) {
    match format {
        SourceFormat::Fixed => {
            if chars.len() <= 6 {
                (' ', String::new())
            } else {
                let end = chars.len().min(72);
                (chars[6], chars[7..end].iter().collect())
            }
        }
        SourceFormat::Variable => {
            if chars.len() <= 6 {
                (' ', String::new())
            } else {
                (chars[6], chars[7..].iter().collect())
            }
        }
        SourceFormat::Tandem => {
            if chars.is_empty() {
                (' ', String::new())
            } else {
                (chars[0], chars[1..].iter().collect())
            }
        }
    }
}

/// Quote character of the literal a line leaves open, if any.
fn literal_state(line: &str) -> Option<char> {
    let mut open: Option<char> = None;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match open {
            None => {
                if c == '\'' || c == '"' {
                    open = Some(c);
                }
            }
            Some(quote) => {
                if c == quote {
                    if chars.peek() == Some(&quote) {
                        // Doubled quote stays inside the literal.
                        chars.next();
                    } else {
                        open = None;
                    }
                }
            }
        }
    }
    open
}

/// Cheap scan for a `WITH DEBUGGING MODE` clause in normalized text.
///
/// Runs on the comment-stripped stream so commented-out clauses do not
/// flip the toggle.
pub(crate) fn detect_debugging_mode(normalized: &str) -> bool {
    let mut collapsed = String::with_capacity(normalized.len());
    let mut last_space = true;
    for c in normalized.chars() {
        if c.is_whitespace() {
            if !last_space {
                collapsed.push(' ');
                last_space = true;
            }
        } else {
            collapsed.push(c.to_ascii_uppercase());
            last_space = false;
        }
    }
    collapsed.contains("WITH DEBUGGING MODE")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(line: &str) -> String {
        // Pad a bare statement into fixed format: six-digit sequence
        // number, blank indicator, area A/B text.
        format!("000100 {line}")
    }

    #[test]
    fn sequence_and_identification_areas_are_stripped() {
        let src = format!("{}{}", "123456 DISPLAY X.", " ".repeat(55) + "IDENTIFIC");
        let out = normalize(&src, SourceFormat::Fixed, false, None).unwrap();
        assert_eq!(out, "DISPLAY X.");
    }

    #[test]
    fn comment_lines_become_blank() {
        let src = ["000100* A COMMENT", "000200 DISPLAY X."].join("\n");
        let out = normalize(&src, SourceFormat::Fixed, false, None).unwrap();
        assert_eq!(out, "\nDISPLAY X.");
    }

    #[test]
    fn slash_is_a_comment_indicator() {
        let out = normalize("000100/ PAGE EJECT", SourceFormat::Fixed, false, None).unwrap();
        assert_eq!(out, "");
    }

    #[test]
    fn debug_lines_follow_the_toggle() {
        let src = "000100D DISPLAY DEBUG-LINE.";
        let off = normalize(src, SourceFormat::Fixed, false, None).unwrap();
        assert_eq!(off, "");
        let on = normalize(src, SourceFormat::Fixed, true, None).unwrap();
        assert_eq!(on, "DISPLAY DEBUG-LINE.");
    }

    #[test]
    fn word_continuation_joins_without_space() {
        let src = [fixed("MOVE LONG-NA"), "000200-    ME TO X.".to_string()].join("\n");
        let out = normalize(&src, SourceFormat::Fixed, false, None).unwrap();
        assert_eq!(out, "MOVE LONG-NAME TO X.\n");
    }

    #[test]
    fn literal_continuation_resumes_at_quote() {
        let src = [fixed("DISPLAY \"AB"), "000200-    \"CD\".".to_string()].join("\n");
        let out = normalize(&src, SourceFormat::Fixed, false, None).unwrap();
        assert_eq!(out, "DISPLAY \"ABCD\".\n");
    }

    #[test]
    fn literal_continuation_without_quote_is_an_error() {
        let src = [fixed("DISPLAY \"AB"), "000200-    CD\".".to_string()].join("\n");
        let err = normalize(&src, SourceFormat::Fixed, false, None).unwrap_err();
        assert!(matches!(err, PreprocessError::Syntax { .. }));
    }

    #[test]
    fn continuation_without_content_is_an_error() {
        let err = normalize("000100-    X", SourceFormat::Fixed, false, None).unwrap_err();
        assert!(matches!(err, PreprocessError::Syntax { .. }));
    }

    #[test]
    fn variable_format_keeps_long_lines() {
        let text = format!("000100 DISPLAY \"{}\".", "Y".repeat(80));
        let out = normalize(&text, SourceFormat::Variable, false, None).unwrap();
        assert!(out.contains(&"Y".repeat(80)));
    }

    #[test]
    fn tandem_indicator_is_column_one() {
        let src = ["*COMMENT", " DISPLAY X."].join("\n");
        let out = normalize(src.as_str(), SourceFormat::Tandem, false, None).unwrap();
        assert_eq!(out, "\nDISPLAY X.");
    }

    #[test]
    fn unknown_indicator_is_rejected() {
        let err = normalize("000100X DISPLAY.", SourceFormat::Fixed, false, None).unwrap_err();
        assert!(matches!(err, PreprocessError::Syntax { .. }));
    }

    #[test]
    fn debugging_mode_detection() {
        assert!(detect_debugging_mode(
            "SOURCE-COMPUTER. IBM-370\n    WITH  DEBUGGING   MODE."
        ));
        assert!(!detect_debugging_mode("SOURCE-COMPUTER. IBM-370."));
    }

    #[test]
    fn doubled_quote_does_not_close_literal() {
        assert_eq!(literal_state("DISPLAY \"A\"\"B"), Some('"'));
        assert_eq!(literal_state("DISPLAY \"A\"\"B\""), None);
    }
}
