//! Corpus loading and normalization.
//!
//! Input files are concatenated in the caller's order and run through a fixed
//! pipeline of pure stages. Each stage takes the previous stage's output and
//! returns a new string, so no shared buffer is mutated in place.
//!
//! Punctuation and digits are *deleted*, not replaced with spaces. Where such
//! a character was the only separator, the fragments on either side fuse into
//! one token ("well-known" becomes "wellknown"). That matches the corpus
//! conventions the scores are calibrated against and must not be "fixed".

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use log::info;

use crate::AnalysisError;

/// Characters removed from the raw text, including the typographic quotes and
/// en/em dashes that show up in published e-texts.
pub const PUNCTUATION: &[char] = &[
    '~', '`', '!', '@', '#', '$', '%', '^', '&', '*', '(', ')', '-', '_', '+', '=', '{', '[', '}',
    ']', '|', '\\', ':', ';', '"', '\'', '<', ',', '>', '.', '?', '/', '’', '–', '‘', '“', '”',
    '—',
];

fn is_punctuation(c: char) -> bool {
    matches!(
        c,
        '~' | '`'
            | '!'
            | '@'
            | '#'
            | '$'
            | '%'
            | '^'
            | '&'
            | '*'
            | '('
            | ')'
            | '-'
            | '_'
            | '+'
            | '='
            | '{'
            | '['
            | '}'
            | ']'
            | '|'
            | '\\'
            | ':'
            | ';'
            | '"'
            | '\''
            | '<'
            | ','
            | '>'
            | '.'
            | '?'
            | '/'
            | '’'
            | '–'
            | '‘'
            | '“'
            | '”'
            | '—'
    )
}

/// Collapse every whitespace run (spaces, tabs, newlines) to a single space.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Delete every character in [`PUNCTUATION`].
pub fn strip_punctuation(text: &str) -> String {
    text.chars().filter(|c| !is_punctuation(*c)).collect()
}

/// Delete every decimal digit.
pub fn strip_digits(text: &str) -> String {
    text.chars().filter(|c| !c.is_ascii_digit()).collect()
}

/// Run the full normalization pipeline over raw text and split it into the
/// final token sequence.
///
/// Stage order matters: punctuation deletion can open new whitespace runs, so
/// whitespace is collapsed both before and after it.
pub fn normalize(raw: &str) -> Vec<String> {
    let text = collapse_whitespace(raw);
    let text = strip_punctuation(&text);
    let text = collapse_whitespace(&text);
    let text = strip_digits(&text);
    let text = text.to_lowercase();
    text.split_whitespace().map(str::to_owned).collect()
}

/// Read and concatenate the given files in order, then normalize the result
/// into one flat token sequence.
///
/// Files are joined with no separator, exactly as raw concatenation would; the
/// trailing/leading whitespace of well-formed text files keeps tokens apart.
/// Any unreadable file aborts the whole load.
pub fn load_corpus<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<String>, AnalysisError> {
    let mut raw = String::new();
    for path in paths {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| AnalysisError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;
        raw.push_str(&content);
    }

    let tokens = normalize(&raw);
    let vocabulary: HashSet<&str> = tokens.iter().map(String::as_str).collect();
    info!(
        "corpus loaded: {} tokens, {} distinct words",
        tokens.len(),
        vocabulary.len()
    );
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_runs_collapse() {
        assert_eq!(collapse_whitespace("a \t b\n\nc"), "a b c");
    }

    #[test]
    fn punctuation_check_matches_published_list() {
        // The match arms must cover exactly the documented character set.
        for &c in PUNCTUATION {
            assert!(is_punctuation(c), "{c:?} missing from is_punctuation");
        }
        for c in "abc xyz0 ü".chars() {
            assert!(!is_punctuation(c), "{c:?} wrongly treated as punctuation");
        }
    }

    #[test]
    fn punctuation_is_deleted_not_spaced() {
        // Deletion fuses fragments that were only separated by punctuation.
        assert_eq!(strip_punctuation("well-known"), "wellknown");
        assert_eq!(strip_punctuation("don’t stop—now"), "dont stopnow");
    }

    #[test]
    fn digits_are_deleted() {
        assert_eq!(strip_digits("chapter 12 begins"), "chapter  begins");
    }

    #[test]
    fn normalize_applies_stages_in_order() {
        let tokens = normalize("The  Ring-bearer\tleft.\nChapter 3!");
        assert_eq!(tokens, vec!["the", "ringbearer", "left", "chapter"]);
    }

    #[test]
    fn normalize_recollapses_after_deletion() {
        // " - " deletes to a double space that must collapse again.
        let tokens = normalize("left - right");
        assert_eq!(tokens, vec!["left", "right"]);
    }
}
