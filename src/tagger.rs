//! Part-of-speech tags and the tagger collaborator interface.
//!
//! The scorer only ever asks one question of a tag: is it an adjective? The
//! three Penn Treebank adjective labels (`JJ`, `JJR`, `JJS`) are modeled as
//! their own variants; every other label passes through opaquely.
//!
//! Tagging itself is not this crate's business. The pipeline accepts any
//! [`PosTagger`], and the bundled [`LexiconTagger`] is a thin adapter around
//! an externally produced token→tag lexicon file.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::AnalysisError;

/// A part-of-speech label. Only the adjective subclass is meaningful to the
/// scorer; everything else is carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PosTag {
    /// Base adjective (`JJ`).
    Jj,
    /// Comparative adjective (`JJR`).
    Jjr,
    /// Superlative adjective (`JJS`).
    Jjs,
    /// Any other label, kept as-is.
    Other(String),
}

impl PosTag {
    pub fn from_label(label: &str) -> Self {
        match label {
            "JJ" => PosTag::Jj,
            "JJR" => PosTag::Jjr,
            "JJS" => PosTag::Jjs,
            other => PosTag::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            PosTag::Jj => "JJ",
            PosTag::Jjr => "JJR",
            PosTag::Jjs => "JJS",
            PosTag::Other(label) => label,
        }
    }

    /// True exactly for the three adjective forms.
    pub fn is_adjective(&self) -> bool {
        matches!(self, PosTag::Jj | PosTag::Jjr | PosTag::Jjs)
    }
}

/// A token paired with its part-of-speech tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedToken {
    pub token: String,
    pub tag: PosTag,
}

impl TaggedToken {
    pub fn new(token: impl Into<String>, tag: PosTag) -> Self {
        TaggedToken {
            token: token.into(),
            tag,
        }
    }
}

/// The external tagging collaborator.
///
/// Implementations must be pure and deterministic and return exactly one
/// [`TaggedToken`] per input token, index-aligned. Failures are propagated
/// unchanged; the pipeline never retries or falls back.
pub trait PosTagger {
    fn tag(&self, tokens: &[String]) -> Result<Vec<TaggedToken>, AnalysisError>;
}

/// A tagger backed by a token→tag lexicon, typically exported from a full
/// tagging toolkit. Tokens missing from the lexicon get `default_tag`.
#[derive(Debug, Clone)]
pub struct LexiconTagger {
    lexicon: HashMap<String, PosTag>,
    default_tag: PosTag,
}

impl LexiconTagger {
    pub fn new(lexicon: HashMap<String, PosTag>) -> Self {
        LexiconTagger {
            lexicon,
            default_tag: PosTag::Other("NN".to_string()),
        }
    }

    pub fn with_default_tag(mut self, tag: PosTag) -> Self {
        self.default_tag = tag;
        self
    }

    /// Load a lexicon file with one `token<whitespace>TAG` entry per line.
    /// Blank lines and lines starting with `#` are skipped; a line without a
    /// tag is a [`AnalysisError::Tagger`] failure.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, AnalysisError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| AnalysisError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;

        let mut lexicon = HashMap::new();
        for (line_no, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.split_whitespace();
            let token = parts.next().unwrap_or_default();
            let tag = parts.next().ok_or_else(|| {
                AnalysisError::Tagger(format!(
                    "lexicon {}: line {} has no tag: {:?}",
                    path.display(),
                    line_no + 1,
                    line
                ))
            })?;
            lexicon.insert(token.to_string(), PosTag::from_label(tag));
        }
        Ok(LexiconTagger::new(lexicon))
    }
}

impl PosTagger for LexiconTagger {
    fn tag(&self, tokens: &[String]) -> Result<Vec<TaggedToken>, AnalysisError> {
        Ok(tokens
            .iter()
            .map(|token| {
                let tag = self
                    .lexicon
                    .get(token)
                    .cloned()
                    .unwrap_or_else(|| self.default_tag.clone());
                TaggedToken::new(token.clone(), tag)
            })
            .collect())
    }
}
