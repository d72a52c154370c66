//! Tokenlist interchange records and the IOB tag grammar.
//!
//! A tokenlist is the hand-off format between document structure and the
//! external annotator: an ordered, externally keyed list of per-token
//! records. Ordering is document order and reconstructs the text via join;
//! the round trip is keyed end to end by `tokenId`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entity::EntityType;
use crate::errors::DocumentError;

/// One token as serialized out of a source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// Surface text of the token
    pub value: String,
    /// Stable identifier of the source element, unique within one document
    #[serde(rename = "tokenId")]
    pub token_id: String,
    /// True if a space separates this token from the next one
    pub whitespace: bool,
}

/// A token coming back from the annotator, carrying optional enrichment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichedToken {
    /// Surface text of the token
    pub value: String,
    /// Stable identifier keying the token back to its source element
    #[serde(rename = "tokenId")]
    pub token_id: String,
    /// True if a space separates this token from the next one
    #[serde(default)]
    pub whitespace: bool,
    /// Lemma
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lemma: Option<String>,
    /// Coarse part-of-speech tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<String>,
    /// Fine-grained tag
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Morphological analysis reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ana: Option<String>,
    /// Dependency relation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dep: Option<String>,
    /// IOB entity tag: `O`, `B-<TYPE>` or `I-<TYPE>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iob: Option<String>,
}

impl From<TokenRecord> for EnrichedToken {
    fn from(record: TokenRecord) -> Self {
        EnrichedToken {
            value: record.value,
            token_id: record.token_id,
            whitespace: record.whitespace,
            ..EnrichedToken::default()
        }
    }
}

/// Tokens grouped into one sentence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentenceTokens {
    /// The sentence's surface text
    pub sent: String,
    /// The sentence's tokens in order
    pub tokens: Vec<EnrichedToken>,
}

/// A parsed IOB tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IobTag {
    /// `O` — outside any entity
    Outside,
    /// `B-<TYPE>` — first token of an entity
    Begin(EntityType),
    /// `I-<TYPE>` — continuation token of an entity
    Inside(EntityType),
}

impl FromStr for IobTag {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "O" {
            return Ok(IobTag::Outside);
        }
        if let Some(label) = s.strip_prefix("B-") {
            if !label.is_empty() {
                return Ok(IobTag::Begin(EntityType::from_label(label)));
            }
        }
        if let Some(label) = s.strip_prefix("I-") {
            if !label.is_empty() {
                return Ok(IobTag::Inside(EntityType::from_label(label)));
            }
        }
        Err(DocumentError::InvalidIobTag(s.to_string()))
    }
}

impl fmt::Display for IobTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IobTag::Outside => write!(f, "O"),
            IobTag::Begin(label) => write!(f, "B-{}", label.as_label()),
            IobTag::Inside(label) => write!(f, "I-{}", label.as_label()),
        }
    }
}

/// Reassemble the plain text a tokenlist was serialized from, honoring the
/// whitespace flags.
pub fn tokenlist_text(tokens: &[TokenRecord]) -> String {
    let mut out = String::new();
    for token in tokens {
        out.push_str(&token.value);
        if token.whitespace {
            out.push(' ');
        }
    }
    out.trim_end().to_string()
}
