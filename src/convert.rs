//! Conversions between payload formats.
//!
//! The pipeline moves data between four representations: TEI documents, TCF
//! documents, annotator tokenlists and plain text. Dispatch is an explicit
//! tagged union with one conversion function per supported ordered pair;
//! the MIME spellings survive only at the string boundary, in
//! [`DataFormat`]'s `Display`/`FromStr`.

use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;

use crate::errors::{AppError, DocumentError};
use crate::tcf_reader::TcfReader;
use crate::tei_reader::TeiReader;
use crate::tokenlist::{EnrichedToken, SentenceTokens, TokenRecord};
use crate::xml_doc::XmlDocument;

/// The payload formats the converter understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataFormat {
    /// TEI/XML document
    TeiXml,
    /// Linguistic-corpus (TCF) XML document
    TcfXml,
    /// Sentence-grouped tokenlist JSON
    Tokenlist,
    /// Plain text
    PlainText,
}

impl DataFormat {
    /// The MIME spelling used on the wire
    pub fn mime(&self) -> &'static str {
        match self {
            DataFormat::TeiXml => "application/xml+tei",
            DataFormat::TcfXml => "application/xml+tcf",
            DataFormat::Tokenlist => "application/json+acdhlang",
            DataFormat::PlainText => "text/plain",
        }
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mime())
    }
}

impl FromStr for DataFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "application/xml+tei" => Ok(DataFormat::TeiXml),
            "application/xml+tcf" => Ok(DataFormat::TcfXml),
            "application/json+acdhlang" => Ok(DataFormat::Tokenlist),
            "text/plain" => Ok(DataFormat::PlainText),
            other => Err(anyhow!("unsupported payload format: {}", other)),
        }
    }
}

/// A pipeline payload in one of the supported representations.
#[derive(Debug)]
pub enum Payload {
    /// A TEI document
    Tei(TeiReader),
    /// A TCF document
    Tcf(TcfReader),
    /// A sentence-grouped tokenlist
    Tokenlist(Vec<SentenceTokens>),
    /// Plain text
    PlainText(String),
}

impl Payload {
    /// The format tag of this payload
    pub fn format(&self) -> DataFormat {
        match self {
            Payload::Tei(_) => DataFormat::TeiXml,
            Payload::Tcf(_) => DataFormat::TcfXml,
            Payload::Tokenlist(_) => DataFormat::Tokenlist,
            Payload::PlainText(_) => DataFormat::PlainText,
        }
    }

    /// Validity signal for the pipeline driver: a boolean, not an error.
    /// Documents are valid once parsed; a tokenlist is valid when every
    /// token carries a non-empty id.
    pub fn is_valid(&self) -> bool {
        match self {
            Payload::Tei(_) | Payload::Tcf(_) | Payload::PlainText(_) => true,
            Payload::Tokenlist(sentences) => sentences
                .iter()
                .flat_map(|s| s.tokens.iter())
                .all(|t| !t.token_id.is_empty()),
        }
    }

    /// Convert into another format where a data-only conversion exists.
    /// Merging a tokenlist back into a document needs the target document
    /// and goes through [`tokenlist_into_tei`] / [`tokenlist_into_tcf`]
    /// instead.
    pub fn convert(self, to: DataFormat) -> Result<Payload, AppError> {
        let from = self.format();
        if from == to {
            return Ok(self);
        }
        match (self, to) {
            (Payload::Tei(reader), DataFormat::Tokenlist) => {
                let tokens = tei_to_tokenlist(&reader)?;
                Ok(Payload::Tokenlist(vec![group_unsplit(tokens)]))
            }
            (Payload::Tcf(reader), DataFormat::Tokenlist) => {
                let tokens = tcf_to_tokenlist(&reader)?;
                Ok(Payload::Tokenlist(vec![group_unsplit(tokens)]))
            }
            (Payload::Tei(reader), DataFormat::PlainText) => {
                Ok(Payload::PlainText(tei_to_text(&reader)))
            }
            (Payload::Tcf(reader), DataFormat::PlainText) => {
                Ok(Payload::PlainText(tcf_to_text(&reader)?))
            }
            _ => Err(AppError::UnsupportedConversion { from, to }),
        }
    }
}

/// Sniff which document format a parsed XML tree is in: TCF layers live
/// under a `TextCorpus` element, everything else is treated as TEI.
pub fn detect_format(doc: &XmlDocument) -> DataFormat {
    let root = doc.root();
    if doc.local_name(root) == "TextCorpus" || doc.find_first(root, "TextCorpus").is_some() {
        DataFormat::TcfXml
    } else {
        DataFormat::TeiXml
    }
}

/// TEI document → tokenlist
pub fn tei_to_tokenlist(reader: &TeiReader) -> Result<Vec<TokenRecord>, DocumentError> {
    reader.create_tokenlist()
}

/// TCF document → tokenlist
pub fn tcf_to_tokenlist(reader: &TcfReader) -> Result<Vec<TokenRecord>, DocumentError> {
    reader.create_tokenlist()
}

/// TEI document → normalized plain text of the whole document
pub fn tei_to_text(reader: &TeiReader) -> String {
    reader.plain_text(reader.document().root())
}

/// TCF document → space-joined token text
pub fn tcf_to_text(reader: &TcfReader) -> Result<String, DocumentError> {
    let tokens = reader.create_tokenlist()?;
    Ok(crate::tokenlist::tokenlist_text(&tokens))
}

/// Enriched tokenlist → TEI document (in-place merge with span
/// reconstruction)
pub fn tokenlist_into_tei(
    reader: &mut TeiReader,
    sentences: &[SentenceTokens],
) -> Result<(), DocumentError> {
    reader.merge_tokenlist(sentences)?;
    Ok(())
}

/// Enriched tokenlist → TCF document (in-place, attribute-only merge)
pub fn tokenlist_into_tcf(
    reader: &mut TcfReader,
    sentences: &[SentenceTokens],
) -> Result<(), DocumentError> {
    let tokens: Vec<EnrichedToken> = sentences
        .iter()
        .flat_map(|s| s.tokens.iter().cloned())
        .collect();
    reader.merge_tokenlist(&tokens, true)?;
    Ok(())
}

/// Wrap a flat token stream into a single unsplit sentence grouping
fn group_unsplit(tokens: Vec<TokenRecord>) -> SentenceTokens {
    SentenceTokens {
        sent: crate::tokenlist::tokenlist_text(&tokens),
        tokens: tokens.into_iter().map(EnrichedToken::from).collect(),
    }
}
