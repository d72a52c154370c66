//! Linguistic-corpus XML (TCF-flavored) documents.
//!
//! TCF stores the token stream in flat `token` elements keyed by an `ID`
//! attribute, with parallel `lemma`/`tag` layers and `sentence` elements
//! referencing token ids. Compared to TEI, the tokenlist round trip here is
//! attribute-only: enrichment lands on the token elements, no span elements
//! are reconstructed.

use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, warn};

use crate::errors::DocumentError;
use crate::file_utils::FileManager;
use crate::tokenlist::{EnrichedToken, TokenRecord};
use crate::xml_doc::{NodeId, Selector, XmlDocument};

/// Identifier attribute on TCF token elements.
const TOKEN_ID_ATTR: &str = "ID";

/// One sentence grouping out of a TCF document's parallel layers.
#[derive(Debug, Clone, PartialEq)]
pub struct TcfSentence {
    /// Sentence id from the `ID` attribute
    pub id: String,
    /// Token surface forms, in order
    pub words: Vec<String>,
    /// Fine-grained tags, parallel to `words`
    pub tags: Vec<String>,
    /// Lemmas, parallel to `words`
    pub lemmas: Vec<String>,
}

/// A tagger training sample derived from one TCF sentence.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggerSample {
    /// Space-joined sentence text
    pub text: String,
    /// Token surface forms
    pub words: Vec<String>,
    /// Fine-grained tags, parallel to `words`
    pub tags: Vec<String>,
    /// Lemmas, parallel to `words`
    pub lemmas: Vec<String>,
}

/// A parsed TCF document.
#[derive(Debug)]
pub struct TcfReader {
    doc: XmlDocument,
}

impl TcfReader {
    /// Parse a TCF document from a string
    pub fn from_str(xml: &str) -> Result<Self, DocumentError> {
        Ok(TcfReader {
            doc: XmlDocument::parse(xml)?,
        })
    }

    /// Read and parse a TCF document from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = FileManager::read_to_string(path)?;
        let doc = XmlDocument::parse(&content)
            .with_context(|| format!("failed to parse TCF document: {}", path.display()))?;
        Ok(TcfReader { doc })
    }

    /// Wrap an already-parsed document
    pub fn from_document(doc: XmlDocument) -> Self {
        TcfReader { doc }
    }

    /// The underlying document
    pub fn document(&self) -> &XmlDocument {
        &self.doc
    }

    /// Serialize the current tree back to XML
    pub fn to_xml(&self) -> Result<String, DocumentError> {
        self.doc.to_xml()
    }

    /// All elements of one layer, by local name, in document order
    fn layer(&self, local_name: &str) -> Vec<NodeId> {
        self.doc
            .select(self.doc.root(), &Selector::new([local_name]))
    }

    fn node_text(&self, node: NodeId) -> String {
        self.doc.text(node).unwrap_or_default().to_string()
    }

    /// Serialize the document's token stream: one [`TokenRecord`] per `token`
    /// element in document order. A token without an `ID` aborts the whole
    /// serialization.
    ///
    /// `whitespace` is decided from the next token's surface text: true when
    /// it begins with an alphanumeric character or one of the opening marks
    /// `„`/`(`, false otherwise and at end of stream. Tokens that are
    /// themselves opening marks never take a following space; the dash `‒`
    /// always does.
    pub fn create_tokenlist(&self) -> Result<Vec<TokenRecord>, DocumentError> {
        let mut tokens = Vec::new();
        for element in self.layer("token") {
            let token_id = self.doc.attr(element, TOKEN_ID_ATTR).ok_or_else(|| {
                DocumentError::MissingAttribute {
                    element: self.doc.local_name(element).to_string(),
                    attribute: TOKEN_ID_ATTR.to_string(),
                }
            })?;
            let value = self.node_text(element);
            let follows = self
                .doc
                .next_sibling(element)
                .map(|sibling| self.node_text(sibling))
                .filter(|text| !text.is_empty());
            let whitespace = match follows {
                Some(next) => {
                    if value == "(" || value == "„" {
                        false
                    } else if value == "‒" {
                        true
                    } else {
                        next.chars()
                            .next()
                            .map_or(false, |c| c.is_alphanumeric() || c == '„' || c == '(')
                    }
                }
                None => false,
            };
            tokens.push(TokenRecord {
                value,
                token_id: token_id.to_string(),
                whitespace,
            });
        }
        debug!("serialized {} tokens from TCF document", tokens.len());
        Ok(tokens)
    }

    /// Merge enriched tokens back onto the `token` elements.
    ///
    /// With `by_id` set, each token is located by its `ID` attribute and a
    /// missing id skips that token silently. Otherwise tokens are matched
    /// positionally; a count mismatch is logged and the overlap is merged.
    /// Present fields are written as the `lemma`, `iob`, `type` and `ana`
    /// attributes. No span elements are reconstructed in TCF documents.
    pub fn merge_tokenlist(
        &mut self,
        tokens: &[EnrichedToken],
        by_id: bool,
    ) -> Result<&XmlDocument, DocumentError> {
        let token_nodes = self.layer("token");
        debug!(
            "merging {} tokens into {} token nodes (by_id: {})",
            tokens.len(),
            token_nodes.len(),
            by_id
        );

        if by_id {
            let root = self.doc.root();
            for token in tokens {
                let Some(node) =
                    self.doc
                        .find_by_attr(root, "token", TOKEN_ID_ATTR, &token.token_id)
                else {
                    continue;
                };
                self.write_token_attrs(node, token);
            }
        } else {
            if tokens.len() != token_nodes.len() {
                warn!(
                    "token count mismatch in positional merge: {} tokens, {} nodes",
                    tokens.len(),
                    token_nodes.len()
                );
            }
            for (&node, token) in token_nodes.iter().zip(tokens) {
                self.write_token_attrs(node, token);
            }
        }
        Ok(&self.doc)
    }

    fn write_token_attrs(&mut self, node: NodeId, token: &EnrichedToken) {
        if let Some(lemma) = &token.lemma {
            self.doc.set_attr(node, "lemma", lemma);
        }
        if let Some(iob) = &token.iob {
            self.doc.set_attr(node, "iob", iob);
        }
        if let Some(tag) = &token.tag {
            self.doc.set_attr(node, "type", tag);
        }
        if let Some(pos) = &token.pos {
            self.doc.set_attr(node, "ana", pos);
        }
    }

    /// Group the parallel `token`/`tag`/`lemma` layers into sentences using
    /// each `sentence` element's `tokenIDs` reference list.
    pub fn sentences(&self) -> Result<Vec<TcfSentence>, DocumentError> {
        let token_nodes = self.layer("token");
        let tag_nodes = self.layer("tag");
        let lemma_nodes = self.layer("lemma");
        let mut sentences = Vec::new();
        let mut start = 0usize;

        for sentence in self.layer("sentence") {
            let id = self.doc.attr(sentence, TOKEN_ID_ATTR).ok_or_else(|| {
                DocumentError::MissingAttribute {
                    element: self.doc.local_name(sentence).to_string(),
                    attribute: TOKEN_ID_ATTR.to_string(),
                }
            })?;
            let token_count = self
                .doc
                .attr(sentence, "tokenIDs")
                .map_or(0, |ids| ids.split_whitespace().count());
            let end = (start + token_count).min(token_nodes.len());

            let texts = |nodes: &[NodeId]| -> Vec<String> {
                nodes
                    .get(start..end.min(nodes.len()))
                    .unwrap_or_default()
                    .iter()
                    .map(|&n| self.node_text(n))
                    .collect()
            };
            sentences.push(TcfSentence {
                id: id.to_string(),
                words: texts(&token_nodes),
                tags: texts(&tag_nodes),
                lemmas: texts(&lemma_nodes),
            });
            start = end;
        }
        Ok(sentences)
    }

    /// Build POS-tagger training samples, one per sentence.
    pub fn tagger_samples(&self) -> Result<Vec<TaggerSample>, DocumentError> {
        Ok(self
            .sentences()?
            .into_iter()
            .map(|sentence| TaggerSample {
                text: sentence.words.join(" "),
                words: sentence.words,
                tags: sentence.tags,
                lemmas: sentence.lemmas,
            })
            .collect())
    }
}
