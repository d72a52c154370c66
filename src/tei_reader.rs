//! TEI document reading, training-data extraction and tokenlist round trips.
//!
//! A [`TeiReader`] owns one parsed TEI document. On the way out it extracts
//! whitespace-normalized plain text, entity mentions from `rs`-style tagged
//! spans, resolved NER training samples and a keyed tokenlist. On the way
//! back it merges an enriched tokenlist into the same document, writing
//! per-token attributes and reconstructing nested entity-span elements from
//! the IOB tag stream.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use log::{debug, warn};

use crate::entity::{EntityMention, NerTagMap, TrainingSample};
use crate::errors::DocumentError;
use crate::file_utils::FileManager;
use crate::offsets::{
    normalize_whitespace, offsets_by_sentence, resolve_offsets, MentionGroup, SentenceSplitter,
};
use crate::tokenlist::{IobTag, SentenceTokens, TokenRecord};
use crate::xml_doc::{NodeId, Selector, XmlDocument};

/// Element name used for reconstructed entity spans.
const ENTITY_ELEMENT: &str = "rs";
/// Identifier attribute keying tokens across the annotation round trip.
const TOKEN_ID_ATTR: &str = "xml:id";

/// Tracks the entity span currently being reassembled during a merge pass.
struct OpenEntity {
    container: NodeId,
    parent: NodeId,
    position: usize,
}

/// A parsed TEI document.
#[derive(Debug)]
pub struct TeiReader {
    doc: XmlDocument,
}

impl TeiReader {
    /// Parse a TEI document from a string
    pub fn from_str(xml: &str) -> Result<Self, DocumentError> {
        Ok(TeiReader {
            doc: XmlDocument::parse(xml)?,
        })
    }

    /// Read and parse a TEI document from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = FileManager::read_to_string(path)?;
        let doc = XmlDocument::parse(&content)
            .with_context(|| format!("failed to parse TEI document: {}", path.display()))?;
        Ok(TeiReader { doc })
    }

    /// Wrap an already-parsed document
    pub fn from_document(doc: XmlDocument) -> Self {
        TeiReader { doc }
    }

    /// The underlying document
    pub fn document(&self) -> &XmlDocument {
        &self.doc
    }

    /// Serialize the current tree back to XML
    pub fn to_xml(&self) -> Result<String, DocumentError> {
        self.doc.to_xml()
    }

    /// Save the current tree to `path`, or to a timestamped file in the
    /// working directory when no path is given. Returns the path written.
    pub fn write_to_file(&self, path: Option<&Path>) -> Result<PathBuf> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => PathBuf::from(FileManager::timestamped_name("document", "xml")),
        };
        FileManager::write_string(&path, &self.to_xml()?)?;
        Ok(path)
    }

    /// The extraction scope: the first `body` element, falling back to the
    /// document root when there is none.
    fn scope(&self) -> NodeId {
        self.doc
            .find_first(self.doc.root(), "body")
            .unwrap_or_else(|| self.doc.root())
    }

    /// All text under `node`, whitespace-normalized
    pub fn plain_text(&self, node: NodeId) -> String {
        normalize_whitespace(&self.doc.collect_text(node))
    }

    /// Extract raw entity mentions from elements matching `entity_selector`
    /// under `node`, in document order. Read-only; the type is resolved from
    /// the `type` attribute, falling back to the tag name, falling back to
    /// MISC (see [`NerTagMap::resolve`]).
    pub fn extract_mentions(
        &self,
        node: NodeId,
        entity_selector: &Selector,
        tag_map: &NerTagMap,
    ) -> Vec<EntityMention> {
        self.doc
            .select(node, entity_selector)
            .into_iter()
            .map(|element| {
                let kind = tag_map.resolve(
                    self.doc.attr(element, "type"),
                    self.doc.local_name(element),
                );
                EntityMention::new(&self.doc.collect_text(element), kind)
            })
            .collect()
    }

    /// One [`MentionGroup`] per element matching `parent_selector` inside the
    /// body: the passage's plain text plus its tagged mentions.
    pub fn mention_groups(
        &self,
        parent_selector: &Selector,
        entity_selector: &Selector,
        tag_map: &NerTagMap,
    ) -> Vec<MentionGroup> {
        self.doc
            .select(self.scope(), parent_selector)
            .into_iter()
            .map(|parent| MentionGroup {
                text: self.plain_text(parent),
                mentions: self.extract_mentions(parent, entity_selector, tag_map),
            })
            .collect()
    }

    /// Resolve entity offsets per passage (paragraph granularity): one
    /// [`TrainingSample`] per matched parent element.
    pub fn ne_offsets(
        &self,
        parent_selector: &Selector,
        entity_selector: &Selector,
        tag_map: &NerTagMap,
    ) -> Vec<TrainingSample> {
        self.mention_groups(parent_selector, entity_selector, tag_map)
            .into_iter()
            .map(|group| resolve_offsets(&group.text, &group.mentions))
            .collect()
    }

    /// Resolve entity offsets per sentence: passages are re-split with the
    /// supplied splitter and every non-empty sentence yields one sample.
    pub fn ne_offsets_by_sentence(
        &self,
        parent_selector: &Selector,
        entity_selector: &Selector,
        tag_map: &NerTagMap,
        splitter: &dyn SentenceSplitter,
    ) -> Vec<TrainingSample> {
        let groups = self.mention_groups(parent_selector, entity_selector, tag_map);
        offsets_by_sentence(&groups, splitter)
    }

    /// Serialize the document's token stream: one [`TokenRecord`] per `w` or
    /// `pc` element in document order. `whitespace` is true exactly when the
    /// next sibling is a `seg` container. A token without an `xml:id` aborts
    /// the whole serialization, since round-trip keying is impossible.
    pub fn create_tokenlist(&self) -> Result<Vec<TokenRecord>, DocumentError> {
        let selector = Selector::new(["w", "pc"]);
        let mut tokens = Vec::new();
        for element in self.doc.select(self.doc.root(), &selector) {
            let token_id = self.doc.attr(element, TOKEN_ID_ATTR).ok_or_else(|| {
                DocumentError::MissingAttribute {
                    element: self.doc.local_name(element).to_string(),
                    attribute: TOKEN_ID_ATTR.to_string(),
                }
            })?;
            let whitespace = self
                .doc
                .next_sibling(element)
                .map_or(false, |sibling| self.doc.local_name(sibling) == "seg");
            tokens.push(TokenRecord {
                value: self.doc.text(element).unwrap_or_default().to_string(),
                token_id: token_id.to_string(),
                whitespace,
            });
        }
        debug!("serialized {} tokens from TEI document", tokens.len());
        Ok(tokens)
    }

    /// Merge an enriched tokenlist back into the document.
    ///
    /// Each token is located by `xml:id` among the `w` elements; a missing id
    /// skips that token silently. Present enrichment fields are written as
    /// attributes (`lemma`, `type` for the fine-grained tag, `ana` for the
    /// POS, `dep`, and the raw tag as `ent_iob`), then the IOB stream drives
    /// span reconstruction:
    ///
    /// - `B-<TYPE>` opens a fresh `rs` container typed `<TYPE>` at the
    ///   token's position, absorbing the token (copy, then clear the
    ///   original). An already-open container is dropped unterminated.
    /// - `I-<TYPE>` absorbs the token into the open container; with no open
    ///   container it leaves the structure alone.
    /// - `O` inserts the open container at the recorded position.
    ///
    /// A container still open at the end of the stream is not inserted.
    /// Those three edge behaviors match what downstream consumers already
    /// depend on and are pinned by tests rather than corrected.
    pub fn merge_tokenlist(
        &mut self,
        sentences: &[SentenceTokens],
    ) -> Result<&XmlDocument, DocumentError> {
        let root = self.doc.root();
        let mut open: Option<OpenEntity> = None;

        for sentence in sentences {
            for token in &sentence.tokens {
                let Some(node) = self.doc.find_by_attr(root, "w", TOKEN_ID_ATTR, &token.token_id)
                else {
                    continue;
                };

                if let Some(lemma) = &token.lemma {
                    self.doc.set_attr(node, "lemma", lemma);
                }
                if let Some(tag) = &token.tag {
                    self.doc.set_attr(node, "type", tag);
                }
                if let Some(pos) = &token.pos {
                    self.doc.set_attr(node, "ana", pos);
                }
                if let Some(dep) = &token.dep {
                    self.doc.set_attr(node, "dep", dep);
                }

                let Some(raw_iob) = &token.iob else {
                    continue;
                };
                self.doc.set_attr(node, "ent_iob", raw_iob);
                match IobTag::from_str(raw_iob)? {
                    IobTag::Begin(label) => {
                        if open.is_some() {
                            warn!(
                                "token {} begins an entity while one is still open; \
                                 dropping the unterminated container",
                                token.token_id
                            );
                        }
                        let parent = self.doc.parent(node).unwrap_or(root);
                        let position = self.doc.child_index(parent, node).unwrap_or(0);
                        let container = self.doc.new_element(ENTITY_ELEMENT);
                        self.doc.set_attr(container, "type", label.as_label());
                        let copy = self.doc.deep_copy(node);
                        self.doc.append_child(container, copy);
                        self.doc.clear(node);
                        open = Some(OpenEntity {
                            container,
                            parent,
                            position,
                        });
                    }
                    IobTag::Inside(_) => {
                        if let Some(entity) = &open {
                            let copy = self.doc.deep_copy(node);
                            self.doc.append_child(entity.container, copy);
                            self.doc.clear(node);
                        }
                    }
                    IobTag::Outside => {
                        if let Some(entity) = open.take() {
                            self.doc
                                .insert_child(entity.parent, entity.position, entity.container);
                        }
                    }
                }
            }
        }

        if open.is_some() {
            warn!("entity container still open at end of token stream; not inserted");
        }
        Ok(&self.doc)
    }
}
