//! Entity-offset reconciliation: the algorithmic core.
//!
//! Mentions arrive as independently tagged surface strings; the plain text
//! they were tagged in is rendered separately. This module recovers character
//! offsets that are consistent, non-overlapping at the start position, and
//! de-duplicated, so they can be handed to a statistical tagger.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::entity::{EntityMention, EntityType, OffsetEntity, TrainingSample};

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Collapse every run of whitespace (including newlines) to a single space
/// and trim. Idempotent.
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").trim().to_string()
}

/// A plain-text passage together with the raw mentions tagged somewhere
/// inside it. Input to [`resolve_offsets`] and [`offsets_by_sentence`].
#[derive(Debug, Clone)]
pub struct MentionGroup {
    /// Whitespace-normalized passage text
    pub text: String,
    /// Mentions extracted from the passage's markup
    pub mentions: Vec<EntityMention>,
}

/// Resolve character offsets for every mention occurrence in `text`.
///
/// Every non-overlapping literal occurrence of each mention's surface text is
/// located left to right; candidates are de-duplicated by the full
/// (start, end, label) triple and sorted in that order. Mentions with empty
/// text are skipped. Offsets are character indices.
///
/// Collision handling is the same-start rule: scanning the sorted candidates,
/// each one is compared to the *next* candidate's start; on equality the
/// earlier one is dropped, so only the last candidate of a same-start run
/// survives. Spans that overlap without sharing a start are left untouched.
/// That narrower behavior is load-bearing for existing training sets and is
/// kept as-is rather than generalized into real overlap resolution.
pub fn resolve_offsets(text: &str, mentions: &[EntityMention]) -> TrainingSample {
    let mut candidates: BTreeSet<(usize, usize, String)> = BTreeSet::new();
    for mention in mentions {
        if mention.text.is_empty() {
            continue;
        }
        let mention_chars = mention.text.chars().count();
        for (byte_start, _) in text.match_indices(mention.text.as_str()) {
            let start = text[..byte_start].chars().count();
            candidates.insert((
                start,
                start + mention_chars,
                mention.kind.as_label().to_string(),
            ));
        }
    }

    let sorted: Vec<(usize, usize, String)> = candidates.into_iter().collect();
    let mut entities = Vec::with_capacity(sorted.len());
    for (index, candidate) in sorted.iter().enumerate() {
        let next_start = sorted.get(index + 1).map(|next| next.0);
        if next_start == Some(candidate.0) {
            continue;
        }
        entities.push(OffsetEntity {
            start: candidate.0,
            end: candidate.1,
            label: EntityType::from_label(&candidate.2),
        });
    }

    TrainingSample {
        text: text.to_string(),
        entities,
    }
}

/// Sentence-splitting capability supplied by the external NLP engine.
pub trait SentenceSplitter {
    /// Split a passage into sentences, in order
    fn split(&self, text: &str) -> Vec<String>;
}

/// A terminal-punctuation splitter for offline use and tests. Splits after
/// `.`, `!` or `?` (plus any attached closing quotes or brackets) when the
/// next character is whitespace or the text ends. Not a linguistic claim;
/// production pipelines plug in the NLP engine's splitter instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleSentenceSplitter;

impl SentenceSplitter for RuleSentenceSplitter {
    fn split(&self, text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        let mut current = String::new();
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            current.push(c);
            if matches!(c, '.' | '!' | '?') {
                while let Some(&next) = chars.peek() {
                    if matches!(next, '"' | '\'' | '“' | '”' | '’' | ')' | ']') {
                        current.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if chars.peek().map_or(true, |next| next.is_whitespace()) {
                    let sentence = current.trim();
                    if !sentence.is_empty() {
                        sentences.push(sentence.to_string());
                    }
                    current.clear();
                }
            }
        }
        let rest = current.trim();
        if !rest.is_empty() {
            sentences.push(rest.to_string());
        }
        sentences
    }
}

/// Re-split each group into sentences and resolve offsets per sentence.
///
/// Every non-empty sentence yields one [`TrainingSample`], entity-less ones
/// included; filtering is a separate concern (see [`crate::data_prep`]).
/// The group's full mention list is matched against each sentence
/// independently, so a recurring surface string shows up in every sentence
/// that contains it, at sentence-local offsets.
pub fn offsets_by_sentence(
    groups: &[MentionGroup],
    splitter: &dyn SentenceSplitter,
) -> Vec<TrainingSample> {
    let mut samples = Vec::new();
    for group in groups {
        for sentence in splitter.split(&group.text) {
            if sentence.is_empty() {
                continue;
            }
            samples.push(resolve_offsets(&sentence, &group.mentions));
        }
    }
    samples
}
