/*!
 * External annotation collaborators.
 *
 * The statistical NLP engine is consumed as a black box behind the
 * [`Annotator`] trait: it takes a tokenlist out, hands an enriched tokenlist
 * back. Which processing stages may be requested is a capability check
 * against the explicit [`PipelineStage`] enum, not a free-form string list.
 *
 * [`RemoteTokenizer`] is the client for the remote XML tokenization service:
 * it POSTs the serialized document and receives the tokenized document back.
 * A non-success status fails the call and is surfaced to the caller; retry
 * policy, if any, belongs to whoever owns the network.
 */

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use log::debug;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};

use crate::errors::AnnotatorError;
use crate::tokenlist::{SentenceTokens, TokenRecord};

/// The processing stages an annotator may provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStage {
    /// Part-of-speech tagging and lemmatization
    Tagger,
    /// Dependency parsing (also supplies sentence boundaries)
    Parser,
    /// Named-entity recognition
    Ner,
}

impl PipelineStage {
    /// Every known stage
    pub const ALL: [PipelineStage; 3] =
        [PipelineStage::Tagger, PipelineStage::Parser, PipelineStage::Ner];

    /// The stage's canonical name
    pub fn name(&self) -> &'static str {
        match self {
            PipelineStage::Tagger => "tagger",
            PipelineStage::Parser => "parser",
            PipelineStage::Ner => "ner",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for PipelineStage {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tagger" => Ok(PipelineStage::Tagger),
            "parser" => Ok(PipelineStage::Parser),
            "ner" => Ok(PipelineStage::Ner),
            other => Err(anyhow!("unknown pipeline stage: {}", other)),
        }
    }
}

/// Common trait for token-level annotators.
///
/// Implementations wrap an NLP engine that consumes a tokenlist and returns
/// the same tokens enriched with lemma, POS, dependency and IOB information,
/// grouped into sentences. The round trip is keyed by `tokenId`; annotators
/// must return every token they were given.
#[async_trait]
pub trait Annotator: Send + Sync {
    /// Whether this annotator can run the given stage
    fn supports(&self, stage: PipelineStage) -> bool;

    /// Run the requested stages over a tokenlist
    ///
    /// # Errors
    /// [`AnnotatorError::UnsupportedStage`] when a requested stage fails the
    /// capability check; transport errors per [`AnnotatorError`].
    async fn annotate(
        &self,
        tokens: Vec<TokenRecord>,
        stages: &[PipelineStage],
    ) -> Result<Vec<SentenceTokens>, AnnotatorError>;
}

/// Client for the remote XML tokenization service.
#[derive(Debug, Clone)]
pub struct RemoteTokenizer {
    client: Client,
    endpoint: String,
    profile: String,
}

impl RemoteTokenizer {
    /// Create a client for `endpoint` with the given tokenization profile
    pub fn new(
        endpoint: impl Into<String>,
        profile: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, AnnotatorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AnnotatorError::RequestFailed(e.to_string()))?;
        Ok(RemoteTokenizer {
            client,
            endpoint: endpoint.into(),
            profile: profile.into(),
        })
    }

    /// The profile-suffixed URL requests go to
    pub fn url(&self) -> String {
        format!("{}{}", self.endpoint, self.profile)
    }

    /// POST a serialized document for tokenization and return the tokenized
    /// document. Fails on any non-success status; never retries.
    pub async fn tokenize(&self, xml: &str) -> Result<String, AnnotatorError> {
        let url = self.url();
        debug!("posting document to tokenizer at {}", url);
        let response = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/xml;charset=UTF-8")
            .header(header::ACCEPT, "application/xml")
            .body(xml.to_string())
            .send()
            .await
            .map_err(|e| AnnotatorError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AnnotatorError::StatusError {
                status_code: status.as_u16(),
                message,
            });
        }
        response
            .text()
            .await
            .map_err(|e| AnnotatorError::ResponseFailed(e.to_string()))
    }
}
