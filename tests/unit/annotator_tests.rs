/*!
 * Tests for pipeline stages and annotation collaborators
 */

use std::str::FromStr;

use async_trait::async_trait;
use teiprep::annotator::{Annotator, PipelineStage, RemoteTokenizer};
use teiprep::errors::AnnotatorError;
use teiprep::tokenlist::{SentenceTokens, TokenRecord};

#[test]
fn test_pipeline_stage_from_str_withKnownStages_shouldParse() {
    assert_eq!(
        PipelineStage::from_str("tagger").unwrap(),
        PipelineStage::Tagger
    );
    assert_eq!(
        PipelineStage::from_str("NER").unwrap(),
        PipelineStage::Ner
    );
    assert!(PipelineStage::from_str("tokenizer").is_err());
}

#[test]
fn test_pipeline_stage_display_shouldUseCanonicalNames() {
    let names: Vec<String> = PipelineStage::ALL.iter().map(|s| s.to_string()).collect();
    assert_eq!(names, ["tagger", "parser", "ner"]);
}

#[test]
fn test_pipeline_stage_serde_shouldUseLowercase() {
    assert_eq!(
        serde_json::to_string(&PipelineStage::Ner).unwrap(),
        "\"ner\""
    );
    let parsed: PipelineStage = serde_json::from_str("\"parser\"").unwrap();
    assert_eq!(parsed, PipelineStage::Parser);
}

#[test]
fn test_remote_tokenizer_url_shouldAppendProfile() {
    let tokenizer =
        RemoteTokenizer::new("https://example.org/tokenize/", "default", 30).unwrap();
    assert_eq!(tokenizer.url(), "https://example.org/tokenize/default");
}

/// A capability-gated annotator that echoes its input back in one sentence.
struct EchoAnnotator;

#[async_trait]
impl Annotator for EchoAnnotator {
    fn supports(&self, stage: PipelineStage) -> bool {
        stage == PipelineStage::Tagger
    }

    async fn annotate(
        &self,
        tokens: Vec<TokenRecord>,
        stages: &[PipelineStage],
    ) -> Result<Vec<SentenceTokens>, AnnotatorError> {
        if let Some(unsupported) = stages.iter().find(|s| !self.supports(**s)) {
            return Err(AnnotatorError::UnsupportedStage(unsupported.to_string()));
        }
        Ok(vec![SentenceTokens {
            sent: teiprep::tokenlist::tokenlist_text(&tokens),
            tokens: tokens.into_iter().map(Into::into).collect(),
        }])
    }
}

#[tokio::test]
async fn test_annotator_withSupportedStage_shouldReturnAllTokens() {
    let tokens = vec![
        TokenRecord {
            value: "Wien".to_string(),
            token_id: "t1".to_string(),
            whitespace: false,
        },
    ];
    let sentences = EchoAnnotator
        .annotate(tokens, &[PipelineStage::Tagger])
        .await
        .unwrap();
    assert_eq!(sentences.len(), 1);
    assert_eq!(sentences[0].sent, "Wien");
    assert_eq!(sentences[0].tokens[0].token_id, "t1");
}

#[tokio::test]
async fn test_annotator_withUnsupportedStage_shouldFailCapabilityCheck() {
    let err = EchoAnnotator
        .annotate(Vec::new(), &[PipelineStage::Ner])
        .await
        .unwrap_err();
    assert!(matches!(err, AnnotatorError::UnsupportedStage(stage) if stage == "ner"));
}
