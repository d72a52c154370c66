/*!
 * Tests for tokenlist records and the IOB tag grammar
 */

use std::str::FromStr;

use teiprep::entity::EntityType;
use teiprep::tokenlist::{tokenlist_text, EnrichedToken, IobTag, SentenceTokens, TokenRecord};

fn record(value: &str, id: &str, whitespace: bool) -> TokenRecord {
    TokenRecord {
        value: value.to_string(),
        token_id: id.to_string(),
        whitespace,
    }
}

#[test]
fn test_token_record_serialize_shouldUseTokenIdKey() {
    let json = serde_json::to_string(&record("Wien", "t1", true)).unwrap();
    assert_eq!(
        json,
        "{\"value\":\"Wien\",\"tokenId\":\"t1\",\"whitespace\":true}"
    );
}

#[test]
fn test_enriched_token_serialize_shouldSkipAbsentFields() {
    let token = EnrichedToken {
        value: "Wien".to_string(),
        token_id: "t1".to_string(),
        whitespace: false,
        lemma: Some("Wien".to_string()),
        ..EnrichedToken::default()
    };
    let json = serde_json::to_string(&token).unwrap();
    assert!(json.contains("\"lemma\":\"Wien\""));
    assert!(!json.contains("\"pos\""));
    assert!(!json.contains("\"iob\""));
}

#[test]
fn test_enriched_token_deserialize_withTypeKey_shouldMapToTag() {
    let json = "{\"value\":\"Wien\",\"tokenId\":\"t1\",\"type\":\"NE\",\"iob\":\"B-LOC\"}";
    let token: EnrichedToken = serde_json::from_str(json).unwrap();
    assert_eq!(token.tag.as_deref(), Some("NE"));
    assert_eq!(token.iob.as_deref(), Some("B-LOC"));
    assert!(!token.whitespace);
}

#[test]
fn test_sentence_tokens_deserialize_shouldGroupTokens() {
    let json = "{\"sent\":\"Wien.\",\"tokens\":[\
        {\"value\":\"Wien\",\"tokenId\":\"t1\",\"whitespace\":false},\
        {\"value\":\".\",\"tokenId\":\"t2\",\"whitespace\":false}]}";
    let sentence: SentenceTokens = serde_json::from_str(json).unwrap();
    assert_eq!(sentence.sent, "Wien.");
    assert_eq!(sentence.tokens.len(), 2);
    assert_eq!(sentence.tokens[0].token_id, "t1");
}

#[test]
fn test_iob_tag_from_str_withValidTags_shouldParse() {
    assert_eq!(IobTag::from_str("O").unwrap(), IobTag::Outside);
    assert_eq!(
        IobTag::from_str("B-PER").unwrap(),
        IobTag::Begin(EntityType::Person)
    );
    assert_eq!(
        IobTag::from_str("I-LOC").unwrap(),
        IobTag::Inside(EntityType::Location)
    );
}

#[test]
fn test_iob_tag_from_str_withInvalidTags_shouldFail() {
    assert!(IobTag::from_str("").is_err());
    assert!(IobTag::from_str("B-").is_err());
    assert!(IobTag::from_str("X-PER").is_err());
    assert!(IobTag::from_str("o").is_err());
}

#[test]
fn test_iob_tag_display_shouldMatchWireSpelling() {
    assert_eq!(IobTag::Outside.to_string(), "O");
    assert_eq!(IobTag::Begin(EntityType::Person).to_string(), "B-PER");
    assert_eq!(IobTag::Inside(EntityType::Misc).to_string(), "I-MISC");
}

#[test]
fn test_tokenlist_text_withWhitespaceFlags_shouldReassembleText() {
    let tokens = [
        record("Maria", "t1", true),
        record("Theresia", "t2", true),
        record("war", "t3", false),
        record(".", "t4", false),
    ];
    assert_eq!(tokenlist_text(&tokens), "Maria Theresia war.");
}

#[test]
fn test_tokenlist_text_withTrailingSpace_shouldTrimEnd() {
    let tokens = [record("Ende", "t1", true)];
    assert_eq!(tokenlist_text(&tokens), "Ende");
    assert_eq!(tokenlist_text(&[]), "");
}
