/*!
 * Tests for TCF layer access, tokenlist serialization and merge
 */

use teiprep::errors::DocumentError;
use teiprep::tcf_reader::TcfReader;
use teiprep::tokenlist::{tokenlist_text, EnrichedToken};

use crate::common;

fn enriched(id: &str, value: &str) -> EnrichedToken {
    EnrichedToken {
        value: value.to_string(),
        token_id: id.to_string(),
        ..EnrichedToken::default()
    }
}

#[test]
fn test_create_tokenlist_withTokenLayer_shouldKeyByIdAttribute() {
    let reader = TcfReader::from_str(common::TCF_SAMPLE).unwrap();
    let tokens = reader.create_tokenlist().unwrap();

    assert_eq!(tokens.len(), 4);
    let ids: Vec<&str> = tokens.iter().map(|t| t.token_id.as_str()).collect();
    assert_eq!(ids, ["t_0", "t_1", "t_2", "t_3"]);
    let values: Vec<&str> = tokens.iter().map(|t| t.value.as_str()).collect();
    assert_eq!(values, ["Wien", "ist", "schön", "."]);
}

#[test]
fn test_create_tokenlist_withPunctuation_shouldDecideWhitespaceFromNextToken() {
    let reader = TcfReader::from_str(common::TCF_SAMPLE).unwrap();
    let tokens = reader.create_tokenlist().unwrap();

    // Space before alphanumeric followers, none before "." and at the end
    let flags: Vec<bool> = tokens.iter().map(|t| t.whitespace).collect();
    assert_eq!(flags, [true, true, false, false]);
    assert_eq!(tokenlist_text(&tokens), "Wien ist schön.");
}

#[test]
fn test_create_tokenlist_withOpeningMarks_shouldSuppressFollowingSpace() {
    let xml = r#"<TextCorpus>
      <tokens>
        <token ID="t_0">(</token>
        <token ID="t_1">Wien</token>
        <token ID="t_2">)</token>
      </tokens>
    </TextCorpus>"#;
    let reader = TcfReader::from_str(xml).unwrap();
    let tokens = reader.create_tokenlist().unwrap();
    let flags: Vec<bool> = tokens.iter().map(|t| t.whitespace).collect();
    assert_eq!(flags, [false, false, false]);
    assert_eq!(tokenlist_text(&tokens), "(Wien)");
}

#[test]
fn test_create_tokenlist_withMissingId_shouldFail() {
    let xml = "<TextCorpus><tokens><token>Wien</token></tokens></TextCorpus>";
    let reader = TcfReader::from_str(xml).unwrap();
    let err = reader.create_tokenlist().unwrap_err();
    assert!(matches!(
        err,
        DocumentError::MissingAttribute { attribute, .. } if attribute == "ID"
    ));
}

#[test]
fn test_merge_tokenlist_byId_shouldWriteAttributesOnTokens() {
    let mut reader = TcfReader::from_str(common::TCF_SAMPLE).unwrap();
    let mut token = enriched("t_0", "Wien");
    token.lemma = Some("Wien".to_string());
    token.iob = Some("B-LOC".to_string());
    token.tag = Some("NE".to_string());
    reader.merge_tokenlist(&[token], true).unwrap();

    let xml = reader.to_xml().unwrap();
    assert!(xml.contains("<token ID=\"t_0\" lemma=\"Wien\" iob=\"B-LOC\" type=\"NE\">Wien</token>"));
    // No span elements appear in corpus documents
    assert!(!xml.contains("<rs"));
}

#[test]
fn test_merge_tokenlist_byId_withUnknownId_shouldSkipSilently() {
    let mut reader = TcfReader::from_str(common::TCF_SAMPLE).unwrap();
    let mut token = enriched("missing", "x");
    token.lemma = Some("x".to_string());
    reader.merge_tokenlist(&[token], true).unwrap();
    assert!(!reader.to_xml().unwrap().contains("missing"));
}

#[test]
fn test_merge_tokenlist_positional_shouldZipInOrder() {
    let mut reader = TcfReader::from_str(common::TCF_SAMPLE).unwrap();
    let mut first = enriched("a", "Wien");
    first.lemma = Some("Wien".to_string());
    let mut second = enriched("b", "ist");
    second.lemma = Some("sein".to_string());
    reader.merge_tokenlist(&[first, second], false).unwrap();

    let xml = reader.to_xml().unwrap();
    // Positional merge ignores ids and stops at the shorter side
    assert!(xml.contains("<token ID=\"t_0\" lemma=\"Wien\">Wien</token>"));
    assert!(xml.contains("<token ID=\"t_1\" lemma=\"sein\">ist</token>"));
    assert!(xml.contains("<token ID=\"t_2\">schön</token>"));
}

#[test]
fn test_sentences_withParallelLayers_shouldSliceByTokenCount() {
    let reader = TcfReader::from_str(common::TCF_SAMPLE).unwrap();
    let sentences = reader.sentences().unwrap();

    assert_eq!(sentences.len(), 1);
    let sentence = &sentences[0];
    assert_eq!(sentence.id, "s_0");
    assert_eq!(sentence.words, ["Wien", "ist", "schön", "."]);
    assert_eq!(sentence.tags, ["NE", "VAFIN", "ADJD", "$."]);
    assert_eq!(sentence.lemmas, ["Wien", "sein", "schön", "."]);
}

#[test]
fn test_tagger_samples_withSentence_shouldJoinWordsWithSpaces() {
    let reader = TcfReader::from_str(common::TCF_SAMPLE).unwrap();
    let samples = reader.tagger_samples().unwrap();

    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].text, "Wien ist schön .");
    assert_eq!(samples[0].words.len(), samples[0].tags.len());
}
