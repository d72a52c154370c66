/*!
 * Tests for entity types, tag mapping and sample serialization
 */

use std::collections::HashMap;

use teiprep::entity::{EntityType, NerTagMap, OffsetEntity, TrainingSample};

#[test]
fn test_entity_type_labels_withStandardTypes_shouldRoundTrip() {
    assert_eq!(EntityType::Person.as_label(), "PER");
    assert_eq!(EntityType::Location.as_label(), "LOC");
    assert_eq!(EntityType::Organization.as_label(), "ORG");
    assert_eq!(EntityType::Misc.as_label(), "MISC");

    assert_eq!(EntityType::from_label("PER"), EntityType::Person);
    assert_eq!(EntityType::from_label("person"), EntityType::Person);
    assert_eq!(EntityType::from_label("GPE"), EntityType::Location);
    assert_eq!(EntityType::from_label("org"), EntityType::Organization);
}

#[test]
fn test_entity_type_from_label_withUnknownLabel_shouldKeepAsOther() {
    let kind = EntityType::from_label("event");
    assert_eq!(kind, EntityType::Other("EVENT".to_string()));
    assert_eq!(kind.as_label(), "EVENT");
}

#[test]
fn test_tag_map_resolve_withTypeAttribute_shouldPreferAttribute() {
    let map = NerTagMap::default();
    assert_eq!(
        map.resolve(Some("person"), "rs"),
        EntityType::Person
    );
    assert_eq!(map.resolve(Some("place"), "rs"), EntityType::Location);
}

#[test]
fn test_tag_map_resolve_withoutTypeAttribute_shouldUseTagName() {
    let map = NerTagMap::default();
    assert_eq!(map.resolve(None, "persName"), EntityType::Person);
    assert_eq!(map.resolve(None, "orgName"), EntityType::Organization);
}

#[test]
fn test_tag_map_resolve_withUnmappedKey_shouldFallBackToMisc() {
    let map = NerTagMap::default();
    assert_eq!(map.resolve(Some("unknown"), "rs"), EntityType::Misc);
    assert_eq!(map.resolve(None, "rs"), EntityType::Misc);
}

#[test]
fn test_tag_map_from_labels_withConfigTable_shouldMapLabels() {
    let mut table = HashMap::new();
    table.insert("loc".to_string(), "LOC".to_string());
    let map = NerTagMap::from_labels(&table);
    assert_eq!(map.resolve(Some("loc"), "rs"), EntityType::Location);
}

#[test]
fn test_offset_entity_serialize_shouldEmitTriple() {
    let entity = OffsetEntity {
        start: 15,
        end: 19,
        label: EntityType::Location,
    };
    let json = serde_json::to_string(&entity).unwrap();
    assert_eq!(json, "[15,19,\"LOC\"]");
}

#[test]
fn test_offset_entity_deserialize_withValidTriple_shouldParse() {
    let entity: OffsetEntity = serde_json::from_str("[15,19,\"LOC\"]").unwrap();
    assert_eq!(entity.start, 15);
    assert_eq!(entity.end, 19);
    assert_eq!(entity.label, EntityType::Location);
}

#[test]
fn test_offset_entity_deserialize_withInvertedSpan_shouldFail() {
    assert!(serde_json::from_str::<OffsetEntity>("[19,15,\"LOC\"]").is_err());
    assert!(serde_json::from_str::<OffsetEntity>("[5,5,\"LOC\"]").is_err());
}

#[test]
fn test_training_sample_serialize_shouldEmitTupleWithEntityDict() {
    let sample = TrainingSample {
        text: "Wien ist schön.".to_string(),
        entities: vec![OffsetEntity {
            start: 0,
            end: 4,
            label: EntityType::Location,
        }],
    };
    let json = serde_json::to_string(&sample).unwrap();
    assert_eq!(json, "[\"Wien ist schön.\",{\"entities\":[[0,4,\"LOC\"]]}]");
}

#[test]
fn test_training_sample_roundtrip_shouldPreserveContent() {
    let json = "[\"Maria Theresia\",{\"entities\":[[0,14,\"PER\"]]}]";
    let sample: TrainingSample = serde_json::from_str(json).unwrap();
    assert_eq!(sample.text, "Maria Theresia");
    assert_eq!(sample.entities.len(), 1);
    assert_eq!(serde_json::to_string(&sample).unwrap(), json);
}
