//! Entity types, mentions, resolved offsets and training samples.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::offsets::normalize_whitespace;

/// Entity type classification.
///
/// Standard NER types following CoNLL conventions, with an open variant for
/// application-specific label sets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityType {
    /// Person name (PER)
    Person,
    /// Location/Place (LOC)
    Location,
    /// Organization name (ORG)
    Organization,
    /// Miscellaneous (MISC)
    Misc,
    /// Any other label
    Other(String),
}

impl EntityType {
    /// Convert to the standard label string
    pub fn as_label(&self) -> &str {
        match self {
            EntityType::Person => "PER",
            EntityType::Location => "LOC",
            EntityType::Organization => "ORG",
            EntityType::Misc => "MISC",
            EntityType::Other(label) => label.as_str(),
        }
    }

    /// Parse from a label string; unknown labels become [`EntityType::Other`]
    pub fn from_label(label: &str) -> Self {
        match label.to_uppercase().as_str() {
            "PER" | "PERSON" => EntityType::Person,
            "LOC" | "LOCATION" | "PLACE" | "GPE" => EntityType::Location,
            "ORG" | "ORGANIZATION" => EntityType::Organization,
            "MISC" => EntityType::Misc,
            other => EntityType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_label())
    }
}

impl FromStr for EntityType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(EntityType::from_label(s))
    }
}

/// A raw entity mention extracted from a tagged span: its surface text
/// (whitespace-normalized) and its canonical type. Ephemeral, consumed by the
/// offset resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityMention {
    /// Trimmed, whitespace-collapsed surface text
    pub text: String,
    /// Canonical entity type
    pub kind: EntityType,
}

impl EntityMention {
    /// Create a mention, normalizing the surface text
    pub fn new(text: &str, kind: EntityType) -> Self {
        EntityMention {
            text: normalize_whitespace(text),
            kind,
        }
    }
}

/// A resolved entity span: zero-based character offsets into a specific
/// plain-text string, `start < end`.
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetEntity {
    /// Start offset (character index, inclusive)
    pub start: usize,
    /// End offset (character index, exclusive)
    pub end: usize,
    /// Entity type
    pub label: EntityType,
}

// The external shape is a bare [start, end, "LABEL"] triple.
impl Serialize for OffsetEntity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.start, self.end, self.label.as_label()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for OffsetEntity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (start, end, label): (usize, usize, String) = Deserialize::deserialize(deserializer)?;
        if start >= end {
            return Err(D::Error::custom(format!(
                "invalid entity span: start {} >= end {}",
                start, end
            )));
        }
        Ok(OffsetEntity {
            start,
            end,
            label: EntityType::from_label(&label),
        })
    }
}

/// One training sample: a plain-text passage with its resolved entities,
/// sorted ascending by start offset.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSample {
    /// The plain text the offsets refer to
    pub text: String,
    /// Resolved entities, sorted by start
    pub entities: Vec<OffsetEntity>,
}

#[derive(Serialize)]
struct EntityDictRef<'a> {
    entities: &'a [OffsetEntity],
}

#[derive(Deserialize)]
struct EntityDict {
    entities: Vec<OffsetEntity>,
}

// Hand-off contract with the tagger-training collaborator:
// ("some text", {"entities": [[15, 19, "LOC"], ...]})
impl Serialize for TrainingSample {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (
            self.text.as_str(),
            EntityDictRef {
                entities: &self.entities,
            },
        )
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TrainingSample {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (text, dict): (String, EntityDict) = Deserialize::deserialize(deserializer)?;
        Ok(TrainingSample {
            text,
            entities: dict.entities,
        })
    }
}

/// Mapping from source tags or `type` attribute values to canonical entity
/// types. Passed explicitly into every call that needs it; there is no
/// process-wide mutable default.
#[derive(Debug, Clone)]
pub struct NerTagMap {
    map: HashMap<String, EntityType>,
}

impl NerTagMap {
    /// Build from an explicit mapping
    pub fn new(map: HashMap<String, EntityType>) -> Self {
        NerTagMap { map }
    }

    /// Build from a string-to-label table, e.g. out of a config file
    pub fn from_labels(labels: &HashMap<String, String>) -> Self {
        let map = labels
            .iter()
            .map(|(k, v)| (k.clone(), EntityType::from_label(v)))
            .collect();
        NerTagMap { map }
    }

    /// Resolve an element to a canonical type: look up the `type` attribute
    /// value when one is present, otherwise the element's tag name; anything
    /// unmapped falls back to MISC.
    pub fn resolve(&self, type_attr: Option<&str>, tag_name: &str) -> EntityType {
        let key = type_attr.unwrap_or(tag_name);
        self.map.get(key).cloned().unwrap_or(EntityType::Misc)
    }
}

impl Default for NerTagMap {
    fn default() -> Self {
        let mut map = HashMap::new();
        for (key, kind) in [
            ("persName", EntityType::Person),
            ("person", EntityType::Person),
            ("placeName", EntityType::Location),
            ("place", EntityType::Location),
            ("orgName", EntityType::Organization),
            ("org", EntityType::Organization),
            ("work", EntityType::Misc),
            ("workName", EntityType::Misc),
        ] {
            map.insert(key.to_string(), kind);
        }
        NerTagMap { map }
    }
}
