use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use log::{info, LevelFilter};
use serde::{Deserialize, Serialize};

use crate::annotator::PipelineStage;
use crate::entity::NerTagMap;
use crate::xml_doc::Selector;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Mapping from source tags or `type` attribute values to canonical
    /// entity labels
    #[serde(default = "default_tag_map")]
    pub tag_map: HashMap<String, String>,

    /// Local names of the passage elements training text is extracted from
    #[serde(default = "default_parent_tags")]
    pub parent_tags: Vec<String>,

    /// Local names of the entity-tagged elements
    #[serde(default = "default_entity_tags")]
    pub entity_tags: Vec<String>,

    /// The application's entity label set
    #[serde(default = "default_labels")]
    pub labels: Vec<String>,

    /// Annotation service config
    #[serde(default)]
    pub annotator: AnnotatorConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Remote annotation / tokenization service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AnnotatorConfig {
    /// Service base URL; the tokenization profile is appended
    #[serde(default = "default_annotator_endpoint")]
    pub endpoint: String,

    /// Tokenization profile id
    #[serde(default = "default_annotator_profile")]
    pub profile: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Pipeline stages to request from the annotator
    #[serde(default = "default_stages")]
    pub stages: Vec<PipelineStage>,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            endpoint: default_annotator_endpoint(),
            profile: default_annotator_profile(),
            timeout_secs: default_timeout_secs(),
            stages: default_stages(),
        }
    }
}

/// Log level configuration
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Errors and warnings
    Warn,
    /// Normal operation logging
    #[default]
    Info,
    /// Verbose diagnostics
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    /// Convert to the log crate's filter
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_tag_map() -> HashMap<String, String> {
    let mut map = HashMap::new();
    for (key, label) in [
        ("persName", "PER"),
        ("person", "PER"),
        ("placeName", "LOC"),
        ("place", "LOC"),
        ("orgName", "ORG"),
        ("org", "ORG"),
        ("work", "MISC"),
        ("workName", "MISC"),
    ] {
        map.insert(key.to_string(), label.to_string());
    }
    map
}

fn default_parent_tags() -> Vec<String> {
    vec!["p".to_string()]
}

fn default_entity_tags() -> Vec<String> {
    vec!["rs".to_string()]
}

fn default_labels() -> Vec<String> {
    ["PER", "LOC", "ORG", "MISC"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_annotator_endpoint() -> String {
    "https://xtx.acdh.oeaw.ac.at/exist/restxq/xtx/tokenize/".to_string()
}

fn default_annotator_profile() -> String {
    "default".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_stages() -> Vec<PipelineStage> {
    PipelineStage::ALL.to_vec()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tag_map: default_tag_map(),
            parent_tags: default_parent_tags(),
            entity_tags: default_entity_tags(),
            labels: default_labels(),
            annotator: AnnotatorConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("invalid config file: {}", path.display()))?;
        Ok(config)
    }

    /// Load configuration, falling back to the defaults when the file does
    /// not exist
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            info!(
                "config file {} not found, using defaults",
                path.display()
            );
            Ok(Self::default())
        }
    }

    /// Save configuration to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// The entity tag map as an explicit value for extraction calls
    pub fn ner_tag_map(&self) -> NerTagMap {
        NerTagMap::from_labels(&self.tag_map)
    }

    /// Selector for passage elements
    pub fn parent_selector(&self) -> Selector {
        Selector::new(self.parent_tags.iter().cloned())
    }

    /// Selector for entity-tagged elements
    pub fn entity_selector(&self) -> Selector {
        Selector::new(self.entity_tags.iter().cloned())
    }
}
