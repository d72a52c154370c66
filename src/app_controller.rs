//! Pipeline driver tying config, document readers and collaborators
//! together.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{error, info};

use crate::annotator::RemoteTokenizer;
use crate::app_config::Config;
use crate::convert::{detect_format, DataFormat};
use crate::entity::TrainingSample;
use crate::file_utils::FileManager;
use crate::offsets::RuleSentenceSplitter;
use crate::tcf_reader::TcfReader;
use crate::tei_reader::TeiReader;
use crate::tokenlist::{SentenceTokens, TokenRecord};
use crate::xml_doc::XmlDocument;

/// Main application controller
pub struct Controller {
    config: Config,
}

impl Controller {
    /// Create a controller with the given configuration
    pub fn with_config(config: Config) -> Self {
        Controller { config }
    }

    /// The active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Collect the corpus files behind an input path: the file itself, or
    /// every `.xml` file under a directory.
    fn collect_files(input: &Path) -> Result<Vec<PathBuf>> {
        if FileManager::dir_exists(input) {
            let files = FileManager::find_files(input, "xml")?;
            if files.is_empty() {
                anyhow::bail!("no XML files found under {}", input.display());
            }
            Ok(files)
        } else if FileManager::file_exists(input) {
            Ok(vec![input.to_path_buf()])
        } else {
            anyhow::bail!("input path does not exist: {}", input.display());
        }
    }

    /// Extract NER training samples from a TEI file or a directory of TEI
    /// files, at paragraph or sentence granularity. A file that fails to
    /// parse is logged with its path and skipped; the batch carries on.
    pub fn extract_training_data(
        &self,
        input: &Path,
        by_sentence: bool,
    ) -> Result<Vec<TrainingSample>> {
        let files = Self::collect_files(input)?;
        let tag_map = self.config.ner_tag_map();
        let parents = self.config.parent_selector();
        let entities = self.config.entity_selector();
        let splitter = RuleSentenceSplitter;

        let mut samples = Vec::new();
        let file_count = files.len();
        for file in files {
            let extracted = TeiReader::from_file(&file).map(|reader| {
                if by_sentence {
                    reader.ne_offsets_by_sentence(&parents, &entities, &tag_map, &splitter)
                } else {
                    reader.ne_offsets(&parents, &entities, &tag_map)
                }
            });
            match extracted {
                Ok(mut file_samples) => samples.append(&mut file_samples),
                Err(e) => error!("failed to process {}: {}", file.display(), e),
            }
        }
        info!(
            "extracted {} training samples from {} file(s)",
            samples.len(),
            file_count
        );
        Ok(samples)
    }

    /// Serialize the token stream of a document file, TEI or TCF, sniffing
    /// the format from the parsed tree.
    pub fn export_tokenlist(&self, input: &Path) -> Result<Vec<TokenRecord>> {
        let content = FileManager::read_to_string(input)?;
        let doc = XmlDocument::parse(&content)
            .with_context(|| format!("failed to parse document: {}", input.display()))?;
        let tokens = match detect_format(&doc) {
            DataFormat::TcfXml => TcfReader::from_document(doc).create_tokenlist(),
            _ => TeiReader::from_document(doc).create_tokenlist(),
        }
        .with_context(|| format!("failed to serialize tokens from {}", input.display()))?;
        Ok(tokens)
    }

    /// Merge an enriched tokenlist file into a document file and return the
    /// mutated document as an XML string.
    pub fn merge_tokenlist(&self, document: &Path, tokens: &Path) -> Result<String> {
        let sentences: Vec<SentenceTokens> =
            serde_json::from_str(&FileManager::read_to_string(tokens)?)
                .with_context(|| format!("invalid tokenlist file: {}", tokens.display()))?;

        let content = FileManager::read_to_string(document)?;
        let doc = XmlDocument::parse(&content)
            .with_context(|| format!("failed to parse document: {}", document.display()))?;
        let xml = match detect_format(&doc) {
            DataFormat::TcfXml => {
                let mut reader = TcfReader::from_document(doc);
                crate::convert::tokenlist_into_tcf(&mut reader, &sentences)
                    .with_context(|| format!("merge failed for {}", document.display()))?;
                reader.to_xml()?
            }
            _ => {
                let mut reader = TeiReader::from_document(doc);
                crate::convert::tokenlist_into_tei(&mut reader, &sentences)
                    .with_context(|| format!("merge failed for {}", document.display()))?;
                reader.to_xml()?
            }
        };
        Ok(xml)
    }

    /// Send a document to the remote tokenizer service and parse the
    /// tokenized document it returns.
    pub async fn tokenize_document(&self, input: &Path) -> Result<TeiReader> {
        let content = FileManager::read_to_string(input)?;
        let tokenizer = RemoteTokenizer::new(
            &self.config.annotator.endpoint,
            &self.config.annotator.profile,
            self.config.annotator.timeout_secs,
        )?;
        let tokenized = tokenizer
            .tokenize(&content)
            .await
            .with_context(|| format!("tokenization failed for {}", input.display()))?;
        let reader = TeiReader::from_str(&tokenized)
            .context("tokenizer returned a document that does not parse")?;
        Ok(reader)
    }
}
