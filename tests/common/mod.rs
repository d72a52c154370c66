/*!
 * Common test utilities and document fixtures for the teiprep test suite
 */

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use tempfile::TempDir;

/// A small tagged TEI document: one paragraph with three entity spans,
/// two sentences, one repeated surface string.
pub const TEI_TAGGED: &str = r#"<TEI xmlns="http://www.tei-c.org/ns/1.0">
  <teiHeader>
    <fileDesc>
      <titleStmt><title>Fixture</title></titleStmt>
    </fileDesc>
  </teiHeader>
  <text>
    <body>
      <p><rs type="place">Wien</rs> ist schön. <rs type="person">Maria Theresia</rs> regierte in <rs type="place">Wien</rs>.</p>
    </body>
  </text>
</TEI>"#;

/// A tokenized TEI document: `w`/`pc` tokens keyed by `xml:id`, with `seg`
/// whitespace containers between words.
pub const TEI_TOKENIZED: &str = r#"<TEI xmlns="http://www.tei-c.org/ns/1.0">
  <text>
    <body>
      <p><w xml:id="t1">Maria</w><seg> </seg><w xml:id="t2">Theresia</w><seg> </seg><w xml:id="t3">war</w><pc xml:id="t4">.</pc></p>
    </body>
  </text>
</TEI>"#;

/// A tokenized TEI document with one token missing its `xml:id`.
pub const TEI_TOKENIZED_NO_ID: &str = r#"<TEI xmlns="http://www.tei-c.org/ns/1.0">
  <text>
    <body>
      <p><w xml:id="t1">Maria</w><seg> </seg><w>Theresia</w></p>
    </body>
  </text>
</TEI>"#;

/// A TCF-style corpus document with parallel token/tag/lemma layers and one
/// sentence grouping.
pub const TCF_SAMPLE: &str = r#"<D-Spin xmlns="http://www.dspin.de/data">
  <TextCorpus lang="de">
    <tokens>
      <token ID="t_0">Wien</token>
      <token ID="t_1">ist</token>
      <token ID="t_2">schön</token>
      <token ID="t_3">.</token>
    </tokens>
    <POStags>
      <tag>NE</tag>
      <tag>VAFIN</tag>
      <tag>ADJD</tag>
      <tag>$.</tag>
    </POStags>
    <lemmas>
      <lemma>Wien</lemma>
      <lemma>sein</lemma>
      <lemma>schön</lemma>
      <lemma>.</lemma>
    </lemmas>
    <sentences>
      <sentence ID="s_0" tokenIDs="t_0 t_1 t_2 t_3"/>
    </sentences>
  </TextCorpus>
</D-Spin>"#;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}
