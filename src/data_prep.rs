//! Training-sample cleaning and JSONL persistence.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use crate::entity::TrainingSample;

/// Drop samples with fewer than `min_entities` resolved entities or fewer
/// than `min_text_len` characters of text. This is the filtering stage the
/// offset resolver deliberately leaves to its caller: empty or thin samples
/// are produced, not suppressed.
pub fn filter_samples(
    samples: Vec<TrainingSample>,
    min_entities: usize,
    min_text_len: usize,
) -> Vec<TrainingSample> {
    let before = samples.len();
    let kept: Vec<TrainingSample> = samples
        .into_iter()
        .filter(|sample| {
            sample.entities.len() >= min_entities
                && sample.text.chars().count() >= min_text_len
        })
        .collect();
    info!(
        "kept {} of {} samples (min_entities: {}, min_text_len: {})",
        kept.len(),
        before,
        min_entities,
        min_text_len
    );
    kept
}

/// Write samples to a JSONL file, one external-shape tuple per line
pub fn write_samples_jsonl<P: AsRef<Path>>(samples: &[TrainingSample], path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("failed to create output file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for sample in samples {
        let line = serde_json::to_string(sample)?;
        writeln!(writer, "{}", line)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read samples back from a JSONL file; empty lines are skipped
pub fn read_samples_jsonl<P: AsRef<Path>>(path: P) -> Result<Vec<TrainingSample>> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("failed to open samples file: {}", path.display()))?;
    let mut samples = Vec::new();
    for (number, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let sample: TrainingSample = serde_json::from_str(&line)
            .with_context(|| format!("invalid sample on line {} of {}", number + 1, path.display()))?;
        samples.push(sample);
    }
    Ok(samples)
}
