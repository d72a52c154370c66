// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::too_many_arguments)]

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::{info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::app_config::Config;
use crate::app_controller::Controller;
use crate::data_prep::{filter_samples, write_samples_jsonl};
use crate::file_utils::FileManager;

mod annotator;
mod app_config;
mod app_controller;
mod convert;
mod data_prep;
mod entity;
mod errors;
mod file_utils;
mod offsets;
mod tcf_reader;
mod tei_reader;
mod tokenlist;
mod xml_doc;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract NER training samples from TEI documents
    Extract {
        /// Input TEI file or directory of TEI files
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        /// Emit one sample per sentence instead of per paragraph
        #[arg(short, long)]
        sentences: bool,

        /// Keep only samples with at least this many entities
        #[arg(long, default_value_t = 0)]
        min_entities: usize,

        /// Keep only samples with at least this many characters of text
        #[arg(long, default_value_t = 0)]
        min_text_len: usize,

        /// Output JSONL file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Serialize a document's token stream as tokenlist JSON
    Tokenlist {
        /// Input TEI or TCF file
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        /// Output JSON file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Merge an enriched tokenlist back into a document
    Merge {
        /// TEI or TCF document to merge into
        #[arg(value_name = "DOCUMENT")]
        document: PathBuf,

        /// Tokenlist JSON file with the enrichments
        #[arg(value_name = "TOKENS")]
        tokens: PathBuf,

        /// Output XML file (timestamped file in the working directory
        /// when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Send a document to the remote tokenizer service
    Tokenize {
        /// Input XML file to tokenize
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        /// Tokenizer endpoint override
        #[arg(long)]
        endpoint: Option<String>,

        /// Tokenizer profile override
        #[arg(long)]
        profile: Option<String>,

        /// Output XML file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// teiprep - TEI/TCF preparation for NER pipelines
///
/// Extracts NER training data from tagged TEI documents and round-trips
/// token-level annotations between XML documents and tokenlist JSON.
#[derive(Parser, Debug)]
#[command(name = "teiprep")]
#[command(version = "0.1.0")]
#[command(about = "TEI/TCF preparation tool for NER pipelines")]
#[command(long_about = "teiprep extracts NER training samples from tagged TEI documents and \
round-trips token-level annotations between XML documents and tokenlist JSON.

EXAMPLES:
    teiprep extract corpus/ -o train.jsonl          # Paragraph-level samples
    teiprep extract -s --min-entities 1 doc.xml     # Sentence samples with entities
    teiprep tokenlist doc.xml -o tokens.json        # Serialize the token stream
    teiprep merge doc.xml enriched.json -o out.xml  # Merge annotations back in
    teiprep tokenize plain.xml -o tokenized.xml     # Remote tokenization

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, defaults
    are used.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Write `content` to `output`, or to stdout when no output path is given
fn emit(output: Option<&PathBuf>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            FileManager::write_string(path, content)?;
            info!("wrote {}", path.display());
            Ok(())
        }
        None => {
            let mut stdout = std::io::stdout();
            stdout.write_all(content.as_bytes())?;
            if !content.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    let mut config = Config::from_file_or_default(&cli.config_path)
        .with_context(|| format!("failed to load config: {}", cli.config_path))?;
    if let Some(cmd_log_level) = &cli.log_level {
        config.log_level = cmd_log_level.clone().into();
    }
    log::set_max_level(config.log_level.to_level_filter());

    let controller = Controller::with_config(config);

    match cli.command {
        Commands::Extract {
            input_path,
            sentences,
            min_entities,
            min_text_len,
            output,
        } => {
            let samples = controller.extract_training_data(&input_path, sentences)?;
            let samples = filter_samples(samples, min_entities, min_text_len);
            match output {
                Some(path) => {
                    write_samples_jsonl(&samples, &path)?;
                    info!("wrote {} samples to {}", samples.len(), path.display());
                }
                None => {
                    let mut lines = String::new();
                    for sample in &samples {
                        lines.push_str(&serde_json::to_string(sample)?);
                        lines.push('\n');
                    }
                    emit(None, &lines)?;
                }
            }
        }
        Commands::Tokenlist { input_path, output } => {
            let tokens = controller.export_tokenlist(&input_path)?;
            emit(output.as_ref(), &serde_json::to_string_pretty(&tokens)?)?;
        }
        Commands::Merge {
            document,
            tokens,
            output,
        } => {
            let xml = controller.merge_tokenlist(&document, &tokens)?;
            match output {
                Some(path) => emit(Some(&path), &xml)?,
                None => {
                    let path = PathBuf::from(FileManager::timestamped_name("document", "xml"));
                    emit(Some(&path), &xml)?;
                }
            }
        }
        Commands::Tokenize {
            input_path,
            endpoint,
            profile,
            output,
        } => {
            let mut config = controller.config().clone();
            if let Some(endpoint) = endpoint {
                config.annotator.endpoint = endpoint;
            }
            if let Some(profile) = profile {
                config.annotator.profile = profile;
            }
            let controller = Controller::with_config(config);
            let reader = controller.tokenize_document(&input_path).await?;
            emit(output.as_ref(), &reader.to_xml()?)?;
        }
    }

    Ok(())
}
