use crate::translation::Lang;
use crate::utils::{AppConfig, OutputMode, ProviderKind};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "csv-langfill")]
#[command(author, version, about = "Resumable, rate-limited translation of multilingual CSV tables", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "langfill.toml", env = "LANGFILL_CONFIG")]
    pub config: PathBuf,

    /// Input CSV file
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Log file (ignored with --debug)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Row index to start from
    #[arg(long)]
    pub start: Option<usize>,

    /// Maximum number of rows with source text to process
    #[arg(long)]
    pub max_rows: Option<usize>,

    /// Source language as COLUMN[:provider_id], e.g. US:en
    #[arg(long)]
    pub source: Option<Lang>,

    /// Target language as COLUMN[:provider_id]; repeatable
    #[arg(long = "target")]
    pub targets: Vec<Lang>,

    /// Discover target languages from "<LANG> Translate" headers
    #[arg(long, overrides_with = "no_detect_languages")]
    pub detect_languages: bool,

    /// Use the configured target list even if the file enables detection
    #[arg(long, overrides_with = "detect_languages")]
    pub no_detect_languages: bool,

    /// Write the whole table once at the end instead of row by row
    #[arg(long, overrides_with = "streaming")]
    pub bulk: bool,

    /// Write and sync each row as soon as it is processed
    #[arg(long, overrides_with = "bulk")]
    pub streaming: bool,

    /// Log to stderr and print the translated table instead of writing files
    #[arg(long, overrides_with = "no_debug")]
    pub debug: bool,

    /// Write the output and log files even if the file enables debug mode
    #[arg(long, overrides_with = "debug")]
    pub no_debug: bool,

    /// Translation provider
    #[arg(long, value_enum)]
    pub provider: Option<ProviderArg>,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ProviderArg {
    Deepl,
    Command,
}

impl From<ProviderArg> for ProviderKind {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Deepl => ProviderKind::Deepl,
            ProviderArg::Command => ProviderKind::Command,
        }
    }
}

impl Cli {
    /// Command-line flags win over values from the configuration file.
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(input) = &self.input {
            config.io.input = input.clone();
        }
        if let Some(output) = &self.output {
            config.io.output = output.clone();
        }
        if let Some(log_file) = &self.log_file {
            config.io.log_file = log_file.clone();
        }
        if let Some(start) = self.start {
            config.io.start = start;
        }
        if let Some(max_rows) = self.max_rows {
            config.io.max_rows = max_rows;
        }
        if let Some(source) = &self.source {
            config.languages.source = source.clone();
        }
        if !self.targets.is_empty() {
            config.languages.targets = self.targets.clone();
        }
        if self.detect_languages {
            config.languages.detect = true;
        } else if self.no_detect_languages {
            config.languages.detect = false;
        }
        if self.bulk {
            config.io.mode = OutputMode::Bulk;
        } else if self.streaming {
            config.io.mode = OutputMode::Streaming;
        }
        if self.debug {
            config.io.debug = true;
        } else if self.no_debug {
            config.io.debug = false;
        }
        if let Some(provider) = self.provider {
            config.provider.kind = provider.into();
        }
    }
}
