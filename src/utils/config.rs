use crate::translation::Lang;
use crate::utils::errors::{LangfillError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub io: IoConfig,
    pub languages: LanguageConfig,
    pub retry: RetryConfig,
    pub status: StatusConfig,
    pub provider: ProviderConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IoConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub log_file: PathBuf,
    pub delimiter: char,
    /// Row index the run starts from.
    pub start: usize,
    /// Upper bound on rows with a non-empty source cell.
    pub max_rows: usize,
    pub mode: OutputMode,
    /// Log to stderr and print the final table instead of writing files.
    pub debug: bool,
    pub id_column: String,
    pub trailing_columns: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    #[default]
    Streaming,
    Bulk,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageConfig {
    pub source: Lang,
    pub targets: Vec<Lang>,
    pub detect: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub timeout_base_ms: u64,
    pub delay_min_ms: u64,
    pub delay_max_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusConfig {
    pub pending: String,
    pub done: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub endpoint: String,
    pub auth_key: Option<String>,
    pub program: String,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Deepl,
    Command,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("input.csv"),
            output: PathBuf::from("output.csv"),
            log_file: PathBuf::from("log.txt"),
            delimiter: ',',
            start: 0,
            max_rows: 999,
            mode: OutputMode::Streaming,
            debug: false,
            id_column: "IdExtern".to_string(),
            trailing_columns: vec![
                "Comments".to_string(),
                "Category".to_string(),
                "KeyFct".to_string(),
                "Web".to_string(),
            ],
        }
    }
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            source: Lang::new("US", "en"),
            targets: vec![Lang::new("ES", "es"), Lang::new("IT", "it"), Lang::new("DE", "de")],
            detect: false,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            timeout_base_ms: 13_000,
            delay_min_ms: 1_000,
            delay_max_ms: 6_000,
        }
    }
}

impl RetryConfig {
    pub fn timeout_base(&self) -> Duration {
        Duration::from_millis(self.timeout_base_ms)
    }

    pub fn delay_range(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.delay_min_ms),
            Duration::from_millis(self.delay_max_ms),
        )
    }
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            pending: "False".to_string(),
            done: "True".to_string(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Deepl,
            endpoint: "https://api-free.deepl.com/v2/translate".to_string(),
            auth_key: None,
            program: "deepl-render".to_string(),
            args: Vec::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| LangfillError::ConfigError(format!("{}: {}", path.display(), e)))?;
        toml::from_str(&content).map_err(|e| LangfillError::ConfigError(e.to_string()))
    }

    /// Falls back to defaults when the file does not exist; a malformed file is an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) if p.exists() => Self::load_from_file(p),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let err = |msg: &str| Err(LangfillError::ConfigError(msg.to_string()));

        if self.retry.max_attempts == 0 {
            return err("retry.max_attempts must be at least 1");
        }
        if self.retry.timeout_base_ms == 0 {
            return err("retry.timeout_base_ms must be positive");
        }
        if self.retry.delay_min_ms > self.retry.delay_max_ms {
            return err("retry.delay_min_ms must not exceed retry.delay_max_ms");
        }
        if self.status.pending.is_empty() {
            return err("status.pending must not be empty");
        }
        if self.languages.source.column.trim().is_empty() {
            return err("languages.source.column must not be empty");
        }
        if !self.languages.detect && self.languages.targets.is_empty() {
            return err("no target languages configured and detection is disabled");
        }
        if !self.io.delimiter.is_ascii() {
            return err("io.delimiter must be a single ASCII character");
        }

        let source = self.languages.source.key();
        let mut seen = HashSet::new();
        for lang in &self.languages.targets {
            let key = lang.key();
            if key == source {
                return Err(LangfillError::ConfigError(format!(
                    "target language {} is also the source language",
                    key
                )));
            }
            if !seen.insert(key.clone()) {
                return Err(LangfillError::ConfigError(format!(
                    "target language {} is configured twice",
                    key
                )));
            }
        }

        Ok(())
    }
}
