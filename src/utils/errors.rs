use thiserror::Error;

#[derive(Error, Debug)]
pub enum LangfillError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("HTTP request error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Missing column '{column}' in {table}")]
    MissingColumn { column: String, table: String },

    #[error("Output header mismatch in {path}: expected {expected:?}, found {found:?}")]
    HeaderMismatch {
        path: String,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Provider timed out after {timeout_ms}ms on attempt {attempt}")]
    ProviderTimeout { attempt: u32, timeout_ms: u64 },

    #[error("Provider returned an empty translation on attempt {attempt}")]
    ProviderEmptyResult { attempt: u32 },

    #[error("Provider error: {0}")]
    ProviderException(String),

    #[error("Run aborted at row {row} ({lang}) after {attempts} attempts")]
    RunAborted {
        row: usize,
        lang: String,
        attempts: u32,
    },
}

pub type Result<T> = std::result::Result<T, LangfillError>;

impl LangfillError {
    pub fn kind(&self) -> &'static str {
        match self {
            LangfillError::ProviderTimeout { .. } => "timeout",
            LangfillError::ProviderEmptyResult { .. } => "empty",
            LangfillError::ProviderException(_) | LangfillError::HttpError(_) => "exception",
            LangfillError::RunAborted { .. } => "aborted",
            _ => "internal",
        }
    }
}
