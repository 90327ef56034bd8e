pub mod client;
pub mod command;
pub mod delay;
pub mod orchestrator;
pub mod retry;
pub mod runner;

pub use client::{build_provider, DeeplClient, TranslationProvider, TranslationRequest};
pub use command::CommandProvider;
pub use delay::JitterDelay;
pub use orchestrator::{RowOrchestrator, RowOutcome};
pub use retry::RetryPolicy;
pub use runner::{RunController, RunReport};

use crate::csv_processor::status_column;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A language as the table names it (`ES`) and as the provider expects it (`es`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Lang {
    pub column: String,
    pub provider_id: String,
}

impl Lang {
    pub fn new(column: impl Into<String>, provider_id: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            provider_id: provider_id.into(),
        }
    }

    /// Uppercased column name used to look cells up.
    pub fn key(&self) -> String {
        self.column.to_uppercase()
    }

    pub fn status_key(&self) -> String {
        status_column(&self.column)
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.column, self.provider_id)
    }
}

/// Parses `COLUMN:provider` or a bare `COLUMN`, whose provider id is the lowercased column.
impl FromStr for Lang {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (column, provider_id) = match s.split_once(':') {
            Some((column, id)) => (column.trim(), id.trim().to_string()),
            None => (s.trim(), s.trim().to_lowercase()),
        };
        if column.is_empty() || provider_id.is_empty() {
            return Err(format!("invalid language '{}', expected COLUMN[:provider_id]", s));
        }
        Ok(Lang::new(column, provider_id))
    }
}
