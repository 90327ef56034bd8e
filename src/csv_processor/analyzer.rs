use crate::translation::Lang;
use crate::utils::{LangfillError, Result};
use serde::{Deserialize, Serialize};

const STATUS_SUFFIX: &str = " Translate";

/// Discovers target languages from `"<NAME> Translate"` headers.
///
/// The source language is excluded, names are de-duplicated and keep the
/// order in which they first appear. The provider id is the lowercased name.
pub fn detect_target_langs(headers: &[String], source: &Lang) -> Vec<Lang> {
    let source_key = source.key();
    let mut detected: Vec<Lang> = Vec::new();

    for header in headers {
        let Some(name) = header.strip_suffix(STATUS_SUFFIX) else {
            continue;
        };
        if name.is_empty() || name.to_uppercase() == source_key {
            continue;
        }
        if detected.iter().any(|l| l.column == name) {
            continue;
        }
        detected.push(Lang::new(name, name.to_lowercase()));
    }

    detected
}

/// Name of the status column paired with a language column.
pub fn status_column(column: &str) -> String {
    format!("{}{}", column.to_uppercase(), STATUS_SUFFIX)
}

/// Column layout of the output table, fixed before any row is processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSchema {
    columns: Vec<String>,
}

impl OutputSchema {
    pub fn build(id_column: &str, source: &Lang, targets: &[Lang], trailing: &[String]) -> Self {
        let mut columns = vec![id_column.to_string(), source.key(), source.status_key()];
        for lang in targets {
            columns.push(lang.key());
            columns.push(lang.status_key());
        }
        columns.extend(trailing.iter().cloned());
        Self { columns }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

/// Checks that the input carries the source column and a status column for
/// every target language.
pub fn validate_headers(headers: &[String], source: &Lang, targets: &[Lang]) -> Result<()> {
    let has = |column: &str| headers.iter().any(|h| h == column);

    let source_key = source.key();
    if !has(&source_key) {
        return Err(LangfillError::MissingColumn {
            column: source_key,
            table: "input".to_string(),
        });
    }
    for lang in targets {
        let status = lang.status_key();
        if !has(&status) {
            return Err(LangfillError::MissingColumn {
                column: status,
                table: "input".to_string(),
            });
        }
    }
    Ok(())
}
