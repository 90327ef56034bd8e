use crate::csv_processor::table::{Row, Table};
use crate::utils::{LangfillError, Result};
use csv::{Reader, ReaderBuilder};
use std::fs::File;
use std::path::PathBuf;

pub struct CsvStreamReader {
    path: PathBuf,
    delimiter: u8,
}

impl CsvStreamReader {
    pub fn new(path: impl Into<PathBuf>, delimiter: u8) -> Self {
        Self {
            path: path.into(),
            delimiter,
        }
    }

    fn open(&self) -> Result<Reader<File>> {
        if !self.path.exists() {
            return Err(LangfillError::FileNotFound(self.path.display().to_string()));
        }
        let file = File::open(&self.path)?;
        Ok(ReaderBuilder::new()
            .delimiter(self.delimiter)
            .from_reader(file))
    }

    /// Reads every record into memory, keeping input order.
    pub fn load_table(&self) -> Result<Table> {
        let mut reader = self.open()?;
        let headers: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(Row::from_record(&headers, &record));
        }

        tracing::debug!(path = %self.path.display(), rows = rows.len(), "Loaded input table");
        Ok(Table::new(headers, rows))
    }
}
