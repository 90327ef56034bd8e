use crate::utils::{LangfillError, Result};
use csv::{ReaderBuilder, Writer, WriterBuilder};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

pub struct CsvStreamWriter {
    path: PathBuf,
    headers: Vec<String>,
    delimiter: u8,
    writer: Option<Writer<File>>,
    rows_written: usize,
}

impl CsvStreamWriter {
    pub fn new(path: impl Into<PathBuf>, headers: Vec<String>, delimiter: u8) -> Self {
        Self {
            path: path.into(),
            headers,
            delimiter,
            writer: None,
            rows_written: 0,
        }
    }

    fn builder(&self) -> WriterBuilder {
        let mut builder = WriterBuilder::new();
        builder.delimiter(self.delimiter).has_headers(false);
        builder
    }

    /// Truncates the output and writes the header row.
    pub fn initialize(&mut self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(&self.path)?;
        let mut writer = self.builder().from_writer(file);
        writer.write_record(&self.headers)?;
        writer.flush()?;
        self.writer = Some(writer);
        Ok(())
    }

    /// Opens an existing output for appending. An empty or missing file gets a
    /// fresh header; a file with a different header is rejected.
    pub fn resume(&mut self) -> Result<()> {
        let existing = read_existing_headers(&self.path, self.delimiter)?;
        match existing {
            None => self.initialize(),
            Some(found) if found == self.headers => {
                let file = OpenOptions::new().append(true).open(&self.path)?;
                self.writer = Some(self.builder().from_writer(file));
                Ok(())
            }
            Some(found) => Err(LangfillError::HeaderMismatch {
                path: self.path.display().to_string(),
                expected: self.headers.clone(),
                found,
            }),
        }
    }

    pub fn write_row(&mut self, row: &[String]) -> Result<()> {
        let writer = self.writer.as_mut().ok_or_else(|| {
            LangfillError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "Writer not initialized",
            ))
        })?;

        writer.write_record(row)?;
        self.rows_written += 1;
        Ok(())
    }

    /// Flushes and asks the OS to persist what has been written so far.
    pub fn sync(&mut self) -> Result<()> {
        if let Some(writer) = self.writer.as_mut() {
            writer.flush()?;
            writer.get_ref().sync_data()?;
        }
        Ok(())
    }

    pub fn finish(mut self) -> Result<usize> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        Ok(self.rows_written)
    }

}

fn read_existing_headers(path: &Path, delimiter: u8) -> Result<Option<Vec<String>>> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.len() > 0 => {}
        _ => return Ok(None),
    }
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .from_path(path)?;
    let headers = reader.headers()?.iter().map(|s| s.to_string()).collect();
    Ok(Some(headers))
}

/// Renders a whole table as CSV text, header first.
pub fn render_csv(headers: &[String], rows: &[Vec<String>], delimiter: u8) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| LangfillError::IoError(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| LangfillError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}
