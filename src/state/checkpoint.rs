use crate::csv_processor::{render_csv, CsvStreamWriter, OutputSchema, Row};
use crate::utils::Result;
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckpointTarget {
    /// One durable record per finished row.
    Streaming,
    /// Every row of the table, written once at the end.
    Bulk,
    /// Every row of the table, printed to stdout at the end.
    Console,
}

/// Commits finished rows to the output table under a fixed schema.
pub struct CheckpointWriter {
    target: CheckpointTarget,
    schema: OutputSchema,
    path: PathBuf,
    delimiter: u8,
    stream: Option<CsvStreamWriter>,
}

impl CheckpointWriter {
    /// Prepares the output. In streaming mode `append` keeps rows from a
    /// previous run instead of truncating the file.
    pub fn open(
        target: CheckpointTarget,
        path: impl Into<PathBuf>,
        schema: OutputSchema,
        delimiter: u8,
        append: bool,
    ) -> Result<Self> {
        let path = path.into();
        let stream = match target {
            CheckpointTarget::Streaming => {
                let mut writer =
                    CsvStreamWriter::new(&path, schema.columns().to_vec(), delimiter);
                if append {
                    writer.resume()?;
                } else {
                    writer.initialize()?;
                }
                info!(path = %path.display(), append, "Streaming output opened");
                Some(writer)
            }
            CheckpointTarget::Bulk | CheckpointTarget::Console => None,
        };

        Ok(Self {
            target,
            schema,
            path,
            delimiter,
            stream,
        })
    }

    /// Persists one fully processed row. Only streaming mode touches disk here.
    pub fn commit(&mut self, index: usize, row: &Row) -> Result<()> {
        if let Some(stream) = self.stream.as_mut() {
            stream.write_row(&row.project(self.schema.columns()))?;
            stream.sync()?;
            debug!(row = index, "Row committed");
        }
        Ok(())
    }

    /// Closes the output. Bulk and console modes emit the whole table here.
    pub fn finish(self, rows: &[Row]) -> Result<usize> {
        match self.target {
            CheckpointTarget::Streaming => match self.stream {
                Some(stream) => stream.finish(),
                None => Ok(0),
            },
            CheckpointTarget::Bulk => {
                let mut writer = CsvStreamWriter::new(
                    &self.path,
                    self.schema.columns().to_vec(),
                    self.delimiter,
                );
                writer.initialize()?;
                for row in rows {
                    writer.write_row(&row.project(self.schema.columns()))?;
                }
                writer.sync()?;
                let written = writer.finish()?;
                info!(path = %self.path.display(), rows = written, "Output written");
                Ok(written)
            }
            CheckpointTarget::Console => {
                let projected: Vec<Vec<String>> = rows
                    .iter()
                    .map(|row| row.project(self.schema.columns()))
                    .collect();
                let text = render_csv(self.schema.columns(), &projected, self.delimiter)?;
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(text.as_bytes())?;
                stdout.flush()?;
                Ok(projected.len())
            }
        }
    }
}
