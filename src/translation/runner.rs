use crate::csv_processor::{detect_target_langs, validate_headers, CsvStreamReader, OutputSchema};
use crate::state::{CheckpointTarget, CheckpointWriter, RunState, RunStatus, ShutdownFlag};
use crate::translation::client::TranslationProvider;
use crate::translation::orchestrator::RowOrchestrator;
use crate::translation::retry::RetryPolicy;
use crate::translation::Lang;
use crate::utils::{AppConfig, LangfillError, OutputMode, Result};
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Summary of a finished (or stopped) run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: String,
    pub status: RunStatus,
    pub start: usize,
    pub total_rows: usize,
    pub rows_visited: usize,
    pub rows_processed: usize,
    pub cells_translated: usize,
    pub cells_skipped: usize,
    pub rows_written: usize,
    /// First row index not committed by this run; pass it as the next start offset.
    pub next_row: usize,
    pub targets: Vec<Lang>,
}

pub struct RunController<P> {
    config: AppConfig,
    provider: P,
    shutdown: ShutdownFlag,
}

impl<P: TranslationProvider> RunController<P> {
    pub fn new(config: AppConfig, provider: P) -> Self {
        Self {
            config,
            provider,
            shutdown: ShutdownFlag::new(),
        }
    }

    pub fn with_shutdown(mut self, shutdown: ShutdownFlag) -> Self {
        self.shutdown = shutdown;
        self
    }

    pub async fn run(self) -> Result<RunReport> {
        self.config.validate()?;
        let run_id = Uuid::new_v4().to_string();
        let span = info_span!("run", run_id = %run_id);
        self.execute(run_id).instrument(span).await
    }

    async fn execute(self, run_id: String) -> Result<RunReport> {
        let RunController {
            config,
            provider,
            shutdown,
        } = self;
        let io = &config.io;
        let delimiter = io.delimiter as u8;

        let mut table = CsvStreamReader::new(&io.input, delimiter).load_table()?;

        let source = config.languages.source.clone();
        let targets = if config.languages.detect {
            let detected = detect_target_langs(&table.headers, &source);
            if detected.is_empty() {
                return Err(LangfillError::ConfigError(format!(
                    "no '<LANG> Translate' columns found in {}",
                    io.input.display()
                )));
            }
            info!(
                targets = ?detected.iter().map(|l| l.column.as_str()).collect::<Vec<_>>(),
                "Detected target languages"
            );
            detected
        } else {
            config.languages.targets.clone()
        };
        validate_headers(&table.headers, &source, &targets)?;

        let schema = OutputSchema::build(&io.id_column, &source, &targets, &io.trailing_columns);
        let checkpoint_target = match (io.debug, io.mode) {
            (true, _) => CheckpointTarget::Console,
            (false, OutputMode::Streaming) => CheckpointTarget::Streaming,
            (false, OutputMode::Bulk) => CheckpointTarget::Bulk,
        };
        let mut checkpoint =
            CheckpointWriter::open(checkpoint_target, &io.output, schema, delimiter, io.start > 0)?;

        let orchestrator = RowOrchestrator::new(
            provider,
            RetryPolicy::from_config(&config.retry),
            source,
            targets.clone(),
            config.status.clone(),
        );

        let mut state = RunState::new(run_id.clone(), io.start, table.len());
        info!(
            input = %io.input.display(),
            start = io.start,
            max_rows = io.max_rows,
            total_rows = table.len(),
            "--- Run started ---"
        );
        if io.start >= table.len() {
            warn!(start = io.start, total_rows = table.len(), "Start offset is past the end of the table");
        }

        for index in io.start..table.len() {
            if shutdown.is_triggered() {
                info!(row = index, "Run interrupted");
                state.status = RunStatus::Interrupted;
                break;
            }
            if state.limit_reached(io.max_rows) {
                info!(row = index, max_rows = io.max_rows, "Processed-row limit reached");
                state.status = RunStatus::LimitReached;
                break;
            }

            let row = &mut table.rows[index];
            match orchestrator.process_row(index, row).await {
                Ok(outcome) => {
                    checkpoint.commit(index, row)?;
                    state.record(outcome);
                }
                Err(e @ LangfillError::RunAborted { .. }) => {
                    error!(error = %e, "ERROR provider: too many requests");
                    error!(
                        "Abandoning translations, successful iterations: {}-{} / {}",
                        state.start,
                        state.rows_processed,
                        state.total_rows
                    );
                    state.status = RunStatus::Aborted;
                    break;
                }
                Err(e) => return Err(e),
            }
        }

        if !state.is_terminated() {
            state.status = if shutdown.is_triggered() {
                info!(row = state.current_row, "Run interrupted");
                RunStatus::Interrupted
            } else {
                RunStatus::Completed
            };
        }

        let rows_written = checkpoint.finish(&table.rows)?;

        info!(
            status = %state.status,
            rows_processed = state.rows_processed,
            cells_translated = state.cells_translated,
            rows_written,
            next_row = state.current_row,
            elapsed_secs = state.elapsed_secs(),
            "--- Run finished ---"
        );

        Ok(RunReport {
            run_id,
            status: state.status,
            start: state.start,
            total_rows: state.total_rows,
            rows_visited: state.rows_visited,
            rows_processed: state.rows_processed,
            cells_translated: state.cells_translated,
            cells_skipped: state.cells_skipped,
            rows_written,
            next_row: state.current_row,
            targets,
        })
    }
}
