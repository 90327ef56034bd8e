pub mod cli;
pub mod csv_processor;
pub mod state;
pub mod translation;
pub mod utils;

pub use csv_processor::{CsvStreamReader, CsvStreamWriter, OutputSchema, Row, Table};
pub use state::{CheckpointWriter, RunState, RunStatus, ShutdownFlag};
pub use translation::{
    Lang, RetryPolicy, RowOrchestrator, RunController, RunReport, TranslationProvider,
};
pub use utils::{AppConfig, LangfillError, Result};
