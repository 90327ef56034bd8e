pub mod checkpoint;

pub use checkpoint::{CheckpointTarget, CheckpointWriter};

use crate::translation::RowOutcome;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    /// Every row from the start offset was visited.
    Completed,
    /// The processed-row budget ran out.
    LimitReached,
    /// A cell exhausted its retries.
    Aborted,
    Interrupted,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::Running => write!(f, "running"),
            RunStatus::Completed => write!(f, "completed"),
            RunStatus::LimitReached => write!(f, "limit reached"),
            RunStatus::Aborted => write!(f, "aborted"),
            RunStatus::Interrupted => write!(f, "interrupted"),
        }
    }
}

/// Counters for one run. Nothing here outlives the process.
#[derive(Debug, Clone)]
pub struct RunState {
    pub run_id: String,
    pub start: usize,
    pub total_rows: usize,
    /// Index of the next row to visit.
    pub current_row: usize,
    pub rows_visited: usize,
    pub rows_processed: usize,
    pub cells_translated: usize,
    pub cells_skipped: usize,
    pub status: RunStatus,
    started_at: Instant,
}

impl RunState {
    pub fn new(run_id: impl Into<String>, start: usize, total_rows: usize) -> Self {
        Self {
            run_id: run_id.into(),
            start,
            total_rows,
            current_row: start,
            rows_visited: 0,
            rows_processed: 0,
            cells_translated: 0,
            cells_skipped: 0,
            status: RunStatus::Running,
            started_at: Instant::now(),
        }
    }

    pub fn record(&mut self, outcome: RowOutcome) {
        self.rows_visited += 1;
        self.current_row += 1;
        if let RowOutcome::Processed {
            translated,
            skipped,
        } = outcome
        {
            self.rows_processed += 1;
            self.cells_translated += translated;
            self.cells_skipped += skipped;
        }
    }

    pub fn limit_reached(&self, max_rows: usize) -> bool {
        self.rows_processed >= max_rows
    }

    pub fn is_terminated(&self) -> bool {
        self.status != RunStatus::Running
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

/// Stop flag set by the interrupt hook and checked between rows.
#[derive(Debug, Clone, Default)]
pub struct ShutdownFlag {
    triggered: Arc<AtomicBool>,
}

impl ShutdownFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.triggered.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }
}
