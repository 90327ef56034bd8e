use async_trait::async_trait;
use csv_langfill::translation::TranslationRequest;
use csv_langfill::utils::OutputMode;
use csv_langfill::{
    AppConfig, LangfillError, Lang, Result, RunController, RunStatus, ShutdownFlag,
    TranslationProvider,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

const HEADER: &str =
    "IdExtern,US,US Translate,ES,ES Translate,IT,IT Translate,Comments,Category,KeyFct,Web";

/// Prefixes the text with the target id, failing every call whose text is `fail_on`.
#[derive(Default)]
struct ScriptedProvider {
    fail_on: Option<&'static str>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedProvider {
    fn failing_on(text: &'static str) -> Self {
        Self {
            fail_on: Some(text),
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    fn texts(&self) -> Vec<String> {
        let mut texts: Vec<String> = self.calls().into_iter().map(|(t, _)| t).collect();
        texts.dedup();
        texts
    }
}

#[async_trait]
impl TranslationProvider for ScriptedProvider {
    async fn translate(&self, request: &TranslationRequest<'_>) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((request.text.to_string(), request.target.to_string()));
        if self.fail_on == Some(request.text) {
            return Err(LangfillError::ProviderException("429 Too Many Requests".into()));
        }
        Ok(format!("{}-{}", request.target, request.text))
    }
}

/// Sets the stop flag while translating `on`, as a signal arriving mid-row would.
struct InterruptingProvider {
    on: &'static str,
    shutdown: ShutdownFlag,
}

#[async_trait]
impl TranslationProvider for InterruptingProvider {
    async fn translate(&self, request: &TranslationRequest<'_>) -> Result<String> {
        if request.text == self.on {
            self.shutdown.trigger();
        }
        Ok(format!("{}-{}", request.target, request.text))
    }
}

fn write_input(dir: &TempDir, rows: &[&str]) -> PathBuf {
    let path = dir.path().join("input.csv");
    let mut content = String::from(HEADER);
    content.push('\n');
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    std::fs::write(&path, content).unwrap();
    path
}

fn pending_row(id: &str, text: &str) -> String {
    format!("{id},{text},True,,False,,False,note {id},cat,key{id},https://example.com/{id}")
}

fn five_rows(dir: &TempDir, third: &str) -> PathBuf {
    let rows = [
        pending_row("1", "Hello"),
        pending_row("2", "World"),
        pending_row("3", third),
        pending_row("4", "Night"),
        pending_row("5", "Day"),
    ];
    let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
    write_input(dir, &refs)
}

fn config(input: &Path, output: &Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.io.input = input.to_path_buf();
    config.io.output = output.to_path_buf();
    config.languages.source = Lang::new("US", "en");
    config.languages.targets = vec![Lang::new("ES", "es"), Lang::new("IT", "it")];
    config.retry.timeout_base_ms = 1_000;
    config.retry.delay_min_ms = 0;
    config.retry.delay_max_ms = 0;
    config
}

fn read_output(path: &Path) -> (Vec<String>, Vec<HashMap<String, String>>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    let rows = reader
        .records()
        .map(|r| {
            let record = r.unwrap();
            headers
                .iter()
                .cloned()
                .zip(record.iter().map(String::from))
                .collect()
        })
        .collect();
    (headers, rows)
}

fn ids(rows: &[HashMap<String, String>]) -> Vec<&str> {
    rows.iter().map(|r| r["IdExtern"].as_str()).collect()
}

#[tokio::test]
async fn circuit_breaker_leaves_a_well_formed_prefix() {
    let dir = tempfile::tempdir().unwrap();
    let input = five_rows(&dir, "boom");
    let output = dir.path().join("output.csv");
    let provider = ScriptedProvider::failing_on("boom");

    let report = RunController::new(config(&input, &output), &provider)
        .run()
        .await
        .unwrap();

    assert_eq!(report.status, RunStatus::Aborted);
    assert_eq!(report.rows_processed, 2);
    assert_eq!(report.next_row, 2);
    assert_eq!(report.rows_written, 2);

    let (headers, rows) = read_output(&output);
    assert_eq!(headers.join(","), HEADER);
    assert_eq!(ids(&rows), vec!["1", "2"]);
    assert_eq!(rows[0]["ES"], "es-Hello");
    assert_eq!(rows[0]["IT"], "it-Hello");
    assert_eq!(rows[1]["ES Translate"], "True");
    assert_eq!(rows[1]["Web"], "https://example.com/2");

    let boom_calls: Vec<_> = provider
        .calls()
        .into_iter()
        .filter(|(text, _)| text == "boom")
        .collect();
    assert_eq!(boom_calls.len(), 3);
    assert!(boom_calls.iter().all(|(_, target)| target == "es"));
    assert_eq!(provider.texts(), vec!["Hello", "World", "boom"]);
}

#[tokio::test]
async fn start_offset_skips_earlier_rows_entirely() {
    let dir = tempfile::tempdir().unwrap();
    let input = five_rows(&dir, "Noon");
    let output = dir.path().join("output.csv");
    let provider = ScriptedProvider::default();

    let mut config = config(&input, &output);
    config.io.start = 3;
    let report = RunController::new(config, &provider).run().await.unwrap();

    assert_eq!(report.status, RunStatus::Completed);
    assert_eq!(report.rows_processed, 2);
    assert_eq!(provider.texts(), vec!["Night", "Day"]);

    let (_, rows) = read_output(&output);
    assert_eq!(ids(&rows), vec!["4", "5"]);
}

#[tokio::test]
async fn resuming_after_abort_appends_to_previous_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = five_rows(&dir, "boom");
    let output = dir.path().join("output.csv");

    let failing = ScriptedProvider::failing_on("boom");
    let first = RunController::new(config(&input, &output), &failing)
        .run()
        .await
        .unwrap();
    assert_eq!(first.status, RunStatus::Aborted);

    let healthy = ScriptedProvider::default();
    let mut resumed = config(&input, &output);
    resumed.io.start = first.next_row;
    let second = RunController::new(resumed, &healthy).run().await.unwrap();
    assert_eq!(second.status, RunStatus::Completed);
    assert_eq!(healthy.texts(), vec!["boom", "Night", "Day"]);

    let (headers, rows) = read_output(&output);
    assert_eq!(headers.join(","), HEADER);
    assert_eq!(ids(&rows), vec!["1", "2", "3", "4", "5"]);
    assert_eq!(rows[2]["ES"], "es-boom");
}

#[tokio::test]
async fn empty_source_rows_do_not_count_toward_the_limit() {
    let dir = tempfile::tempdir().unwrap();
    let rows = [
        pending_row("1", "Hello"),
        "2,,True,,False,,False,,,,".to_string(),
        pending_row("3", "World"),
        pending_row("4", "Night"),
    ];
    let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
    let input = write_input(&dir, &refs);
    let output = dir.path().join("output.csv");
    let provider = ScriptedProvider::default();

    let mut config = config(&input, &output);
    config.io.max_rows = 2;
    let report = RunController::new(config, &provider).run().await.unwrap();

    assert_eq!(report.status, RunStatus::LimitReached);
    assert_eq!(report.rows_processed, 2);
    assert_eq!(report.rows_visited, 3);
    assert_eq!(report.next_row, 3);
    assert_eq!(provider.texts(), vec!["Hello", "World"]);

    let (_, rows) = read_output(&output);
    assert_eq!(ids(&rows), vec!["1", "2", "3"]);
    assert_eq!(rows[1]["ES"], "");
    assert_eq!(rows[1]["ES Translate"], "False");
}

#[tokio::test]
async fn rerunning_on_translated_output_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = five_rows(&dir, "Noon");
    let first_output = dir.path().join("first.csv");
    let second_output = dir.path().join("second.csv");

    let provider = ScriptedProvider::default();
    RunController::new(config(&input, &first_output), &provider)
        .run()
        .await
        .unwrap();

    let again = ScriptedProvider::default();
    let report = RunController::new(config(&first_output, &second_output), &again)
        .run()
        .await
        .unwrap();

    assert!(again.calls().is_empty());
    assert_eq!(report.cells_translated, 0);
    assert_eq!(report.cells_skipped, 10);
    assert_eq!(read_output(&first_output), read_output(&second_output));
}

#[tokio::test]
async fn detects_target_languages_from_headers() {
    let dir = tempfile::tempdir().unwrap();
    let input = five_rows(&dir, "Noon");
    let output = dir.path().join("output.csv");
    let provider = ScriptedProvider::default();

    let mut config = config(&input, &output);
    config.languages.targets.clear();
    config.languages.detect = true;
    let report = RunController::new(config, &provider).run().await.unwrap();

    assert_eq!(
        report.targets,
        vec![Lang::new("ES", "es"), Lang::new("IT", "it")]
    );
    assert_eq!(report.cells_translated, 10);
}

#[tokio::test]
async fn bulk_mode_writes_every_row_at_the_end() {
    let dir = tempfile::tempdir().unwrap();
    let input = five_rows(&dir, "boom");
    let output = dir.path().join("output.csv");
    let provider = ScriptedProvider::failing_on("boom");

    let mut config = config(&input, &output);
    config.io.mode = OutputMode::Bulk;
    let report = RunController::new(config, &provider).run().await.unwrap();

    assert_eq!(report.status, RunStatus::Aborted);
    assert_eq!(report.rows_written, 5);

    let (_, rows) = read_output(&output);
    assert_eq!(ids(&rows), vec!["1", "2", "3", "4", "5"]);
    assert_eq!(rows[1]["IT"], "it-World");
    assert_eq!(rows[2]["ES"], "");
    assert_eq!(rows[2]["ES Translate"], "False");
    assert_eq!(rows[4]["ES Translate"], "False");
}

#[tokio::test]
async fn triggered_shutdown_stops_before_the_next_row() {
    let dir = tempfile::tempdir().unwrap();
    let input = five_rows(&dir, "Noon");
    let output = dir.path().join("output.csv");
    let provider = ScriptedProvider::default();

    let shutdown = ShutdownFlag::new();
    shutdown.trigger();
    let report = RunController::new(config(&input, &output), &provider)
        .with_shutdown(shutdown)
        .run()
        .await
        .unwrap();

    assert_eq!(report.status, RunStatus::Interrupted);
    assert!(provider.calls().is_empty());
    let (headers, rows) = read_output(&output);
    assert_eq!(headers.len(), 11);
    assert!(rows.is_empty());
}

#[tokio::test]
async fn stop_request_during_last_row_reports_interrupted() {
    let dir = tempfile::tempdir().unwrap();
    let input = five_rows(&dir, "Noon");
    let output = dir.path().join("output.csv");

    let shutdown = ShutdownFlag::new();
    let provider = InterruptingProvider {
        on: "Day",
        shutdown: shutdown.clone(),
    };
    let report = RunController::new(config(&input, &output), &provider)
        .with_shutdown(shutdown)
        .run()
        .await
        .unwrap();

    assert_eq!(report.status, RunStatus::Interrupted);
    assert_eq!(report.rows_processed, 5);
    assert_eq!(report.next_row, 5);

    let (_, rows) = read_output(&output);
    assert_eq!(ids(&rows), vec!["1", "2", "3", "4", "5"]);
    assert_eq!(rows[4]["IT"], "it-Day");
}

#[tokio::test]
async fn stop_request_mid_run_finishes_the_current_row() {
    let dir = tempfile::tempdir().unwrap();
    let input = five_rows(&dir, "Noon");
    let output = dir.path().join("output.csv");

    let shutdown = ShutdownFlag::new();
    let provider = InterruptingProvider {
        on: "World",
        shutdown: shutdown.clone(),
    };
    let report = RunController::new(config(&input, &output), &provider)
        .with_shutdown(shutdown)
        .run()
        .await
        .unwrap();

    assert_eq!(report.status, RunStatus::Interrupted);
    assert_eq!(report.next_row, 2);

    let (_, rows) = read_output(&output);
    assert_eq!(ids(&rows), vec!["1", "2"]);
    assert_eq!(rows[1]["ES"], "es-World");
    assert_eq!(rows[1]["IT Translate"], "True");
}

#[tokio::test]
async fn missing_status_column_fails_before_any_call() {
    let dir = tempfile::tempdir().unwrap();
    let input = five_rows(&dir, "Noon");
    let output = dir.path().join("output.csv");
    let provider = ScriptedProvider::default();

    let mut config = config(&input, &output);
    config.languages.targets.push(Lang::new("DE", "de"));
    let err = RunController::new(config, &provider).run().await.unwrap_err();

    assert!(matches!(err, LangfillError::MissingColumn { ref column, .. } if column == "DE Translate"));
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn legacy_done_marker_keeps_false_after_translation() {
    let dir = tempfile::tempdir().unwrap();
    let input = five_rows(&dir, "Noon");
    let output = dir.path().join("output.csv");
    let provider = ScriptedProvider::default();

    let mut config = config(&input, &output);
    config.status.done = "False".to_string();
    config.io.max_rows = 1;
    RunController::new(config, &provider).run().await.unwrap();

    let (_, rows) = read_output(&output);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["ES"], "es-Hello");
    assert_eq!(rows[0]["ES Translate"], "False");
}
