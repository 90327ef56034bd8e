use clap::Parser;
use csv_langfill::cli::Cli;
use csv_langfill::translation::build_provider;
use csv_langfill::utils::{init_logging, LogSink};
use csv_langfill::{AppConfig, RunController, RunReport, RunStatus, ShutdownFlag};
use std::process::ExitCode;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(Some(cli.config.as_path()))?;
    cli.apply_to(&mut config);
    config.validate()?;

    let sink = if config.io.debug {
        LogSink::Console
    } else {
        LogSink::File(config.io.log_file.clone())
    };
    init_logging(&config.logging, &sink)?;

    let provider = build_provider(&config.provider)?;
    let shutdown = ShutdownFlag::new();
    let run = RunController::new(config, provider)
        .with_shutdown(shutdown.clone())
        .run();
    tokio::pin!(run);

    // First interrupt stops after the current row; a second one exits at once.
    // Committed rows are already on disk either way.
    let report = tokio::select! {
        result = &mut run => result?,
        _ = tokio::signal::ctrl_c() => {
            shutdown.trigger();
            warn!("Termination signal received, stopping after the current row");
            tokio::select! {
                result = &mut run => result?,
                _ = tokio::signal::ctrl_c() => {
                    warn!("Second termination signal, exiting now");
                    eprintln!("interrupted");
                    return Ok(ExitCode::from(130));
                }
            }
        }
    };

    print_summary(&report);
    info!(status = %report.status, "Exiting");

    Ok(match report.status {
        RunStatus::Aborted => ExitCode::from(2),
        RunStatus::Interrupted => ExitCode::from(130),
        _ => ExitCode::SUCCESS,
    })
}

fn print_summary(report: &RunReport) {
    eprintln!(
        "{}: {} rows processed ({} cells translated, {} skipped) from row {} of {}; next start offset {}",
        report.status,
        report.rows_processed,
        report.cells_translated,
        report.cells_skipped,
        report.start,
        report.total_rows,
        report.next_row
    );
}
