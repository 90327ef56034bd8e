use crate::utils::config::LoggingConfig;
use crate::utils::errors::{LangfillError, Result};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

#[derive(Debug, Clone)]
pub enum LogSink {
    Console,
    File(PathBuf),
}

pub fn init_logging(config: &LoggingConfig, sink: &LogSink) -> Result<()> {
    let directive = format!("csv_langfill={}", config.level);
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&directive))
        .map_err(|e| LangfillError::ConfigError(format!("invalid log level: {}", e)))?;
    let json = config.format.eq_ignore_ascii_case("json");

    let layer = match sink {
        LogSink::Console => fmt_layer(std::io::stderr, json, true),
        LogSink::File(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            fmt_layer(Mutex::new(file), json, false)
        }
    };

    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init()
        .map_err(|e| LangfillError::ConfigError(e.to_string()))
}

fn fmt_layer<W>(writer: W, json: bool, ansi: bool) -> Box<dyn Layer<Registry> + Send + Sync>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer().with_writer(writer).with_ansi(ansi);
    if json {
        layer.json().boxed()
    } else {
        layer.boxed()
    }
}
