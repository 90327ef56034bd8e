pub mod config;
pub mod errors;
pub mod logging;

pub use config::{
    AppConfig, IoConfig, LanguageConfig, LoggingConfig, OutputMode, ProviderConfig, ProviderKind,
    RetryConfig, StatusConfig,
};
pub use errors::{LangfillError, Result};
pub use logging::{init_logging, LogSink};
