use crate::translation::client::{TranslationProvider, TranslationRequest};
use crate::utils::{LangfillError, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Delegates page rendering and text extraction to an external program.
///
/// The program receives one JSON object on stdin
/// (`text`, `source`, `target`, `attempt`, `timeout_ms`) and must print the
/// translated text on stdout. A non-zero exit status is a provider failure.
/// The child is killed if the call is abandoned on timeout.
pub struct CommandProvider {
    program: String,
    args: Vec<String>,
}

#[derive(Debug, Serialize)]
struct CommandRequest<'a> {
    text: &'a str,
    source: &'a str,
    target: &'a str,
    attempt: u32,
    timeout_ms: u64,
}

impl CommandProvider {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

#[async_trait]
impl TranslationProvider for CommandProvider {
    async fn translate(&self, request: &TranslationRequest<'_>) -> Result<String> {
        let payload = serde_json::to_vec(&CommandRequest {
            text: request.text,
            source: request.source,
            target: request.target,
            attempt: request.attempt,
            timeout_ms: request.timeout.as_millis() as u64,
        })?;

        debug!(program = %self.program, attempt = request.attempt, "Spawning provider command");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                LangfillError::ProviderException(format!("failed to spawn {}: {}", self.program, e))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&payload).await?;
            stdin.shutdown().await?;
        }

        let output = child.wait_with_output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LangfillError::ProviderException(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.trim_end_matches(['\r', '\n']).to_string())
    }
}
