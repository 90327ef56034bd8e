use crate::translation::CommandProvider;
use crate::utils::{LangfillError, ProviderConfig, ProviderKind, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

pub const AUTH_KEY_ENV: &str = "DEEPL_AUTH_KEY";

/// One provider call. `timeout` already reflects the attempt number.
#[derive(Debug, Clone)]
pub struct TranslationRequest<'a> {
    pub text: &'a str,
    pub source: &'a str,
    pub target: &'a str,
    pub attempt: u32,
    pub timeout: Duration,
}

#[async_trait]
pub trait TranslationProvider: Send + Sync {
    async fn translate(&self, request: &TranslationRequest<'_>) -> Result<String>;
}

#[async_trait]
impl<T: TranslationProvider + ?Sized> TranslationProvider for &T {
    async fn translate(&self, request: &TranslationRequest<'_>) -> Result<String> {
        (**self).translate(request).await
    }
}

#[async_trait]
impl<T: TranslationProvider + ?Sized> TranslationProvider for Box<T> {
    async fn translate(&self, request: &TranslationRequest<'_>) -> Result<String> {
        (**self).translate(request).await
    }
}

#[async_trait]
impl<T: TranslationProvider + ?Sized> TranslationProvider for Arc<T> {
    async fn translate(&self, request: &TranslationRequest<'_>) -> Result<String> {
        (**self).translate(request).await
    }
}

pub fn build_provider(config: &ProviderConfig) -> Result<Box<dyn TranslationProvider>> {
    match config.kind {
        ProviderKind::Deepl => {
            let auth_key = config
                .auth_key
                .clone()
                .or_else(|| std::env::var(AUTH_KEY_ENV).ok())
                .filter(|k| !k.is_empty())
                .ok_or_else(|| {
                    LangfillError::ConfigError(format!(
                        "provider.auth_key is not set and {} is empty",
                        AUTH_KEY_ENV
                    ))
                })?;
            Ok(Box::new(DeeplClient::new(&config.endpoint, auth_key)?))
        }
        ProviderKind::Command => {
            if config.program.is_empty() {
                return Err(LangfillError::ConfigError(
                    "provider.program must be set for the command provider".to_string(),
                ));
            }
            Ok(Box::new(CommandProvider::new(
                config.program.clone(),
                config.args.clone(),
            )))
        }
    }
}

pub struct DeeplClient {
    client: Client,
    endpoint: String,
    auth_key: String,
}

#[derive(Debug, Serialize)]
struct DeeplRequest<'a> {
    text: Vec<&'a str>,
    source_lang: String,
    target_lang: String,
}

#[derive(Debug, Deserialize)]
struct DeeplResponse {
    translations: Vec<DeeplTranslation>,
}

#[derive(Debug, Deserialize)]
struct DeeplTranslation {
    text: String,
}

impl DeeplClient {
    pub fn new(endpoint: impl Into<String>, auth_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("csv-langfill/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            auth_key: auth_key.into(),
        })
    }

    async fn call_api(&self, request: &TranslationRequest<'_>) -> Result<String> {
        let body = DeeplRequest {
            text: vec![request.text],
            source_lang: request.source.to_uppercase(),
            target_lang: request.target.to_uppercase(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("DeepL-Auth-Key {}", self.auth_key))
            .timeout(request.timeout)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LangfillError::ProviderException(format!(
                "API returned {}: {}",
                status,
                body.trim()
            )));
        }

        let api_response: DeeplResponse = response.json().await?;
        Ok(api_response
            .translations
            .into_iter()
            .map(|t| t.text)
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

#[async_trait]
impl TranslationProvider for DeeplClient {
    async fn translate(&self, request: &TranslationRequest<'_>) -> Result<String> {
        self.call_api(request).await.map_err(|e| match e {
            LangfillError::HttpError(err) if err.is_timeout() => LangfillError::ProviderTimeout {
                attempt: request.attempt,
                timeout_ms: request.timeout.as_millis() as u64,
            },
            other => other,
        })
    }
}
