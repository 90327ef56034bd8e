use crate::csv_processor::Row;
use crate::translation::client::TranslationProvider;
use crate::translation::retry::RetryPolicy;
use crate::translation::Lang;
use crate::utils::{LangfillError, Result, StatusConfig};
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    /// Empty source cell; the row does not count toward the processed total.
    SkippedEmptySource,
    Processed { translated: usize, skipped: usize },
}

/// Drives every target language of a row to completion.
pub struct RowOrchestrator<P> {
    provider: P,
    retry: RetryPolicy,
    source: Lang,
    targets: Vec<Lang>,
    markers: StatusConfig,
}

impl<P: TranslationProvider> RowOrchestrator<P> {
    pub fn new(
        provider: P,
        retry: RetryPolicy,
        source: Lang,
        targets: Vec<Lang>,
        markers: StatusConfig,
    ) -> Self {
        Self {
            provider,
            retry,
            source,
            targets,
            markers,
        }
    }

    /// Translates the pending cells of `row` in target order.
    ///
    /// Returns [`LangfillError::RunAborted`] as soon as one cell exhausts its
    /// retries; languages after it are left untouched.
    pub async fn process_row(&self, index: usize, row: &mut Row) -> Result<RowOutcome> {
        let source_text = row.get(&self.source.key()).to_string();
        if source_text.is_empty() {
            info!(row = index, "Empty source cell, skipping row");
            return Ok(RowOutcome::SkippedEmptySource);
        }

        info!(row = index, lang = %self.source, source = %source_text, "Source");

        let mut translated = 0;
        let mut skipped = 0;

        for target in &self.targets {
            let status_key = target.status_key();
            if row.get(&status_key) != self.markers.pending {
                info!(row = index, lang = %target, "Already translated or not requested");
                skipped += 1;
                continue;
            }

            match self
                .retry
                .translate(&self.provider, &source_text, &self.source, target)
                .await
            {
                Some(text) => {
                    row.set(&target.key(), text);
                    row.set(&status_key, self.markers.done.clone());
                    translated += 1;
                }
                None => {
                    error!(
                        row = index,
                        lang = %target,
                        attempts = self.retry.max_attempts(),
                        "Translation failed after {} attempts, provider is likely throttling",
                        self.retry.max_attempts()
                    );
                    return Err(LangfillError::RunAborted {
                        row: index,
                        lang: target.key(),
                        attempts: self.retry.max_attempts(),
                    });
                }
            }
        }

        Ok(RowOutcome::Processed {
            translated,
            skipped,
        })
    }
}
