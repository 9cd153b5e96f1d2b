/*!
 * Whole-document translation.
 *
 * The entire file is one work unit: it is sent in a single request with a
 * format prompt, fences are stripped from the answer and the result is
 * written to a language-coded file name. A directory scan repeats this for
 * every matching file.
 */

use async_trait::async_trait;
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::{Config, FileType};
use crate::errors::JobError;
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::providers::{TranslationRequest, Translator};

use super::cancel::CancellationFlag;
use super::envelope::strip_code_fences;
use super::progress::{ProgressSink, ProgressTracker, ProgressUpdate};
use super::strategy::{FormatStrategy, JobOutcome};

/// Characters shown by `preview`
pub const PREVIEW_CHARS: usize = 200;

/// Translates text files as whole documents
pub struct TextFileStrategy {
    config: Config,
    translator: Arc<dyn Translator>,
    cancel: CancellationFlag,
}

/// Maps one file's 0..100 progress into its slot of a directory scan
struct ScanProgress<'a> {
    inner: &'a dyn ProgressSink,
    index: usize,
    total: usize,
    file_name: String,
}

impl ProgressSink for ScanProgress<'_> {
    fn report(&self, update: ProgressUpdate) {
        let overall = (self.index as f64 + update.percent / 100.0) / self.total as f64 * 100.0;
        let status = match update.status {
            Some(status) => format!("{} ({}/{}) {}", self.file_name, self.index + 1, self.total, status),
            None => format!("{} ({}/{})", self.file_name, self.index + 1, self.total),
        };
        self.inner.report(ProgressUpdate {
            percent: overall,
            current: self.index,
            total: self.total,
            status: Some(status),
        });
    }
}

impl TextFileStrategy {
    pub fn new(config: Config, translator: Arc<dyn Translator>, cancel: CancellationFlag) -> Self {
        Self {
            config,
            translator,
            cancel,
        }
    }

    fn file_code(&self) -> String {
        language_utils::get_language_file_code(&self.config.target_language)
    }

    fn read_source(input: &Path) -> Result<String, JobError> {
        let content = FileManager::read_to_string(input).map_err(|e| JobError::parse(input, format!("{:#}", e)))?;
        if content.trim().is_empty() {
            return Err(JobError::parse(input, "file is empty"));
        }
        Ok(content)
    }

    fn cancelled(mut outcome: JobOutcome) -> Result<JobOutcome, JobError> {
        outcome.cancelled = true;
        Ok(outcome)
    }

    /// Translate every file under `directory` whose name matches `pattern`.
    ///
    /// Output goes next to each input, or into `output_dir` when given. Files
    /// written before a cancellation stay in place.
    pub async fn scan_and_translate(
        &self,
        directory: &Path,
        pattern: &str,
        output_dir: Option<&Path>,
        progress: &dyn ProgressSink,
    ) -> Result<JobOutcome, JobError> {
        let files = FileManager::find_matching_files(directory, pattern)
            .map_err(|e| JobError::parse(directory, format!("{:#}", e)))?;
        if files.is_empty() {
            return Err(JobError::NoMatchingFiles {
                directory: directory.to_path_buf(),
                pattern: pattern.to_string(),
            });
        }

        info!("Found {} files matching {} in {:?}", files.len(), pattern, directory);

        let total = files.len();
        let file_code = self.file_code();
        let mut tracker = ProgressTracker::new(progress);
        let mut outcome = JobOutcome {
            output_path: Some(directory.to_path_buf()),
            ..JobOutcome::default()
        };

        for (index, input) in files.iter().enumerate() {
            if self.cancel.is_cancelled() {
                return Self::cancelled(outcome);
            }

            let output = FileManager::text_output_path(input, &file_code, output_dir);
            if output == *input {
                warn!("Skipping {:?}: it is already the {} output file", input, file_code);
                outcome.record_skip();
                continue;
            }

            let file_name = input
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            tracker.report(
                index as f64 / total as f64 * 100.0,
                index,
                total,
                Some(format!("Translating {}", file_name)),
            );

            let file_progress = ScanProgress {
                inner: progress,
                index,
                total,
                file_name,
            };

            match self.translate(input, &output, &file_progress).await {
                Ok(file_outcome) => {
                    outcome.absorb(&file_outcome);
                    if file_outcome.cancelled {
                        return Self::cancelled(outcome);
                    }
                    if let Some(path) = file_outcome.output_path {
                        info!("Wrote {:?}", path);
                    }
                }
                Err(e) => {
                    error!("Failed to translate {:?}: {}", input, e);
                    outcome.record_failure();
                }
            }
        }

        tracker.report(100.0, total, total, Some("Done".to_string()));
        Ok(outcome)
    }
}

#[async_trait]
impl FormatStrategy for TextFileStrategy {
    fn file_type(&self) -> FileType {
        FileType::Text
    }

    fn default_output_path(&self, input: &Path) -> PathBuf {
        FileManager::text_output_path(input, &self.file_code(), None)
    }

    async fn preview(&self, input: &Path) -> Result<String, JobError> {
        let content = Self::read_source(input)?;

        let mut excerpt: String = content.chars().take(PREVIEW_CHARS).collect();
        if content.chars().count() > PREVIEW_CHARS {
            excerpt.push_str("...");
        }

        let output_name = self
            .default_output_path(input)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(format!(
            "Content preview:\n\n{}\n\nThe whole file will be translated into {} and saved as {}",
            excerpt, self.config.target_language, output_name
        ))
    }

    async fn translate(
        &self,
        input: &Path,
        output: &Path,
        progress: &dyn ProgressSink,
    ) -> Result<JobOutcome, JobError> {
        let mut tracker = ProgressTracker::new(progress);
        let mut outcome = JobOutcome::default();

        let content = Self::read_source(input)?;
        tracker.report(10.0, 1, 3, Some("Reading file".to_string()));

        if self.cancel.is_cancelled() {
            return Self::cancelled(outcome);
        }

        let target_language = &self.config.target_language;
        let request = TranslationRequest::new(content, target_language)
            .with_system_prompt(self.config.text_file_prompt_for(target_language));

        tracker.report(30.0, 2, 3, Some("Translating".to_string()));
        let translated = self.translator.translate_one(&request).await;

        if self.cancel.is_cancelled() {
            return Self::cancelled(outcome);
        }

        let translated = match translated.map(|text| strip_code_fences(&text)) {
            Some(text) if !text.is_empty() => text,
            _ => {
                error!("No translation returned for {:?}", input);
                outcome.record_failure();
                return Ok(outcome);
            }
        };

        tracker.report(80.0, 3, 3, Some("Saving".to_string()));
        if self.cancel.is_cancelled() {
            return Self::cancelled(outcome);
        }

        FileManager::write_atomic(output, &translated).map_err(|e| JobError::Io(format!("{:#}", e)))?;
        outcome.record_success();
        outcome.output_path = Some(output.to_path_buf());

        tracker.report(100.0, 3, 3, Some("Done".to_string()));
        Ok(outcome)
    }
}
