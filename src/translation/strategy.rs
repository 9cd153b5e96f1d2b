/*!
 * Format strategies: how one file format turns into translation units and
 * how results are written back.
 *
 * - `ResxStrategy`: entry-by-entry translation of XML resource files
 * - `TextFileStrategy`: whole-document translation of arbitrary text files
 */

use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::{Config, FileType};
use crate::errors::JobError;
use crate::providers::Translator;

use super::cancel::CancellationFlag;
use super::progress::ProgressSink;
use super::resx::ResxStrategy;
use super::text_file::TextFileStrategy;

/// Counts for one finished (or stopped) job
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobOutcome {
    /// Work units sent to a provider; always `succeeded + failed`
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Units with nothing to translate
    pub skipped: usize,
    pub cancelled: bool,
    /// Written file, or the scanned root for directory jobs
    pub output_path: Option<PathBuf>,
}

impl JobOutcome {
    pub fn record_success(&mut self) {
        self.attempted += 1;
        self.succeeded += 1;
    }

    pub fn record_failure(&mut self) {
        self.attempted += 1;
        self.failed += 1;
    }

    pub fn record_skip(&mut self) {
        self.skipped += 1;
    }

    /// Add the unit counts of another outcome
    pub fn absorb(&mut self, other: &JobOutcome) {
        self.attempted += other.attempted;
        self.succeeded += other.succeeded;
        self.failed += other.failed;
        self.skipped += other.skipped;
    }
}

impl fmt::Display for JobOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "attempted: {}, succeeded: {}, failed: {}, skipped: {}",
            self.attempted, self.succeeded, self.failed, self.skipped
        )?;
        if let Some(path) = &self.output_path {
            write!(f, ", output: {}", path.display())?;
        }
        Ok(())
    }
}

/// Translation logic for one file format
#[async_trait]
pub trait FormatStrategy: Send + Sync {
    fn file_type(&self) -> FileType;

    /// Where `translate` writes when the caller gives no output path
    fn default_output_path(&self, input: &Path) -> PathBuf;

    /// Translate a small sample for inspection; never writes anything
    async fn preview(&self, input: &Path) -> Result<String, JobError>;

    /// Translate `input` into `output`.
    ///
    /// Parse failures are returned as errors before any unit runs. Unit
    /// failures and cancellation are reported in the outcome.
    async fn translate(
        &self,
        input: &Path,
        output: &Path,
        progress: &dyn ProgressSink,
    ) -> Result<JobOutcome, JobError>;
}

/// Closed set of supported formats
pub enum Strategy {
    Resx(ResxStrategy),
    Text(TextFileStrategy),
}

impl Strategy {
    pub fn for_file_type(
        file_type: FileType,
        config: Config,
        translator: Arc<dyn Translator>,
        cancel: CancellationFlag,
    ) -> Self {
        match file_type {
            FileType::Resx => Self::Resx(ResxStrategy::new(config, translator, cancel)),
            FileType::Text => Self::Text(TextFileStrategy::new(config, translator, cancel)),
        }
    }
}

#[async_trait]
impl FormatStrategy for Strategy {
    fn file_type(&self) -> FileType {
        match self {
            Self::Resx(strategy) => strategy.file_type(),
            Self::Text(strategy) => strategy.file_type(),
        }
    }

    fn default_output_path(&self, input: &Path) -> PathBuf {
        match self {
            Self::Resx(strategy) => strategy.default_output_path(input),
            Self::Text(strategy) => strategy.default_output_path(input),
        }
    }

    async fn preview(&self, input: &Path) -> Result<String, JobError> {
        match self {
            Self::Resx(strategy) => strategy.preview(input).await,
            Self::Text(strategy) => strategy.preview(input).await,
        }
    }

    async fn translate(
        &self,
        input: &Path,
        output: &Path,
        progress: &dyn ProgressSink,
    ) -> Result<JobOutcome, JobError> {
        match self {
            Self::Resx(strategy) => strategy.translate(input, output, progress).await,
            Self::Text(strategy) => strategy.translate(input, output, progress).await,
        }
    }
}
