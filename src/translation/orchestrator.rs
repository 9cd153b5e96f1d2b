/*!
 * Job orchestration.
 *
 * One `Orchestrator` drives one job at a time through
 * `Idle -> Running -> {Completed, Cancelled, Failed}`: it validates the
 * configuration, picks the format strategy, runs it and turns the outcome
 * into a report with a human readable summary.
 */

use log::{error, info};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::app_config::{Config, FileType};
use crate::errors::JobError;
use crate::providers::{ProviderClient, Translator};

use super::cancel::CancellationFlag;
use super::progress::ProgressSink;
use super::strategy::{FormatStrategy, JobOutcome, Strategy};
use super::text_file::TextFileStrategy;

/// Lifecycle of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobState {
    #[default]
    Idle,
    Running,
    Completed,
    Cancelled,
    Failed,
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// What a job translates
#[derive(Debug, Clone, PartialEq)]
pub enum JobKind {
    /// One resource file; `output` defaults to `<stem>.<CODE><ext>`
    ResxFile { input: PathBuf, output: Option<PathBuf> },
    /// One text file; `output` defaults to `<file_code>.<ext>` next to the input
    TextFile { input: PathBuf, output: Option<PathBuf> },
    /// Every text file under `directory` matching `pattern`
    TextScan {
        directory: PathBuf,
        pattern: String,
        output_dir: Option<PathBuf>,
    },
}

impl JobKind {
    pub fn file_type(&self) -> FileType {
        match self {
            Self::ResxFile { .. } => FileType::Resx,
            Self::TextFile { .. } | Self::TextScan { .. } => FileType::Text,
        }
    }
}

/// Final report of one job
#[derive(Debug, Clone)]
pub struct JobReport {
    pub job_id: Uuid,
    pub state: JobState,
    pub outcome: JobOutcome,
    /// Reason for `Failed`
    pub error: Option<String>,
    pub duration: Duration,
}

impl JobReport {
    /// One-paragraph summary for the user
    pub fn summary(&self) -> String {
        match self.state {
            JobState::Completed => {
                let mut summary = format!(
                    "Translation completed.\nSucceeded: {}\nFailed: {}",
                    self.outcome.succeeded, self.outcome.failed
                );
                if self.outcome.skipped > 0 {
                    summary.push_str(&format!("\nSkipped: {}", self.outcome.skipped));
                }
                if let Some(path) = &self.outcome.output_path {
                    summary.push_str(&format!("\nSaved to: {}", path.display()));
                }
                summary
            }
            JobState::Cancelled => format!(
                "Translation cancelled.\nSucceeded before cancelling: {}\nFailed: {}",
                self.outcome.succeeded, self.outcome.failed
            ),
            JobState::Failed => format!(
                "Translation failed: {}",
                self.error.as_deref().unwrap_or("unknown error")
            ),
            JobState::Idle | JobState::Running => format!("Job is {}", self.state),
        }
    }
}

/// Runs translation jobs against one provider
pub struct Orchestrator {
    config: Config,
    translator: Arc<dyn Translator>,
    cancel: CancellationFlag,
    state: JobState,
}

impl Orchestrator {
    /// Build an orchestrator around the configured provider
    pub fn new(config: Config) -> Self {
        let cancel = CancellationFlag::new();
        let translator: Arc<dyn Translator> = Arc::new(ProviderClient::from_config(&config, cancel.clone()));
        Self::with_translator(config, translator, cancel)
    }

    /// Build an orchestrator around any translator sharing `cancel`
    pub fn with_translator(config: Config, translator: Arc<dyn Translator>, cancel: CancellationFlag) -> Self {
        Self {
            config,
            translator,
            cancel,
            state: JobState::Idle,
        }
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    /// Handle for cancelling the running job from another task or thread
    pub fn cancel_flag(&self) -> CancellationFlag {
        self.cancel.clone()
    }

    fn strategy(&self, file_type: FileType) -> Strategy {
        Strategy::for_file_type(
            file_type,
            self.config.clone(),
            Arc::clone(&self.translator),
            self.cancel.clone(),
        )
    }

    fn text_strategy(&self) -> TextFileStrategy {
        TextFileStrategy::new(self.config.clone(), Arc::clone(&self.translator), self.cancel.clone())
    }

    /// Translate a sample of `input` without writing anything
    pub async fn preview(&self, file_type: FileType, input: &Path) -> Result<String, JobError> {
        self.validate()?;
        self.strategy(file_type).preview(input).await
    }

    /// Preview the first file of a directory scan
    pub async fn preview_scan(&self, directory: &Path, pattern: &str) -> Result<String, JobError> {
        self.validate()?;
        let files = crate::file_utils::FileManager::find_matching_files(directory, pattern)
            .map_err(|e| JobError::parse(directory, format!("{:#}", e)))?;
        let Some(first) = files.first() else {
            return Err(JobError::NoMatchingFiles {
                directory: directory.to_path_buf(),
                pattern: pattern.to_string(),
            });
        };

        let preview = self.text_strategy().preview(first).await?;
        Ok(format!(
            "Found {} matching files. Previewing {}:\n\n{}",
            files.len(),
            first.display(),
            preview
        ))
    }

    fn validate(&self) -> Result<(), JobError> {
        self.config
            .validate()
            .map_err(|e| JobError::Configuration(format!("{:#}", e)))
    }

    /// Run one job to completion, cancellation or failure
    pub async fn run(&mut self, job: JobKind, progress: &dyn ProgressSink) -> JobReport {
        let job_id = Uuid::new_v4();
        let started = Instant::now();

        self.cancel.reset();
        self.state = JobState::Running;
        info!("Job {} started: {:?} with {}", job_id, job, self.translator.name());

        let result = match self.validate() {
            Ok(()) => self.execute(&job, progress).await,
            Err(e) => Err(e),
        };

        let (state, outcome, error) = match result {
            Ok(outcome) if outcome.cancelled => (JobState::Cancelled, outcome, None),
            Ok(outcome) => (JobState::Completed, outcome, None),
            Err(e) => {
                error!("Job {} failed: {}", job_id, e);
                (JobState::Failed, JobOutcome::default(), Some(e.to_string()))
            }
        };

        self.state = state;
        let report = JobReport {
            job_id,
            state,
            outcome,
            error,
            duration: started.elapsed(),
        };
        info!("Job {} {}: {}", job_id, state, report.outcome);
        report
    }

    async fn execute(&self, job: &JobKind, progress: &dyn ProgressSink) -> Result<JobOutcome, JobError> {
        match job {
            JobKind::ResxFile { input, output } | JobKind::TextFile { input, output } => {
                let strategy = self.strategy(job.file_type());
                let output = output
                    .clone()
                    .unwrap_or_else(|| strategy.default_output_path(input));
                strategy.translate(input, &output, progress).await
            }
            JobKind::TextScan {
                directory,
                pattern,
                output_dir,
            } => {
                self.text_strategy()
                    .scan_and_translate(directory, pattern, output_dir.as_deref(), progress)
                    .await
            }
        }
    }
}
