use anyhow::{Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::Path;
use std::time::Duration;

use crate::app_config::{Config, FileType};
use crate::file_utils::FileManager;
use crate::providers::{ProviderClient, TranslationRequest, Translator};
use crate::translation::{
    CancellationFlag, JobKind, JobReport, JobState, Orchestrator, ProgressSink, ProgressUpdate,
};

// @module: Application controller for CLI translation jobs

/// Text sent by `check_connection`
const CONNECTION_CHECK_TEXT: &str = "Hello, world!";

/// Progress sink drawing an indicatif bar scaled to 0..100
pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::new(100);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}% {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}% {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style.progress_chars("█▓▒░"));
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for BarProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for BarProgress {
    fn report(&self, update: ProgressUpdate) {
        self.bar.set_position(update.percent.round() as u64);
        match update.status {
            Some(status) => self.bar.set_message(format!("{}/{} {}", update.current, update.total, status)),
            None => self.bar.set_message(format!("{}/{}", update.current, update.total)),
        }
    }
}

/// Main application controller for translation jobs
pub struct Controller {
    // @field: App configuration, fixed for the controller's lifetime
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config })
    }

    /// Run one job with a progress bar; Ctrl-C cancels it cooperatively
    pub async fn run(&self, job: JobKind) -> Result<JobReport> {
        if let JobKind::ResxFile { input, .. } | JobKind::TextFile { input, .. } = &job {
            if !FileManager::file_exists(input) {
                return Err(anyhow!("Input file does not exist: {:?}", input));
            }
        }

        let mut orchestrator = Orchestrator::new(self.config.clone());
        let cancel_watch = Self::cancel_on_ctrl_c(orchestrator.cancel_flag());

        info!(
            "Translating into {} with {}",
            self.config.target_language,
            self.config.provider.display_name()
        );

        let progress = BarProgress::new();
        let report = orchestrator.run(job, &progress).await;
        progress.finish();
        cancel_watch.abort();

        match report.state {
            JobState::Completed => info!("{}", report.summary()),
            JobState::Cancelled => warn!("{}", report.summary()),
            _ => error!("{}", report.summary()),
        }
        info!("Finished in {}", Self::format_duration(report.duration));

        Ok(report)
    }

    /// Translate a sample of one file and return the rendered preview
    pub async fn preview(&self, file_type: FileType, input: &Path) -> Result<String> {
        let orchestrator = Orchestrator::new(self.config.clone());
        Ok(orchestrator.preview(file_type, input).await?)
    }

    /// Preview the first file a directory scan would translate
    pub async fn preview_scan(&self, directory: &Path, pattern: &str) -> Result<String> {
        let orchestrator = Orchestrator::new(self.config.clone());
        Ok(orchestrator.preview_scan(directory, pattern).await?)
    }

    /// Send one short text through the configured provider
    pub async fn check_connection(&self) -> Result<String> {
        self.config.validate()?;

        let client = ProviderClient::from_config(&self.config, CancellationFlag::new());
        let request = TranslationRequest::new(CONNECTION_CHECK_TEXT, &self.config.target_language);

        match client.translate_one(&request).await {
            Some(text) if !text.is_empty() => Ok(text),
            _ => Err(anyhow!(
                "{} did not return a translation, check the provider settings",
                client.name()
            )),
        }
    }

    fn cancel_on_ctrl_c(cancel: CancellationFlag) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Cancelling, waiting for the current request to finish");
                cancel.cancel();
            }
        })
    }

    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
