// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use restrans::app_config::{self, Config, FileType, TranslationProvider};
use restrans::app_controller::Controller;
use restrans::file_utils::FileManager;
use restrans::language_utils;
use restrans::translation::{JobKind, JobState};

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    #[value(name = "deeplx")]
    DeepLx,
    Chat,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::DeepLx => TranslationProvider::DeepLx,
            CliTranslationProvider::Chat => TranslationProvider::Chat,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for FileType to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliFileType {
    Resx,
    Text,
}

impl From<CliFileType> for FileType {
    fn from(cli_type: CliFileType) -> Self {
        match cli_type {
            CliFileType::Resx => FileType::Resx,
            CliFileType::Text => FileType::Text,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate the entries of a RESX resource file
    #[command(alias = "resx")]
    TranslateResx {
        /// Resource file to translate
        input: PathBuf,
        /// Output file (default: <stem>.<CODE>.resx next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Translate a text file as one document
    #[command(alias = "text")]
    TranslateText {
        /// File to translate
        input: PathBuf,
        /// Output file (default: <code>.<ext> next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Translate every matching text file under a directory
    Scan {
        /// Directory to search recursively
        directory: PathBuf,
        /// Filename pattern, e.g. 'zh-cn.ts'
        #[arg(long, default_value = "*.ts")]
        pattern: String,
        /// Write all output files into this directory instead of next to each input
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Translate a sample without writing anything
    Preview {
        /// File to preview, or a directory to preview its first matching file
        input: PathBuf,
        /// File format (default: from the extension)
        #[arg(long, value_enum)]
        file_type: Option<CliFileType>,
        /// Filename pattern when INPUT is a directory
        #[arg(long, default_value = "*.ts")]
        pattern: String,
    },

    /// Send a short text through the configured provider
    Check,

    /// Show or edit the persisted configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions for restrans
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Write the default configuration
    Init {
        /// Replace an existing file
        #[arg(short, long)]
        force: bool,
    },
    /// Print the effective configuration with credentials redacted
    Show,
    /// Set one key and save
    Set {
        key: String,
        value: String,
    },
    /// List the supported target languages
    Languages,
}

/// restrans - translate RESX resources and text files with DeepLX or a chat model
#[derive(Parser, Debug)]
#[command(name = "restrans")]
#[command(version)]
#[command(about = "Resource file translation tool")]
#[command(long_about = "restrans translates RESX resource entries and whole text files through DeepLX or an OpenAI-compatible chat API.

EXAMPLES:
    restrans translate-resx Strings.resx               # Writes Strings.EN.resx
    restrans -t Japanese translate-text i18n/zh-cn.ts  # Writes i18n/ja.ts
    restrans scan src/locales --pattern zh-cn.ts       # Translate every zh-cn.ts below src/locales
    restrans -p chat -b 10 translate-resx Strings.resx # Batch 10 entries per chat request
    restrans preview Strings.resx                      # Translate one random entry
    restrans config set deeplx_url http://localhost:1188
    restrans completions bash > restrans.bash

CONFIGURATION:
    Configuration is stored in ~/.resource_translator.json by default. Missing
    keys take their default values. Press Ctrl-C to cancel a running job after
    the current request.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config_path: Option<PathBuf>,

    /// Translation provider to use
    #[arg(short, long, value_enum, global = true)]
    provider: Option<CliTranslationProvider>,

    /// Chat model to use
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Target language name or code (e.g. 'Japanese', 'de')
    #[arg(short, long, global = true)]
    target_language: Option<String>,

    /// Entries per chat batch request
    #[arg(short, long, global = true)]
    batch_size: Option<usize>,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,

    /// Log provider requests and responses
    #[arg(long, global = true)]
    enable_logging: bool,

    /// Also write logs to logs/translator_YYYYMMDD.log
    #[arg(long, global = true)]
    log_to_file: bool,
}

/// Open log file shared by every record once file logging is enabled
static LOG_FILE: Lazy<Mutex<Option<File>>> = Lazy::new(|| Mutex::new(None));

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    /// Mirror records into the daily log file under `dir`
    fn enable_file_output(dir: &Path) -> Result<PathBuf> {
        FileManager::ensure_dir(dir)?;
        let path = dir.join(format!("translator_{}.log", chrono::Local::now().format("%Y%m%d")));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file: {:?}", path))?;
        *LOG_FILE.lock() = Some(file);
        Ok(path)
    }

    // @returns: ANSI colour for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let now = chrono::Local::now();
        let mut stderr = std::io::stderr();
        let _ = writeln!(
            stderr,
            "{}{} {:<5} {}\x1B[0m",
            Self::color_for_level(record.level()),
            now.format("%H:%M:%S.%3f"),
            record.level(),
            record.args()
        );

        if let Some(file) = LOG_FILE.lock().as_mut() {
            let _ = writeln!(
                file,
                "{} - {} - {}",
                now.format("%Y-%m-%d %H:%M:%S,%3f"),
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
        if let Some(file) = LOG_FILE.lock().as_mut() {
            let _ = file.flush();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger with every level and narrow it once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "restrans", &mut std::io::stdout());
        return Ok(());
    }

    let config_path = cli.config_path.clone().unwrap_or_else(Config::default_path);
    let config = effective_config(&cli, &config_path);

    log::set_max_level(config.log_level.to_level_filter());
    if config.log_to_file {
        match CustomLogger::enable_file_output(Path::new("logs")) {
            Ok(path) => info!("Logging to {:?}", path),
            Err(e) => warn!("File logging disabled: {:#}", e),
        }
    }

    match cli.command {
        Commands::Config { action } => run_config(action, &config_path, &config),
        Commands::Check => {
            let controller = Controller::with_config(config)?;
            let translated = controller.check_connection().await?;
            info!("Connection OK: {}", translated);
            Ok(())
        }
        Commands::Preview {
            input,
            file_type,
            pattern,
        } => {
            let controller = Controller::with_config(config)?;
            let preview = if input.is_dir() {
                controller.preview_scan(&input, &pattern).await?
            } else {
                let file_type = file_type.map(FileType::from).unwrap_or_else(|| detect_file_type(&input));
                controller.preview(file_type, &input).await?
            };
            println!("{}", preview);
            Ok(())
        }
        Commands::TranslateResx { input, output } => {
            run_job(config, &config_path, JobKind::ResxFile { input, output }).await
        }
        Commands::TranslateText { input, output } => {
            run_job(config, &config_path, JobKind::TextFile { input, output }).await
        }
        Commands::Scan {
            directory,
            pattern,
            output_dir,
        } => {
            let job = JobKind::TextScan {
                directory,
                pattern,
                output_dir,
            };
            run_job(config, &config_path, job).await
        }
        Commands::Completions { .. } => Ok(()),
    }
}

/// Persisted configuration with this run's command line overrides applied
fn effective_config(cli: &CommandLineOptions, config_path: &Path) -> Config {
    let mut config = Config::load(config_path);

    if let Some(provider) = &cli.provider {
        config.provider = provider.clone().into();
    }
    if let Some(model) = &cli.model {
        config.chat_model = model.clone();
    }
    if let Some(target_language) = &cli.target_language {
        config.target_language = language_utils::resolve_target_language(target_language).name;
    }
    if let Some(batch_size) = cli.batch_size {
        config.batch_size = batch_size;
    }
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }
    if cli.enable_logging {
        config.enable_logging = true;
    }
    if cli.log_to_file {
        config.log_to_file = true;
    }

    config
}

fn detect_file_type(input: &Path) -> FileType {
    match input.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("resx") => FileType::Resx,
        _ => FileType::Text,
    }
}

async fn run_job(config: Config, config_path: &Path, job: JobKind) -> Result<()> {
    let file_type = job.file_type();
    let controller = Controller::with_config(config)?;
    let report = controller.run(job).await?;

    // Command line overrides stay out of the persisted file
    if let Err(e) = Config::remember_file_type(config_path, file_type) {
        warn!("Could not save configuration: {:#}", e);
    }

    match report.state {
        JobState::Completed | JobState::Cancelled => Ok(()),
        _ => Err(anyhow!(report.summary())),
    }
}

fn run_config(action: ConfigAction, config_path: &Path, effective: &Config) -> Result<()> {
    match action {
        ConfigAction::Init { force } => {
            if config_path.exists() && !force {
                return Err(anyhow!(
                    "Config file already exists at {:?}, use --force to replace it",
                    config_path
                ));
            }
            Config::default().save(config_path)?;
            info!("Default configuration written to {:?}", config_path);
        }
        ConfigAction::Show => {
            let json = serde_json::to_string_pretty(&effective.redacted())
                .context("Failed to serialize config to JSON")?;
            println!("{}", json);
        }
        ConfigAction::Set { key, value } => {
            let mut persisted = Config::load(config_path);
            persisted.set_value(&key, &value)?;
            persisted.save(config_path)?;
            info!("Set {} in {:?}", key, config_path);
        }
        ConfigAction::Languages => {
            for name in language_utils::supported_languages() {
                let language = language_utils::resolve_target_language(name);
                println!("{:<20} {:<6} {}", language.name, language.provider_code, language.file_code);
            }
        }
    }
    Ok(())
}
