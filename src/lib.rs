/*!
 * # restrans - resource file translator
 *
 * A Rust library for translating localization resources through
 * machine-translation providers.
 *
 * ## Features
 *
 * - Translate RESX resource entries one by one or in batches
 * - Translate whole text files (e.g. `zh-cn.ts` locale modules) in one request
 * - Scan a directory and translate every file matching a pattern
 * - Providers:
 *   - DeepLX (single-text endpoint)
 *   - OpenAI-compatible chat completions, with JSON batch envelopes
 * - Cooperative cancellation and progress reporting
 * - Byte-for-byte preservation of everything except translated values
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `translation`: The translation pipeline:
 *   - `translation::resx`: Structured entry translation
 *   - `translation::text_file`: Whole-document translation and directory scans
 *   - `translation::envelope`: Batch envelopes and fence cleanup
 *   - `translation::orchestrator`: Job state machine
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: Target language table
 * - `providers`: Client implementations for translation backends:
 *   - `providers::deeplx`: DeepLX client
 *   - `providers::chat`: Chat completions client
 *   - `providers::mock`: In-process providers for tests
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod translation;
pub mod app_controller;
pub mod language_utils;
pub mod providers;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::{Config, FileType, TranslationProvider};
pub use translation::{CancellationFlag, JobKind, JobOutcome, JobReport, JobState, Orchestrator};
pub use providers::{ProviderClient, TranslationRequest, Translator};
pub use language_utils::{get_language_code, get_language_file_code, resolve_target_language};
pub use errors::{JobError, ProviderError};
