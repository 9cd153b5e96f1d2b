/*!
 * Translation pipeline: format strategies, batching, cancellation and
 * progress, and the orchestrator that ties them together.
 *
 * - `cancel`: cooperative cancellation flag
 * - `progress`: progress capability and monotonic tracker
 * - `envelope`: JSON batch envelopes and code fence cleanup
 * - `resx`: entry-by-entry translation of XML resource files
 * - `text_file`: whole-document translation and directory scans
 * - `strategy`: the `FormatStrategy` interface and job outcome counts
 * - `orchestrator`: job state machine
 */

// Re-export main types for easier usage
pub use self::cancel::CancellationFlag;
pub use self::orchestrator::{JobKind, JobReport, JobState, Orchestrator};
pub use self::progress::{NoProgress, ProgressSink, ProgressTracker, ProgressUpdate, RecordingProgress};
pub use self::resx::{ResourceEntry, ResxDocument, ResxStrategy};
pub use self::strategy::{FormatStrategy, JobOutcome, Strategy};
pub use self::text_file::TextFileStrategy;

// Submodules
pub mod cancel;
pub mod envelope;
pub mod orchestrator;
pub mod progress;
pub mod resx;
pub mod strategy;
pub mod text_file;
