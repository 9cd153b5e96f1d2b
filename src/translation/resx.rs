/*!
 * Structured entry translation for XML resource (RESX) files.
 *
 * Only `data` elements with a `value` child are translation units and the
 * `name` attribute of `data` is the entry id. The document is kept as the
 * original source text plus the byte span of every value, so rendering
 * splices new values in and leaves every other byte untouched.
 */

use async_trait::async_trait;
use log::{debug, info, warn};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use rand::seq::IndexedRandom;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::{Config, FileType};
use crate::errors::JobError;
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::providers::{TranslationRequest, Translator};

use super::cancel::CancellationFlag;
use super::envelope::BatchRequest;
use super::progress::{ProgressSink, ProgressTracker};
use super::strategy::{FormatStrategy, JobOutcome};

/// One `data` element of a resource file
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceEntry {
    /// Value of the `name` attribute
    pub id: String,
    /// Unescaped text of the `value` child
    pub original_text: String,
    /// Empty until a provider returns a translation
    pub translated_text: String,
    /// Byte range of the value content in the source; `None` when there is no value to replace
    span: Option<Range<usize>>,
}

impl ResourceEntry {
    /// Entries with a non-blank value are work units; everything else is skipped
    pub fn is_translatable(&self) -> bool {
        self.span.is_some() && !self.original_text.trim().is_empty()
    }

    pub fn is_translated(&self) -> bool {
        !self.translated_text.is_empty()
    }
}

/// A parsed resource document
#[derive(Debug, Clone)]
pub struct ResxDocument {
    source: String,
    pub entries: Vec<ResourceEntry>,
}

/// Entry being assembled while the reader walks a `data` element
struct PendingEntry {
    id: String,
    text: String,
    content_start: Option<usize>,
    span: Option<Range<usize>>,
    in_value: bool,
}

impl ResxDocument {
    /// Load and parse a resource file
    pub fn load(path: &Path) -> Result<Self, JobError> {
        let source = FileManager::read_to_string(path).map_err(|e| JobError::parse(path, format!("{:#}", e)))?;
        Self::parse(&source).map_err(|reason| JobError::parse(path, reason))
    }

    /// Parse resource markup held in memory
    pub fn parse(source: &str) -> Result<Self, String> {
        // Reader positions start after a byte order mark; spans index into `source`
        let bom = if source.starts_with('\u{FEFF}') { '\u{FEFF}'.len_utf8() } else { 0 };
        let mut reader = Reader::from_str(&source[bom..]);
        reader.config_mut().trim_text(false);

        let mut entries = Vec::new();
        let mut pending: Option<PendingEntry> = None;
        let mut saw_element = false;

        loop {
            let event = reader
                .read_event()
                .map_err(|e| format!("invalid markup at byte {}: {}", reader.error_position(), e))?;
            let position = reader.buffer_position() as usize + bom;

            match event {
                Event::Start(start) => {
                    saw_element = true;
                    match start.local_name().as_ref() {
                        b"data" if pending.is_none() => {
                            pending = Some(PendingEntry {
                                id: entry_id(&start)?,
                                text: String::new(),
                                content_start: None,
                                span: None,
                                in_value: false,
                            });
                        }
                        b"value" => {
                            if let Some(entry) = pending.as_mut().filter(|e| e.span.is_none() && !e.in_value) {
                                entry.in_value = true;
                                entry.content_start = Some(position);
                            }
                        }
                        _ => {}
                    }
                }
                Event::Empty(start) => {
                    saw_element = true;
                    if start.local_name().as_ref() == b"data" && pending.is_none() {
                        entries.push(ResourceEntry {
                            id: entry_id(&start)?,
                            original_text: String::new(),
                            translated_text: String::new(),
                            span: None,
                        });
                    }
                }
                Event::Text(text) => {
                    if let Some(entry) = pending.as_mut().filter(|e| e.in_value) {
                        let unescaped = text.unescape().map_err(|e| format!("invalid text in value: {}", e))?;
                        entry.text.push_str(&unescaped);
                    }
                }
                Event::CData(data) => {
                    if let Some(entry) = pending.as_mut().filter(|e| e.in_value) {
                        entry.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                    }
                }
                Event::End(end) => match end.local_name().as_ref() {
                    b"value" => {
                        if let Some(entry) = pending.as_mut().filter(|e| e.in_value) {
                            entry.in_value = false;
                            let content_start = entry.content_start.unwrap_or(position);
                            // The end tag is the last "</" before the reader position
                            let content_end = source[..position].rfind("</").unwrap_or(position);
                            entry.span = Some(content_start..content_end.max(content_start));
                        }
                    }
                    b"data" => {
                        if let Some(entry) = pending.take() {
                            entries.push(ResourceEntry {
                                id: entry.id,
                                original_text: entry.text,
                                translated_text: String::new(),
                                span: entry.span,
                            });
                        }
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
        }

        if !saw_element {
            return Err("no root element".to_string());
        }
        if let Some(entry) = pending {
            return Err(format!("unterminated data element '{}'", entry.id));
        }

        Ok(Self {
            source: source.to_string(),
            entries,
        })
    }

    /// Indices of the entries that are work units, in document order
    pub fn translatable_indices(&self) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.is_translatable())
            .map(|(index, _)| index)
            .collect()
    }

    /// Entries with nothing to translate
    pub fn skipped_count(&self) -> usize {
        self.entries.iter().filter(|entry| !entry.is_translatable()).count()
    }

    /// The original source with every translated value spliced in
    pub fn render(&self) -> String {
        let mut replacements: Vec<(&Range<usize>, &str)> = self
            .entries
            .iter()
            .filter(|entry| entry.is_translated())
            .filter_map(|entry| entry.span.as_ref().map(|span| (span, entry.translated_text.as_str())))
            .collect();
        replacements.sort_by_key(|(span, _)| span.start);

        let mut output = String::with_capacity(self.source.len());
        let mut cursor = 0;
        for (span, text) in replacements {
            output.push_str(&self.source[cursor..span.start]);
            output.push_str(&quick_xml::escape::partial_escape(text));
            cursor = span.end;
        }
        output.push_str(&self.source[cursor..]);
        output
    }

    /// Write the rendered document
    pub fn save(&self, path: &Path) -> Result<(), JobError> {
        FileManager::write_atomic(path, &self.render()).map_err(|e| JobError::Io(format!("{:#}", e)))
    }
}

fn entry_id(start: &BytesStart<'_>) -> Result<String, String> {
    let attribute = start
        .try_get_attribute("name")
        .map_err(|e| format!("invalid attribute on data element: {}", e))?;
    match attribute {
        Some(attribute) => attribute
            .unescape_value()
            .map(|value| value.into_owned())
            .map_err(|e| format!("invalid name attribute: {}", e)),
        None => Ok(String::new()),
    }
}

/// Entry-by-entry translation of resource files
pub struct ResxStrategy {
    config: Config,
    translator: Arc<dyn Translator>,
    cancel: CancellationFlag,
}

impl ResxStrategy {
    pub fn new(config: Config, translator: Arc<dyn Translator>, cancel: CancellationFlag) -> Self {
        Self {
            config,
            translator,
            cancel,
        }
    }

    /// One request per entry
    async fn translate_per_entry(
        &self,
        document: &mut ResxDocument,
        progress: &mut ProgressTracker<'_>,
        outcome: &mut JobOutcome,
    ) {
        let units = document.translatable_indices();
        let total = units.len();

        for (done, index) in units.into_iter().enumerate() {
            if self.cancel.is_cancelled() {
                outcome.cancelled = true;
                return;
            }

            let entry = &mut document.entries[index];
            let request = TranslationRequest::new(entry.original_text.clone(), &self.config.target_language);
            let result = self.translator.translate_one(&request).await;

            if self.cancel.is_cancelled() {
                outcome.cancelled = true;
                return;
            }

            match result {
                Some(text) if !text.is_empty() => {
                    entry.translated_text = text;
                    outcome.record_success();
                }
                _ => {
                    warn!("No translation for entry '{}'", entry.id);
                    outcome.record_failure();
                }
            }

            progress.report_units(done + 1, total, Some(format!("Translated {}", entry.id)));
        }
    }

    /// One provider batch per group of `batch_size` entries
    async fn translate_batched(
        &self,
        document: &mut ResxDocument,
        progress: &mut ProgressTracker<'_>,
        outcome: &mut JobOutcome,
    ) {
        let units = document.translatable_indices();
        let total = units.len();
        let batch_size = self.config.batch_size.max(1);
        let mut processed = 0;

        for (batch_number, group) in units.chunks(batch_size).enumerate() {
            if self.cancel.is_cancelled() {
                outcome.cancelled = true;
                return;
            }

            // Ids key the envelope, so a blank or repeated id cannot be written back
            let mut request = BatchRequest::new();
            let mut sent = Vec::with_capacity(group.len());
            for &index in group {
                let entry = &document.entries[index];
                if entry.id.is_empty() || request.contains_key(&entry.id) {
                    warn!("Entry '{}' has no unique id, leaving it untranslated", entry.id);
                    outcome.record_failure();
                    continue;
                }
                request.insert(entry.id.clone(), entry.original_text.clone());
                sent.push(index);
            }

            let translated = if request.is_empty() {
                Default::default()
            } else {
                debug!("Sending batch {} with {} entries", batch_number + 1, request.len());
                self.translator
                    .translate_batch(&request, &self.config.target_language)
                    .await
            };

            if self.cancel.is_cancelled() {
                outcome.cancelled = true;
                return;
            }

            for &index in &sent {
                let entry = &mut document.entries[index];
                match translated.get(&entry.id).filter(|text| !text.is_empty()) {
                    Some(text) => {
                        entry.translated_text = text.clone();
                        outcome.record_success();
                    }
                    None => {
                        warn!("Entry '{}' missing from batch response", entry.id);
                        outcome.record_failure();
                    }
                }
            }

            processed += group.len();
            progress.report_units(processed, total, Some(format!("Batch {} done", batch_number + 1)));
        }
    }
}

#[async_trait]
impl FormatStrategy for ResxStrategy {
    fn file_type(&self) -> FileType {
        FileType::Resx
    }

    fn default_output_path(&self, input: &Path) -> PathBuf {
        FileManager::resx_output_path(input, &language_utils::get_language_code(&self.config.target_language))
    }

    async fn preview(&self, input: &Path) -> Result<String, JobError> {
        let document = ResxDocument::load(input)?;
        let units = document.translatable_indices();

        let picked = {
            let mut rng = rand::rng();
            units.choose(&mut rng).copied()
        };
        let Some(index) = picked else {
            return Ok(format!("No translatable entries found in {}", input.display()));
        };

        let entry = &document.entries[index];
        let request = TranslationRequest::new(entry.original_text.clone(), &self.config.target_language);
        let translated = self
            .translator
            .translate_one(&request)
            .await
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| "[translation failed]".to_string());

        Ok(format!(
            "Sampled 1 of {} entries:\n\n{}\n  Original:   {}\n  Translated: {}\n",
            units.len(),
            entry.id,
            entry.original_text,
            translated
        ))
    }

    async fn translate(
        &self,
        input: &Path,
        output: &Path,
        progress: &dyn ProgressSink,
    ) -> Result<JobOutcome, JobError> {
        let mut document = ResxDocument::load(input)?;
        let mut tracker = ProgressTracker::new(progress);
        let mut outcome = JobOutcome {
            skipped: document.skipped_count(),
            ..JobOutcome::default()
        };

        info!(
            "Translating {} entries of {:?} with {} ({} skipped)",
            document.translatable_indices().len(),
            input,
            self.translator.name(),
            outcome.skipped
        );

        if self.translator.supports_batch() {
            self.translate_batched(&mut document, &mut tracker, &mut outcome).await;
        } else {
            self.translate_per_entry(&mut document, &mut tracker, &mut outcome).await;
        }

        if outcome.cancelled {
            info!("Translation of {:?} cancelled, nothing written", input);
            return Ok(outcome);
        }

        document.save(output)?;
        tracker.report(100.0, outcome.attempted, outcome.attempted, Some("Saved".to_string()));
        outcome.output_path = Some(output.to_path_buf());
        Ok(outcome)
    }
}
