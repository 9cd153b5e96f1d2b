/*!
 * Mock provider implementations for testing.
 *
 * This module provides an in-process provider that simulates different behaviors:
 * - `MockTranslator::uppercase()` - Always succeeds, uppercasing the input
 * - `MockTranslator::intermittent(n)` - Fails every nth call
 * - `MockTranslator::failing()` - Always fails
 * - `MockTranslator::fenced(tag)` - Wraps answers in a tagged code fence
 *
 * Batching, dropped batch ids and cancellation after a number of calls can be
 * layered on top of any behavior.
 */

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::translation::cancel::CancellationFlag;
use crate::translation::envelope::{BatchRequest, BatchResponse};

use super::{TranslationRequest, Translator, translate_sequentially};

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with the uppercased input
    Uppercase,
    /// Fails on every nth call
    Intermittent { fail_every: usize },
    /// Always fails
    Failing,
    /// Succeeds but wraps the answer in a fenced code block with this tag
    Fenced { tag: &'static str },
}

/// Mock provider for testing translation behavior
#[derive(Debug)]
pub struct MockTranslator {
    /// Behavior mode
    behavior: MockBehavior,
    /// Whether `translate_batch` answers with one call per batch
    batching: bool,
    /// Ids a batch answer silently leaves out
    dropped_ids: HashSet<String>,
    /// Calls that actually reached the mock "network"
    request_count: Arc<AtomicUsize>,
    /// Flag polled before and after each call
    cancel: Option<CancellationFlag>,
    /// Set `cancel` once this many calls have completed
    cancel_after: Option<usize>,
    /// Requests seen, in order
    seen: Arc<parking_lot::Mutex<Vec<TranslationRequest>>>,
}

impl MockTranslator {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            batching: false,
            dropped_ids: HashSet::new(),
            request_count: Arc::new(AtomicUsize::new(0)),
            cancel: None,
            cancel_after: None,
            seen: Arc::new(parking_lot::Mutex::new(Vec::new())),
        }
    }

    /// Create a mock provider that uppercases every text
    pub fn uppercase() -> Self {
        Self::new(MockBehavior::Uppercase)
    }

    /// Create an intermittently failing mock provider
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every: fail_every.max(1) })
    }

    /// Create a failing mock provider
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that answers inside a fenced code block
    pub fn fenced(tag: &'static str) -> Self {
        Self::new(MockBehavior::Fenced { tag })
    }

    /// Answer batches with a single call, like a chat backend
    pub fn with_batching(mut self) -> Self {
        self.batching = true;
        self
    }

    /// Leave these ids out of batch answers
    pub fn dropping<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dropped_ids = ids.into_iter().map(Into::into).collect();
        self.batching = true;
        self
    }

    /// Poll this flag around every call
    pub fn with_cancellation(mut self, cancel: CancellationFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Set the cancellation flag after `calls` calls, as a user pressing cancel would
    pub fn cancel_after(mut self, calls: usize, cancel: CancellationFlag) -> Self {
        self.cancel = Some(cancel);
        self.cancel_after = Some(calls);
        self
    }

    /// Number of calls that reached the provider
    pub fn call_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Requests received by `translate_one`
    pub fn seen_requests(&self) -> Vec<TranslationRequest> {
        self.seen.lock().clone()
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationFlag::is_cancelled)
    }

    /// Count one call; returns its 0-based index, or None if cancelled beforehand
    fn begin_call(&self) -> Option<usize> {
        if self.is_cancelled() {
            return None;
        }
        Some(self.request_count.fetch_add(1, Ordering::SeqCst))
    }

    fn end_call(&self, index: usize) -> bool {
        if let (Some(limit), Some(cancel)) = (self.cancel_after, &self.cancel) {
            if index + 1 >= limit {
                cancel.cancel();
            }
        }
        !self.is_cancelled()
    }

    fn answer(&self, text: &str, index: usize) -> Option<String> {
        match self.behavior {
            MockBehavior::Uppercase => Some(text.to_uppercase()),
            MockBehavior::Intermittent { fail_every } => {
                if index % fail_every == fail_every - 1 {
                    None
                } else {
                    Some(text.to_uppercase())
                }
            }
            MockBehavior::Failing => None,
            MockBehavior::Fenced { tag } => Some(format!("```{}\n{}\n```", tag, text.to_uppercase())),
        }
    }
}

#[async_trait]
impl Translator for MockTranslator {
    fn name(&self) -> &str {
        "Mock"
    }

    fn supports_batch(&self) -> bool {
        self.batching
    }

    async fn translate_one(&self, request: &TranslationRequest) -> Option<String> {
        if request.is_blank() {
            return Some(String::new());
        }

        let index = self.begin_call()?;
        self.seen.lock().push(request.clone());
        let answer = self.answer(&request.text, index);

        if !self.end_call(index) {
            return None;
        }
        answer
    }

    async fn translate_batch(&self, entries: &BatchRequest, target_language: &str) -> BatchResponse {
        if !self.batching {
            return translate_sequentially(self, entries, target_language).await;
        }
        if entries.is_empty() {
            return BatchResponse::new();
        }

        let Some(index) = self.begin_call() else {
            return BatchResponse::new();
        };

        let mut result = BatchResponse::new();
        for (id, text) in entries {
            if self.dropped_ids.contains(id) {
                continue;
            }
            if let Some(answer) = self.answer(text, index) {
                result.insert(id.clone(), answer);
            }
        }

        if !self.end_call(index) {
            return BatchResponse::new();
        }
        result
    }
}
