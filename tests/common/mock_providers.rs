/*!
 * Scripted providers for tests that need an exact answer
 *
 * `restrans::providers::mock` covers behavior-driven mocks; the provider here
 * replays a fixed response so file content can be asserted byte for byte.
 */

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use restrans::providers::{TranslationRequest, Translator};

/// Answers every request with the same text
#[derive(Debug)]
pub struct FixedResponseTranslator {
    response: String,
    calls: Arc<AtomicUsize>,
}

impl FixedResponseTranslator {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Translator for FixedResponseTranslator {
    fn name(&self) -> &str {
        "Fixed"
    }

    async fn translate_one(&self, request: &TranslationRequest) -> Option<String> {
        if request.is_blank() {
            return Some(String::new());
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        Some(self.response.clone())
    }
}
