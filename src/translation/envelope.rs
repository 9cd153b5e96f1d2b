/*!
 * Batch envelope handling and fenced code block cleanup.
 *
 * A batch envelope is a JSON object whose keys are entry ids and whose values
 * are the texts to translate. Chat models tend to wrap their answers in
 * markdown fences, so responses are unwrapped before parsing.
 */

use std::collections::BTreeMap;
use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Entry id to source text. Ids are unique within one batch.
pub type BatchRequest = BTreeMap<String, String>;

/// Entry id to translated text; keys are always a subset of the request's keys.
pub type BatchResponse = HashMap<String, String>;

static FENCED_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"```[A-Za-z0-9_+.\-]*[ \t]*\r?\n?([\s\S]*?)\s*```").expect("valid fenced block regex")
});

static LEADING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^```[A-Za-z0-9_+.\-]*[ \t]*(\r?\n)?").expect("valid leading fence regex"));

static TRAILING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\r?\n)?[ \t]*```$").expect("valid trailing fence regex"));

/// Serialize a batch into the JSON envelope sent to the provider
pub fn build_envelope(entries: &BatchRequest) -> String {
    // A map of strings always serializes
    serde_json::to_string(entries).unwrap_or_else(|_| "{}".to_string())
}

/// Prompt asking the model to translate only the values of an envelope
pub fn build_batch_prompt(envelope: &str, target_language: &str) -> String {
    format!(
        "Translate the following JSON into {target}.\n\
         The keys are text ids and the values are the texts to translate.\n\
         Keep the JSON structure unchanged: translate only the values, never the keys.\n\
         Reply with the translated JSON only, without explanations or any other content.\n\n\
         {envelope}",
        target = target_language,
        envelope = envelope
    )
}

/// Content of the first fenced code block, if the text contains one
pub fn extract_fenced_block(text: &str) -> Option<&str> {
    FENCED_BLOCK
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

/// Parse a provider's answer to a batch envelope.
///
/// Tries the first fenced block, then the raw text, then the outermost braces.
/// Keys that were not in `request` are dropped. `None` means nothing parsed.
pub fn parse_envelope_response(content: &str, request: &BatchRequest) -> Option<BatchResponse> {
    let content = content.trim();

    let mut candidates: Vec<&str> = Vec::with_capacity(3);
    if let Some(block) = extract_fenced_block(content) {
        candidates.push(block);
    }
    candidates.push(content);
    if let (Some(start), Some(end)) = (content.find('{'), content.rfind('}')) {
        if start < end {
            candidates.push(&content[start..=end]);
        }
    }

    let object = candidates.into_iter().find_map(|candidate| {
        match serde_json::from_str::<Value>(candidate.trim()) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        }
    })?;

    let translated = object
        .into_iter()
        .filter(|(id, _)| request.contains_key(id))
        .filter_map(|(id, value)| match value {
            Value::String(text) => Some((id, text)),
            Value::Number(n) => Some((id, n.to_string())),
            Value::Bool(b) => Some((id, b.to_string())),
            _ => None,
        })
        .collect();

    Some(translated)
}

/// Strip one leading and one trailing fence marker from a whole-document answer.
///
/// Best-effort cleanup: text without fences is returned trimmed, and inner
/// fences are left alone.
pub fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();
    let without_leading = LEADING_FENCE.replace(trimmed, "");
    let without_trailing = TRAILING_FENCE.replace(&without_leading, "");
    without_trailing.trim().to_string()
}
