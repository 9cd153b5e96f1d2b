/*!
 * Tests for the whole-document strategy
 */

use std::sync::Arc;

use restrans::providers::mock::MockTranslator;
use restrans::translation::{CancellationFlag, FormatStrategy, RecordingProgress, TextFileStrategy};

use crate::common;
use crate::common::mock_providers::FixedResponseTranslator;

#[tokio::test]
async fn test_preview_shouldTruncateLongContent() {
    let dir = common::create_temp_dir().unwrap();
    let long = "a".repeat(250);
    let input = common::create_test_file(dir.path(), "zh-cn.ts", &long).unwrap();

    let strategy = TextFileStrategy::new(common::test_config(), Arc::new(MockTranslator::uppercase()), CancellationFlag::new());
    let preview = strategy.preview(&input).await.unwrap();

    assert!(preview.contains(&format!("{}...", "a".repeat(200))));
    assert!(!preview.contains(&"a".repeat(201)));
    assert!(preview.contains("German"));
    assert!(preview.contains("de.ts"));
}

#[tokio::test]
async fn test_preview_shortContent_shouldNotAddEllipsis() {
    let dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(dir.path(), "zh-cn.ts", "export default {};").unwrap();

    let strategy = TextFileStrategy::new(common::test_config(), Arc::new(MockTranslator::uppercase()), CancellationFlag::new());
    let preview = strategy.preview(&input).await.unwrap();

    assert!(preview.contains("export default {};\n"));
    assert!(!preview.contains("..."));
}

#[tokio::test]
async fn test_translate_shouldReportFixedMilestones() {
    let dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(dir.path(), "zh-cn.ts", "export default { hi: '你好' };").unwrap();
    let output = dir.path().join("de.ts");

    let strategy = TextFileStrategy::new(common::test_config(), Arc::new(MockTranslator::uppercase()), CancellationFlag::new());
    let recorder = RecordingProgress::new();
    let outcome = strategy.translate(&input, &output, &recorder).await.unwrap();

    let percents: Vec<f64> = recorder.updates().iter().map(|u| u.percent).collect();
    assert_eq!(percents, vec![10.0, 30.0, 80.0, 100.0]);
    assert_eq!(outcome.succeeded, 1);
    assert_eq!(outcome.attempted, 1);
}

#[tokio::test]
async fn test_translate_shouldSendFormatPromptWithTargetLanguage() {
    let dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(dir.path(), "zh-cn.ts", "export default {};").unwrap();

    let mock = Arc::new(MockTranslator::uppercase());
    let strategy = TextFileStrategy::new(common::test_config(), mock.clone(), CancellationFlag::new());
    strategy.translate(&input, &dir.path().join("de.ts"), &RecordingProgress::new()).await.unwrap();

    let requests = mock.seen_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].text, "export default {};");
    let prompt = requests[0].system_prompt.as_deref().unwrap();
    assert!(prompt.contains("German"));
}

#[tokio::test]
async fn test_translate_withEmptyFile_shouldFailAsParseError() {
    let dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(dir.path(), "zh-cn.ts", "  \n").unwrap();

    let fixed = Arc::new(FixedResponseTranslator::new("unused"));
    let strategy = TextFileStrategy::new(common::test_config(), fixed.clone(), CancellationFlag::new());

    assert!(strategy.translate(&input, &dir.path().join("de.ts"), &RecordingProgress::new()).await.is_err());
    assert_eq!(fixed.call_count(), 0);
}

#[test]
fn test_defaultOutputPath_shouldUseFileCode() {
    let mut config = common::test_config();
    config.target_language = "Simplified Chinese".to_string();
    let strategy = TextFileStrategy::new(config, Arc::new(MockTranslator::uppercase()), CancellationFlag::new());

    let output = strategy.default_output_path(std::path::Path::new("locales/en.ts"));
    assert_eq!(output, std::path::PathBuf::from("locales/zh-cn.ts"));
}
