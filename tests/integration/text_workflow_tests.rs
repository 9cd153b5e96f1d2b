/*!
 * End-to-end tests for whole-document translation and directory scans
 */

use std::fs;
use std::sync::Arc;

use restrans::providers::mock::MockTranslator;
use restrans::translation::{
    CancellationFlag, FormatStrategy, JobKind, JobState, NoProgress, Orchestrator, RecordingProgress,
    TextFileStrategy,
};

use crate::common;
use crate::common::mock_providers::FixedResponseTranslator;

#[tokio::test]
async fn test_translate_withJsonFencedResponse_shouldSaveInnerContent() {
    common::init_logging();
    let dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(dir.path(), "zh-cn.ts", "{\"hello\": \"你好\"}").unwrap();
    let output = dir.path().join("de.ts");

    let fixed = Arc::new(FixedResponseTranslator::new("```json\n{\"hello\": \"Hallo\"}\n```"));
    let strategy = TextFileStrategy::new(common::test_config(), fixed.clone(), CancellationFlag::new());
    let outcome = strategy.translate(&input, &output, &NoProgress).await.unwrap();

    assert_eq!(outcome.succeeded, 1);
    assert_eq!(fs::read_to_string(&output).unwrap(), "{\"hello\": \"Hallo\"}");
    assert_eq!(fixed.call_count(), 1);
}

#[tokio::test]
async fn test_translate_withTypescriptFence_shouldStripMarkers() {
    let dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(dir.path(), "zh-cn.ts", "export default { a: '甲' };").unwrap();
    let output = dir.path().join("de.ts");

    let strategy = TextFileStrategy::new(common::test_config(), Arc::new(MockTranslator::fenced("typescript")), CancellationFlag::new());
    strategy.translate(&input, &output, &NoProgress).await.unwrap();

    let written = fs::read_to_string(&output).unwrap();
    assert!(!written.contains("```"));
    assert_eq!(written, "EXPORT DEFAULT { A: '甲' };");
}

#[tokio::test]
async fn test_translate_withFailingProvider_shouldCountFailureAndWriteNothing() {
    let dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(dir.path(), "zh-cn.ts", "export default {};").unwrap();

    let mut orchestrator =
        Orchestrator::with_translator(common::test_config(), Arc::new(MockTranslator::failing()), CancellationFlag::new());
    let report = orchestrator
        .run(JobKind::TextFile { input, output: None }, &NoProgress)
        .await;

    assert_eq!(report.state, JobState::Completed);
    assert_eq!(report.outcome.failed, 1);
    assert_eq!(report.outcome.succeeded, 0);
    assert!(!dir.path().join("de.ts").exists());
}

#[tokio::test]
async fn test_scan_shouldTranslateEveryMatchNextToItsInput() {
    let dir = common::create_temp_dir().unwrap();
    common::create_test_file(dir.path(), "app/zh-cn.ts", "export default { a: 'x' };").unwrap();
    common::create_test_file(dir.path(), "lib/nested/zh-cn.ts", "export default { b: 'y' };").unwrap();
    common::create_test_file(dir.path(), "lib/readme.md", "not me").unwrap();

    let mock = Arc::new(MockTranslator::uppercase());
    let mut orchestrator = Orchestrator::with_translator(common::test_config(), mock.clone(), CancellationFlag::new());
    let recorder = RecordingProgress::new();
    let job = JobKind::TextScan {
        directory: dir.path().to_path_buf(),
        pattern: "zh-cn.ts".to_string(),
        output_dir: None,
    };
    let report = orchestrator.run(job, &recorder).await;

    assert_eq!(report.state, JobState::Completed);
    assert_eq!(report.outcome.succeeded, 2);
    assert_eq!(report.outcome.output_path.as_deref(), Some(dir.path()));
    assert_eq!(
        fs::read_to_string(dir.path().join("app/de.ts")).unwrap(),
        "EXPORT DEFAULT { A: 'X' };"
    );
    assert!(dir.path().join("lib/nested/de.ts").exists());
    assert!(!dir.path().join("lib/de.ts").exists());

    let updates = recorder.updates();
    assert!(updates.windows(2).all(|pair| pair[0].percent <= pair[1].percent));
    assert_eq!(updates.last().unwrap().percent, 100.0);
    assert!(updates.iter().any(|u| (u.percent - 55.0).abs() < 1e-9));
}

#[tokio::test]
async fn test_scan_withOutputDir_shouldWriteThere() {
    let dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(dir.path(), "src/zh-cn.ts", "export default {};").unwrap();
    let out_dir = dir.path().join("translated");

    let strategy = TextFileStrategy::new(common::test_config(), Arc::new(MockTranslator::uppercase()), CancellationFlag::new());
    let outcome = strategy
        .scan_and_translate(&dir.path().join("src"), "zh-cn.ts", Some(&out_dir), &NoProgress)
        .await
        .unwrap();

    assert_eq!(outcome.succeeded, 1);
    assert!(out_dir.join("de.ts").exists());
    assert!(!input.with_file_name("de.ts").exists());
}

#[tokio::test]
async fn test_scan_cancelledMidway_shouldKeepWrittenFilesAndStop() {
    let dir = common::create_temp_dir().unwrap();
    for name in ["a", "b", "c"] {
        common::create_test_file(dir.path(), &format!("{}/zh-cn.ts", name), "export default {};").unwrap();
    }

    let cancel = CancellationFlag::new();
    let mock = Arc::new(MockTranslator::uppercase().cancel_after(2, cancel.clone()));
    let strategy = TextFileStrategy::new(common::test_config(), mock.clone(), cancel);
    let outcome = strategy
        .scan_and_translate(dir.path(), "zh-cn.ts", None, &NoProgress)
        .await
        .unwrap();

    assert!(outcome.cancelled);
    assert_eq!(outcome.succeeded, 1);
    assert_eq!(mock.call_count(), 2);
    assert!(dir.path().join("a/de.ts").exists());
    assert!(!dir.path().join("b/de.ts").exists());
    assert!(!dir.path().join("c/de.ts").exists());
}

#[tokio::test]
async fn test_scan_whenFileIsAlreadyTheOutput_shouldSkipIt() {
    let dir = common::create_temp_dir().unwrap();
    let existing = common::create_test_file(dir.path(), "de.ts", "export default {};").unwrap();

    let mock = Arc::new(MockTranslator::uppercase());
    let strategy = TextFileStrategy::new(common::test_config(), mock.clone(), CancellationFlag::new());
    let outcome = strategy
        .scan_and_translate(dir.path(), "*.ts", None, &NoProgress)
        .await
        .unwrap();

    assert_eq!(outcome.skipped, 1);
    assert_eq!(outcome.attempted, 0);
    assert_eq!(mock.call_count(), 0);
    assert_eq!(fs::read_to_string(existing).unwrap(), "export default {};");
}

#[tokio::test]
async fn test_scan_withNoMatches_shouldFailJob() {
    let dir = common::create_temp_dir().unwrap();
    common::create_test_file(dir.path(), "only.txt", "x").unwrap();

    let mut orchestrator =
        Orchestrator::with_translator(common::test_config(), Arc::new(MockTranslator::uppercase()), CancellationFlag::new());
    let job = JobKind::TextScan {
        directory: dir.path().to_path_buf(),
        pattern: "zh-cn.ts".to_string(),
        output_dir: None,
    };
    let report = orchestrator.run(job, &NoProgress).await;

    assert_eq!(report.state, JobState::Failed);
    assert!(report.error.unwrap().contains("zh-cn.ts"));
}

#[tokio::test]
async fn test_scan_withUnreadableMatch_shouldCountFailureAndContinue() {
    let dir = common::create_temp_dir().unwrap();
    common::create_test_file(dir.path(), "a/zh-cn.ts", "").unwrap();
    common::create_test_file(dir.path(), "b/zh-cn.ts", "export default {};").unwrap();

    let strategy = TextFileStrategy::new(common::test_config(), Arc::new(MockTranslator::uppercase()), CancellationFlag::new());
    let outcome = strategy
        .scan_and_translate(dir.path(), "zh-cn.ts", None, &NoProgress)
        .await
        .unwrap();

    assert_eq!(outcome.failed, 1);
    assert_eq!(outcome.succeeded, 1);
    assert!(dir.path().join("b/de.ts").exists());
}
