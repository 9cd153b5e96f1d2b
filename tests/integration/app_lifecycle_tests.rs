/*!
 * Tests for the job state machine and the application controller
 */

use std::sync::Arc;

use restrans::app_config::{Config, FileType, TranslationProvider};
use restrans::app_controller::Controller;
use restrans::providers::mock::MockTranslator;
use restrans::translation::{CancellationFlag, JobKind, JobState, NoProgress, Orchestrator};

use crate::common;

#[tokio::test]
async fn test_orchestrator_shouldStartIdleAndEndCompleted() {
    let dir = common::create_temp_dir().unwrap();
    let input = common::create_test_resx(dir.path(), "Strings.resx", &[("a", Some("x"))]).unwrap();

    let mut orchestrator =
        Orchestrator::with_translator(common::test_config(), Arc::new(MockTranslator::uppercase()), CancellationFlag::new());
    assert_eq!(orchestrator.state(), JobState::Idle);

    let report = orchestrator
        .run(JobKind::ResxFile { input, output: None }, &NoProgress)
        .await;

    assert_eq!(report.state, JobState::Completed);
    assert_eq!(orchestrator.state(), JobState::Completed);
    assert!(report.error.is_none());
    assert!(report.summary().contains("Succeeded: 1"));
}

#[tokio::test]
async fn test_orchestrator_chatWithoutApiKey_shouldFailWithConfigurationError() {
    let dir = common::create_temp_dir().unwrap();
    let input = common::create_test_resx(dir.path(), "Strings.resx", &[("a", Some("x"))]).unwrap();

    let config = Config {
        provider: TranslationProvider::Chat,
        ..Config::default()
    };
    let mock = Arc::new(MockTranslator::uppercase());
    let mut orchestrator = Orchestrator::with_translator(config, mock.clone(), CancellationFlag::new());
    let report = orchestrator
        .run(JobKind::ResxFile { input, output: None }, &NoProgress)
        .await;

    assert_eq!(report.state, JobState::Failed);
    assert!(report.error.as_deref().unwrap().contains("API key"));
    assert!(report.summary().starts_with("Translation failed"));
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_orchestrator_shouldBeReusableAfterCancellation() {
    let dir = common::create_temp_dir().unwrap();
    let input = common::create_test_resx(dir.path(), "Strings.resx", &[("a", Some("x")), ("b", Some("y"))]).unwrap();

    let cancel = CancellationFlag::new();
    let mock = Arc::new(MockTranslator::uppercase().with_cancellation(cancel.clone()));
    let mut orchestrator = Orchestrator::with_translator(common::test_config(), mock.clone(), cancel);

    let first = orchestrator
        .run(
            JobKind::ResxFile {
                input: input.clone(),
                output: None,
            },
            &NoProgress,
        )
        .await;
    assert_eq!(first.state, JobState::Completed);

    orchestrator.cancel_flag().cancel();
    assert!(orchestrator.cancel_flag().is_cancelled());

    let second = orchestrator
        .run(JobKind::ResxFile { input, output: None }, &NoProgress)
        .await;
    assert_eq!(second.state, JobState::Completed);
    assert_ne!(first.job_id, second.job_id);
    assert_eq!(mock.call_count(), 4);
}

#[tokio::test]
async fn test_orchestrator_preview_shouldNotWriteOutput() {
    let dir = common::create_temp_dir().unwrap();
    let input = common::create_test_resx(dir.path(), "Strings.resx", &[("a", Some("x"))]).unwrap();

    let orchestrator =
        Orchestrator::with_translator(common::test_config(), Arc::new(MockTranslator::uppercase()), CancellationFlag::new());
    let preview = orchestrator.preview(FileType::Resx, &input).await.unwrap();

    assert!(preview.contains("X"));
    assert!(!dir.path().join("Strings.DE.resx").exists());
}

#[tokio::test]
async fn test_orchestrator_previewScan_shouldReportMatchCount() {
    let dir = common::create_temp_dir().unwrap();
    common::create_test_file(dir.path(), "a/zh-cn.ts", "export default { a: 1 };").unwrap();
    common::create_test_file(dir.path(), "b/zh-cn.ts", "export default { b: 2 };").unwrap();

    let orchestrator =
        Orchestrator::with_translator(common::test_config(), Arc::new(MockTranslator::uppercase()), CancellationFlag::new());
    let preview = orchestrator.preview_scan(dir.path(), "zh-cn.ts").await.unwrap();

    assert!(preview.contains("Found 2 matching files"));
    assert!(preview.contains("export default { a: 1 };"));
}

#[tokio::test]
async fn test_controller_checkConnection_withInvalidConfig_shouldFail() {
    let controller = Controller::with_config(Config::default()).unwrap();
    assert!(controller.check_connection().await.is_err());
}

#[test]
fn test_controller_previewWithInvalidConfig_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    let input = common::create_test_resx(dir.path(), "Strings.resx", &[("a", Some("x"))]).unwrap();

    let controller = Controller::with_config(Config::default()).unwrap();
    let result = tokio_test::block_on(async { controller.preview(FileType::Resx, &input).await });
    assert!(result.is_err());
}

#[tokio::test]
async fn test_controller_checkConnection_withDeepLx_shouldReturnTranslation() {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/translate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "code": 200,
            "data": "Hallo, Welt!"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = common::test_config();
    config.deeplx_url = server.uri();
    let controller = Controller::with_config(config).unwrap();

    assert_eq!(controller.check_connection().await.unwrap(), "Hallo, Welt!");
}

#[tokio::test]
async fn test_controller_run_withMissingInput_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    let controller = Controller::with_config(common::test_config()).unwrap();

    let job = JobKind::ResxFile {
        input: dir.path().join("Missing.resx"),
        output: None,
    };
    let error = controller.run(job).await.unwrap_err();
    assert!(error.to_string().contains("does not exist"));
}
