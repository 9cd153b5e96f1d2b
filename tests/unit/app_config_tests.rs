/*!
 * Tests for configuration defaults, key updates and validation
 */

use restrans::app_config::{Config, FileType, LogLevel, TranslationProvider};

use crate::common;

#[test]
fn test_default_shouldUseDocumentedValues() {
    let config = Config::default();

    assert_eq!(config.provider, TranslationProvider::DeepLx);
    assert_eq!(config.chat_base_url, "http://localhost:3000/api");
    assert_eq!(config.chat_model, "gemma3:27b");
    assert_eq!(config.target_language, "English");
    assert_eq!(config.batch_size, 5);
    assert_eq!(config.last_file_type, FileType::Resx);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(!config.enable_logging);
    assert!(config.text_file_prompt.contains("{target_language}"));
}

#[test]
fn test_load_withMissingFile_shouldReturnDefaults() {
    let dir = common::create_temp_dir().unwrap();
    let config = Config::load(dir.path().join("nope.json"));
    assert_eq!(config, Config::default());
}

#[test]
fn test_saveThenLoad_shouldKeepChangedKeys() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("nested").join("config.json");

    let mut config = Config::default();
    config.provider = TranslationProvider::Chat;
    config.chat_api_key = "sk-test".to_string();
    config.last_file_type = FileType::Text;
    config.save(&path).unwrap();

    let loaded = Config::load(&path);
    assert_eq!(loaded, config);
}

#[test]
fn test_validate_deeplxWithoutUrl_shouldFail() {
    let error = Config::default().validate().unwrap_err();
    assert!(error.to_string().contains("DeepLX URL"));
}

#[test]
fn test_validate_deeplxWithUrl_shouldPass() {
    assert!(common::test_config().validate().is_ok());
}

#[test]
fn test_validate_chatWithoutKey_shouldFail() {
    let config = Config {
        provider: TranslationProvider::Chat,
        ..Config::default()
    };
    let error = config.validate().unwrap_err();
    assert!(error.to_string().contains("API key"));
}

#[test]
fn test_validate_withZeroBatchSize_shouldFail() {
    let mut config = common::test_config();
    config.batch_size = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withNonHttpUrl_shouldFail() {
    let mut config = common::test_config();
    config.deeplx_url = "ftp://example.com".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_setValue_shouldParseTypedKeys() {
    let mut config = Config::default();

    config.set_value("provider", "chatgpt").unwrap();
    config.set_value("batch_size", "12").unwrap();
    config.set_value("enable_logging", "true").unwrap();
    config.set_value("last_file_type", "ts").unwrap();

    assert_eq!(config.provider, TranslationProvider::Chat);
    assert_eq!(config.batch_size, 12);
    assert!(config.enable_logging);
    assert_eq!(config.last_file_type, FileType::Text);
}

#[test]
fn test_setValue_withUnknownKeyOrBadValue_shouldFail() {
    let mut config = Config::default();
    assert!(config.set_value("colour", "blue").is_err());
    assert!(config.set_value("batch_size", "many").is_err());
    assert!(config.set_value("provider", "babelfish").is_err());
}

#[test]
fn test_redacted_shouldHideApiKey() {
    let mut config = Config::default();
    config.chat_api_key = "sk-very-secret".to_string();

    let shown = serde_json::to_string(&config.redacted()).unwrap();

    assert!(!shown.contains("sk-very-secret"));
    assert!(shown.contains("********"));
}

#[test]
fn test_rememberFileType_withoutConfigFile_shouldNotCreateIt() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("restrans.json");

    assert!(!Config::remember_file_type(&path, FileType::Text).unwrap());
    assert!(!path.exists());
}

#[test]
fn test_rememberFileType_withExistingFile_shouldUpdateOnlyThatKey() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("restrans.json");
    let mut config = Config::default();
    config.batch_size = 9;
    config.save(&path).unwrap();

    assert!(Config::remember_file_type(&path, FileType::Text).unwrap());
    assert!(!Config::remember_file_type(&path, FileType::Text).unwrap());

    let reloaded = Config::load(&path);
    assert_eq!(reloaded.last_file_type, FileType::Text);
    assert_eq!(reloaded.batch_size, 9);
}
