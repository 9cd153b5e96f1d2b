/*!
 * Tests for the target language table
 */

use restrans::language_utils::{
    get_language_code, get_language_file_code, resolve_target_language, supported_languages,
};

#[test]
fn test_supportedLanguages_shouldListFifteen() {
    let languages = supported_languages();
    assert_eq!(languages.len(), 15);
    assert_eq!(languages[0], "English");
    assert!(languages.contains(&"Ukrainian"));
}

#[test]
fn test_getLanguageCode_shouldReturnProviderCodes() {
    assert_eq!(get_language_code("English"), "EN");
    assert_eq!(get_language_code("Simplified Chinese"), "ZH");
    assert_eq!(get_language_code("Traditional Chinese"), "ZH-TW");
    assert_eq!(get_language_code("Japanese"), "JA");
}

#[test]
fn test_getLanguageFileCode_shouldReturnLowercaseCodes() {
    assert_eq!(get_language_file_code("Simplified Chinese"), "zh-cn");
    assert_eq!(get_language_file_code("Korean"), "ko");
}

#[test]
fn test_resolve_withTableCode_shouldFindLanguage() {
    let language = resolve_target_language("zh-cn");
    assert_eq!(language.name, "Simplified Chinese");
    assert_eq!(language.provider_code, "ZH");
}

#[test]
fn test_resolve_withIsoCodeOutsideTable_shouldUseIsolang() {
    let language = resolve_target_language("sv");
    assert_eq!(language.name, "Swedish");
    assert_eq!(language.provider_code, "SV");
    assert_eq!(language.file_code, "sv");
}

#[test]
fn test_resolve_withUnknownName_shouldFallBackToEnglishCodes() {
    let language = resolve_target_language("Klingon");
    assert_eq!(language.provider_code, "EN");
    assert_eq!(language.file_code, "en");
    assert_eq!(language.name, "Klingon");
}
