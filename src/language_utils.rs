use isolang::Language;
use log::warn;

/// Language utilities for target language handling
///
/// Target languages are chosen by display name ("English", "Japanese", ...).
/// Each one maps to the code the DeepLX endpoint expects and to the lowercase
/// code used when naming translated output files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetLanguage {
    /// Display name passed to chat providers
    pub name: String,
    /// Uppercase code sent to DeepLX (`EN`, `ZH-TW`, ...)
    pub provider_code: String,
    /// Lowercase code used in output file names (`en`, `zh-cn`, ...)
    pub file_code: String,
}

/// (display name, provider code, file code)
const LANGUAGES: &[(&str, &str, &str)] = &[
    ("English", "EN", "en"),
    ("Simplified Chinese", "ZH", "zh-cn"),
    ("Traditional Chinese", "ZH-TW", "zh-tw"),
    ("Japanese", "JA", "ja"),
    ("Korean", "KO", "ko"),
    ("German", "DE", "de"),
    ("French", "FR", "fr"),
    ("Spanish", "ES", "es"),
    ("Portuguese", "PT", "pt"),
    ("Italian", "IT", "it"),
    ("Russian", "RU", "ru"),
    ("Dutch", "NL", "nl"),
    ("Polish", "PL", "pl"),
    ("Thai", "TH", "th"),
    ("Ukrainian", "UK", "uk"),
];

/// Names of every language in the built-in table
pub fn supported_languages() -> Vec<&'static str> {
    LANGUAGES.iter().map(|(name, _, _)| *name).collect()
}

/// Resolve a display name or code into a target language.
///
/// Lookup order: table name, table provider/file code, then any ISO 639-1 code
/// known to isolang. Anything else resolves to English with a warning.
pub fn resolve_target_language(input: &str) -> TargetLanguage {
    let needle = input.trim();

    if let Some((name, provider_code, file_code)) = LANGUAGES.iter().find(|(name, provider_code, file_code)| {
        name.eq_ignore_ascii_case(needle)
            || provider_code.eq_ignore_ascii_case(needle)
            || file_code.eq_ignore_ascii_case(needle)
    }) {
        return TargetLanguage {
            name: name.to_string(),
            provider_code: provider_code.to_string(),
            file_code: file_code.to_string(),
        };
    }

    let lowered = needle.to_lowercase();
    if lowered.len() == 2 {
        if let Some(lang) = Language::from_639_1(&lowered) {
            return TargetLanguage {
                name: lang.to_name().to_string(),
                provider_code: lowered.to_uppercase(),
                file_code: lowered,
            };
        }
    }

    warn!("Unknown target language '{}', falling back to English codes", input);
    TargetLanguage {
        name: if needle.is_empty() { "English".to_string() } else { needle.to_string() },
        provider_code: "EN".to_string(),
        file_code: "en".to_string(),
    }
}

/// Uppercase code for DeepLX and for RESX output names
pub fn get_language_code(input: &str) -> String {
    resolve_target_language(input).provider_code
}

/// Lowercase code for whole-document output names
pub fn get_language_file_code(input: &str) -> String {
    resolve_target_language(input).file_code
}
