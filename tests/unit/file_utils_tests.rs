/*!
 * Tests for file and directory utilities
 */

use std::path::{Path, PathBuf};

use restrans::file_utils::FileManager;

use crate::common;

#[test]
fn test_resxOutputPath_shouldInsertCodeBeforeExtension() {
    let output = FileManager::resx_output_path("project/Resources/Strings.resx", "ZH-TW");
    assert_eq!(output, PathBuf::from("project/Resources/Strings.ZH-TW.resx"));
}

#[test]
fn test_textOutputPath_shouldUseCodeAsFileName() {
    let output = FileManager::text_output_path("src/locales/zh-cn.ts", "ja", None);
    assert_eq!(output, PathBuf::from("src/locales/ja.ts"));
}

#[test]
fn test_textOutputPath_withOutputDir_shouldUseIt() {
    let output = FileManager::text_output_path("src/locales/zh-cn.ts", "de", Some(Path::new("out")));
    assert_eq!(output, PathBuf::from("out/de.ts"));
}

#[test]
fn test_findMatchingFiles_shouldRecurseAndSort() {
    let dir = common::create_temp_dir().unwrap();
    common::create_test_file(dir.path(), "b/zh-cn.ts", "x").unwrap();
    common::create_test_file(dir.path(), "a/deep/zh-cn.ts", "x").unwrap();
    common::create_test_file(dir.path(), "a/en.ts", "x").unwrap();
    common::create_test_file(dir.path(), "notes.txt", "x").unwrap();

    let files = FileManager::find_matching_files(dir.path(), "zh-cn.ts").unwrap();

    assert_eq!(
        files,
        vec![dir.path().join("a/deep/zh-cn.ts"), dir.path().join("b/zh-cn.ts")]
    );
}

#[test]
fn test_findMatchingFiles_withWildcard_shouldMatchNames() {
    let dir = common::create_temp_dir().unwrap();
    common::create_test_file(dir.path(), "one.ts", "x").unwrap();
    common::create_test_file(dir.path(), "sub/two.ts", "x").unwrap();
    common::create_test_file(dir.path(), "three.js", "x").unwrap();

    let files = FileManager::find_matching_files(dir.path(), "*.ts").unwrap();
    assert_eq!(files.len(), 2);
}

#[test]
fn test_findMatchingFiles_withMissingDir_shouldFail() {
    assert!(FileManager::find_matching_files("definitely/not/here", "*.ts").is_err());
}

#[test]
fn test_writeAtomic_shouldCreateParentsAndReplaceContent() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("out/nested/file.txt");

    FileManager::write_atomic(&path, "first").unwrap();
    FileManager::write_atomic(&path, "second").unwrap();

    assert_eq!(FileManager::read_to_string(&path).unwrap(), "second");
    let leftovers = std::fs::read_dir(path.parent().unwrap()).unwrap().count();
    assert_eq!(leftovers, 1);
}
