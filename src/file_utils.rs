use anyhow::{Context, Result, anyhow};
use glob::Pattern;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Output path for a translated resource file: `<dir>/<stem>.<CODE><ext>`
    pub fn resx_output_path<P: AsRef<Path>>(input_file: P, language_code: &str) -> PathBuf {
        let input_file = input_file.as_ref();
        let stem = input_file.file_stem().unwrap_or_default().to_string_lossy();

        let mut output_filename = format!("{}.{}", stem, language_code);
        if let Some(ext) = input_file.extension() {
            output_filename.push('.');
            output_filename.push_str(&ext.to_string_lossy());
        }

        input_file.with_file_name(output_filename)
    }

    /// Output path for a whole-document translation: `<dir>/<code><ext>`.
    ///
    /// `output_dir` overrides the input's own directory when given.
    pub fn text_output_path<P: AsRef<Path>>(
        input_file: P,
        file_code: &str,
        output_dir: Option<&Path>,
    ) -> PathBuf {
        let input_file = input_file.as_ref();

        let mut output_filename = file_code.to_string();
        if let Some(ext) = input_file.extension() {
            output_filename.push('.');
            output_filename.push_str(&ext.to_string_lossy());
        }

        match output_dir {
            Some(dir) => dir.join(output_filename),
            None => input_file.with_file_name(output_filename),
        }
    }

    /// Recursively find files whose name (or path relative to `dir`) matches a glob pattern.
    ///
    /// Results are sorted so repeated scans visit files in the same order.
    pub fn find_matching_files<P: AsRef<Path>>(dir: P, pattern: &str) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        if !Self::dir_exists(dir) {
            return Err(anyhow!("Directory does not exist: {:?}", dir));
        }

        let matcher = Pattern::new(pattern)
            .with_context(|| format!("Invalid filename pattern: {}", pattern))?;

        let mut result = Vec::new();
        for entry in WalkDir::new(dir).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            let name_matches = path
                .file_name()
                .map(|name| matcher.matches(&name.to_string_lossy()))
                .unwrap_or(false);
            let relative_matches = path
                .strip_prefix(dir)
                .map(|relative| matcher.matches_path(relative))
                .unwrap_or(false);

            if name_matches || relative_matches {
                result.push(path.to_path_buf());
            }
        }

        result.sort();
        Ok(result)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Write a file through a temporary sibling so readers never see a partial file
    pub fn write_atomic<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let path = path.as_ref();
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Self::ensure_dir(&parent)?;

        let mut temp = tempfile::NamedTempFile::new_in(&parent)
            .with_context(|| format!("Failed to create temporary file in {:?}", parent))?;
        temp.write_all(content.as_bytes())
            .with_context(|| format!("Failed to write temporary file for {:?}", path))?;
        temp.persist(path)
            .map_err(|e| anyhow!("Failed to write to file {:?}: {}", path, e.error))?;

        Ok(())
    }
}
