//! Reads an Antro source file into memory after validating it against the
//! compile-time limits

use crate::config::compile_time::file_processing::{MAX_FILE_SIZE, MAX_LINE_COUNT};
use crate::config::runtime::FileProcessorPreferences;
use crate::logging::codes;
use crate::{log_debug, log_error, log_success};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

/// Extension expected on Antro sources
pub const ANTRO_EXTENSION: &str = "antro";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FileProcessorError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid file extension: expected .antro, found {extension:?}")]
    InvalidExtension { extension: Option<String> },

    #[error("File too large: {size} bytes (max: {max_size})")]
    FileTooLarge { size: u64, max_size: u64 },

    #[error("File is empty")]
    EmptyFile,

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("Invalid UTF-8 encoding in file: {path}")]
    InvalidEncoding { path: String },

    #[error("I/O error reading file: {message}")]
    IoError { message: String },

    #[error("Invalid file path: {path}")]
    InvalidPath { path: String },

    #[error("File exceeds maximum line count: {lines} (max: {max_lines})")]
    TooManyLines { lines: usize, max_lines: usize },
}

impl FileProcessorError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            Self::FileNotFound { .. } => codes::file_processing::FILE_NOT_FOUND,
            Self::InvalidExtension { .. } => codes::file_processing::INVALID_EXTENSION,
            Self::FileTooLarge { .. } => codes::file_processing::FILE_TOO_LARGE,
            Self::EmptyFile => codes::file_processing::EMPTY_FILE,
            Self::PermissionDenied { .. } => codes::file_processing::PERMISSION_DENIED,
            Self::InvalidEncoding { .. } => codes::file_processing::INVALID_ENCODING,
            Self::IoError { .. } => codes::file_processing::IO_ERROR,
            Self::InvalidPath { .. } => codes::file_processing::INVALID_PATH,
            Self::TooManyLines { .. } => codes::file_processing::TOO_MANY_LINES,
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }

    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.error_code().as_str()).as_str()
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.error_code().as_str())
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }

    fn from_io(error: std::io::Error, path: &Path) -> Self {
        match error.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                path: path.display().to_string(),
            },
            std::io::ErrorKind::InvalidData => Self::InvalidEncoding {
                path: path.display().to_string(),
            },
            std::io::ErrorKind::NotFound => Self::FileNotFound {
                path: path.display().to_string(),
            },
            _ => Self::IoError {
                message: format!("'{}': {}", path.display(), error),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileMetadata {
    /// Canonical file path
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Lowercased extension, if any
    pub extension: Option<String>,
    pub line_count: usize,
    pub is_antro_file: bool,
    pub modified: Option<SystemTime>,
}

impl FileMetadata {
    pub fn human_readable_size(&self) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
        let mut size = self.size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", self.size, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }

    /// Name used to label diagnostics for this file
    pub fn source_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Source text plus what was learned while reading it
#[derive(Debug, Clone)]
pub struct FileProcessingResult {
    pub source: String,
    pub metadata: FileMetadata,
    pub processing_duration: Duration,
}

impl FileProcessingResult {
    pub fn char_count(&self) -> usize {
        self.source.chars().count()
    }

    /// Only whitespace in the file
    pub fn is_effectively_empty(&self) -> bool {
        self.source.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct FileProcessor {
    preferences: FileProcessorPreferences,
}

impl FileProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_preferences(preferences: &FileProcessorPreferences) -> Self {
        Self {
            preferences: preferences.clone(),
        }
    }

    pub fn with_antro_extension_required(mut self, required: bool) -> Self {
        self.preferences.require_antro_extension = required;
        self
    }

    pub fn preferences(&self) -> &FileProcessorPreferences {
        &self.preferences
    }

    pub fn max_file_size() -> u64 {
        MAX_FILE_SIZE
    }

    /// Validate and read the file at `file_path`
    pub fn process_file(
        &self,
        file_path: impl AsRef<Path>,
    ) -> Result<FileProcessingResult, FileProcessorError> {
        let start_time = Instant::now();
        let file_path = file_path.as_ref();
        let display = file_path.display().to_string();

        log_debug!("Starting file processing", "file" => display);

        let result = self.read_validated(file_path, start_time);
        match &result {
            Ok(processed) => self.log_processing_success(processed, &display),
            Err(error) => {
                log_error!(error.error_code(), "File processing failed",
                    "file" => display,
                    "error" => error
                );
            }
        }
        result
    }

    fn read_validated(
        &self,
        file_path: &Path,
        start_time: Instant,
    ) -> Result<FileProcessingResult, FileProcessorError> {
        let path = self.validate_path(file_path)?;
        let mut metadata = self.collect_metadata(&path)?;
        self.validate_file(&metadata)?;

        let source =
            fs::read_to_string(&path).map_err(|e| FileProcessorError::from_io(e, &path))?;

        let line_count = source.lines().count();
        if line_count > MAX_LINE_COUNT {
            return Err(FileProcessorError::TooManyLines {
                lines: line_count,
                max_lines: MAX_LINE_COUNT,
            });
        }
        metadata.line_count = line_count;

        Ok(FileProcessingResult {
            source,
            metadata,
            processing_duration: start_time.elapsed(),
        })
    }

    fn validate_path(&self, file_path: &Path) -> Result<PathBuf, FileProcessorError> {
        if file_path.as_os_str().is_empty() {
            return Err(FileProcessorError::InvalidPath {
                path: String::new(),
            });
        }
        if !file_path.exists() {
            return Err(FileProcessorError::FileNotFound {
                path: file_path.display().to_string(),
            });
        }
        if !file_path.is_file() {
            return Err(FileProcessorError::InvalidPath {
                path: file_path.display().to_string(),
            });
        }

        file_path
            .canonicalize()
            .map_err(|e| FileProcessorError::from_io(e, file_path))
    }

    fn collect_metadata(&self, path: &Path) -> Result<FileMetadata, FileProcessorError> {
        let metadata = fs::metadata(path).map_err(|e| FileProcessorError::from_io(e, path))?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|s| s.to_lowercase());
        let is_antro_file = extension.as_deref() == Some(ANTRO_EXTENSION);

        Ok(FileMetadata {
            path: path.to_path_buf(),
            size: metadata.len(),
            extension,
            line_count: 0,
            is_antro_file,
            modified: metadata.modified().ok(),
        })
    }

    fn validate_file(&self, metadata: &FileMetadata) -> Result<(), FileProcessorError> {
        if metadata.size > MAX_FILE_SIZE {
            return Err(FileProcessorError::FileTooLarge {
                size: metadata.size,
                max_size: MAX_FILE_SIZE,
            });
        }
        if metadata.size == 0 {
            return Err(FileProcessorError::EmptyFile);
        }
        if self.preferences.require_antro_extension && !metadata.is_antro_file {
            return Err(FileProcessorError::InvalidExtension {
                extension: metadata.extension.clone(),
            });
        }
        Ok(())
    }

    fn log_processing_success(&self, result: &FileProcessingResult, file_path: &str) {
        if self.preferences.enable_performance_logging {
            log_success!(codes::success::FILE_PROCESSING_SUCCESS, "File processed",
                "file" => file_path,
                "size" => result.metadata.human_readable_size(),
                "lines" => result.metadata.line_count,
                "chars" => result.char_count(),
                "duration_ms" => format!("{:.2}", result.processing_duration.as_secs_f64() * 1000.0)
            );
        } else {
            log_success!(codes::success::FILE_PROCESSING_SUCCESS, "File processed",
                "file" => file_path,
                "lines" => result.metadata.line_count
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_process_valid_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("main.antro");
        let content = "begin:\nend;\n";
        fs::write(&file_path, content).unwrap();

        let result = FileProcessor::new().process_file(&file_path).unwrap();
        assert_eq!(result.source, content);
        assert_eq!(result.metadata.line_count, 2);
        assert!(result.metadata.is_antro_file);
        assert_eq!(result.metadata.source_name(), "main.antro");
        assert_eq!(result.char_count(), content.chars().count());
        assert!(!result.is_effectively_empty());
    }

    #[test]
    fn test_file_not_found() {
        let dir = tempdir().unwrap();
        let err = FileProcessor::new()
            .process_file(dir.path().join("missing.antro"))
            .unwrap_err();
        assert_matches!(err, FileProcessorError::FileNotFound { .. });
    }

    #[test]
    fn test_directory_is_invalid_path() {
        let dir = tempdir().unwrap();
        let err = FileProcessor::new().process_file(dir.path()).unwrap_err();
        assert_matches!(err, FileProcessorError::InvalidPath { .. });

        let err = FileProcessor::new().process_file("").unwrap_err();
        assert_matches!(err, FileProcessorError::InvalidPath { .. });
    }

    #[test]
    fn test_file_size_limit() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("large.antro");
        fs::write(&file_path, "a".repeat((MAX_FILE_SIZE + 1) as usize)).unwrap();

        let err = FileProcessor::new().process_file(&file_path).unwrap_err();
        assert_matches!(err, FileProcessorError::FileTooLarge { max_size, .. } if max_size == MAX_FILE_SIZE);
    }

    #[test]
    fn test_extension_requirement() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("main.txt");
        fs::write(&file_path, "begin: end;").unwrap();

        let err = FileProcessor::new()
            .with_antro_extension_required(true)
            .process_file(&file_path)
            .unwrap_err();
        assert_eq!(
            err,
            FileProcessorError::InvalidExtension {
                extension: Some("txt".to_string())
            }
        );

        let lenient = FileProcessor::new().with_antro_extension_required(false);
        assert!(lenient.process_file(&file_path).is_ok());
    }

    #[test]
    fn test_empty_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("empty.antro");
        fs::write(&file_path, "").unwrap();

        let err = FileProcessor::new().process_file(&file_path).unwrap_err();
        assert_eq!(err, FileProcessorError::EmptyFile);
    }

    #[test]
    fn test_invalid_utf8() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("binary.antro");
        fs::write(&file_path, [0xff, 0xfe, 0x00]).unwrap();

        let err = FileProcessor::new().process_file(&file_path).unwrap_err();
        assert_matches!(err, FileProcessorError::InvalidEncoding { .. });
    }

    #[test]
    fn test_too_many_lines() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("long.antro");
        fs::write(&file_path, ";\n".repeat(MAX_LINE_COUNT + 1)).unwrap();

        let err = FileProcessor::new().process_file(&file_path).unwrap_err();
        assert_matches!(err, FileProcessorError::TooManyLines { max_lines, .. } if max_lines == MAX_LINE_COUNT);
        assert_eq!(err.error_code(), codes::file_processing::TOO_MANY_LINES);
    }

    #[test]
    fn test_error_methods() {
        let error = FileProcessorError::FileNotFound {
            path: "main.antro".to_string(),
        };
        assert_eq!(error.error_code().as_str(), "E005");
        assert_eq!(error.category(), "FileProcessing");
        assert_eq!(error.severity(), "Medium");
        assert!(!error.is_recoverable());
        assert!(error.requires_halt());
    }

    #[test]
    fn test_human_readable_size() {
        let metadata = FileMetadata {
            path: PathBuf::from("a.antro"),
            size: 2048,
            extension: Some("antro".to_string()),
            line_count: 1,
            is_antro_file: true,
            modified: None,
        };
        assert_eq!(metadata.human_readable_size(), "2.00 KB");
    }
}
