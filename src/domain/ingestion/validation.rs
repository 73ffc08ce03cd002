//! Batch validation for incoming files

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;
use crate::domain::document::to_mib;

/// Default per-file size limit (10 MiB)
pub const DEFAULT_MAX_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Default number of files accepted per batch
pub const DEFAULT_MAX_FILES: usize = 10;

/// MIME types accepted by default
pub const DEFAULT_ALLOWED_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "text/plain",
    "text/csv",
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
];

/// Reference to a candidate file: name, byte size and declared MIME type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRef {
    pub name: String,
    pub size: u64,
    pub mime_type: String,
}

impl FileRef {
    pub fn new(name: impl Into<String>, size: u64, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size,
            mime_type: mime_type.into(),
        }
    }
}

/// Limits applied to every submitted batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub max_size_bytes: u64,
    pub allowed_mime_types: HashSet<String>,
    pub max_files: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
            allowed_mime_types: DEFAULT_ALLOWED_MIME_TYPES
                .iter()
                .map(|m| m.to_string())
                .collect(),
            max_files: DEFAULT_MAX_FILES,
        }
    }
}

impl ValidationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_size_bytes(mut self, max_size_bytes: u64) -> Self {
        self.max_size_bytes = max_size_bytes;
        self
    }

    pub fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }

    pub fn with_allowed_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.allowed_mime_types.insert(mime_type.into().to_lowercase());
        self
    }

    /// Check a declared MIME type against the allow-list, ignoring case and
    /// parameters such as `; charset=utf-8`
    pub fn is_allowed(&self, mime_type: &str) -> bool {
        let essence = mime_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        self.allowed_mime_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&essence))
    }

    /// Sanity check for configured limits
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.max_files == 0 {
            return Err(DomainError::configuration("max_files must be greater than 0"));
        }

        if self.max_size_bytes == 0 {
            return Err(DomainError::configuration(
                "max_size_bytes must be greater than 0",
            ));
        }

        if self.allowed_mime_types.is_empty() {
            return Err(DomainError::configuration(
                "allowed_mime_types cannot be empty",
            ));
        }

        Ok(())
    }
}

/// Outcome of validating one batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub accepted: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Validate a batch of files.
///
/// Every rule runs regardless of earlier failures so that all violations are
/// reported together. Warnings never affect `accepted`.
pub fn validate(files: &[FileRef], config: &ValidationConfig) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if files.len() > config.max_files {
        errors.push(format!(
            "Too many files: a maximum of {} files can be uploaded at once, {} were submitted",
            config.max_files,
            files.len()
        ));
    }

    let mut seen: HashMap<&str, usize> = HashMap::new();

    for file in files {
        if file.name.trim().is_empty() {
            errors.push(format!("File name cannot be empty ('{}')", file.name));
        }

        if file.size > config.max_size_bytes {
            errors.push(format!(
                "File '{}' is too large ({:.1} MB). Maximum size is {:.1} MB",
                file.name,
                to_mib(file.size),
                to_mib(config.max_size_bytes)
            ));
        }

        if !config.is_allowed(&file.mime_type) {
            errors.push(format!(
                "File '{}' has unsupported type '{}'",
                file.name, file.mime_type
            ));
        }

        let occurrences = seen.entry(file.name.as_str()).or_insert(0);
        *occurrences += 1;

        if *occurrences > 1 {
            warnings.push(format!(
                "Duplicate file name '{}' in this upload",
                file.name
            ));
        }
    }

    ValidationResult {
        accepted: errors.is_empty(),
        errors,
        warnings,
    }
}
