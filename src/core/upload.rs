// LogLens - core/upload.rs
//
// Upload gate: decides whether a selected file may be sent to the analysis
// service, and normalises chat queries before they are sent.

use crate::core::model::FileDescriptor;
use crate::util::constants;
use crate::util::error::UploadError;

/// Limits applied to files before upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    /// Maximum accepted file size in bytes (inclusive).
    pub max_size_bytes: u64,

    /// Lowercase extensions without the dot.
    pub accepted_extensions: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_size_bytes: constants::DEFAULT_MAX_UPLOAD_SIZE,
            accepted_extensions: constants::DEFAULT_ACCEPTED_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

impl UploadPolicy {
    /// Check `file` against the policy. Type is checked before size.
    ///
    /// The type is `FileDescriptor::file_type`, so a bare name such as `log`
    /// is treated as its own extension.
    pub fn check(&self, file: &FileDescriptor) -> Result<(), UploadError> {
        let extension = file.file_type();

        if !self.accepted_extensions.iter().any(|e| *e == extension) {
            return Err(UploadError::UnsupportedType {
                file_name: file.name.clone(),
                extension,
                accepted: self.accepted_extensions.clone(),
            });
        }

        if file.size > self.max_size_bytes {
            return Err(UploadError::TooLarge {
                file_name: file.name.clone(),
                size: file.size,
                max_size: self.max_size_bytes,
            });
        }

        Ok(())
    }
}

/// Trim a chat query; an empty result is rejected.
pub fn validate_query(query: &str) -> Result<&str, UploadError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        Err(UploadError::EmptyQuery)
    } else {
        Ok(trimmed)
    }
}
