// LogLens - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// All errors preserve the causal chain for diagnostic logging.
//
// The parser and aggregator have no error type: they are total over their
// input. Errors only arise at the I/O and service boundaries.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all LogLens operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum LogLensError {
    /// Reading an input file failed.
    Read(ReadError),

    /// The upload gate rejected a file or query.
    Upload(UploadError),

    /// Persisting the history ledger failed.
    Ledger(LedgerError),

    /// The remote analysis service failed.
    Service(ServiceError),

    /// Export operation failed.
    Export(ExportError),
}

impl fmt::Display for LogLensError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(e) => write!(f, "Read error: {e}"),
            Self::Upload(e) => write!(f, "Upload rejected: {e}"),
            Self::Ledger(e) => write!(f, "History error: {e}"),
            Self::Service(e) => write!(f, "Service error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
        }
    }
}

impl std::error::Error for LogLensError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read(e) => Some(e),
            Self::Upload(e) => Some(e),
            Self::Ledger(e) => Some(e),
            Self::Service(e) => Some(e),
            Self::Export(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Read errors
// ---------------------------------------------------------------------------

/// Errors raised by the file-reading collaborator.
#[derive(Debug)]
pub enum ReadError {
    /// The path does not exist.
    NotFound { path: PathBuf },

    /// The path exists but is not a regular file.
    NotAFile { path: PathBuf },

    /// I/O error while reading the file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { path } => write!(f, "'{}' does not exist", path.display()),
            Self::NotAFile { path } => write!(f, "'{}' is not a regular file", path.display()),
            Self::Io { path, source } => {
                write!(f, "cannot read '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ReadError> for LogLensError {
    fn from(e: ReadError) -> Self {
        Self::Read(e)
    }
}

// ---------------------------------------------------------------------------
// Upload gate errors
// ---------------------------------------------------------------------------

/// Reasons the upload gate refuses a file or a chat query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    /// The file extension is not in the accepted list.
    UnsupportedType {
        file_name: String,
        extension: String,
        accepted: Vec<String>,
    },

    /// The file exceeds the maximum upload size.
    TooLarge {
        file_name: String,
        size: u64,
        max_size: u64,
    },

    /// The chat query is empty after trimming.
    EmptyQuery,
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedType {
                file_name,
                extension,
                accepted,
            } => write!(
                f,
                "'{file_name}' has unsupported type '.{extension}'. Accepted: {}",
                accepted
                    .iter()
                    .map(|ext| format!(".{ext}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Self::TooLarge {
                file_name,
                size,
                max_size,
            } => write!(
                f,
                "'{file_name}' is {size} bytes, exceeds maximum of {max_size} bytes"
            ),
            Self::EmptyQuery => f.write_str("query cannot be empty"),
        }
    }
}

impl std::error::Error for UploadError {}

impl From<UploadError> for LogLensError {
    fn from(e: UploadError) -> Self {
        Self::Upload(e)
    }
}

// ---------------------------------------------------------------------------
// Ledger errors
// ---------------------------------------------------------------------------

/// Errors writing the history ledger slot.
///
/// Reads never fail: a missing or corrupt slot is treated as an empty ledger.
#[derive(Debug)]
pub enum LedgerError {
    /// The ledger could not be serialised.
    Serialise { source: serde_json::Error },

    /// I/O error writing the ledger slot.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Serialise { source } => write!(f, "failed to serialise history: {source}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for LedgerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Serialise { source } => Some(source),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<LedgerError> for LogLensError {
    fn from(e: LedgerError) -> Self {
        Self::Ledger(e)
    }
}

// ---------------------------------------------------------------------------
// Service errors
// ---------------------------------------------------------------------------

/// Failures reported by the remote analysis service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The service could not be reached.
    Unavailable { reason: String },

    /// The service answered with a failure status.
    Rejected { status: u16, detail: String },
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable { reason } => write!(f, "service unavailable: {reason}"),
            Self::Rejected { status, detail } => {
                write!(f, "service rejected request ({status}): {detail}")
            }
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<ServiceError> for LogLensError {
    fn from(e: ServiceError) -> Self {
        Self::Service(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export file.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Export would exceed maximum record count.
    TooManyRecords { count: usize, max: usize },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
            Self::TooManyRecords { count, max } => write!(
                f,
                "Export of {count} records exceeds maximum of {max}"
            ),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ExportError> for LogLensError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Problems found while loading configuration.
///
/// Always reported as startup warnings; the application falls back to
/// defaults and keeps going.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for LogLens results.
pub type Result<T> = std::result::Result<T, LogLensError>;
