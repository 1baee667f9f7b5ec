// LogLens - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "LogLens";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "LogLens";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Upload gate
// =============================================================================

/// Maximum size of an uploaded file in bytes.
pub const DEFAULT_MAX_UPLOAD_SIZE: u64 = 10 * 1024 * 1024; // 10 MB

/// Hard upper bound on the configurable upload size.
pub const ABSOLUTE_MAX_UPLOAD_SIZE: u64 = 512 * 1024 * 1024; // 512 MB

/// Lowercase file extensions (without the dot) accepted for upload.
pub const DEFAULT_ACCEPTED_EXTENSIONS: &[&str] = &["csv", "log", "txt", "md"];

// =============================================================================
// Analysis
// =============================================================================

/// Number of records shown in the "recent entries" preview.
pub const DEFAULT_PREVIEW_ROWS: usize = 10;

/// Upper bound on the configurable preview size.
pub const ABSOLUTE_MAX_PREVIEW_ROWS: usize = 1_000;

/// Hours in a day; time buckets are keyed `0..HOURS_PER_DAY`.
pub const HOURS_PER_DAY: u32 = 24;

/// Placeholder rendered for metrics that are undefined on empty input.
pub const NOT_AVAILABLE: &str = "N/A";

// =============================================================================
// History ledger
// =============================================================================

/// File name of the ledger slot in the platform data directory.
pub const LEDGER_FILE_NAME: &str = "chatHistory.json";

/// Messages recorded per completed chat turn (question + answer).
pub const MESSAGES_PER_TURN: u32 = 2;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Maximum length of a log line included in debug output.
/// Prevents accidental exposure of sensitive data in long lines.
pub const DEBUG_MAX_LINE_PREVIEW: usize = 200;

// =============================================================================
// Export
// =============================================================================

/// Maximum number of records that can be exported in a single operation.
pub const MAX_EXPORT_RECORDS: usize = 5_000_000;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
