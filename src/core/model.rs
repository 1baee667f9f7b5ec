// LogLens - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies.
//
// These types are the shared vocabulary across all layers.

use crate::util::constants::NOT_AVAILABLE;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Log Record (output of parsing)
// =============================================================================

/// One parsed line of a log file.
///
/// Every non-blank input line produces exactly one record; lines that carry
/// no recognisable structure still become records with default fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    /// 1-based line number in the raw text.
    pub line_number: usize,

    /// Local wall-clock time of the event. Parsed from the line when a
    /// known pattern is present, otherwise the time the parse started.
    pub timestamp: NaiveDateTime,

    /// True when `timestamp` is the parse-time fallback rather than a value
    /// found in the line.
    pub timestamp_inferred: bool,

    /// Severity token found in the line, `Info` when none matched.
    pub severity: Severity,

    /// The original line, untouched.
    pub message: String,
}

// =============================================================================
// Severity
// =============================================================================

/// Coarse log level, ordered from most to least severe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
}

impl Severity {
    /// Returns all variants in display order (most severe first).
    pub fn all() -> &'static [Severity] {
        &[
            Severity::Error,
            Severity::Warn,
            Severity::Info,
            Severity::Debug,
        ]
    }

    /// Uppercase token as it appears in logs and reports.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Error => "ERROR",
            Severity::Warn => "WARN",
            Severity::Info => "INFO",
            Severity::Debug => "DEBUG",
        }
    }

    /// Case-insensitive lookup of a literal severity token.
    pub fn from_token(token: &str) -> Option<Severity> {
        Severity::all()
            .iter()
            .copied()
            .find(|s| s.label().eq_ignore_ascii_case(token))
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Aggregated views
// =============================================================================

/// Record count for one hour of the day (0-23).
///
/// Records from different calendar days that share an hour land in the
/// same bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeBucket {
    pub hour: u32,
    pub count: usize,
}

impl TimeBucket {
    /// Chart axis label, e.g. `"9:00"`.
    pub fn label(&self) -> String {
        format!("{}:00", self.hour)
    }
}

/// Record count for one observed severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeverityCount {
    pub severity: Severity,
    pub count: usize,
}

/// Hour-of-day of the first and last record in input order.
///
/// `first` may be greater than `last`: this is positional, not min/max.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourRange {
    pub first: u32,
    pub last: u32,
}

impl std::fmt::Display for HourRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:00 - {}:00", self.first, self.last)
    }
}

/// Headline numbers for a record sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryMetrics {
    /// Number of records.
    pub total: usize,

    /// Number of `ERROR` records.
    pub errors: usize,

    /// `None` when there are no records.
    pub time_range: Option<HourRange>,

    /// Percentage of non-error records, rounded to one decimal place.
    /// `None` when there are no records.
    pub success_rate: Option<f64>,
}

impl SummaryMetrics {
    pub fn time_range_label(&self) -> String {
        self.time_range
            .map(|r| r.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    pub fn success_rate_label(&self) -> String {
        self.success_rate
            .map(|rate| format!("{rate:.1}%"))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }
}

// =============================================================================
// Files and history
// =============================================================================

/// Metadata of a user-selected file, as handed over by the file picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    /// File name including extension, without directories.
    pub name: String,

    /// Size in bytes.
    pub size: u64,

    /// Opaque handle from which the original bytes can be fetched again.
    pub download_ref: String,
}

impl FileDescriptor {
    /// Lowercase extension without the dot.
    ///
    /// A name without a dot yields the whole name lowercased.
    pub fn file_type(&self) -> String {
        self.name
            .rsplit('.')
            .next()
            .unwrap_or(&self.name)
            .to_lowercase()
    }
}

/// A persisted record of one upload/chat session.
///
/// Field names on the wire are camelCase; `timestamp` and `downloadUrl` are
/// accepted as aliases so ledgers written by older clients still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: u64,
    pub file_name: String,
    pub file_size: u64,
    pub file_type: String,
    #[serde(alias = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub message_count: u32,
    #[serde(default)]
    pub last_message: String,
    #[serde(alias = "downloadUrl", default)]
    pub download_ref: String,
}

/// Fields of a `HistoryEntry` that may change after creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryUpdate {
    pub message_count: Option<u32>,
    pub last_message: Option<String>,
}

impl HistoryUpdate {
    pub fn is_empty(&self) -> bool {
        self.message_count.is_none() && self.last_message.is_none()
    }
}
