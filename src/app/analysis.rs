// LogLens - app/analysis.rs
//
// The ingestion pipeline: read a file as text, parse it into records and
// derive the dashboard views.

use crate::core::aggregate::LogAggregator;
use crate::core::model::{FileDescriptor, LogRecord, SeverityCount, SummaryMetrics, TimeBucket};
use crate::core::parser;
use crate::util::error::ReadError;
use serde::Serialize;
use std::path::Path;

/// Everything the dashboard renders for one file.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub file_name: String,
    pub summary: SummaryMetrics,
    pub time_series: Vec<TimeBucket>,
    pub severity_distribution: Vec<SeverityCount>,
    /// First records in input order.
    pub preview: Vec<LogRecord>,
}

impl AnalysisReport {
    /// Derive all views from `records`.
    pub fn build(file_name: &str, records: &[LogRecord], preview_rows: usize) -> Self {
        let agg = LogAggregator::new(records);
        Self {
            file_name: file_name.to_string(),
            summary: agg.summary_metrics(),
            time_series: agg.time_series(),
            severity_distribution: agg.severity_distribution(),
            preview: agg.preview(preview_rows).to_vec(),
        }
    }
}

/// Read the full content of a file as text.
///
/// Invalid UTF-8 is replaced rather than rejected, so binary noise in a log
/// still yields records.
pub fn read_text(path: &Path) -> Result<String, ReadError> {
    Ok(String::from_utf8_lossy(&read_bytes(path)?).into_owned())
}

/// Read the raw bytes of a regular file.
pub fn read_bytes(path: &Path) -> Result<Vec<u8>, ReadError> {
    check_regular_file(path)?;
    std::fs::read(path).map_err(|source| ReadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Describe the file at `path` the way a browser file picker would.
///
/// The download reference is the canonical path, so the original bytes can
/// be fetched again while the file stays in place.
pub fn describe_file(path: &Path) -> Result<FileDescriptor, ReadError> {
    let meta = check_regular_file(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let download_ref = std::fs::canonicalize(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string();

    Ok(FileDescriptor {
        name,
        size: meta.len(),
        download_ref,
    })
}

fn check_regular_file(path: &Path) -> Result<std::fs::Metadata, ReadError> {
    let meta = std::fs::metadata(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ReadError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ReadError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    if !meta.is_file() {
        return Err(ReadError::NotAFile {
            path: path.to_path_buf(),
        });
    }
    Ok(meta)
}

/// Read, parse and aggregate the file at `path`.
///
/// Returns the parsed records alongside the report so callers can export them.
pub fn analyze_file(
    path: &Path,
    preview_rows: usize,
) -> Result<(Vec<LogRecord>, AnalysisReport), ReadError> {
    let text = read_text(path)?;
    let records = parser::parse(&text);
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let report = AnalysisReport::build(&file_name, &records, preview_rows);
    tracing::info!(
        file = %file_name,
        records = report.summary.total,
        errors = report.summary.errors,
        "Analysis complete"
    );
    Ok((records, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Severity;
    use tempfile::TempDir;

    #[test]
    fn test_analyze_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("auth.log");
        std::fs::write(
            &path,
            "2024-01-01T10:00:00 ERROR disk full\n\n2024-01-01T11:05:00 info ok\n",
        )
        .unwrap();

        let (records, report) = analyze_file(&path, 1).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(report.file_name, "auth.log");
        assert_eq!(report.summary.total, 2);
        assert_eq!(report.summary.success_rate_label(), "50.0%");
        assert_eq!(report.time_series.len(), 2);
        assert_eq!(report.preview.len(), 1);
        assert_eq!(report.preview[0].severity, Severity::Error);
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bin.log");
        std::fs::write(&path, b"ok INFO\n\xff\xfe WARN garbled\n").unwrap();
        let text = read_text(&path).unwrap();
        assert_eq!(parser::parse(&text).len(), 2);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let result = analyze_file(&dir.path().join("nope.log"), 10);
        assert!(matches!(result, Err(ReadError::NotFound { .. })));
    }

    #[test]
    fn test_directory_is_not_a_file() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            describe_file(dir.path()),
            Err(ReadError::NotAFile { .. })
        ));
    }

    #[test]
    fn test_describe_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Events.CSV");
        std::fs::write(&path, "a,b\n").unwrap();
        let file = describe_file(&path).unwrap();
        assert_eq!(file.name, "Events.CSV");
        assert_eq!(file.size, 4);
        assert_eq!(file.file_type(), "csv");
        assert!(file.download_ref.ends_with("Events.CSV"));
    }
}
