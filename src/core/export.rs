// LogLens - core/export.rs
//
// CSV export of parsed records and JSON export of an analysis report.
// Core layer: writes to any Write trait object.

use crate::core::model::LogRecord;
use crate::util::constants::MAX_EXPORT_RECORDS;
use crate::util::error::ExportError;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Export records to CSV.
///
/// Writes: line, timestamp, timestamp_inferred, severity, message
pub fn export_csv<W: Write>(
    records: &[LogRecord],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    if records.len() > MAX_EXPORT_RECORDS {
        return Err(ExportError::TooManyRecords {
            count: records.len(),
            max: MAX_EXPORT_RECORDS,
        });
    }

    let csv_err = |source: csv::Error| ExportError::Csv {
        path: export_path.to_path_buf(),
        source,
    };

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(["line", "timestamp", "timestamp_inferred", "severity", "message"])
        .map_err(csv_err)?;

    for record in records {
        csv_writer
            .write_record([
                record.line_number.to_string().as_str(),
                record.timestamp.format("%Y-%m-%dT%H:%M:%S").to_string().as_str(),
                if record.timestamp_inferred { "true" } else { "false" },
                record.severity.label(),
                record.message.as_str(),
            ])
            .map_err(csv_err)?;
    }

    csv_writer.flush().map_err(|source| ExportError::Io {
        path: export_path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %export_path.display(), records = records.len(), "CSV export complete");
    Ok(records.len())
}

/// Export any serialisable report as pretty-printed JSON.
pub fn export_json<W: Write, T: Serialize + ?Sized>(
    report: &T,
    writer: W,
    export_path: &Path,
) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(writer, report).map_err(|source| ExportError::Json {
        path: export_path.to_path_buf(),
        source,
    })
}
