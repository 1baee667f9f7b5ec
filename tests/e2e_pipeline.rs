// LogLens - tests/e2e_pipeline.rs
//
// End-to-end tests for the ingestion pipeline and the file-backed ledger.
//
// These tests exercise the real filesystem, real chrono timestamp parsing
// and real JSON persistence: a raw log file on disk becomes records, derived
// views and a CSV export; uploads become ledger entries that survive reopen.

use chrono::Timelike;
use loglens::app::analysis::{analyze_file, describe_file, read_text};
use loglens::core::aggregate::LogAggregator;
use loglens::core::export::export_csv;
use loglens::core::history::{HistoryLedger, LedgerStore};
use loglens::core::model::{HistoryUpdate, Severity, TimeBucket};
use loglens::core::parser;
use loglens::core::upload::UploadPolicy;
use loglens::platform::store::FileStore;
use loglens::util::error::UploadError;
use std::path::PathBuf;
use tempfile::TempDir;

// =============================================================================
// Helpers
// =============================================================================

/// Absolute path to the on-disk fixture files.
fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

// =============================================================================
// Pipeline E2E
// =============================================================================

/// The sample auth log has 7 non-blank lines, one without a timestamp.
#[test]
fn e2e_fixture_parses_every_non_blank_line() {
    let path = fixture("auth_sample.log");
    let text = read_text(&path).unwrap();
    let non_blank = text.lines().filter(|l| !l.trim().is_empty()).count();

    let records = parser::parse(&text);
    assert_eq!(records.len(), non_blank);
    assert_eq!(records.len(), 7);

    let severities: Vec<_> = records.iter().map(|r| r.severity).collect();
    assert_eq!(
        severities,
        vec![
            Severity::Info,
            Severity::Warn,
            Severity::Error,
            Severity::Debug,
            Severity::Error,
            Severity::Info,
            Severity::Info,
        ]
    );

    let inferred: Vec<_> = records
        .iter()
        .filter(|r| r.timestamp_inferred)
        .map(|r| r.line_number)
        .collect();
    assert_eq!(inferred, vec![7], "only the kernel line lacks a timestamp");
}

#[test]
fn e2e_fixture_report() {
    let (records, report) = analyze_file(&fixture("auth_sample.log"), 3).unwrap();

    assert_eq!(report.file_name, "auth_sample.log");
    assert_eq!(report.summary.total, 7);
    assert_eq!(report.summary.errors, 2);
    assert_eq!(report.summary.success_rate_label(), "71.4%");
    assert_eq!(report.summary.time_range_label(), "8:00 - 8:00");
    assert_eq!(report.preview.len(), 3);

    let dist_total: usize = report.severity_distribution.iter().map(|c| c.count).sum();
    assert_eq!(dist_total, report.summary.total);

    // Excluding the fallback-stamped kernel line, hours 8 and 9 remain.
    let dated: Vec<_> = records
        .iter()
        .filter(|r| !r.timestamp_inferred)
        .cloned()
        .collect();
    let series = LogAggregator::new(&dated).time_series();
    assert_eq!(
        series,
        vec![
            TimeBucket { hour: 8, count: 4 },
            TimeBucket { hour: 9, count: 2 },
        ]
    );

    let full = &report.time_series;
    assert!(full.windows(2).all(|w| w[0].hour < w[1].hour));
    let kernel_hour = records[5].timestamp.hour();
    assert!(full.iter().any(|b| b.hour == kernel_hour));
}

#[test]
fn e2e_csv_export_writes_one_row_per_record() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("records.csv");
    let (records, _) = analyze_file(&fixture("auth_sample.log"), 10).unwrap();

    let file = std::fs::File::create(&out).unwrap();
    let count = export_csv(&records, file, &out).unwrap();
    assert_eq!(count, 7);

    let mut reader = csv::Reader::from_path(&out).unwrap();
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 7);
    assert_eq!(&rows[2][3], "ERROR");
    assert_eq!(&rows[5][0], "7");
    assert_eq!(&rows[5][2], "true");
}

// =============================================================================
// Ledger E2E
// =============================================================================

#[test]
fn e2e_upload_history_lifecycle() {
    let dir = TempDir::new().unwrap();
    let ledger_path = dir.path().join("data").join("chatHistory.json");
    let policy = UploadPolicy::default();

    let first = describe_file(&fixture("auth_sample.log")).unwrap();
    policy.check(&first).unwrap();

    let notes = dir.path().join("notes.md");
    std::fs::write(&notes, "# triage notes\n").unwrap();
    let second = describe_file(&notes).unwrap();

    let (a, b) = {
        let mut ledger = HistoryLedger::new(FileStore::new(&ledger_path));
        let a = ledger.create(&first).unwrap();
        let b = ledger.create(&second).unwrap();
        ledger
            .update(
                a.id,
                HistoryUpdate {
                    message_count: Some(2),
                    last_message: Some("Two failed logins from 203.0.113.9".to_string()),
                },
            )
            .unwrap();
        (a, b)
    };

    // Reopen from disk: newest first, update applied.
    let mut ledger = HistoryLedger::new(FileStore::new(&ledger_path));
    let list = ledger.list();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].id, b.id);
    assert_eq!(list[0].file_type, "md");
    assert_eq!(list[0].message_count, 0);
    assert_eq!(list[1].id, a.id);
    assert_eq!(list[1].message_count, 2);
    assert_eq!(list[1].file_type, "log");

    ledger.update(u64::MAX, HistoryUpdate::default()).unwrap();
    assert_eq!(ledger.list(), list);

    ledger.delete(a.id).unwrap();
    let after = ledger.list();
    assert_eq!(after.len(), list.len() - 1);
    assert_eq!(after[0].id, b.id);
}

#[test]
fn e2e_corrupt_ledger_file_resets_to_empty() {
    let dir = TempDir::new().unwrap();
    let ledger_path = dir.path().join("chatHistory.json");
    std::fs::write(&ledger_path, "[{\"id\": \"not a number\"").unwrap();

    let store = FileStore::new(&ledger_path);
    assert!(store.load().is_empty());

    let mut ledger = HistoryLedger::new(store);
    let file = describe_file(&fixture("auth_sample.log")).unwrap();
    ledger.create(&file).unwrap();
    assert_eq!(ledger.list().len(), 1);
}

#[test]
fn e2e_upload_gate_rejects_oversized_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("big.log");
    std::fs::write(&path, vec![b'x'; 2048]).unwrap();

    let policy = UploadPolicy {
        max_size_bytes: 1024,
        ..UploadPolicy::default()
    };
    let file = describe_file(&path).unwrap();
    assert!(matches!(
        policy.check(&file),
        Err(UploadError::TooLarge { size: 2048, max_size: 1024, .. })
    ));
}
