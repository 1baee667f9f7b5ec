// LogLens - core/parser.rs
//
// Line-oriented conversion of raw text into `LogRecord`s.
// Core layer: accepts an in-memory string, never touches the filesystem.
//
// Parsing is total: every non-blank line becomes exactly one record. Fields
// that cannot be extracted fall back to defaults (parse-time clock, INFO).

use crate::core::model::{LogRecord, Severity};
use crate::util::logging::preview;
use chrono::{Local, NaiveDateTime};
use regex::Regex;
use std::sync::OnceLock;

/// Parse `raw_text` using the current local time as the fallback timestamp.
///
/// The clock is read once, so every record without a timestamp in the same
/// call gets the same fallback value.
pub fn parse(raw_text: &str) -> Vec<LogRecord> {
    parse_at(raw_text, Local::now().naive_local())
}

/// Parse `raw_text`, stamping lines without a recognisable timestamp with
/// `fallback`.
pub fn parse_at(raw_text: &str, fallback: NaiveDateTime) -> Vec<LogRecord> {
    let mut records = Vec::new();
    let mut inferred = 0usize;

    for (idx, line) in raw_text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let (timestamp, timestamp_inferred) = match sniff_timestamp(line) {
            Some(ts) => (ts, false),
            None => {
                inferred += 1;
                tracing::trace!(line = preview(line), "No timestamp found; using fallback");
                (fallback, true)
            }
        };

        records.push(LogRecord {
            line_number: idx + 1,
            timestamp,
            timestamp_inferred,
            severity: detect_severity(line).unwrap_or_default(),
            message: line.to_string(),
        });
    }

    tracing::debug!(
        records = records.len(),
        inferred_timestamps = inferred,
        "Parsing complete"
    );

    records
}

// =============================================================================
// Timestamp sniffing
// =============================================================================

/// A timestamp candidate: a regex that finds a timestamp substring, plus a
/// parsing function that converts the matched text.
struct Sniffer {
    re: Regex,
    parse: fn(&str) -> Option<NaiveDateTime>,
}

/// Compile a built-in pattern. Every pattern is covered by the unit tests
/// below, so a mistake shows up as a failing test.
fn re(pat: &str) -> Regex {
    Regex::new(pat).expect("built-in parser regex must compile")
}

/// Timestamp patterns in priority order. Append new formats here.
fn sniffers() -> &'static [Sniffer] {
    static SNIFFERS: OnceLock<Vec<Sniffer>> = OnceLock::new();
    SNIFFERS.get_or_init(|| {
        vec![
            // ISO 8601 with T separator: 2024-01-15T14:30:22
            Sniffer {
                re: re(r"\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}"),
                parse: |s| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").ok(),
            },
            // Space separated: 2024-01-15 14:30:22
            Sniffer {
                re: re(r"\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}"),
                parse: |s| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").ok(),
            },
        ]
    })
}

/// Find the first recognisable timestamp in `line`.
///
/// Patterns are tried in order and the first one whose match also parses
/// wins. A match that is not a real date (e.g. month 13) falls through to
/// the next pattern.
pub(crate) fn sniff_timestamp(line: &str) -> Option<NaiveDateTime> {
    sniffers()
        .iter()
        .find_map(|sniffer| sniffer.re.find(line).and_then(|m| (sniffer.parse)(m.as_str())))
}

// =============================================================================
// Severity detection
// =============================================================================

fn severity_regex() -> &'static Regex {
    static SEVERITY_RE: OnceLock<Regex> = OnceLock::new();
    SEVERITY_RE.get_or_init(|| {
        let alternation = Severity::all()
            .iter()
            .map(|severity| regex::escape(severity.label()))
            .collect::<Vec<_>>()
            .join("|");
        re(&format!("(?i){alternation}"))
    })
}

/// Severity of the leftmost token in `line`, if any.
///
/// Matching is case-insensitive and substring-based, so `WARNING` counts as
/// `WARN`.
pub(crate) fn detect_severity(line: &str) -> Option<Severity> {
    Severity::from_token(severity_regex().find(line)?.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, Timelike};

    fn fixed_clock() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2030, 6, 1)
            .unwrap()
            .and_hms_opt(17, 45, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_mixed_input() {
        let text = "2024-01-01T10:00:00 ERROR disk full\n\n2024-01-01T11:05:00 info ok\nrandom junk line";
        let records = parse_at(text, fixed_clock());

        assert_eq!(records.len(), 3);
        let severities: Vec<_> = records.iter().map(|r| r.severity).collect();
        assert_eq!(
            severities,
            vec![Severity::Error, Severity::Info, Severity::Info]
        );
        let hours: Vec<_> = records.iter().map(|r| r.timestamp.hour()).collect();
        assert_eq!(hours, vec![10, 11, 17]);
        assert!(!records[0].timestamp_inferred);
        assert!(records[2].timestamp_inferred);
        assert_eq!(records[2].message, "random junk line");
    }

    #[test]
    fn test_parse_skips_blank_lines_and_keeps_order() {
        let text = "one\n   \n\t\ntwo\n\nthree\n";
        let records = parse_at(text, fixed_clock());
        let messages: Vec<_> = records.iter().map(|r| r.message.as_str()).collect();
        assert_eq!(messages, vec!["one", "two", "three"]);
        let lines: Vec<_> = records.iter().map(|r| r.line_number).collect();
        assert_eq!(lines, vec![1, 4, 6]);
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(parse_at("", fixed_clock()).is_empty());
        assert!(parse_at("\n\n  \n", fixed_clock()).is_empty());
    }

    #[test]
    fn test_message_is_not_trimmed() {
        let records = parse_at("   padded WARN line  ", fixed_clock());
        assert_eq!(records[0].message, "   padded WARN line  ");
        assert_eq!(records[0].severity, Severity::Warn);
    }

    #[test]
    fn test_fallback_timestamp_within_invocation_window() {
        let before = Local::now().naive_local();
        let records = parse("no timestamp here\nnor here");
        let after = Local::now().naive_local();

        for record in &records {
            assert!(record.timestamp_inferred);
            assert!(
                record.timestamp >= before && record.timestamp <= after,
                "fallback {} outside [{before}, {after}]",
                record.timestamp
            );
        }
        assert_eq!(records[0].timestamp, records[1].timestamp);
    }

    #[test]
    fn test_sniff_iso_t_separator() {
        let ts = sniff_timestamp("ts=2024-01-15T14:30:22 level=info").unwrap();
        assert_eq!(ts.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-01-15 14:30:22");
    }

    #[test]
    fn test_sniff_space_separator() {
        let ts = sniff_timestamp("[2024-01-15 14:30:22] sshd: accepted").unwrap();
        assert_eq!(ts.hour(), 14);
    }

    /// The T-separated form is tried first even when the space-separated
    /// form appears earlier in the line.
    #[test]
    fn test_sniff_priority_order() {
        let ts = sniff_timestamp("2024-01-01 01:00:00 relayed 2024-02-02T02:00:00").unwrap();
        assert_eq!(ts.hour(), 2);
    }

    #[test]
    fn test_sniff_invalid_date_falls_through() {
        assert!(sniff_timestamp("2024-13-45T99:99:99 broken").is_none());
        let ts = sniff_timestamp("2024-13-45T99:99:99 then 2024-01-01 08:00:00").unwrap();
        assert_eq!(ts.hour(), 8);
    }

    #[test]
    fn test_sniff_no_timestamp_returns_none() {
        assert!(sniff_timestamp("hello world, no date here").is_none());
        assert!(sniff_timestamp("").is_none());
    }

    #[test]
    fn test_detect_severity_leftmost_token_wins() {
        assert_eq!(
            detect_severity("debug: retrying after ERROR"),
            Some(Severity::Debug)
        );
        assert_eq!(detect_severity("WARNING: low disk"), Some(Severity::Warn));
        assert_eq!(detect_severity("Error 500"), Some(Severity::Error));
        assert_eq!(detect_severity("nothing to see"), None);
    }

    #[test]
    fn test_detect_severity_covers_every_level() {
        for severity in Severity::all() {
            let lower = format!("[{}] something", severity.label().to_lowercase());
            assert_eq!(detect_severity(&lower), Some(*severity));
            assert_eq!(Severity::from_token(severity.label()), Some(*severity));
        }
    }

    #[test]
    fn test_every_non_blank_line_yields_one_record() {
        let lines = [
            "2024-01-01T00:00:00 INFO boot",
            "\u{0}\u{1} binary-ish junk",
            "2024-99-99 99:99:99 DEBUG bad date",
            "",
            "    ",
            "trailing",
        ];
        let text = lines.join("\n");
        let records = parse_at(&text, fixed_clock());
        let expected = lines.iter().filter(|l| !l.trim().is_empty()).count();
        assert_eq!(records.len(), expected);
        assert_eq!(records[2].timestamp, fixed_clock());
        assert_eq!(records[2].severity, Severity::Debug);
    }

    #[test]
    fn test_parsed_timestamps_are_not_shifted() {
        let records = parse_at("2024-01-01T23:59:59 x", fixed_clock());
        let expected = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        assert_eq!(records[0].timestamp, expected);
        assert!(records[0].timestamp < fixed_clock() - Duration::days(1));
    }

    #[test]
    fn test_crlf_line_endings() {
        let records = parse_at("a INFO\r\nb ERROR\r\n", fixed_clock());
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].message, "b ERROR");
        assert_eq!(records[1].severity, Severity::Error);
    }
}
