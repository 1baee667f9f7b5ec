// LogLens - core/aggregate.rs
//
// Derived views over a parsed record sequence: per-hour counts, severity
// distribution and headline metrics.
//
// Every view is recomputed from the borrowed slice on each call. Nothing is
// cached, and the input cannot be mutated through an aggregator.

use crate::core::model::{HourRange, LogRecord, Severity, SeverityCount, SummaryMetrics, TimeBucket};
use chrono::Timelike;
use std::collections::BTreeMap;

/// Read-only view builder over a record slice.
#[derive(Debug, Clone, Copy)]
pub struct LogAggregator<'a> {
    records: &'a [LogRecord],
}

impl<'a> LogAggregator<'a> {
    pub fn new(records: &'a [LogRecord]) -> Self {
        Self { records }
    }

    /// Record counts per hour of day, ascending by hour. Hours with no
    /// records are omitted.
    pub fn time_series(&self) -> Vec<TimeBucket> {
        let mut by_hour: BTreeMap<u32, usize> = BTreeMap::new();
        for record in self.records {
            *by_hour.entry(record.timestamp.hour()).or_insert(0) += 1;
        }
        by_hour
            .into_iter()
            .map(|(hour, count)| TimeBucket { hour, count })
            .collect()
    }

    /// Record counts per observed severity, most severe first.
    pub fn severity_distribution(&self) -> Vec<SeverityCount> {
        let mut by_severity: BTreeMap<Severity, usize> = BTreeMap::new();
        for record in self.records {
            *by_severity.entry(record.severity).or_insert(0) += 1;
        }
        by_severity
            .into_iter()
            .map(|(severity, count)| SeverityCount { severity, count })
            .collect()
    }

    /// Totals, time range and success rate.
    ///
    /// The time range uses the first and last records in input order, not
    /// the earliest and latest timestamps.
    pub fn summary_metrics(&self) -> SummaryMetrics {
        let total = self.records.len();
        let errors = self
            .records
            .iter()
            .filter(|r| r.severity == Severity::Error)
            .count();

        let (Some(first), Some(last)) = (self.records.first(), self.records.last()) else {
            return SummaryMetrics {
                total: 0,
                errors: 0,
                time_range: None,
                success_rate: None,
            };
        };

        let ratio = 1.0 - errors as f64 / total as f64;
        let success_rate = (ratio * 1000.0).round() / 10.0;

        SummaryMetrics {
            total,
            errors,
            time_range: Some(HourRange {
                first: first.timestamp.hour(),
                last: last.timestamp.hour(),
            }),
            success_rate: Some(success_rate),
        }
    }

    /// The first `n` records in input order.
    pub fn preview(&self, n: usize) -> &'a [LogRecord] {
        &self.records[..n.min(self.records.len())]
    }
}
