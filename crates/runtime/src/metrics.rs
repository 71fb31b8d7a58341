use std::time::{Duration, Instant};

use serde::Serialize;
use th_views::TopKStats;

/// Per-run line counters kept by the scan driver.
#[derive(Debug, Clone, Default)]
pub struct ScanMetrics {
    lines_read: u64,
    records_parsed: u64,
    lines_skipped: u64,
}

impl ScanMetrics {
    pub fn inc_lines_read(&mut self) {
        self.lines_read += 1;
    }

    pub fn inc_records_parsed(&mut self) {
        self.records_parsed += 1;
    }

    pub fn inc_lines_skipped(&mut self) {
        self.lines_skipped += 1;
    }

    /// Combine the line counters with the tracker's admission counters.
    pub fn snapshot(&self, tracker: TopKStats) -> MetricsSnapshot {
        MetricsSnapshot {
            lines_read: self.lines_read,
            records_parsed: self.records_parsed,
            lines_skipped: self.lines_skipped,
            records_admitted: tracker.admitted,
            records_evicted: tracker.evicted,
            records_rejected: tracker.rejected,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub lines_read: u64,
    pub records_parsed: u64,
    pub lines_skipped: u64,
    pub records_admitted: u64,
    pub records_evicted: u64,
    pub records_rejected: u64,
}

impl MetricsSnapshot {
    pub fn to_json_line(&self, label: &str, elapsed: Option<Duration>) -> String {
        #[derive(Serialize)]
        struct Snapshot<'a> {
            label: &'a str,
            #[serde(flatten)]
            counters: &'a MetricsSnapshot,
            elapsed_ms: Option<u128>,
        }

        let payload = Snapshot {
            label,
            counters: self,
            elapsed_ms: elapsed.map(|d| d.as_millis()),
        };
        serde_json::to_string(&payload).unwrap_or_else(|_| String::from("{}"))
    }
}

pub struct ScanTimer {
    start: Instant,
}

impl ScanTimer {
    pub fn start() -> Self {
        Self { start: Instant::now() }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
