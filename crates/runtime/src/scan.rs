//! Line-streaming driver: reader -> parser -> tracker.
//!
//! Lines are read one at a time through a buffered reader; only the tracker's
//! working set is kept in memory. Lines longer than [`MAX_LINE_BYTES`] are
//! skipped without being buffered. A read failure ends the stream early but
//! the records offered up to that point still make it into the report.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use std::time::Duration;

use th_core::{parse_line, CoreError};
use th_views::TopKTracker;
use tracing::{error, info, trace};

use crate::metrics::{MetricsSnapshot, ScanMetrics, ScanTimer};

/// Longest line, terminator excluded, handed to the parser.
pub const MAX_LINE_BYTES: usize = 64 * 1024;

#[derive(Debug)]
pub struct ScanReport {
    /// Retained labels, highest value first.
    pub labels: Vec<String>,
    pub metrics: MetricsSnapshot,
    pub elapsed: Duration,
    /// Set when reading stopped before end of input.
    pub read_error: Option<io::Error>,
}

impl ScanReport {
    pub fn is_complete(&self) -> bool {
        self.read_error.is_none()
    }
}

/// Stream every line of `reader` through a tracker of the given capacity.
pub fn scan_reader<R: BufRead>(mut reader: R, capacity: usize) -> Result<ScanReport, CoreError> {
    let mut tracker = TopKTracker::new(capacity)?;
    let mut metrics = ScanMetrics::default();
    let timer = ScanTimer::start();
    let mut read_error = None;

    info!(%capacity, "scan starting");
    let mut buf = Vec::new();
    let mut line_no: u64 = 0;
    let limit = MAX_LINE_BYTES as u64 + 1;
    loop {
        buf.clear();
        match (&mut reader).take(limit).read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(err) => {
                error!(%err, line_no, "read failed, keeping partial results");
                read_error = Some(err);
                break;
            }
        }
        line_no += 1;
        metrics.inc_lines_read();

        if buf.len() > MAX_LINE_BYTES && buf.last() != Some(&b'\n') {
            trace!(line_no, "skipping line: longer than {MAX_LINE_BYTES} bytes");
            metrics.inc_lines_skipped();
            if let Err(err) = discard_rest_of_line(&mut reader) {
                error!(%err, line_no, "read failed, keeping partial results");
                read_error = Some(err);
                break;
            }
            continue;
        }

        // Labels are opaque, so invalid utf-8 is replaced rather than rejected.
        match parse_line(&String::from_utf8_lossy(&buf)) {
            Ok(record) => {
                metrics.inc_records_parsed();
                tracker.offer(record);
            }
            Err(reason) => {
                trace!(line_no, %reason, "skipping line");
                metrics.inc_lines_skipped();
            }
        }
    }

    let snapshot = metrics.snapshot(tracker.stats());
    let labels = tracker.finalize();
    let elapsed = timer.elapsed();
    info!(
        lines = snapshot.lines_read,
        skipped = snapshot.lines_skipped,
        results = labels.len(),
        elapsed_ms = elapsed.as_millis() as u64,
        "scan finished"
    );

    Ok(ScanReport {
        labels,
        metrics: snapshot,
        elapsed,
        read_error,
    })
}

fn discard_rest_of_line<R: BufRead>(reader: &mut R) -> io::Result<()> {
    loop {
        let available = reader.fill_buf()?;
        if available.is_empty() {
            return Ok(());
        }
        match available.iter().position(|&byte| byte == b'\n') {
            Some(at) => {
                reader.consume(at + 1);
                return Ok(());
            }
            None => {
                let len = available.len();
                reader.consume(len);
            }
        }
    }
}

/// Open `path` for line-buffered reading, failing fast when it is not a
/// readable regular file.
pub fn open_input(path: &Path) -> Result<BufReader<File>, CoreError> {
    let access = |reason: String| CoreError::FileAccess {
        path: path.to_path_buf(),
        reason,
    };
    let meta = std::fs::metadata(path).map_err(|err| access(err.to_string()))?;
    if !meta.is_file() {
        return Err(access(String::from("not a regular file")));
    }
    let file = File::open(path).map_err(|err| access(err.to_string()))?;
    Ok(BufReader::new(file))
}

pub fn scan_file(path: &Path, capacity: usize) -> Result<ScanReport, CoreError> {
    let reader = open_input(path)?;
    scan_reader(reader, capacity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::{Cursor, Read};

    /// Yields `data`, then fails every later read.
    struct FailAfter {
        data: Cursor<Vec<u8>>,
    }

    impl Read for FailAfter {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.data.read(buf)?;
            if n == 0 {
                return Err(io::Error::other("disk went away"));
            }
            Ok(n)
        }
    }

    #[test]
    fn ranks_lines_from_reader() {
        let input = "a 3\nb 1\nc 2\nd 5\ne 4\nf 0\n";
        let report = scan_reader(Cursor::new(input), 5).unwrap();
        assert!(report.is_complete());
        assert_eq!(report.labels, vec!["d", "e", "a", "c", "b"]);
        assert_eq!(report.metrics.lines_read, 6);
        assert_eq!(report.metrics.records_parsed, 6);
        assert_eq!(report.metrics.records_evicted, 0);
        assert_eq!(report.metrics.records_rejected, 1);
    }

    #[test]
    fn skips_malformed_lines() {
        let mut input = b"onlylabel\n\nlabel notanumber\r\nok 7\r\n".to_vec();
        input.extend_from_slice(b"bad \xff\xfe 9\n");
        input.extend_from_slice(b"last 2");
        let report = scan_reader(Cursor::new(input), 10).unwrap();
        assert_eq!(report.labels, vec!["ok", "last"]);
        assert_eq!(report.metrics.lines_read, 6);
        assert_eq!(report.metrics.lines_skipped, 4);
    }

    #[test]
    fn non_utf8_label_is_kept() {
        let report = scan_reader(Cursor::new(b"caf\xe9 900\nb 1\n".to_vec()), 5).unwrap();
        assert_eq!(report.labels, vec!["caf\u{FFFD}", "b"]);
        assert_eq!(report.metrics.lines_skipped, 0);
    }

    #[test]
    fn over_long_line_is_skipped() {
        let mut input = format!("{} 5\nok 1\n", "x".repeat(MAX_LINE_BYTES * 2));
        input.push_str(&format!("{} 3", "y".repeat(MAX_LINE_BYTES - 2)));
        let report = scan_reader(Cursor::new(input), 5).unwrap();
        assert!(report.is_complete());
        let longest = format!("{} 3", "y".repeat(MAX_LINE_BYTES - 2));
        assert_eq!(report.labels.len(), 2);
        assert_eq!(report.labels[0].len(), longest.len() - 2);
        assert_eq!(report.labels[1], "ok");
        assert_eq!(report.metrics.lines_read, 3);
        assert_eq!(report.metrics.lines_skipped, 1);
    }

    #[test]
    fn over_long_line_at_end_of_input_is_skipped() {
        let input = format!("ok 1\n{}", "z".repeat(MAX_LINE_BYTES + 10));
        let report = scan_reader(Cursor::new(input), 5).unwrap();
        assert_eq!(report.labels, vec!["ok"]);
        assert_eq!(report.metrics.lines_skipped, 1);
    }

    #[test]
    fn read_failure_keeps_partial_results() {
        let reader = BufReader::new(FailAfter {
            data: Cursor::new(b"a 1\nb 9\nc 5\n".to_vec()),
        });
        let report = scan_reader(reader, 2).unwrap();
        assert!(!report.is_complete());
        assert_eq!(report.labels, vec!["b", "c"]);
    }

    #[test]
    fn zero_capacity_fails_before_reading() {
        let err = scan_reader(Cursor::new("a 1\n"), 0).unwrap_err();
        assert!(matches!(err, CoreError::InvalidCapacity(0)));
    }
}
