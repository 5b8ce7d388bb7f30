//! Extract the duration and its uncertainty from a `perf stat` text report.
//!
//! A typical report looks like:
//!
//! ```text
//!  Performance counter stats for 'bin/add' (10 runs):
//!
//!          1,234,567 ns   duration_time    ( +-  3.45% )
//!
//!        0.001234567 +- 0.000042 seconds time elapsed  ( +-  3.45% )
//! ```
//!
//! The layout is not assumed beyond "some line holds an `ns`-suffixed number and
//! some line holds a `%`-suffixed decimal". Both patterns are tested against every
//! line, the first match of each wins, and reading stops as soon as both are known.
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{error::EvalError, registry::Measurement};

/// Digit groups, optionally comma separated, followed by `ns`
static DURATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"([0-9],?)+\s*ns").unwrap());
/// A decimal number followed by `%`
static UNCERTAINTY: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+\.[0-9]+%").unwrap());

/// Convert a matched figure to a float.
///
/// Only digits are kept, so thousands separators and units are ignored
/// (`"12,000 ns"` is `12000.0`). The number of digits after the first `.`
/// places the decimal point. A string without digits is `0.0`.
pub fn to_float(s: &str) -> f64 {
    let mut value = 0.0;
    let mut seen_point = false;
    let mut decimals = 0;
    for c in s.chars() {
        if let Some(d) = c.to_digit(10) {
            value = value * 10.0 + d as f64;
            if seen_point {
                decimals += 1;
            }
        } else if c == '.' {
            seen_point = true;
        }
    }
    value / 10f64.powi(decimals)
}

/// Accumulates the two figures across lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReportScanner {
    runtime: Option<f64>,
    uncertainty: Option<f64>,
}

impl ReportScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test one line against both patterns. Returns true once both values are known.
    pub fn feed(&mut self, line: &str) -> bool {
        if self.runtime.is_none() {
            self.runtime = DURATION.find(line).map(|m| to_float(m.as_str()));
        }
        if self.uncertainty.is_none() {
            self.uncertainty = UNCERTAINTY.find(line).map(|m| to_float(m.as_str()));
        }
        self.is_complete()
    }

    pub fn is_complete(&self) -> bool {
        self.runtime.is_some() && self.uncertainty.is_some()
    }

    pub fn finish(self) -> Option<Measurement> {
        Some(Measurement {
            runtime_ns: self.runtime?,
            uncertainty_pct: self.uncertainty?,
        })
    }
}

/// Scan a report from any buffered reader. `path` is only used for error messages.
pub fn parse_reader(mut reader: impl BufRead, path: &Path) -> Result<Measurement, EvalError> {
    let mut scanner = ReportScanner::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let n = reader
            .read_until(b'\n', &mut buf)
            .map_err(|source| EvalError::ReportRead {
                path: path.to_owned(),
                source,
            })?;
        if n == 0 {
            break;
        }
        if scanner.feed(&String::from_utf8_lossy(&buf)) {
            break;
        }
    }
    scanner
        .finish()
        .ok_or_else(|| EvalError::IncompleteReport(path.to_owned()))
}

/// Parse the report at `path` line by line.
pub fn parse(path: &Path) -> Result<Measurement, EvalError> {
    let file = File::open(path).map_err(|source| EvalError::ReportOpen {
        path: path.to_owned(),
        source,
    })?;
    parse_reader(BufReader::new(file), path)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn parse_str(s: &str) -> Result<Measurement, EvalError> {
        parse_reader(Cursor::new(s), Path::new("report.txt"))
    }

    const PERF_REPORT: &str = "
 Performance counter stats for 'bin/add' (10 runs):

         1,234,567 ns   duration_time                                                           ( +-  3.45% )

       0.001234567 +- 0.000042 seconds time elapsed  ( +-  2.10% )

";

    #[test]
    fn conversion() {
        assert_eq!(to_float("0.5%"), 0.5);
        assert_eq!(to_float("12,000 ns"), 12000.0);
        assert_eq!(to_float("1,234,567 ns"), 1234567.0);
        assert_eq!(to_float("3.45%"), 3.45);
        assert_eq!(to_float("ns"), 0.0);
        assert_eq!(to_float(""), 0.0);
    }

    #[test]
    fn perf_report() {
        let m = parse_str(PERF_REPORT).unwrap();
        assert_eq!(m.runtime_ns, 1234567.0);
        assert_eq!(m.uncertainty_pct, 3.45);
    }

    #[test]
    fn separate_lines_in_either_order() {
        let m = parse_str("1,234,567 ns\n3.45%\n").unwrap();
        assert_eq!((m.runtime_ns, m.uncertainty_pct), (1234567.0, 3.45));
        let m = parse_str("3.45%\n1,234,567 ns\n").unwrap();
        assert_eq!((m.runtime_ns, m.uncertainty_pct), (1234567.0, 3.45));
    }

    #[test]
    fn first_match_wins() {
        let m = parse_str("10 ns\n1.00%\n20 ns ( +- 2.00% )\n").unwrap();
        assert_eq!((m.runtime_ns, m.uncertainty_pct), (10.0, 1.0));
    }

    #[test]
    fn no_trailing_newline() {
        let m = parse_str("5 ns\n0.5%").unwrap();
        assert_eq!((m.runtime_ns, m.uncertainty_pct), (5.0, 0.5));
    }

    #[test]
    fn missing_either_value_is_incomplete() {
        for s in ["1,234,567 ns\n", "3.45%\n", "", "no numbers here\n", "7%\n12 ns\n"] {
            let err = parse_str(s).unwrap_err();
            assert!(matches!(err, EvalError::IncompleteReport(_)), "{s:?}");
        }
    }

    #[test]
    fn stops_reading_once_both_are_found() {
        use std::io::Read;

        // Errors at end of input, which the scan must never reach.
        struct FailAfter<'a>(Cursor<&'a [u8]>);
        impl Read for FailAfter<'_> {
            fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
                let n = self.0.read(buf)?;
                if n == 0 {
                    return Err(std::io::Error::other("read past the figures"));
                }
                Ok(n)
            }
        }
        let reader = BufReader::new(FailAfter(Cursor::new(&b"5 ns\n0.5%\n"[..])));
        let m = parse_reader(reader, Path::new("report.txt")).unwrap();
        assert_eq!((m.runtime_ns, m.uncertainty_pct), (5.0, 0.5));
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let err = parse(Path::new("/nonexistent/perfeval/add.txt")).unwrap_err();
        assert!(matches!(err, EvalError::ReportOpen { .. }));
    }
}
