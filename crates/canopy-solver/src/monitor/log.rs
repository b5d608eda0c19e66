// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Tabular progress log for the radius search.
//!
//! `LogSearchMonitor` writes one header when the search starts, one row per
//! oracle call, and a short footer with the final statistics. Output goes to
//! stdout unless another writer is supplied. A failed write never aborts the
//! search: the monitor keeps the first I/O error, stops writing, and reports
//! the error through `LogSearchMonitor::error`.

use crate::{
    metric::TreeMetric, monitor::search_monitor::SearchMonitor, oracle::OracleOutcome,
    stats::SolverStatistics,
};
use canopy_core::num::weight::TreeWeight;
use canopy_model::solution::CenterSolution;
use std::io::Write;
use std::time::Instant;

const RULE_WIDTH: usize = 72;

#[derive(Debug)]
pub struct LogSearchMonitor<W, O = std::io::Stdout> {
    out: O,
    error: Option<std::io::Error>,
    start_time: Instant,
    best_radius: Option<W>,
}

impl<W> LogSearchMonitor<W>
where
    W: TreeWeight,
{
    /// Creates a monitor that logs to stdout.
    pub fn new() -> Self {
        Self::with_writer(std::io::stdout())
    }
}

impl<W> Default for LogSearchMonitor<W>
where
    W: TreeWeight,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<W, O> LogSearchMonitor<W, O>
where
    W: TreeWeight,
    O: Write,
{
    /// Creates a monitor that logs to `out`.
    pub fn with_writer(out: O) -> Self {
        Self {
            out,
            error: None,
            start_time: Instant::now(),
            best_radius: None,
        }
    }

    /// Returns the first write error, if any. Once set, nothing more is
    /// written.
    #[inline]
    pub fn error(&self) -> Option<&std::io::Error> {
        self.error.as_ref()
    }

    /// Consumes the monitor and returns its writer.
    pub fn into_inner(self) -> O {
        self.out
    }

    #[inline(always)]
    fn print_header(&mut self) {
        emit(
            &mut self.out,
            &mut self.error,
            format_args!(
                "{:<9} | {:<6} | {:<14} | {:<8} | {:<7} | {:<10}",
                "Elapsed", "Probe", "Radius", "Feasible", "Centers", "Unassigned"
            ),
        );
        self.print_rule();
    }

    #[inline(always)]
    fn print_rule(&mut self) {
        emit(
            &mut self.out,
            &mut self.error,
            format_args!("{}", "-".repeat(RULE_WIDTH)),
        );
    }
}

/// Writes one line unless an earlier write already failed.
fn emit<O>(out: &mut O, error: &mut Option<std::io::Error>, line: std::fmt::Arguments<'_>)
where
    O: Write,
{
    if error.is_some() {
        return;
    }
    if let Err(e) = writeln!(out, "{}", line) {
        *error = Some(e);
    }
}

impl<W, O> std::fmt::Display for LogSearchMonitor<W, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LogSearchMonitor")
    }
}

impl<W, O> SearchMonitor<W> for LogSearchMonitor<W, O>
where
    W: TreeWeight,
    O: Write,
{
    fn name(&self) -> &str {
        "LogSearchMonitor"
    }

    fn on_enter_search(&mut self, metric: &TreeMetric<W>, _statistics: &SolverStatistics) {
        self.start_time = Instant::now();
        self.best_radius = None;
        emit(
            &mut self.out,
            &mut self.error,
            format_args!(
                "Radius search over {} vertices and {} candidates",
                metric.num_vertices(),
                metric.candidates().len()
            ),
        );
        self.print_header();
    }

    fn on_probe(&mut self, outcome: &OracleOutcome<W>, statistics: &SolverStatistics) {
        if outcome.is_feasible() {
            self.best_radius = Some(outcome.radius());
        }
        let elapsed = format!("{:.1}s", self.start_time.elapsed().as_secs_f32());
        emit(
            &mut self.out,
            &mut self.error,
            format_args!(
                "{:<9} | {:<6} | {:<14} | {:<8} | {:<7} | {:<10}",
                elapsed,
                statistics.probes,
                outcome.radius(),
                if outcome.is_feasible() { "yes" } else { "no" },
                outcome.centers().len(),
                outcome.num_unassigned()
            ),
        );
    }

    fn on_solution_found(&mut self, solution: &CenterSolution<W>, _statistics: &SolverStatistics) {
        self.best_radius = Some(solution.radius());
    }

    fn on_exit_search(&mut self, statistics: &SolverStatistics) {
        self.print_rule();
        match self.best_radius {
            Some(radius) => emit(
                &mut self.out,
                &mut self.error,
                format_args!(
                    "Search finished. Radius {} with {} centers after {} probes.",
                    radius, statistics.centers_opened, statistics.probes
                ),
            ),
            None => emit(
                &mut self.out,
                &mut self.error,
                format_args!(
                    "Search finished without a feasible radius after {} probes.",
                    statistics.probes
                ),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_without_solution() {
        let mut monitor = LogSearchMonitor::<i64, _>::with_writer(Vec::new());
        let statistics = SolverStatistics {
            probes: 3,
            ..SolverStatistics::default()
        };
        monitor.on_exit_search(&statistics);

        let text = String::from_utf8(monitor.into_inner()).unwrap();
        assert!(text.ends_with("Search finished without a feasible radius after 3 probes.\n"));
    }

    /// Accepts `capacity` bytes, then fails every write.
    struct FailingWriter {
        capacity: usize,
        written: usize,
        attempts: usize,
    }

    impl Write for FailingWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.attempts += 1;
            if self.written >= self.capacity {
                return Err(std::io::Error::other("sink full"));
            }
            let n = buf.len().min(self.capacity - self.written);
            self.written += n;
            Ok(n)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_first_write_error_is_kept_and_stops_output() {
        let writer = FailingWriter {
            capacity: 0,
            written: 0,
            attempts: 0,
        };
        let mut monitor = LogSearchMonitor::<i64, _>::with_writer(writer);
        assert!(monitor.error().is_none());

        let statistics = SolverStatistics::default();
        monitor.on_exit_search(&statistics);
        let error = monitor.error().map(|e| e.to_string());
        assert_eq!(error.as_deref(), Some("sink full"));

        monitor.on_exit_search(&statistics);
        assert_eq!(monitor.into_inner().attempts, 1);
    }

    #[test]
    fn test_healthy_writer_reports_no_error() {
        let mut monitor = LogSearchMonitor::<i64, _>::with_writer(Vec::new());
        monitor.on_exit_search(&SolverStatistics::default());
        assert!(monitor.error().is_none());
    }

    #[test]
    fn test_name_and_display() {
        let monitor = LogSearchMonitor::<i64, _>::with_writer(Vec::new());
        assert_eq!(SearchMonitor::<i64>::name(&monitor), "LogSearchMonitor");
        assert_eq!(monitor.to_string(), "LogSearchMonitor");
    }
}
