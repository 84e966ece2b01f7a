//! Output formatters for benchmark reports
//!
//! Supports colored text for the terminal and JSON for tooling. A finished
//! [`BenchReport`] is written in one go with [`write_report`]; a run in
//! progress is written event by event through [`ReportWriter`].

use std::fmt::Write as _;
use std::io::{self, Write};

use colored::Colorize;

use crate::harness::{BenchEvent, BenchReport, SizeOutcome, SizeReport, Walkthrough};
use crate::kernel::{optimized_backend, Kernel, OptimizedBackend};
use crate::verify::Verification;

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Colored text output for terminal
    #[default]
    Text,
    /// JSON output for tooling and CI
    Json,
}

const RULE: &str = "=========================================";

fn banner(out: &mut String, title: &str) {
    out.push('\n');
    out.push_str(RULE);
    out.push('\n');
    let _ = writeln!(out, " {}", title.cyan().bold());
    out.push_str(RULE);
    out.push('\n');
}

fn join_short(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| format!("{v:.1}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn mismatch_line(verification: &Verification) -> Option<String> {
    verification.mismatch().map(|m| {
        format!(
            "Mismatch at index {}: ref={:.15} test={:.15} diff={:.3e}",
            m.index, m.reference, m.candidate, m.diff
        )
    })
}

fn format_walkthrough(out: &mut String, w: &Walkthrough, backend_name: &str) {
    banner(out, "PROCESS VERIFICATION");

    out.push_str("Input:\n");
    let _ = writeln!(out, "  A --> {:.1}", w.scalar);
    let _ = writeln!(out, "  x --> {}", join_short(&w.x));
    let _ = writeln!(out, "  y --> {}", join_short(&w.y));

    out.push_str("\nProcess (DAXPY: Z = A*X + Y):\n");
    for step in &w.steps {
        let _ = writeln!(
            out,
            "  z[{}] = {:.1} * {:.1} + {:.1} = {:.1}",
            step.index, w.scalar, step.x, step.y, step.z
        );
    }

    let _ = writeln!(out, "\nOutput ({}):", Kernel::Reference.label());
    let _ = writeln!(out, "  z --> {}", join_short(&w.reference));
    let _ = writeln!(
        out,
        "\nOutput ({}, {}):",
        Kernel::Optimized.label(),
        backend_name
    );
    let _ = writeln!(out, "  z --> {}", join_short(&w.optimized));

    if let Some(line) = mismatch_line(&w.verification) {
        let _ = writeln!(out, "{line}");
    }
    let verdict = if w.verification.passed() {
        "PASSED - optimized output matches reference output".green()
    } else {
        "FAILED".red().bold()
    };
    let _ = writeln!(out, "\nCorrectness: {verdict}");
}

fn format_head(out: &mut String, kernel: Kernel, head: &[f64]) {
    let _ = writeln!(out, "{} result (first {}):", kernel.label(), head.len());
    for (i, v) in head.iter().enumerate() {
        let _ = writeln!(out, "  Z[{i:2}] = {v:.6}");
    }
}

fn size_title(n: usize) -> String {
    if n.is_power_of_two() {
        format!("Vector size n = {n} (2^{})", n.trailing_zeros())
    } else {
        format!("Vector size n = {n}")
    }
}

fn format_size(out: &mut String, report: &SizeReport) {
    if let Some(line) = mismatch_line(&report.verification) {
        let _ = writeln!(out, "{line}");
    }
    let verdict = if report.verification.passed() {
        "PASSED - optimized kernel output is correct".green()
    } else {
        "FAILED".red().bold()
    };
    let _ = writeln!(out, "Correctness check: {verdict}");

    format_head(out, Kernel::Reference, &report.reference_head);
    format_head(out, Kernel::Optimized, &report.optimized_head);

    let _ = writeln!(
        out,
        "\nAverage kernel execution time ({} runs):",
        report.reference.runs
    );
    let _ = writeln!(
        out,
        "  {:<17}: {:.6} sec",
        Kernel::Reference.label(),
        report.reference.mean_secs()
    );
    let _ = writeln!(
        out,
        "  {:<17}: {:.6} sec",
        Kernel::Optimized.label(),
        report.optimized.mean_secs()
    );
    match report.speedup() {
        Some(s) => {
            let _ = writeln!(out, "  {:<17}: {:.2}x", "speedup", s);
        }
        None => {
            let _ = writeln!(out, "  {:<17}: n/a", "speedup");
        }
    }
}

fn format_outcome(out: &mut String, outcome: &SizeOutcome) {
    banner(out, &size_title(outcome.size()));
    match outcome {
        SizeOutcome::Completed(size) => format_size(out, size),
        SizeOutcome::AllocationFailed { len, bytes } => {
            let _ = writeln!(
                out,
                "{} ({len} elements, {bytes} bytes); size skipped.",
                "Memory allocation failed".yellow().bold()
            );
        }
    }
}

fn format_finished(out: &mut String) {
    banner(out, "All tests completed!");
}

/// Format a benchmark report as colored text for terminal
#[must_use]
pub fn format_text(report: &BenchReport) -> String {
    let mut output = String::new();
    let backend_name = report.optimized_backend.name();

    if let Some(w) = &report.walkthrough {
        format_walkthrough(&mut output, w, backend_name);
    }

    for outcome in &report.sizes {
        format_outcome(&mut output, outcome);
    }

    format_finished(&mut output);
    output
}

/// Format a benchmark report as JSON
///
/// # Errors
///
/// Returns `serde_json::Error` if serialization fails.
pub fn format_json(report: &BenchReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// Write report to `writer` in the specified format
///
/// # Errors
///
/// Returns `io::Error` if writing fails or JSON serialization fails.
pub fn write_report<W: Write>(
    report: &BenchReport,
    format: OutputFormat,
    writer: &mut W,
) -> io::Result<()> {
    match format {
        OutputFormat::Text => {
            write!(writer, "{}", format_text(report))?;
        }
        OutputFormat::Json => {
            let json = format_json(report).map_err(io::Error::other)?;
            writeln!(writer, "{}", json)?;
        }
    }

    writer.flush()
}

/// Incremental report writer for a run in progress
///
/// Feed it every [`BenchEvent`] from [`crate::harness::run_with`]. Each event
/// is rendered and flushed before `write_event` returns. Text output matches
/// [`format_text`] section by section; JSON output is one object per line.
pub struct ReportWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    backend: OptimizedBackend,
}

impl<W: Write> ReportWriter<W> {
    /// Create a writer in the given format
    pub fn new(writer: W, format: OutputFormat) -> Self {
        Self {
            writer,
            format,
            backend: optimized_backend(),
        }
    }

    /// Render one event and flush it
    ///
    /// # Errors
    ///
    /// Returns `io::Error` if writing fails or JSON serialization fails.
    pub fn write_event(&mut self, event: &BenchEvent<'_>) -> io::Result<()> {
        if let BenchEvent::Started {
            optimized_backend: backend,
            ..
        } = event
        {
            self.backend = *backend;
        }

        match self.format {
            OutputFormat::Text => {
                let mut section = String::new();
                match event {
                    BenchEvent::Started { .. } => {}
                    BenchEvent::Walkthrough(w) => {
                        format_walkthrough(&mut section, w, self.backend.name());
                    }
                    BenchEvent::Size(outcome) => format_outcome(&mut section, outcome),
                    BenchEvent::Finished { .. } => format_finished(&mut section),
                }
                self.writer.write_all(section.as_bytes())?;
            }
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.writer, event).map_err(io::Error::other)?;
                self.writer.write_all(b"\n")?;
            }
        }

        self.writer.flush()
    }

    /// Borrow the underlying writer
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Unwrap the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BenchConfig;
    use crate::harness::{run, run_with};
    use crate::kernel::OptimizedBackend;
    use crate::timing::Timing;
    use crate::verify::Mismatch;
    use std::time::Duration;

    fn sample_report() -> BenchReport {
        let config = BenchConfig {
            runs: 2,
            sizes: vec![16],
            ..BenchConfig::default()
        };
        run(&config).unwrap()
    }

    fn failing_size() -> SizeReport {
        let timing = Timing {
            runs: 30,
            total: Duration::from_millis(30),
            mean: Duration::from_millis(1),
        };
        SizeReport {
            n: 3,
            reference: timing,
            optimized: timing,
            verification: Verification::Mismatch(Mismatch {
                index: 2,
                reference: 19.0,
                candidate: 19.5,
                diff: 0.5,
            }),
            reference_head: vec![13.0, 16.0, 19.0],
            optimized_head: vec![13.0, 16.0, 19.5],
        }
    }

    #[test]
    fn test_format_text_contains_walkthrough() {
        let text = format_text(&sample_report());
        assert!(text.contains("PROCESS VERIFICATION"));
        assert!(text.contains("z[0] = 2.0 * 1.0 + 11.0 = 13.0"));
        assert!(text.contains("z --> 13.0, 16.0, 19.0"));
        assert!(text.contains("PASSED - optimized output matches reference output"));
    }

    #[test]
    fn test_format_text_contains_size_section() {
        let text = format_text(&sample_report());
        assert!(text.contains("Vector size n = 16 (2^4)"));
        assert!(text.contains("PASSED - optimized kernel output is correct"));
        assert!(text.contains("reference kernel result (first 10):"));
        assert!(text.contains("  Z[ 0] = 0.000000"));
        assert!(text.contains("Average kernel execution time (2 runs):"));
        assert!(text.contains("All tests completed!"));
    }

    #[test]
    fn test_format_text_failed_size() {
        let report = BenchReport {
            config: BenchConfig::default(),
            optimized_backend: OptimizedBackend::Pointer,
            walkthrough: None,
            sizes: vec![SizeOutcome::Completed(failing_size())],
        };
        let text = format_text(&report);
        assert!(text.contains("Vector size n = 3"));
        assert!(!text.contains("(2^"));
        assert!(text.contains("Mismatch at index 2"));
        assert!(text.contains("FAILED"));
        assert!(text.contains("speedup"));
    }

    #[test]
    fn test_format_text_allocation_failure() {
        let report = BenchReport {
            config: BenchConfig::default(),
            optimized_backend: OptimizedBackend::Sse2,
            walkthrough: None,
            sizes: vec![SizeOutcome::AllocationFailed {
                len: 1 << 28,
                bytes: 1 << 33,
            }],
        };
        let text = format_text(&report);
        assert!(text.contains("Vector size n = 268435456 (2^28)"));
        assert!(text.contains("Memory allocation failed"));
        assert!(text.contains("size skipped"));
    }

    #[test]
    fn test_format_json_valid() {
        let report = sample_report();
        let json = format_json(&report).unwrap();

        let parsed: BenchReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.sizes.len(), 1);
        assert_eq!(parsed.config.runs, 2);
        assert!(parsed.all_passed());
    }

    #[test]
    fn test_format_json_tags() {
        let report = BenchReport {
            config: BenchConfig::default(),
            optimized_backend: OptimizedBackend::Sse2,
            walkthrough: None,
            sizes: vec![
                SizeOutcome::Completed(failing_size()),
                SizeOutcome::AllocationFailed { len: 8, bytes: 256 },
            ],
        };
        let json = format_json(&report).unwrap();
        assert!(json.contains("\"optimized_backend\": \"sse2\""));
        assert!(json.contains("\"outcome\": \"completed\""));
        assert!(json.contains("\"outcome\": \"allocation_failed\""));
        assert!(json.contains("\"status\": \"mismatch\""));
    }

    #[test]
    fn test_write_report_to_buffer() {
        let report = sample_report();
        let mut buf = Vec::new();
        write_report(&report, OutputFormat::Json, &mut buf).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert!(parsed["sizes"].is_array());

        let mut buf = Vec::new();
        write_report(&report, OutputFormat::Text, &mut buf).unwrap();
        assert!(String::from_utf8(buf).unwrap().contains("All tests completed!"));
    }

    #[test]
    fn test_report_writer_streams_each_size_before_the_next() {
        let huge = usize::MAX / 8;
        let config = BenchConfig {
            runs: 2,
            sizes: vec![16, huge],
            ..BenchConfig::default()
        };

        let mut out = ReportWriter::new(Vec::new(), OutputFormat::Text);
        let mut snapshots = Vec::new();
        run_with(&config, |event| {
            out.write_event(&event)?;
            snapshots.push(String::from_utf8_lossy(out.get_ref()).into_owned());
            Ok::<(), anyhow::Error>(())
        })
        .unwrap();

        // started, walkthrough, size 16, size huge, finished
        assert_eq!(snapshots.len(), 5);
        assert!(snapshots[0].is_empty());
        assert!(snapshots[1].contains("PROCESS VERIFICATION"));

        let after_first = &snapshots[2];
        assert!(after_first.contains("Vector size n = 16 (2^4)"));
        assert!(after_first.contains("PASSED - optimized kernel output is correct"));
        assert!(!after_first.contains("Memory allocation failed"));
        assert!(!after_first.contains("All tests completed!"));

        assert!(snapshots[3].contains("Memory allocation failed"));
        assert!(snapshots[4].ends_with(&format!("{RULE}\n")));
        assert!(snapshots[4].contains("All tests completed!"));
    }

    #[test]
    fn test_report_writer_text_matches_format_text() {
        let config = BenchConfig {
            runs: 2,
            sizes: vec![16, 100],
            ..BenchConfig::default()
        };

        let mut out = ReportWriter::new(Vec::new(), OutputFormat::Text);
        let report = run_with(&config, |event| -> anyhow::Result<()> {
            out.write_event(&event)?;
            Ok(())
        })
        .unwrap();
        let streamed = String::from_utf8(out.into_inner()).unwrap();

        assert_eq!(streamed, format_text(&report));
        assert!(streamed.contains("Vector size n = 100"));
    }

    #[test]
    fn test_report_writer_json_lines() {
        let config = BenchConfig {
            runs: 2,
            sizes: vec![16, usize::MAX / 8],
            walkthrough: false,
            ..BenchConfig::default()
        };

        let mut out = ReportWriter::new(Vec::new(), OutputFormat::Json);
        run_with(&config, |event| -> anyhow::Result<()> {
            out.write_event(&event)?;
            Ok(())
        })
        .unwrap();
        let buf = out.into_inner();

        let lines: Vec<serde_json::Value> = std::str::from_utf8(&buf)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0]["event"], "started");
        assert_eq!(lines[0]["config"]["runs"], 2);
        assert_eq!(lines[1]["event"], "size");
        assert_eq!(lines[1]["outcome"], "completed");
        assert_eq!(lines[1]["n"], 16);
        assert_eq!(lines[2]["outcome"], "allocation_failed");
        assert_eq!(lines[3]["event"], "finished");
        assert_eq!(lines[3]["all_passed"], false);
    }
}
