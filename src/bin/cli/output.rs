//! Output formatting for CLI operations.

use depipe::{BatchSummary, Operation, Outcome, Report};
use serde_json::{Value, json};

/// Trait for output formatting
pub trait OutputFormatter {
    /// Formats one report as it is produced, or `None` to defer to the summary
    fn format_report(&self, report: &Report) -> Option<String>;

    /// Formats the finished batch; empty when there is nothing left to print
    fn format_summary(&self, operation: &Operation, summary: &BatchSummary) -> String;
}

/// Human-readable output formatter
///
/// Prints the `<path> PASS` / `<path> FAIL - <reason>` lines as they come.
pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn format_report(&self, report: &Report) -> Option<String> {
        Some(report.to_string())
    }

    fn format_summary(&self, _operation: &Operation, summary: &BatchSummary) -> String {
        if summary.interrupted {
            format!(
                "Interrupted after {} of the requested dates",
                summary.reports.len()
            )
        } else {
            String::new()
        }
    }
}

/// JSON output formatter
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, _report: &Report) -> Option<String> {
        None
    }

    fn format_summary(&self, operation: &Operation, summary: &BatchSummary) -> String {
        let reports: Vec<Value> = summary.reports.iter().map(report_json).collect();

        let obj = json!([
            reports,
            {
                "operation": operation.operation_type(),
                "passed": summary.passed(),
                "failed": summary.failed(),
                "interrupted": summary.interrupted,
            }
        ]);

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "[]".to_string())
    }
}

fn report_json(report: &Report) -> Value {
    let path = report.path().display().to_string();
    match report.outcome() {
        Outcome::Pass => json!({
            "path": path,
            "status": "PASS",
        }),
        Outcome::Fail { reason, detail } => json!({
            "path": path,
            "status": "FAIL",
            "reason": reason.as_str(),
            "detail": detail,
        }),
    }
}

/// Creates the appropriate formatter based on output format
pub fn create_formatter(format: super::OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        super::OutputFormat::Human => Box::new(HumanFormatter),
        super::OutputFormat::Json => Box::new(JsonFormatter),
    }
}
