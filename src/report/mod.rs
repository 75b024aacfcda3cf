//! # Report Generation Module
//!
//! Aggregates findings from all analyzed files into a single report and
//! renders it for the terminal, as JSON, or as Markdown.
//!
//! ## Key Types
//!
//! - [`Report`] - Complete analysis report with metadata and summary
//! - [`Finding`] - Individual fault-pattern finding
//! - [`Category`] - Fault-pattern category tags
//! - [`Severity`] - Severity classification for findings

mod finding;
mod formatter;

pub use finding::{Category, Finding, FindingSet, Severity};
pub use formatter::to_markdown;

use colored::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete analysis report.
///
/// Contains metadata about the scan, all findings, and summary statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Metadata about the scan operation.
    pub metadata: ReportMetadata,

    /// All findings from the analysis, in detection order.
    pub findings: Vec<Finding>,

    /// Summary statistics by severity.
    pub summary: ReportSummary,
}

/// Metadata about the scan operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Tool version used for the scan.
    pub version: String,

    /// Timestamp when the scan was performed.
    pub timestamp: String,

    /// Path that was scanned.
    pub scanned_path: String,

    /// Number of files analyzed.
    pub files_analyzed: usize,
}

/// Summary of findings by severity level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Count of high severity findings.
    pub high: usize,

    /// Count of medium severity findings.
    pub medium: usize,

    /// Count of low severity findings.
    pub low: usize,

    /// Count of informational findings.
    pub info: usize,

    /// Total count of all findings.
    pub total: usize,
}

impl Report {
    /// Creates a new report from a collection of findings.
    ///
    /// Summary statistics are derived from the findings themselves.
    pub fn new(findings: Vec<Finding>, scanned_path: PathBuf, files_analyzed: usize) -> Self {
        let summary = ReportSummary::from_findings(&findings);

        let metadata = ReportMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: chrono_lite_timestamp(),
            scanned_path: scanned_path.display().to_string(),
            files_analyzed,
        };

        Self {
            metadata,
            findings,
            summary,
        }
    }

    /// Prints colorized output to the terminal.
    pub fn print_terminal(&self) {
        if self.findings.is_empty() {
            println!("\n{}", "[+] No fault-injection patterns found.".green().bold());
            return;
        }

        println!("\n{}", "[!] Fault-Injection Findings:".red().bold());
        println!("{}", "=".repeat(60).cyan());

        for (i, finding) in self.findings.iter().enumerate() {
            finding.print_terminal(i + 1);
        }
    }

    /// Prints summary statistics to the terminal.
    pub fn print_summary(&self) {
        println!(
            "{}",
            format!(
                "[*] Summary: {} High | {} Medium | {} Low | {} Info",
                self.summary.high, self.summary.medium, self.summary.low, self.summary.info
            )
            .bold()
        );

        if self.summary.total == 0 {
            println!("{}", "[+] No issues found.".green().bold());
        } else {
            let message = format!("[!] Total: {} issue(s) found", self.summary.total);
            if self.summary.high > 0 {
                println!("{}", message.red().bold());
            } else if self.summary.medium > 0 {
                println!("{}", message.yellow().bold());
            } else {
                println!("{}", message.blue().bold());
            }
        }
    }

    /// Converts the report to Markdown format.
    pub fn to_markdown(&self) -> String {
        formatter::to_markdown(self)
    }
}

impl ReportSummary {
    /// Creates a summary from a collection of findings.
    fn from_findings(findings: &[Finding]) -> Self {
        let mut summary = ReportSummary {
            high: 0,
            medium: 0,
            low: 0,
            info: 0,
            total: findings.len(),
        };

        for finding in findings {
            match finding.severity {
                Severity::High => summary.high += 1,
                Severity::Medium => summary.medium += 1,
                Severity::Low => summary.low += 1,
                Severity::Info => summary.info += 1,
            }
        }

        summary
    }
}

/// Generates a simple timestamp without external dependencies.
fn chrono_lite_timestamp() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();

    format!("{}", duration.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_summary_counts() {
        let findings = vec![
            Finding::single(
                Category::Branch,
                Severity::Medium,
                "\"x == 0\" Using explicit integer instead of variable in branch.".to_string(),
                4,
            ),
            Finding::spanning(
                Category::DoubleCheck,
                Severity::High,
                "Recommended addition of complement check regarding condition at 4 to 6. See replacements! ".to_string(),
                4,
                6,
            ),
        ];

        let report = Report::new(findings, PathBuf::from("./firmware"), 1);

        assert_eq!(report.summary.high, 1);
        assert_eq!(report.summary.medium, 1);
        assert_eq!(report.summary.low, 0);
        assert_eq!(report.summary.total, 2);
        assert_eq!(report.metadata.files_analyzed, 1);
    }

    #[test]
    fn test_empty_report() {
        let report = Report::new(Vec::new(), PathBuf::from("."), 0);
        assert_eq!(report.summary.total, 0);
        assert!(report.findings.is_empty());
    }
}
