//! Markdown rendering for reports.

use super::{Report, Severity};

/// Renders a complete report as a Markdown document.
pub fn to_markdown(report: &Report) -> String {
    let mut md = String::new();

    md.push_str("# GlitchGuard Fault-Injection Report\n\n");
    md.push_str(&format!("**Version:** {}\n\n", report.metadata.version));
    md.push_str(&format!(
        "**Scanned Path:** `{}`\n\n",
        report.metadata.scanned_path
    ));
    md.push_str(&format!(
        "**Files Analyzed:** {}\n\n",
        report.metadata.files_analyzed
    ));

    md.push_str("## Summary\n\n");
    md.push_str("| Severity | Count |\n");
    md.push_str("|----------|-------|\n");
    md.push_str(&format!("| High     | {} |\n", report.summary.high));
    md.push_str(&format!("| Medium   | {} |\n", report.summary.medium));
    md.push_str(&format!("| Low      | {} |\n", report.summary.low));
    md.push_str(&format!("| Info     | {} |\n", report.summary.info));
    md.push_str(&format!("| **Total** | **{}** |\n\n", report.summary.total));

    if report.findings.is_empty() {
        md.push_str("No fault-injection patterns found.\n");
        return md;
    }

    md.push_str("## Findings\n\n");

    for (i, finding) in report.findings.iter().enumerate() {
        md.push_str(&format!(
            "### {}. [{}] {}\n\n",
            i + 1,
            severity_label(finding.severity),
            finding.category
        ));

        let location = match finding.end_line {
            Some(end) => format!("{}:{}-{}", finding.file_path, finding.line, end),
            None => format!("{}:{}", finding.file_path, finding.line),
        };
        md.push_str(&format!("**Location:** `{}`\n\n", location));
        md.push_str(&format!("{}\n\n", finding.message.trim_end()));
    }

    md
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "HIGH",
        Severity::Medium => "MEDIUM",
        Severity::Low => "LOW",
        Severity::Info => "INFO",
    }
}
