//! # Finding and Severity Definitions
//!
//! Defines the core data structures for representing fault-pattern findings:
//! the [`Category`] wire tags, the [`Finding`] record (single-line or
//! line-spanning), and the ordered, append-only [`FindingSet`].

use colored::*;
use serde::{Deserialize, Serialize};

/// Fault-pattern category a finding belongs to.
///
/// The serialized form is the wire-visible tag used in reports and in the
/// CLI `--only`/`--exclude` filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Trivial constants compared inside branch conditions.
    Branch,

    /// Function calls inside a branch condition that a fault may skip.
    Bypass,

    /// Constants with low Hamming weight used in initializers/assignments.
    ConstantCoding,

    /// Unguarded `default:`/`else` fallback paths.
    DefaultFail,

    /// Externally supplied values never verified by an XOR checksum.
    Detect,

    /// Single conditional checks missing a complementary re-check.
    DoubleCheck,
}

impl Category {
    /// Returns the wire tag for this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Branch => "branch",
            Category::Bypass => "bypass",
            Category::ConstantCoding => "constant_coding",
            Category::DefaultFail => "default_fail",
            Category::Detect => "detect",
            Category::DoubleCheck => "double_check",
        }
    }

    /// Parses a category from its wire tag.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "branch" => Some(Category::Branch),
            "bypass" => Some(Category::Bypass),
            "constant_coding" => Some(Category::ConstantCoding),
            "default_fail" => Some(Category::DefaultFail),
            "detect" => Some(Category::Detect),
            "double_check" => Some(Category::DoubleCheck),
            _ => None,
        }
    }

    /// All known categories in the engine's fixed run order.
    ///
    /// `double_check` comes last: it is the only pattern that proposes
    /// source edits, and the patterns before it must see original line text.
    pub fn all() -> [Category; 6] {
        [
            Category::ConstantCoding,
            Category::DefaultFail,
            Category::Branch,
            Category::Detect,
            Category::Bypass,
            Category::DoubleCheck,
        ]
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity level classification for findings.
///
/// Ordered from lowest to highest severity. Severity is reporting metadata
/// only; it never changes what a detector flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational finding, no direct security impact.
    Info = 0,

    /// Low severity, hardening recommendation.
    Low = 1,

    /// Medium severity, pattern weakens fault resistance.
    Medium = 2,

    /// High severity, a single glitch can defeat the check.
    High = 3,
}

impl Severity {
    /// Parses a severity level from a string, defaulting to `Info` for
    /// unknown values.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "high" => Severity::High,
            "medium" => Severity::Medium,
            "low" => Severity::Low,
            _ => Severity::Info,
        }
    }

    /// Returns a colored label for terminal output.
    pub fn colored_label(&self) -> ColoredString {
        match self {
            Severity::High => "HIGH".black().on_yellow().bold(),
            Severity::Medium => "MEDIUM".white().on_bright_blue().bold(),
            Severity::Low => "LOW".black().on_white().bold(),
            Severity::Info => "INFO".black().on_bright_white(),
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::High => write!(f, "High"),
            Severity::Medium => write!(f, "Medium"),
            Severity::Low => write!(f, "Low"),
            Severity::Info => write!(f, "Info"),
        }
    }
}

/// A single fault-pattern finding.
///
/// A finding is either single-line (`end_line == None`) or spanning
/// (`end_line == Some(end)` with `end >= line`). Findings are immutable once
/// created; creation order is preserved by [`FindingSet`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    /// Fault-pattern category tag.
    pub category: Category,

    /// Severity classification.
    pub severity: Severity,

    /// Human-readable message embedding the offending snippet in quotes.
    pub message: String,

    /// Path to the analyzed source file.
    pub file_path: String,

    /// Start line (1-indexed, matching the syntax tree's line numbers).
    pub line: usize,

    /// End line for spanning findings.
    pub end_line: Option<usize>,
}

impl Finding {
    /// Creates a single-line finding.
    pub fn single(category: Category, severity: Severity, message: String, line: usize) -> Self {
        Self {
            category,
            severity,
            message,
            file_path: String::new(),
            line,
            end_line: None,
        }
    }

    /// Creates a spanning finding covering `line..=end_line`.
    pub fn spanning(
        category: Category,
        severity: Severity,
        message: String,
        line: usize,
        end_line: usize,
    ) -> Self {
        debug_assert!(end_line >= line);
        Self {
            category,
            severity,
            message,
            file_path: String::new(),
            line,
            end_line: Some(end_line),
        }
    }

    /// Prints the finding to terminal with color formatting.
    pub fn print_terminal(&self, index: usize) {
        println!();
        println!(
            "{} {} [{}]",
            format!("#{}", index).cyan().bold(),
            self.severity.colored_label(),
            self.category.as_str().yellow()
        );

        let location = match self.end_line {
            Some(end) => format!("{}:{}-{}", self.file_path, self.line, end),
            None => format!("{}:{}", self.file_path, self.line),
        };
        println!("   {} {}", "Location:".dimmed(), location.blue());

        for line in self.message.lines() {
            println!("   {}", line);
        }
    }
}

/// Ordered, append-only collection of findings.
///
/// Insertion order equals report order: within one detector it is detection
/// order, across detectors it is the engine's run order.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct FindingSet {
    items: Vec<Finding>,
}

impl FindingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a finding, preserving insertion order.
    pub fn append(&mut self, finding: Finding) {
        self.items.push(finding);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Finding> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consumes the set, yielding the findings in insertion order.
    pub fn into_vec(self) -> Vec<Finding> {
        self.items
    }

    /// Stamps every finding with the analyzed file's path.
    pub fn set_file_path(&mut self, path: &str) {
        for finding in &mut self.items {
            finding.file_path = path.to_string();
        }
    }
}

impl<'a> IntoIterator for &'a FindingSet {
    type Item = &'a Finding;
    type IntoIter = std::slice::Iter<'a, Finding>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
