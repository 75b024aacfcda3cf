//! # Analysis Engine
//!
//! Orchestrates one analysis run over a parsed translation unit: runs the
//! variable collector pre-pass, instantiates the enabled detectors fresh,
//! drives one full tree traversal per detector in a fixed order (the
//! double-check pattern last), and aggregates everything into one ordered
//! [`FindingSet`]. Proposed source insertions are collected as edit records
//! during the traversals and applied to a patched copy of the line buffer
//! only after every detector has finished, so all detectors observe original
//! line text.
//!
//! Detectors run strictly sequentially; the engine owns the finding set and
//! the edit list for the duration of the run.

mod variables;

pub use variables::{collect, VariableRecord};

use crate::detectors::{
    run_pattern, BranchPattern, BypassPattern, ConstantCodingPattern, DefaultFailPattern,
    DetectPattern, DoubleCheckPattern, FaultPattern, PassContext,
};
use crate::parser::{apply_edits, LineEdit, ParseContext, SourceLines};
use crate::report::{Category, FindingSet};

/// Default Hamming-weight sensitivity threshold.
pub const DEFAULT_SENSITIVITY: u32 = 3;

/// Which patterns run, and with what sensitivity.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Enabled pattern categories. Run order is fixed by the engine, not by
    /// this list's order.
    pub enabled: Vec<Category>,

    /// Hamming-weight threshold for the branch and constant-coding patterns.
    pub sensitivity: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            enabled: Category::all().to_vec(),
            sensitivity: DEFAULT_SENSITIVITY,
        }
    }
}

impl AnalysisConfig {
    /// Resolves pattern names (`branch`, `double_check`, ...) into enabled
    /// categories. Unknown names are logged and ignored rather than
    /// aborting the run.
    pub fn resolve_patterns(names: &[String]) -> Vec<Category> {
        let mut enabled = Vec::new();
        for name in names {
            match Category::parse(name) {
                Some(category) => {
                    if !enabled.contains(&category) {
                        enabled.push(category);
                    }
                }
                None => log::warn!("unknown fault pattern {name:?} ignored"),
            }
        }
        enabled
    }
}

/// The result of one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    /// All findings, in detection order within each pattern and engine run
    /// order across patterns.
    pub findings: FindingSet,

    /// Proposed source insertions recorded by the double-check pattern.
    pub edits: Vec<LineEdit>,

    /// The line buffer with all edits applied.
    pub patched: SourceLines,
}

/// Runs the enabled fault patterns over one parsed translation unit.
pub fn analyze(ctx: &ParseContext, config: &AnalysisConfig) -> AnalysisOutcome {
    let variables = collect(&ctx.tree);

    let mut findings = FindingSet::new();
    let mut edits = Vec::new();

    for category in Category::all() {
        if !config.enabled.contains(&category) {
            continue;
        }
        // Fresh construction per run keeps detectors idempotent: no scratch
        // state survives between runs.
        let mut pattern: Box<dyn FaultPattern> = match category {
            Category::ConstantCoding => Box::new(ConstantCodingPattern::new(config.sensitivity)),
            Category::DefaultFail => Box::new(DefaultFailPattern::new()),
            Category::Branch => Box::new(BranchPattern::new(config.sensitivity)),
            Category::Detect => Box::new(DetectPattern::new(variables.clone())),
            Category::Bypass => Box::new(BypassPattern::new()),
            Category::DoubleCheck => Box::new(DoubleCheckPattern::new()),
        };

        let mut pass = PassContext {
            findings: &mut findings,
            lines: &ctx.lines,
            edits: &mut edits,
        };
        run_pattern(&ctx.tree, pattern.as_mut(), &mut pass);
    }

    findings.set_file_path(&ctx.file_path);
    let patched = apply_edits(&ctx.lines, &edits);

    AnalysisOutcome {
        findings,
        edits,
        patched,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Severity;

    const SAMPLE: &str = "int key = 0x5A;\n\nvoid f(int x) {\n    if (x == 0) {\n        run();\n    }\n}\n";

    fn parse(src: &str) -> ParseContext {
        ParseContext::from_source("test.c", src.to_string()).unwrap()
    }

    #[test]
    fn test_findings_follow_engine_run_order() {
        let ctx = parse(SAMPLE);
        let outcome = analyze(&ctx, &AnalysisConfig::default());

        let categories: Vec<_> = outcome.findings.iter().map(|f| f.category).collect();
        assert_eq!(
            categories,
            vec![
                Category::Branch,
                Category::Detect,
                Category::DoubleCheck,
            ]
        );
        assert!(outcome.findings.iter().all(|f| f.file_path == "test.c"));
    }

    #[test]
    fn test_disabled_patterns_do_not_run() {
        let ctx = parse(SAMPLE);
        let config = AnalysisConfig {
            enabled: vec![Category::Branch],
            sensitivity: DEFAULT_SENSITIVITY,
        };
        let outcome = analyze(&ctx, &config);

        assert_eq!(outcome.findings.len(), 1);
        assert_eq!(outcome.findings.iter().next().unwrap().category, Category::Branch);
        assert!(outcome.edits.is_empty());
    }

    #[test]
    fn test_two_runs_are_identical() {
        let ctx = parse(SAMPLE);
        let first = analyze(&ctx, &AnalysisConfig::default());
        let second = analyze(&ctx, &AnalysisConfig::default());

        let msgs = |o: &AnalysisOutcome| -> Vec<String> {
            o.findings.iter().map(|f| f.message.clone()).collect()
        };
        assert_eq!(msgs(&first), msgs(&second));
        assert_eq!(first.edits, second.edits);
    }

    #[test]
    fn test_patched_buffer_contains_guard_insertion() {
        let ctx = parse(SAMPLE);
        let outcome = analyze(&ctx, &AnalysisConfig::default());

        assert_eq!(outcome.edits.len(), 1);
        let patched_line = outcome.patched.get(4).unwrap();
        assert!(patched_line.contains("faultDetect();"));
        // Original buffer untouched.
        assert!(!ctx.lines.get(4).unwrap().contains("faultDetect"));
    }

    #[test]
    fn test_resolve_patterns_ignores_unknown_names() {
        let names = vec![
            "branch".to_string(),
            "no_such_pattern".to_string(),
            "double_check".to_string(),
            "branch".to_string(),
        ];
        let enabled = AnalysisConfig::resolve_patterns(&names);
        assert_eq!(enabled, vec![Category::Branch, Category::DoubleCheck]);
    }

    #[test]
    fn test_severity_defaults_by_category() {
        let ctx = parse(SAMPLE);
        let outcome = analyze(&ctx, &AnalysisConfig::default());
        for finding in &outcome.findings {
            match finding.category {
                Category::Branch => assert_eq!(finding.severity, Severity::Medium),
                Category::Detect | Category::DoubleCheck => {
                    assert_eq!(finding.severity, Severity::High)
                }
                _ => {}
            }
        }
    }
}
