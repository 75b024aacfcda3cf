//! # ConstantCoding Pattern
//!
//! Sentinel constants stored in program state should be far apart in Hamming
//! distance, so a handful of bit flips cannot turn one valid value into
//! another. Initializers and assignments using integer constants with a
//! Hamming weight below the sensitivity threshold are reported with a
//! recommendation to pick a distant encoding (e.g. `0xA5` instead of `1`).

use super::literals::{hamming_weight, is_decimal, is_hex, parse_int};
use super::{FaultPattern, PassContext};
use crate::parser::{NodeKind, SyntaxNode};
use crate::report::{Category, Finding, Severity};

/// Detector for low-Hamming-weight constant encodings.
pub struct ConstantCodingPattern {
    sensitivity: u32,
}

impl ConstantCodingPattern {
    pub fn new(sensitivity: u32) -> Self {
        Self { sensitivity }
    }

    fn check_constant(&self, node: &SyntaxNode, value_text: &str, pass: &mut PassContext) {
        let value_text = value_text.trim();
        if !is_decimal(value_text) && !is_hex(value_text) {
            return;
        }
        let Some(value) = parse_int(value_text) else {
            log::warn!("malformed integer literal {value_text:?} skipped");
            return;
        };
        if hamming_weight(value) < self.sensitivity {
            pass.findings.append(Finding::single(
                self.category(),
                self.severity(),
                format!(
                    "\"{}\" Using constant with low Hamming weight; prefer a Hamming-distant encoding.",
                    node.text
                ),
                node.line,
            ));
        }
    }
}

impl FaultPattern for ConstantCodingPattern {
    fn category(&self) -> Category {
        Category::ConstantCoding
    }

    fn description(&self) -> &'static str {
        "Detects integer constants with low Hamming weight in initializers \
         and assignments; nearby encodings are reachable by few bit flips."
    }

    fn severity(&self) -> Severity {
        Severity::Low
    }

    fn enter(&mut self, node: &SyntaxNode, pass: &mut PassContext) {
        match node.kind {
            NodeKind::Declarator => {
                if let Some((_, value)) = node.text.split_once('=') {
                    self.check_constant(node, value, pass);
                }
            }
            NodeKind::Assignment => {
                if let Some(rhs) = node.children.get(1) {
                    if rhs.kind == NodeKind::Literal {
                        self.check_constant(node, &rhs.text, pass);
                    }
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::run_pattern;
    use crate::parser::ParseContext;
    use crate::report::FindingSet;

    fn run(src: &str, sensitivity: u32) -> Vec<Finding> {
        let ctx = ParseContext::from_source("test.c", src.to_string()).unwrap();
        let mut findings = FindingSet::new();
        let mut edits = Vec::new();
        let mut pass = PassContext {
            findings: &mut findings,
            lines: &ctx.lines,
            edits: &mut edits,
        };
        let mut pattern = ConstantCodingPattern::new(sensitivity);
        run_pattern(&ctx.tree, &mut pattern, &mut pass);
        findings.into_vec()
    }

    #[test]
    fn test_low_weight_initializer_is_reported() {
        let findings = run("int authenticated = 1;\n", 3);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("authenticated = 1"));
    }

    #[test]
    fn test_distant_constant_is_quiet() {
        // weight(0x5A) == 4.
        assert!(run("int state = 0x5A;\n", 3).is_empty());
    }

    #[test]
    fn test_assignment_rhs_is_checked() {
        let src = "void f(int mode) {\n    mode = 2;\n}\n";
        let findings = run(src, 3);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].line, 2);
    }

    #[test]
    fn test_non_literal_rhs_is_ignored() {
        let src = "void f(int mode, int other) {\n    mode = other;\n}\n";
        assert!(run(src, 3).is_empty());
    }
}
