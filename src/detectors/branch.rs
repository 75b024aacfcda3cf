//! # Branch Pattern
//!
//! Flags trivial constants compared inside `if` conditions. A comparison
//! against a bare boolean literal, or against an integer whose Hamming weight
//! is below the sensitivity threshold, can be satisfied by very few bit
//! flips and is a weak guard under fault injection.
//!
//! ## Aggregation
//!
//! Within one `if`, each equality/relational term is tagged by the logical
//! operator it appears under. The condition is reported when all AND-tagged
//! terms are trivial, or when at least one OR-tagged term is trivial and no
//! non-trivial OR term exists. A condition with no logical operators reports
//! its single term directly. Terms inside a `for` header are never
//! considered.

use super::context::ConditionContext;
use super::literals::{hamming_weight, is_bool, is_decimal, is_hex, parse_int};
use super::{FaultPattern, PassContext};
use crate::parser::{BinaryOp, NodeKind, SyntaxNode};
use crate::report::{Category, Finding, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupTag {
    Or,
    And,
}

/// One term's verdict, parked until the enclosing condition is left.
struct TempResult {
    trivial: bool,
    tag: GroupTag,
    finding: Option<Finding>,
}

/// Detector for trivial branch conditions.
pub struct BranchPattern {
    sensitivity: u32,
    context: ConditionContext,
    temp: Vec<TempResult>,
}

impl BranchPattern {
    /// `sensitivity` is the Hamming-weight threshold: integer constants with
    /// weight strictly below it are trivial.
    pub fn new(sensitivity: u32) -> Self {
        Self {
            sensitivity,
            context: ConditionContext::new(),
            temp: Vec::new(),
        }
    }

    fn integer_operand(lhs: &str, rhs: &str) -> Option<i64> {
        for side in [lhs, rhs] {
            if is_decimal(side) || is_hex(side) {
                match parse_int(side) {
                    Some(v) => return Some(v),
                    None => log::warn!("malformed integer literal {side:?} skipped"),
                }
            }
        }
        None
    }

    /// Parks or directly reports one condition term.
    fn record(&mut self, trivial: bool, finding: Option<Finding>, pass: &mut PassContext) {
        let tag = if self.context.in_and() {
            GroupTag::And
        } else if self.context.in_or() {
            GroupTag::Or
        } else {
            // Simple condition, no logical operators: report directly.
            if let Some(finding) = finding {
                if trivial {
                    pass.findings.append(finding);
                }
            }
            return;
        };
        self.temp.push(TempResult {
            trivial,
            tag,
            finding,
        });
    }

    fn examine_term(&mut self, node: &SyntaxNode, op: BinaryOp, pass: &mut PassContext) {
        let (Some(lhs), Some(rhs)) = (node.children.first(), node.children.get(1)) else {
            return;
        };
        let lhs = lhs.text.trim();
        let rhs = rhs.text.trim();

        if op == BinaryOp::Equal && (is_bool(lhs) || is_bool(rhs)) {
            let finding = Finding::single(
                self.category(),
                self.severity(),
                format!("\"{}\" Using trivial bool in branch statement.", node.text),
                node.line,
            );
            self.record(true, Some(finding), pass);
            return;
        }

        match Self::integer_operand(lhs, rhs) {
            Some(value) => {
                let trivial = hamming_weight(value) < self.sensitivity;
                let finding = trivial.then(|| {
                    Finding::single(
                        self.category(),
                        self.severity(),
                        format!(
                            "\"{}\" Using explicit integer instead of variable in branch.",
                            node.text
                        ),
                        node.line,
                    )
                });
                self.record(trivial, finding, pass);
            }
            None => {
                // No literal operand: a non-trivial term, relevant only to
                // the aggregation of an OR/AND group.
                if self.context.in_or() || self.context.in_and() {
                    self.record(false, None, pass);
                }
            }
        }
    }

    /// Decides the parked terms when the condition is left.
    fn aggregate(&mut self, pass: &mut PassContext) {
        let mut trivial_or = 0usize;
        let mut trivial_and = 0usize;
        let mut nontrivial_or = 0usize;
        let mut nontrivial_and = 0usize;
        for result in &self.temp {
            match (result.trivial, result.tag) {
                (true, GroupTag::Or) => trivial_or += 1,
                (true, GroupTag::And) => trivial_and += 1,
                (false, GroupTag::Or) => nontrivial_or += 1,
                (false, GroupTag::And) => nontrivial_and += 1,
            }
        }

        let and_group_trivial = trivial_and >= 1 && nontrivial_and == 0;
        let or_group_trivial = trivial_or >= 1 && nontrivial_or == 0;

        if and_group_trivial || or_group_trivial {
            for result in self.temp.drain(..) {
                if result.trivial {
                    if let Some(finding) = result.finding {
                        pass.findings.append(finding);
                    }
                }
            }
        }
        self.temp.clear();
    }
}

impl FaultPattern for BranchPattern {
    fn category(&self) -> Category {
        Category::Branch
    }

    fn description(&self) -> &'static str {
        "Detects trivial constants (boolean literals, low-Hamming-weight \
         integers) compared inside if conditions; such checks can be \
         defeated by a single-bit fault."
    }

    fn severity(&self) -> Severity {
        Severity::Medium
    }

    fn enter(&mut self, node: &SyntaxNode, pass: &mut PassContext) {
        self.context.enter(node);

        if node.kind == NodeKind::IfCondition {
            self.temp.clear();
            return;
        }

        if !self.context.in_if_condition() || self.context.in_for_condition() {
            return;
        }
        match node.kind {
            NodeKind::Binary(op @ BinaryOp::Equal)
            | NodeKind::Binary(op @ BinaryOp::LessEqual)
            | NodeKind::Binary(op @ BinaryOp::GreaterEqual) => {
                self.examine_term(node, op, pass);
            }
            _ => {}
        }
    }

    fn exit(&mut self, node: &SyntaxNode, pass: &mut PassContext) {
        if node.kind == NodeKind::IfCondition {
            // Aggregate before the scope flag unwinds; nested statements in
            // the body can no longer clobber the parked terms.
            self.aggregate(pass);
        }
        self.context.exit(node);
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
        let mut pattern = BranchPattern::new(sensitivity);
        run_pattern(&ctx.tree, &mut pattern, &mut pass);
        findings.into_vec()
    }

    fn wrap(condition: &str) -> String {
        format!("void f(int x, int a, int b, int flag) {{\n    if ({condition}) {{\n        x = 1;\n    }}\n}}\n")
    }

    #[test]
    fn test_simple_zero_compare_triggers() {
        let findings = run(&wrap("x == 0"), 3);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("x == 0"));
        assert!(findings[0].message.contains("explicit integer"));
        assert_eq!(findings[0].line, 2);
    }

    #[test]
    fn test_boolean_literal_compare_triggers() {
        let findings = run(&wrap("flag == true"), 3);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("trivial bool"));
    }

    #[test]
    fn test_high_weight_constant_is_quiet() {
        // weight(7) == 3, not < 3.
        assert!(run(&wrap("x == 7"), 3).is_empty());
        // Raising the sensitivity flags it.
        assert_eq!(run(&wrap("x == 7"), 4).len(), 1);
    }

    #[test]
    fn test_relational_operators_use_hamming_rule() {
        assert_eq!(run(&wrap("x <= 2"), 3).len(), 1);
        assert_eq!(run(&wrap("x >= 0x5A"), 3).len(), 0);
        // Plain < is outside the pattern.
        assert!(run(&wrap("x < 1"), 3).is_empty());
    }

    #[test]
    fn test_and_group_requires_all_terms_trivial() {
        // weight(7) == 3 is non-trivial at sensitivity 3, so the AND group
        // must stay quiet even though a == 0 alone is trivial.
        assert!(run(&wrap("a == 0 && b == 7"), 3).is_empty());
        // All-trivial AND group reports every trivial term.
        assert_eq!(run(&wrap("a == 0 && b == 1"), 3).len(), 2);
    }

    #[test]
    fn test_or_group_blocked_by_nontrivial_term() {
        assert!(run(&wrap("a == 0 || b == 7"), 3).is_empty());
        assert_eq!(run(&wrap("a == 0 || b == 1"), 3).len(), 2);
    }

    #[test]
    fn test_for_condition_is_ignored() {
        let src = "void f(void) {\n    for (int i = 0; i <= 2; i++) {\n        i++;\n    }\n}\n";
        assert!(run(src, 3).is_empty());
    }

    #[test]
    fn test_equality_in_if_body_is_ignored() {
        let src = "void f(int x, int y) {\n    if (x > y) {\n        int t = (y == 0);\n    }\n}\n";
        assert!(run(src, 3).is_empty());
    }

    #[test]
    fn test_fresh_runs_are_idempotent() {
        let src = wrap("x == 0");
        let first = run(&src, 3);
        let second = run(&src, 3);
        assert_eq!(first.len(), second.len());
        assert_eq!(first[0].message, second[0].message);
    }
}
