//! # DoubleCheck Pattern
//!
//! A single equality test guarding a sensitive block is a single point of
//! failure: one glitch flips the comparison and the guarded code runs. The
//! hardened idiom re-tests the same variable against the bitwise (or
//! boolean) complement of the constant with the complementary relation, so
//! no single bit flip can satisfy both tests.
//!
//! The pattern records one entry per `if` whose condition compares a
//! variable against a constant. When the traversal closes the root
//! conditional (the `if` whose end line reaches the furthest end line seen
//! in the current nest), recorded entries are walked pairwise: an entry
//! followed by a nested entry re-testing the same variable against the
//! complemented constant is a satisfied double check and both are consumed;
//! anything else is reported, and a synthesized complement guard is proposed
//! as a source insertion under the guarded block's opening brace.
//!
//! Complement rules: integers compare under 16-bit truncation
//! (`candidate == !original & 0xFFFF`); booleans must differ. `for`/`while`
//! headers are never tracked, but `if`s inside loop bodies are.

use super::context::ConditionContext;
use super::literals::{is_bool, is_decimal, is_hex, parse_int};
use super::{FaultPattern, PassContext};
use crate::parser::{BinaryOp, LineEdit, NodeKind, SourceLines, SyntaxNode};
use crate::report::{Category, Finding, Severity};

/// Relational operators and their complements, as fixed pairs.
const RELATIONAL_PAIRS: [(&str, &str); 6] = [
    ("<", ">="),
    (">", "<="),
    ("<=", ">"),
    (">=", "<"),
    ("==", "!="),
    ("!=", "=="),
];

/// Looks up the complementary relation for `op`.
fn complement_relation(op: &str) -> &'static str {
    RELATIONAL_PAIRS
        .iter()
        .find(|(from, _)| *from == op)
        .map(|(_, to)| *to)
        .unwrap_or("!=")
}

/// Normalized right-hand constant of a recorded condition.
#[derive(Debug, Clone, PartialEq, Eq)]
enum CondValue {
    Int(i64),
    Bool(bool),
    /// Neither side was a literal; kept textually for guard synthesis only.
    Other(String),
}

impl CondValue {
    fn parse(text: &str) -> CondValue {
        if is_bool(text) {
            return CondValue::Bool(text.eq_ignore_ascii_case("true"));
        }
        if is_decimal(text) || is_hex(text) {
            match parse_int(text) {
                Some(v) => return CondValue::Int(v),
                None => log::warn!("malformed integer literal {text:?} skipped"),
            }
        }
        CondValue::Other(text.to_string())
    }

    /// True when `candidate` is the complement of `self`: 16-bit truncated
    /// bitwise complement for integers, negation for booleans.
    fn is_complement_of(&self, candidate: &CondValue) -> bool {
        match (self, candidate) {
            (CondValue::Int(original), CondValue::Int(candidate)) => {
                (candidate & 0xFFFF) == (!original & 0xFFFF)
            }
            (CondValue::Bool(original), CondValue::Bool(candidate)) => candidate != original,
            _ => false,
        }
    }
}

/// One tracked `if` condition: variable text, relation, constant, and the
/// span/indentation of the owning `if`.
#[derive(Debug, Clone)]
struct CondRecord {
    lhs: String,
    op: BinaryOp,
    value: CondValue,
    start_line: usize,
    end_line: usize,
    indent: usize,
}

/// Open `if` statements along the current traversal path.
struct IfFrame {
    start_line: usize,
    end_line: usize,
    indent: usize,
}

/// Detector for conditionals missing a complementary re-check.
pub struct DoubleCheckPattern {
    context: ConditionContext,
    if_stack: Vec<IfFrame>,
    records: Vec<CondRecord>,
    condition_recorded: bool,
    root_end: usize,
}

impl DoubleCheckPattern {
    pub fn new() -> Self {
        Self {
            context: ConditionContext::new(),
            if_stack: Vec::new(),
            records: Vec::new(),
            condition_recorded: false,
            root_end: 0,
        }
    }

    /// Records the first constant equality test of the current condition.
    fn record_equality(&mut self, node: &SyntaxNode, op: BinaryOp) {
        let (Some(lhs), Some(rhs)) = (node.children.first(), node.children.get(1)) else {
            return;
        };
        let lhs = lhs.text.trim();
        let rhs = rhs.text.trim();
        let Some(frame) = self.if_stack.last() else {
            return;
        };

        let literal = |s: &str| is_decimal(s) || is_hex(s) || is_bool(s);
        let (var, value) = if literal(rhs) {
            (lhs, CondValue::parse(rhs))
        } else if literal(lhs) {
            (rhs, CondValue::parse(lhs))
        } else {
            // Both sides are expressions; track textually so the guard can
            // still be synthesized, though no complement can match it.
            (lhs, CondValue::Other(rhs.to_string()))
        };

        self.records.push(CondRecord {
            lhs: var.to_string(),
            op,
            value,
            start_line: frame.start_line,
            end_line: frame.end_line,
            indent: frame.indent,
        });
        self.condition_recorded = true;
    }

    /// Walks the recorded chain once the root conditional closes: a record
    /// immediately followed by a nested complement re-test is consumed as a
    /// satisfied double check; everything else is reported and patched.
    fn match_and_report(&mut self, pass: &mut PassContext) {
        let mut j = 0;
        while j < self.records.len() {
            let consumed = match self.records.get(j + 1) {
                Some(next) => {
                    let cur = &self.records[j];
                    let nests = next.start_line > cur.start_line && next.end_line <= cur.end_line;
                    nests && next.lhs == cur.lhs && cur.value.is_complement_of(&next.value)
                }
                None => false,
            };
            if consumed {
                j += 2;
            } else {
                self.report(j, pass);
                j += 1;
            }
        }
        self.records.clear();
    }

    fn report(&self, index: usize, pass: &mut PassContext) {
        let record = &self.records[index];
        pass.findings.append(Finding::spanning(
            self.category(),
            self.severity(),
            format!(
                "Recommended addition of complement check regarding condition at {} to {}. See replacements! ",
                record.start_line, record.end_line
            ),
            record.start_line,
            record.end_line,
        ));

        let guard = self.synthesize_guard(record, pass.lines);
        // The guard lands under the guarded block's opening brace, scanned
        // forward from the if's start line.
        for line_no in record.start_line..=record.end_line {
            let Some(line) = pass.lines.get(line_no) else {
                break;
            };
            if line.trim_end().ends_with('{') {
                pass.edits.push(LineEdit {
                    line: line_no,
                    text: format!("\n{guard}"),
                });
                break;
            }
        }
    }

    /// Builds the complement guard block for a record.
    fn synthesize_guard(&self, record: &CondRecord, lines: &SourceLines) -> String {
        let lhs = format!(
            "{}{}",
            complement_prefix(lines, record.start_line, &record.lhs),
            record.lhs
        );
        let relation = complement_relation(record.op.token());
        let rhs = match &record.value {
            CondValue::Int(v) => (!v).to_string(),
            CondValue::Bool(b) => (!b).to_string(),
            CondValue::Other(text) => {
                format!("{}{}", complement_prefix(lines, record.start_line, text), text)
            }
        };

        let indent = " ".repeat(record.indent);
        format!("{indent}if({lhs} {relation} {rhs}){{\n{indent}{indent}faultDetect();\n{indent}}}")
    }
}

impl Default for DoubleCheckPattern {
    fn default() -> Self {
        Self::new()
    }
}

/// `!` when a preceding line declares the expression with a boolean type,
/// `~` otherwise: the complement operator must match the operand's apparent
/// type.
fn complement_prefix(lines: &SourceLines, from_line: usize, expression: &str) -> &'static str {
    let needle = format!("bool {expression}");
    for line_no in (1..=from_line).rev() {
        if let Some(line) = lines.get(line_no) {
            if line.contains(&needle) {
                return "!";
            }
        }
    }
    "~"
}

impl FaultPattern for DoubleCheckPattern {
    fn category(&self) -> Category {
        Category::DoubleCheck
    }

    fn description(&self) -> &'static str {
        "Detects if conditions comparing a variable against a constant with \
         no complementary re-check; proposes an inserted complement guard \
         calling faultDetect()."
    }

    fn severity(&self) -> Severity {
        Severity::High
    }

    fn enter(&mut self, node: &SyntaxNode, _pass: &mut PassContext) {
        self.context.enter(node);
        match node.kind {
            NodeKind::If => {
                self.if_stack.push(IfFrame {
                    start_line: node.line,
                    end_line: node.end_line,
                    indent: node.column,
                });
                if node.end_line > self.root_end {
                    self.root_end = node.end_line;
                }
            }
            NodeKind::IfCondition => {
                self.condition_recorded = false;
            }
            NodeKind::Binary(op) if op.is_equality() => {
                if self.context.in_if_condition() && !self.condition_recorded {
                    self.record_equality(node, op);
                }
            }
            _ => {}
        }
    }

    fn exit(&mut self, node: &SyntaxNode, pass: &mut PassContext) {
        if node.kind == NodeKind::If {
            self.if_stack.pop();
            // Closing the root conditional: every if seen since the root
            // opened has been recorded, decide the chain now.
            if node.end_line >= self.root_end {
                if !self.records.is_empty() {
                    self.match_and_report(pass);
                }
                self.root_end = 0;
            }
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

    fn run(src: &str) -> (Vec<Finding>, Vec<LineEdit>) {
        let ctx = ParseContext::from_source("test.c", src.to_string()).unwrap();
        let mut findings = FindingSet::new();
        let mut edits = Vec::new();
        let mut pass = PassContext {
            findings: &mut findings,
            lines: &ctx.lines,
            edits: &mut edits,
        };
        let mut pattern = DoubleCheckPattern::new();
        run_pattern(&ctx.tree, &mut pattern, &mut pass);
        (findings.into_vec(), edits)
    }

    #[test]
    fn test_lone_constant_check_gets_spanning_finding_and_guard() {
        let src = "void f(int x) {\n    if (x == 5) {\n        foo();\n    }\n}\n";
        let (findings, edits) = run(src);

        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("condition at 2 to 4"));
        assert_eq!(findings[0].line, 2);
        assert_eq!(findings[0].end_line, Some(4));

        // Guard appended under the opening brace, 16-bit complement of 5.
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].line, 2);
        assert!(edits[0].text.contains("if(~x != -6){"));
        assert!(edits[0].text.contains("faultDetect();"));
    }

    #[test]
    fn test_else_if_complement_is_consumed() {
        let src = "void f(int x) {\n    if (x == 5) {\n        foo();\n    } else if (x == -6) {\n        bar();\n    }\n}\n";
        let (findings, edits) = run(src);
        assert!(findings.is_empty());
        assert!(edits.is_empty());
    }

    #[test]
    fn test_nested_complement_is_consumed() {
        let src = "void f(int x) {\n    if (x == 5) {\n        if (x != -6) {\n            foo();\n        }\n    }\n}\n";
        let (findings, edits) = run(src);
        assert!(findings.is_empty());
        assert!(edits.is_empty());
    }

    #[test]
    fn test_nested_non_complement_reports_both() {
        let src = "void f(int x) {\n    if (x == 5) {\n        if (x == 3) {\n            foo();\n        }\n    }\n}\n";
        let (findings, edits) = run(src);
        assert_eq!(findings.len(), 2);
        assert_eq!(edits.len(), 2);
    }

    #[test]
    fn test_boolean_complement_pair_is_consumed() {
        let src = "void f(bool armed) {\n    if (armed == true) {\n        foo();\n    } else if (armed == false) {\n        bar();\n    }\n}\n";
        let (findings, _) = run(src);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_boolean_variable_gets_logical_not_guard() {
        let src = "bool armed = true;\n\nvoid f(void) {\n    if (armed == true) {\n        foo();\n    }\n}\n";
        let (findings, edits) = run(src);
        assert_eq!(findings.len(), 1);
        assert_eq!(edits.len(), 1);
        assert!(edits[0].text.contains("if(!armed != false){"));
    }

    #[test]
    fn test_loop_conditions_are_not_tracked() {
        let src = "void f(int x) {\n    while (x == 1) {\n        x--;\n    }\n    for (int i = 0; i == 0; i++) {\n        x++;\n    }\n}\n";
        let (findings, edits) = run(src);
        assert!(findings.is_empty());
        assert!(edits.is_empty());
    }

    #[test]
    fn test_if_without_constant_equality_is_invisible() {
        let src = "void f(int x, int y) {\n    if (x > y) {\n        x = y;\n    }\n}\n";
        let (findings, _) = run(src);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_hex_constant_normalizes_to_decimal_guard() {
        let src = "void f(int x) {\n    if (x == 0x0005) {\n        foo();\n    }\n}\n";
        let (_, edits) = run(src);
        assert_eq!(edits.len(), 1);
        assert!(edits[0].text.contains("if(~x != -6){"));
    }

    #[test]
    fn test_complement_relation_table() {
        assert_eq!(complement_relation("<"), ">=");
        assert_eq!(complement_relation(">"), "<=");
        assert_eq!(complement_relation("<="), ">");
        assert_eq!(complement_relation(">="), "<");
        assert_eq!(complement_relation("=="), "!=");
        assert_eq!(complement_relation("!="), "==");
    }

    #[test]
    fn test_sixteen_bit_complement_rule() {
        assert!(CondValue::Int(5).is_complement_of(&CondValue::Int(-6)));
        assert!(CondValue::Int(5).is_complement_of(&CondValue::Int(0xFFFA)));
        assert!(!CondValue::Int(5).is_complement_of(&CondValue::Int(5)));
        assert!(CondValue::Bool(true).is_complement_of(&CondValue::Bool(false)));
        assert!(!CondValue::Bool(true).is_complement_of(&CondValue::Bool(true)));
        assert!(!CondValue::Int(5).is_complement_of(&CondValue::Other("y".into())));
    }
}
