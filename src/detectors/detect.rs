//! # Detect Pattern
//!
//! Externally supplied values should be integrity-checked before they are
//! trusted. This pattern takes the collector's records of top-level
//! initialized variables and watches the traversal for exclusive-OR
//! expressions using them; any tracked variable that never appears as an XOR
//! operand is reported at finalize time as lacking checksum verification.

use super::literals::{is_decimal, is_hex, parse_int};
use super::{FaultPattern, PassContext};
use crate::analysis::VariableRecord;
use crate::parser::{BinaryOp, NodeKind, SyntaxNode};
use crate::report::{Category, Finding, Severity};

/// Detector for missing XOR-checksum verification.
pub struct DetectPattern {
    tracked: Vec<VariableRecord>,
    verified: Vec<bool>,
}

impl DetectPattern {
    /// Tracks the collector's records for this run.
    pub fn new(variables: Vec<VariableRecord>) -> Self {
        let verified = vec![false; variables.len()];
        Self {
            tracked: variables,
            verified,
        }
    }

    fn mark_verified(&mut self, operand: &str) {
        if let Some(index) = self.tracked.iter().position(|v| v.name == operand) {
            self.verified[index] = true;
        }
    }
}

impl FaultPattern for DetectPattern {
    fn category(&self) -> Category {
        Category::Detect
    }

    fn description(&self) -> &'static str {
        "Detects externally declared initialized variables that are never \
         verified by an XOR checksum before use."
    }

    fn severity(&self) -> Severity {
        Severity::High
    }

    fn enter(&mut self, node: &SyntaxNode, _pass: &mut PassContext) {
        if node.kind != NodeKind::Binary(BinaryOp::BitXor) {
            return;
        }
        let (Some(lhs), Some(rhs)) = (node.children.first(), node.children.get(1)) else {
            return;
        };
        self.mark_verified(lhs.text.trim());
        self.mark_verified(rhs.text.trim());
    }

    fn finalize(&mut self, pass: &mut PassContext) {
        for (record, verified) in self.tracked.iter().zip(&self.verified) {
            if *verified {
                continue;
            }
            pass.findings.append(Finding::single(
                self.category(),
                self.severity(),
                format!(
                    "Recommended addition of checksum verification for variable {} = {} in line {}. See replacements!",
                    record.name, record.value, record.line
                ),
                record.line,
            ));
        }
    }
}

/// Decides whether two integer/hex literals XOR to a validity-checksum bit
/// signature: every byte of the XOR is `0xFF` except possibly the most
/// significant one, which may be `0xFF` or `0x0F`.
///
/// Exploratory heuristic: kept and tested for the day constant pairs are
/// classified, but not consulted by the traversal above, which only tracks
/// whether an XOR over the variable exists at all.
pub fn is_checksum(lhs: &str, rhs: &str) -> bool {
    let shape_ok = |s: &str| is_decimal(s) || is_hex(s);
    if !shape_ok(lhs) || !shape_ok(rhs) {
        return false;
    }
    let (Some(lhs), Some(rhs)) = (parse_int(lhs), parse_int(rhs)) else {
        return false;
    };

    let lhs_bytes = trimmed_le_bytes(lhs);
    let rhs_bytes = trimmed_le_bytes(rhs);
    if lhs_bytes.len() != rhs_bytes.len() || lhs_bytes.is_empty() {
        return false;
    }

    let last = lhs_bytes.len() - 1;
    for (i, (a, b)) in lhs_bytes.iter().zip(&rhs_bytes).enumerate() {
        let x = a ^ b;
        let ok = if i < last {
            x == 0xFF
        } else {
            x == 0xFF || x == 0x0F
        };
        if !ok {
            return false;
        }
    }
    true
}

/// Little-endian bytes with trailing zero bytes dropped, so values compare
/// by their occupied width.
fn trimmed_le_bytes(value: i64) -> Vec<u8> {
    let mut bytes = (value as u64).to_le_bytes().to_vec();
    while bytes.last() == Some(&0) {
        bytes.pop();
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::collect;
    use crate::detectors::run_pattern;
    use crate::parser::ParseContext;
    use crate::report::FindingSet;

    fn run(src: &str) -> Vec<Finding> {
        let ctx = ParseContext::from_source("test.c", src.to_string()).unwrap();
        let variables = collect(&ctx.tree);
        let mut findings = FindingSet::new();
        let mut edits = Vec::new();
        let mut pass = PassContext {
            findings: &mut findings,
            lines: &ctx.lines,
            edits: &mut edits,
        };
        let mut pattern = DetectPattern::new(variables);
        run_pattern(&ctx.tree, &mut pattern, &mut pass);
        findings.into_vec()
    }

    #[test]
    fn test_unverified_variable_is_reported_once() {
        let src = "int key = 0x5A;\n\nvoid f(void) {\n    use(key);\n}\n";
        let findings = run(src);
        assert_eq!(findings.len(), 1);
        assert!(findings[0]
            .message
            .contains("checksum verification for variable key = 0x5A in line 1"));
        assert_eq!(findings[0].line, 1);
    }

    #[test]
    fn test_xor_operand_suppresses_the_finding() {
        let src = "int key = 0x5A;\nint check = 0xA5;\n\nint verify(void) {\n    return key ^ check;\n}\n";
        assert!(run(src).is_empty());
    }

    #[test]
    fn test_xor_assign_shorthand_is_not_an_xor_expression() {
        // `^=` is an assignment, not an exclusive-or expression; the value
        // is being rewritten, not verified.
        let src = "int key = 0x5A;\n\nvoid f(void) {\n    key ^= 1;\n}\n";
        assert_eq!(run(src).len(), 1);
    }

    #[test]
    fn test_is_checksum_signature() {
        // 0x5A ^ 0xA5 == 0xFF: single-byte full complement.
        assert!(is_checksum("0x5A", "0xA5"));
        // 0x125A ^ 0xEDA5 == 0xFFFF.
        assert!(is_checksum("0x125A", "0xEDA5"));
        // High nibble only differs by 0x0F.
        assert!(is_checksum("0x105A", "0x1FA5"));
        // Not a complement pair.
        assert!(!is_checksum("0x5A", "0x5A"));
        // Width mismatch.
        assert!(!is_checksum("0x5A", "0xA5A5"));
        // Non-literals.
        assert!(!is_checksum("key", "0xA5"));
    }
}
