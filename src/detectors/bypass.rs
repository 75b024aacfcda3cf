//! # Bypass Pattern
//!
//! A guard function called directly inside an `if` condition is a single
//! point a fault can skip: glitching the call (or its return value) bypasses
//! the check entirely. The pattern reports every call expression found
//! inside an `if` condition, naming both the condition and the call.

use super::{FaultPattern, PassContext};
use crate::parser::{NodeKind, SyntaxNode};
use crate::report::{Category, Finding, Severity};

/// Detector for inline guard calls in branch conditions.
#[derive(Default)]
pub struct BypassPattern {
    condition_depth: usize,
    condition_text: String,
}

impl BypassPattern {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FaultPattern for BypassPattern {
    fn category(&self) -> Category {
        Category::Bypass
    }

    fn description(&self) -> &'static str {
        "Detects function calls placed directly inside if conditions, where \
         a single fault can skip the call and bypass the guard."
    }

    fn severity(&self) -> Severity {
        Severity::Medium
    }

    fn enter(&mut self, node: &SyntaxNode, pass: &mut PassContext) {
        match node.kind {
            NodeKind::IfCondition => {
                if self.condition_depth == 0 {
                    self.condition_text = node.text.clone();
                }
                self.condition_depth += 1;
            }
            NodeKind::Call if self.condition_depth > 0 => {
                pass.findings.append(Finding::single(
                    self.category(),
                    self.severity(),
                    format!(
                        "The condition {} contains a function {}, which may be bypassed.",
                        self.condition_text, node.text
                    ),
                    node.line,
                ));
            }
            _ => {}
        }
    }

    fn exit(&mut self, node: &SyntaxNode, _pass: &mut PassContext) {
        if node.kind == NodeKind::IfCondition {
            self.condition_depth -= 1;
        }
    }
}
