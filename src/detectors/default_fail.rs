//! # DefaultFail Pattern
//!
//! Fallback paths should fail safe. A `switch` `default:` or an `if/else`
//! fallback that does real work is exactly where corrupted control flow ends
//! up under fault injection, so anything beyond a bare `break;` or a
//! valueless `return;` in those positions is reported.

use super::{FaultPattern, PassContext};
use crate::parser::{NodeKind, SyntaxNode};
use crate::report::{Category, Finding, Severity};

/// Detector for unsafe `default:`/`else` fallback bodies.
#[derive(Default)]
pub struct DefaultFailPattern;

impl DefaultFailPattern {
    pub fn new() -> Self {
        Self
    }

    /// A statement that makes a fallback harmless: `break;` or a valueless
    /// `return;`.
    fn is_safe_fallback(node: &SyntaxNode) -> bool {
        match node.kind {
            NodeKind::Break => true,
            NodeKind::Return => node.children.is_empty(),
            _ => false,
        }
    }

    fn check_default(&self, node: &SyntaxNode, pass: &mut PassContext) {
        let safe = node.first_child().is_some_and(Self::is_safe_fallback);
        if !safe {
            pass.findings.append(Finding::single(
                self.category(),
                self.severity(),
                format!(
                    "\"{}\" uses potentially unsafe default statement. ",
                    condense(&node.text)
                ),
                node.line,
            ));
        }
    }

    fn check_else(&self, if_node: &SyntaxNode, pass: &mut PassContext) {
        let Some(else_node) = if_node.child_of_kind(NodeKind::Else) else {
            return;
        };
        let Some(body) = else_node.first_child() else {
            return;
        };

        let safe = match body.kind {
            // else-if chain: the next condition carries its own checks.
            NodeKind::If => true,
            NodeKind::Return => body.children.is_empty(),
            NodeKind::Compound => {
                body.children.len() == 1 && Self::is_safe_fallback(&body.children[0])
            }
            _ => false,
        };

        if !safe {
            pass.findings.append(Finding::single(
                self.category(),
                self.severity(),
                "\"else\" uses potentially unsafe else statement. ".to_string(),
                else_node.line,
            ));
        }
    }
}

/// Collapses whitespace runs so multi-line bodies quote as one line.
fn condense(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl FaultPattern for DefaultFailPattern {
    fn category(&self) -> Category {
        Category::DefaultFail
    }

    fn description(&self) -> &'static str {
        "Detects switch default labels and else branches whose body is not a \
         bare break/return; such fallbacks execute sensitive work when a \
         fault corrupts the selector."
    }

    fn severity(&self) -> Severity {
        Severity::Medium
    }

    fn enter(&mut self, node: &SyntaxNode, pass: &mut PassContext) {
        match node.kind {
            NodeKind::DefaultLabel => self.check_default(node, pass),
            NodeKind::If => self.check_else(node, pass),
            _ => {}
        }
    }
}
