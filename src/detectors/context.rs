//! # Traversal Condition Context
//!
//! Several patterns need to know where the traversal cursor currently sits:
//! inside an `if` condition, a `for`/`while` header, a logical-OR or
//! logical-AND sub-expression. Instead of single booleans (which break under
//! re-entrant nesting, e.g. an `if` inside a `for` body inside another `if`),
//! this tracker keeps depth counters pushed and popped at enter/exit
//! boundaries.

use crate::parser::{BinaryOp, NodeKind, SyntaxNode};

/// Depth counters for the condition scopes a detector cares about.
///
/// Call [`enter`](Self::enter) and [`exit`](Self::exit) from the pattern's
/// own enter/exit callbacks; the walk guarantees they pair in LIFO order.
#[derive(Debug, Default)]
pub struct ConditionContext {
    if_condition: usize,
    for_condition: usize,
    while_condition: usize,
    logical_or: usize,
    logical_and: usize,
}

impl ConditionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&mut self, node: &SyntaxNode) {
        match node.kind {
            NodeKind::IfCondition => self.if_condition += 1,
            NodeKind::ForCondition => self.for_condition += 1,
            NodeKind::WhileCondition => self.while_condition += 1,
            NodeKind::Binary(BinaryOp::LogicalOr) => self.logical_or += 1,
            NodeKind::Binary(BinaryOp::LogicalAnd) => self.logical_and += 1,
            _ => {}
        }
    }

    pub fn exit(&mut self, node: &SyntaxNode) {
        match node.kind {
            NodeKind::IfCondition => self.if_condition -= 1,
            NodeKind::ForCondition => self.for_condition -= 1,
            NodeKind::WhileCondition => self.while_condition -= 1,
            NodeKind::Binary(BinaryOp::LogicalOr) => self.logical_or -= 1,
            NodeKind::Binary(BinaryOp::LogicalAnd) => self.logical_and -= 1,
            _ => {}
        }
    }

    /// Inside the condition expression of an `if`.
    pub fn in_if_condition(&self) -> bool {
        self.if_condition > 0
    }

    /// Inside the middle clause of a `for` header.
    pub fn in_for_condition(&self) -> bool {
        self.for_condition > 0
    }

    /// Inside a `while`/`do-while` condition.
    pub fn in_while_condition(&self) -> bool {
        self.while_condition > 0
    }

    /// Inside at least one `||` expression.
    pub fn in_or(&self) -> bool {
        self.logical_or > 0
    }

    /// Inside at least one `&&` expression.
    pub fn in_and(&self) -> bool {
        self.logical_and > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{walk, NodeKind, ParseContext};

    #[test]
    fn test_context_tracks_nested_condition_scopes() {
        let src = "void f(int x, int y) {\n    for (int i = 0; i < 3; i++) {\n        if (x == 1 || (y == 2 && x == 3)) {\n            x = 0;\n        }\n    }\n}\n";
        let ctx = ParseContext::from_source("test.c", src.to_string()).unwrap();

        let tracker = std::cell::RefCell::new(ConditionContext::new());
        // (in_if, in_or, in_and) observed at each equality expression.
        let mut observed = Vec::new();

        walk(
            &ctx.tree.root,
            &mut |n| {
                let mut tracker = tracker.borrow_mut();
                tracker.enter(n);
                if n.kind == NodeKind::Binary(crate::parser::BinaryOp::Equal) {
                    observed.push((tracker.in_if_condition(), tracker.in_or(), tracker.in_and()));
                }
            },
            &mut |n| tracker.borrow_mut().exit(n),
        );
        let tracker = tracker.into_inner();

        assert_eq!(
            observed,
            vec![
                (true, true, false), // x == 1
                (true, true, true),  // y == 2
                (true, true, true),  // x == 3
            ]
        );
        // All scopes unwound.
        assert!(!tracker.in_if_condition());
        assert!(!tracker.in_or());
        assert!(!tracker.in_and());
    }
}
