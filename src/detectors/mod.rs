//! # Fault-Pattern Detection Framework
//!
//! All detectors implement the [`FaultPattern`] trait: a stateful listener
//! driven by one depth-first traversal of the syntax tree, appending findings
//! to the shared [`FindingSet`] and, for the double-check pattern, recording
//! proposed source insertions as [`LineEdit`]s. A `finalize` step runs after
//! the traversal for end-of-pass findings.
//!
//! Detectors are constructed fresh for every run; their scratch state
//! (condition-context counters, pending records) is discarded afterwards, so
//! running the same pattern twice over an unmodified tree yields identical
//! findings.
//!
//! ## Available Patterns
//!
//! | Tag | Pattern | Severity |
//! |-----|---------|----------|
//! | `branch` | Trivial constant in branch condition | Medium |
//! | `bypass` | Function call inside branch condition | Medium |
//! | `constant_coding` | Low-Hamming-weight constant | Low |
//! | `default_fail` | Unguarded default/else fallback | Medium |
//! | `detect` | Missing checksum verification | High |
//! | `double_check` | Missing complementary re-check | High |

mod branch;
mod bypass;
mod constant_coding;
mod context;
mod default_fail;
mod detect;
mod double_check;
mod literals;

pub use branch::BranchPattern;
pub use bypass::BypassPattern;
pub use constant_coding::ConstantCodingPattern;
pub use context::ConditionContext;
pub use default_fail::DefaultFailPattern;
pub use detect::DetectPattern;
pub use double_check::DoubleCheckPattern;

use crate::parser::{LineEdit, SourceLines, SyntaxNode, SyntaxTree};
use crate::report::{Category, FindingSet, Severity};

/// Shared per-run resources handed to a detector during its traversal.
///
/// `lines` is always the original, unmodified buffer; proposed insertions go
/// through `edits` and are applied by the engine once every detector has
/// finished.
pub struct PassContext<'a> {
    /// Shared findings sink, owned by the engine for the run.
    pub findings: &'a mut FindingSet,

    /// Original source lines, read-only.
    pub lines: &'a SourceLines,

    /// Recorded insertions, applied after all detectors complete.
    pub edits: &'a mut Vec<LineEdit>,
}

/// A fault-pattern detector: a stateful tree listener plus a finalize step.
pub trait FaultPattern {
    /// Configuration name; equals the category's wire tag.
    fn name(&self) -> &'static str {
        self.category().as_str()
    }

    /// Category stamped on every finding this detector produces.
    fn category(&self) -> Category;

    /// One-line description for `glitchguard list`.
    fn description(&self) -> &'static str;

    /// Default severity for this pattern's findings.
    fn severity(&self) -> Severity;

    /// Called before a node's children are visited.
    fn enter(&mut self, node: &SyntaxNode, pass: &mut PassContext);

    /// Called after a node's children are visited.
    fn exit(&mut self, _node: &SyntaxNode, _pass: &mut PassContext) {}

    /// Called once after the full traversal, for end-of-pass findings.
    fn finalize(&mut self, _pass: &mut PassContext) {}
}

/// Drives one full depth-first traversal of `tree` through `pattern`, then
/// runs its finalize step.
pub fn run_pattern(tree: &SyntaxTree, pattern: &mut dyn FaultPattern, pass: &mut PassContext) {
    fn visit(node: &SyntaxNode, pattern: &mut dyn FaultPattern, pass: &mut PassContext) {
        pattern.enter(node, pass);
        for child in &node.children {
            visit(child, pattern, pass);
        }
        pattern.exit(node, pass);
    }

    visit(&tree.root, pattern, pass);
    pattern.finalize(pass);
}
