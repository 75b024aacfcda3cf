//! # Variable Collector
//!
//! One pre-pass over the syntax tree that harvests top-level initialized
//! variable declarations for detectors that need to cross-reference
//! declarations (checksum tracking in particular). Function-local
//! declarations and function prototypes are excluded; anything that does not
//! match the expected declarator shape is silently skipped rather than
//! reported, a deliberate under-approximation.

use std::cell::Cell;

use regex::Regex;

use crate::parser::{walk, NodeKind, SyntaxTree};

/// One harvested declaration record. Read-only after collection; lives for
/// one analysis run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableRecord {
    /// Declared variable name (text left of `=`).
    pub name: String,

    /// Textual type hint (`int`, `unsigned char`, ...). Best effort; no
    /// semantic resolution is attempted.
    pub declared_type: String,

    /// Initializer text (right of `=`), exactly as written.
    pub value: String,

    /// Declaration line, 1-indexed.
    pub line: usize,
}

/// Collects all top-level declarations that carry an initializer.
pub fn collect(tree: &SyntaxTree) -> Vec<VariableRecord> {
    // Declarator shaped like a function prototype: name(params).
    let prototype = Regex::new(r"^\w+\((?:[^)]*)\)$").expect("static regex");

    let mut records = Vec::new();
    let function_depth = Cell::new(0usize);

    walk(
        &tree.root,
        &mut |node| {
            match node.kind {
                NodeKind::Function => function_depth.set(function_depth.get() + 1),
                NodeKind::Declaration if function_depth.get() == 0 => {
                    let declared_type = node
                        .child_of_kind(NodeKind::TypeSpecifier)
                        .map(|t| t.text.clone())
                        .unwrap_or_default();

                    for declarator in node
                        .children
                        .iter()
                        .filter(|c| c.kind == NodeKind::Declarator)
                    {
                        let condensed: String = declarator
                            .text
                            .chars()
                            .filter(|c| !c.is_whitespace())
                            .collect();
                        if prototype.is_match(&condensed) {
                            continue;
                        }
                        let Some((name, value)) = declarator.text.split_once('=') else {
                            continue;
                        };
                        records.push(VariableRecord {
                            name: name.trim().to_string(),
                            declared_type: declared_type.clone(),
                            value: value.trim().to_string(),
                            line: declarator.line,
                        });
                    }
                }
                _ => {}
            }
        },
        &mut |node| {
            if node.kind == NodeKind::Function {
                function_depth.set(function_depth.get() - 1);
            }
        },
    );

    records
}
