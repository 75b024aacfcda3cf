//! # Parser Module
//!
//! Front end that turns C source text into the inputs the analysis engine
//! expects: a lowered [`SyntaxTree`] and the matching [`SourceLines`] buffer.
//! Parsing is done with `tree-sitter` and the C grammar; the raw CST is
//! lowered immediately (see [`lower`]) and never leaves this module.
//!
//! ## Key Types
//!
//! - [`ParseContext`] - everything the engine needs for one translation unit
//! - [`SyntaxTree`] / [`SyntaxNode`] - the lowered, detector-facing tree
//! - [`SourceLines`] - 1-indexed source line buffer

mod lower;
mod source;
mod tree;

pub use lower::lower;
pub use source::{apply_edits, LineEdit, SourceLines};
pub use tree::{walk, BinaryOp, NodeKind, SyntaxNode, SyntaxTree};

use thiserror::Error;

/// Errors produced while preparing a translation unit for analysis.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("tree-sitter rejected the C grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    #[error("parser produced no tree for {0}")]
    NoTree(String),
}

/// Complete analysis context for one parsed C translation unit.
///
/// Holds the raw source, the lowered syntax tree, and the line buffer. The
/// tree is immutable; the line buffer is only ever mutated by the engine when
/// it applies recorded edits after all detectors have run.
#[derive(Debug, Clone)]
pub struct ParseContext {
    /// Path identifier for the source file.
    pub file_path: String,

    /// Raw source code content.
    pub source_code: String,

    /// Lowered syntax tree.
    pub tree: SyntaxTree,

    /// Original source lines, 1-indexed like the tree's line numbers.
    pub lines: SourceLines,
}

impl ParseContext {
    /// Parses C source text into an analysis context.
    ///
    /// tree-sitter is error-tolerant: malformed regions become error nodes
    /// that lower to opaque subtrees, so one bad construct does not abort
    /// analysis of the rest of the file.
    pub fn from_source(file_path: &str, source_code: String) -> Result<Self, ParseError> {
        let mut parser = tree_sitter::Parser::new();
        parser.set_language(&tree_sitter_c::LANGUAGE.into())?;

        let cst = parser
            .parse(&source_code, None)
            .ok_or_else(|| ParseError::NoTree(file_path.to_string()))?;

        let root = lower(cst.root_node(), &source_code);
        let lines = SourceLines::from_source(&source_code);

        Ok(Self {
            file_path: file_path.to_string(),
            source_code,
            tree: SyntaxTree::new(root),
            lines,
        })
    }

    /// Loads and parses a C file from disk.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ParseError> {
        let source = std::fs::read_to_string(path).map_err(|e| ParseError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_source(&path.display().to_string(), source)
    }
}
