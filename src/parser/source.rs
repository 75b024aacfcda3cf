//! # Source Line Buffer
//!
//! The 1-indexed line buffer shared with the detectors. Detectors never edit
//! the buffer in place; proposed insertions are captured as [`LineEdit`]
//! records and applied by the engine in one final pass, so every detector in
//! a run sees original line text regardless of run order.

use serde::{Deserialize, Serialize};

/// Ordered sequence of source text lines, 1-indexed to match the syntax
/// tree's line numbers.
#[derive(Debug, Clone)]
pub struct SourceLines {
    lines: Vec<String>,
}

impl SourceLines {
    /// Splits source text into its line buffer.
    pub fn from_source(source: &str) -> Self {
        Self {
            lines: source.lines().map(str::to_string).collect(),
        }
    }

    /// Returns line `line` (1-indexed), or `None` when out of bounds.
    pub fn get(&self, line: usize) -> Option<&str> {
        if line == 0 {
            return None;
        }
        self.lines.get(line - 1).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Appends text to an existing line. Lines are never deleted or
    /// reordered, so line numbers stay valid for later lookups.
    pub fn append_to(&mut self, line: usize, text: &str) {
        if line == 0 || line > self.lines.len() {
            log::warn!("append to out-of-range line {line} ignored");
            return;
        }
        self.lines[line - 1].push_str(text);
    }

    /// Reassembles the buffer into source text.
    pub fn to_source(&self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}

/// A proposed insertion: `text` is appended to the end of `line`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineEdit {
    /// 1-indexed target line.
    pub line: usize,
    /// Text appended to the line (typically `"\n"` plus a guard block).
    pub text: String,
}

/// Applies edits in order, producing the patched buffer.
pub fn apply_edits(lines: &SourceLines, edits: &[LineEdit]) -> SourceLines {
    let mut patched = lines.clone();
    for edit in edits {
        patched.append_to(edit.line, &edit.text);
    }
    patched
}
