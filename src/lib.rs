//! # GlitchGuard Library
//!
//! A static analysis library that flags C code patterns weak against fault
//! injection attacks (voltage/clock glitching) and proposes hardened
//! replacements.
//!
//! This library provides the core functionality for parsing C sources,
//! running the fault-pattern detectors, and generating reports.
//!
//! ## Modules
//!
//! - [`cli`] - Command-line interface definitions and argument parsing
//! - [`parser`] - C syntax tree parsing and source-line bookkeeping
//! - [`analysis`] - The analysis engine and the variable collector
//! - [`detectors`] - Fault-pattern detector implementations
//! - [`report`] - Report generation in multiple formats
//!
//! ## Example
//!
//! ```rust,ignore
//! use glitchguard::analysis::{analyze, AnalysisConfig};
//! use glitchguard::parser::ParseContext;
//! use glitchguard::Report;
//!
//! let ctx = ParseContext::from_file(Path::new("./firmware.c"))?;
//! let outcome = analyze(&ctx, &AnalysisConfig::default());
//! let report = Report::new(outcome.findings.into_vec(), path, 1);
//! ```

pub mod analysis;
pub mod cli;
pub mod detectors;
pub mod parser;
pub mod report;

pub use analysis::{analyze, AnalysisConfig, AnalysisOutcome};
pub use cli::Cli;
pub use parser::ParseContext;
pub use report::{Category, Finding, Report, Severity};
