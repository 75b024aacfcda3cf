//! # CLI Module
//!
//! Defines the command-line interface for GlitchGuard using the `clap`
//! derive macros for declarative argument parsing.
//!
//! ## Commands
//!
//! - `scan` - Analyze C sources for fault-injection-sensitive patterns
//! - `list` - Display available fault patterns
//! - `version` - Show version information

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// GlitchGuard command-line interface.
///
/// A static analyzer that flags C code patterns weak against fault
/// injection (voltage/clock glitching) and proposes hardened replacements.
#[derive(Parser, Debug)]
#[command(name = "glitchguard")]
#[command(version)]
#[command(about = "Static analyzer for fault-injection-sensitive patterns in C code")]
#[command(long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for the GlitchGuard CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan C source files for fault-injection-sensitive patterns.
    ///
    /// Analyzes `.c`/`.h` files for trivial branch constants, bypassable
    /// condition calls, unsafe fallback paths, unverified values, and
    /// unduplicated security checks.
    Scan {
        /// Path to the file or directory to scan.
        ///
        /// If a directory is specified, all `.c` and `.h` files within it
        /// will be analyzed.
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Scan directories recursively.
        #[arg(short, long, default_value_t = true)]
        recursive: bool,

        /// Output format for the report.
        ///
        /// Supported formats:
        /// - `terminal`: Colorized console output (default)
        /// - `json`: Machine-readable JSON format
        /// - `markdown`: Human-readable Markdown report
        #[arg(short, long, default_value = "terminal")]
        format: String,

        /// Output directory for reports and patched sources.
        ///
        /// If not specified, reports are printed to stdout and patched
        /// sources are written to `./replacements/`.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Minimum severity level to include in results.
        ///
        /// Valid values: high, medium, low, info
        #[arg(short, long)]
        severity: Option<String>,

        /// Exclude specific fault patterns from the scan.
        ///
        /// Comma-separated list of pattern names to skip.
        /// Example: --exclude bypass,constant_coding
        #[arg(short = 'x', long, value_delimiter = ',')]
        exclude: Vec<String>,

        /// Include only specific fault patterns in the scan.
        ///
        /// Comma-separated list of pattern names to run.
        /// Example: --only branch,double_check
        #[arg(long, value_delimiter = ',')]
        only: Vec<String>,

        /// Hamming-weight sensitivity threshold.
        ///
        /// Integer constants whose binary representation has fewer one-bits
        /// than this are treated as trivial.
        #[arg(long, default_value_t = 3)]
        sensitivity: u32,

        /// Write patched source files with hardened replacements applied.
        ///
        /// Each analyzed file that received proposed insertions is written
        /// under the output directory with the insertions in place.
        #[arg(long)]
        replacements: bool,
    },

    /// List all available fault patterns.
    ///
    /// Displays the name, severity, and description of each registered
    /// fault pattern.
    List,

    /// Print version information.
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    /// Verify that the CLI definition is valid.
    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_scan_defaults() {
        let cli = Cli::try_parse_from(["glitchguard", "scan", "src"]).unwrap();
        match cli.command {
            Commands::Scan {
                recursive,
                format,
                sensitivity,
                replacements,
                ..
            } => {
                assert!(recursive);
                assert_eq!(format, "terminal");
                assert_eq!(sensitivity, 3);
                assert!(!replacements);
            }
            _ => panic!("expected scan subcommand"),
        }
    }

    #[test]
    fn test_pattern_filters_split_on_commas() {
        let cli = Cli::try_parse_from([
            "glitchguard",
            "scan",
            "src",
            "--only",
            "branch,double_check",
        ])
        .unwrap();
        match cli.command {
            Commands::Scan { only, .. } => {
                assert_eq!(only, vec!["branch", "double_check"]);
            }
            _ => panic!("expected scan subcommand"),
        }
    }
}
