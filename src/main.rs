//! # GlitchGuard CLI Entry Point
//!
//! This module provides the main entry point for the GlitchGuard
//! command-line fault-injection-pattern analyzer.

use anyhow::Result;
use clap::Parser;
use colored::*;
use glitchguard::analysis::{analyze, AnalysisConfig};
use glitchguard::parser::ParseContext;
use glitchguard::report::Finding;
use glitchguard::{Category, Cli, Report, Severity};
use std::path::PathBuf;

/// ASCII art banner displayed at startup.
const BANNER: &str = r#"
   ____ _ _ _       _     ____                     _
  / ___| (_) |_ ___| |__ / ___|_   _  __ _ _ __ __| |
 | |  _| | | __/ __| '_ \ |  _| | | |/ _` | '__/ _` |
 | |_| | | | || (__| | | | |_| | |_| | (_| | | | (_| |
  \____|_|_|\__\___|_| |_|\____|\__,_|\__,_|_|  \__,_|

         Fault-Injection Pattern Analyzer for C
"#;

/// Application entry point.
///
/// Initializes the logging system, displays the banner, parses command-line
/// arguments, and dispatches to the appropriate command handler.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("{}", BANNER.cyan().bold());

    let cli = Cli::parse();

    match cli.command {
        glitchguard::cli::Commands::Scan {
            path,
            recursive,
            format,
            output,
            severity,
            exclude,
            only,
            sensitivity,
            replacements,
        } => {
            run_scan(
                path,
                recursive,
                format,
                output,
                severity,
                exclude,
                only,
                sensitivity,
                replacements,
            )?;
        }
        glitchguard::cli::Commands::List => {
            list_patterns();
        }
        glitchguard::cli::Commands::Version => {
            println!(
                "{} {}",
                "GlitchGuard version:".green(),
                env!("CARGO_PKG_VERSION").yellow()
            );
        }
    }

    Ok(())
}

/// One analyzed file's patched source, kept for `--replacements` output.
struct PatchedFile {
    source_path: PathBuf,
    contents: String,
}

/// Executes the scan operation.
///
/// Orchestrates the complete scanning workflow:
/// 1. Collects C source files from the specified path
/// 2. Parses each file into a syntax tree
/// 3. Runs the enabled fault patterns
/// 4. Generates reports in the specified format
/// 5. Optionally writes patched sources with hardened replacements
#[allow(clippy::too_many_arguments)]
fn run_scan(
    path: PathBuf,
    recursive: bool,
    format: String,
    output: Option<PathBuf>,
    min_severity: Option<String>,
    exclude: Vec<String>,
    only: Vec<String>,
    sensitivity: u32,
    replacements: bool,
) -> Result<()> {
    println!(
        "{} {}",
        "[*] Scanning:".green().bold(),
        path.display().to_string().yellow()
    );

    let config = build_config(&only, &exclude, sensitivity);
    let (all_findings, patched_files, files_analyzed) = perform_scan(&path, recursive, &config)?;

    let findings = if let Some(ref min_sev) = min_severity {
        let min = Severity::from_str(min_sev);
        all_findings
            .into_iter()
            .filter(|f| f.severity >= min)
            .collect()
    } else {
        all_findings
    };

    let report = Report::new(findings, path.clone(), files_analyzed);

    match format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        "markdown" => {
            let md = report.to_markdown();
            if let Some(ref out_path) = output {
                std::fs::create_dir_all(out_path)?;
                let report_path = out_path.join("glitchguard_report.md");
                std::fs::write(&report_path, &md)?;
                println!(
                    "{} {}",
                    "[+] Report saved to:".green(),
                    report_path.display().to_string().yellow()
                );
            } else {
                println!("{}", md);
            }
        }
        _ => {
            report.print_terminal();
        }
    }

    if replacements && !patched_files.is_empty() {
        let out_dir = output.unwrap_or_else(|| PathBuf::from("./replacements"));
        std::fs::create_dir_all(&out_dir)?;

        println!("\n{}", "[+] Patched sources:".magenta().bold());
        for patched in &patched_files {
            let file_name = patched
                .source_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "patched.c".to_string());
            let target = out_dir.join(file_name);
            std::fs::write(&target, &patched.contents)?;
            println!("    -> {}", target.display().to_string().yellow());
        }
    }

    println!("\n{}", "=".repeat(60).cyan());
    report.print_summary();

    Ok(())
}

/// Resolves the `--only`/`--exclude` filters into an engine configuration.
fn build_config(only: &[String], exclude: &[String], sensitivity: u32) -> AnalysisConfig {
    let mut enabled: Vec<Category> = if only.is_empty() {
        Category::all().to_vec()
    } else {
        AnalysisConfig::resolve_patterns(only)
    };

    if !exclude.is_empty() {
        let excluded = AnalysisConfig::resolve_patterns(exclude);
        enabled.retain(|c| !excluded.contains(c));
    }

    AnalysisConfig {
        enabled,
        sensitivity,
    }
}

/// Performs the actual scanning logic over a file or directory.
fn perform_scan(
    path: &PathBuf,
    recursive: bool,
    config: &AnalysisConfig,
) -> Result<(Vec<Finding>, Vec<PatchedFile>, usize)> {
    use indicatif::{ProgressBar, ProgressStyle};

    let files = if path.is_file() {
        vec![path.clone()]
    } else {
        collect_c_files(path, recursive)?
    };

    if files.is_empty() {
        return Ok((Vec::new(), Vec::new(), 0));
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=>-"),
    );

    let mut all_findings = Vec::new();
    let mut patched_files = Vec::new();
    let mut files_analyzed = 0;

    for file_path in &files {
        pb.set_message(format!(
            "Analyzing {}",
            file_path.file_name().unwrap_or_default().to_string_lossy()
        ));

        match ParseContext::from_file(file_path) {
            Ok(ctx) => {
                let outcome = analyze(&ctx, config);
                all_findings.extend(outcome.findings.into_vec());
                if !outcome.edits.is_empty() {
                    patched_files.push(PatchedFile {
                        source_path: file_path.clone(),
                        contents: outcome.patched.to_source(),
                    });
                }
                files_analyzed += 1;
            }
            Err(e) => {
                log::warn!("Failed to parse {}: {}", file_path.display(), e);
            }
        }

        pb.inc(1);
    }

    pb.finish_and_clear();
    Ok((all_findings, patched_files, files_analyzed))
}

/// Collects C source files from a directory.
///
/// Traverses the specified directory and collects all `.c` and `.h` files,
/// excluding anything under a `build` directory.
fn collect_c_files(dir: &PathBuf, recursive: bool) -> Result<Vec<PathBuf>> {
    use walkdir::WalkDir;

    let walker = if recursive {
        WalkDir::new(dir)
    } else {
        WalkDir::new(dir).max_depth(1)
    };

    let files: Vec<PathBuf> = walker
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.path()
                .extension()
                .map_or(false, |ext| ext == "c" || ext == "h")
                && !e.path().to_string_lossy().contains("build")
        })
        .map(|e| e.path().to_path_buf())
        .collect();

    Ok(files)
}

/// Displays all available fault patterns.
///
/// Prints a formatted list of patterns including their names, severity
/// levels, and descriptions.
fn list_patterns() {
    use glitchguard::detectors::{
        BranchPattern, BypassPattern, ConstantCodingPattern, DefaultFailPattern, DetectPattern,
        DoubleCheckPattern, FaultPattern,
    };
    use glitchguard::analysis::DEFAULT_SENSITIVITY;

    let patterns: Vec<Box<dyn FaultPattern>> = vec![
        Box::new(ConstantCodingPattern::new(DEFAULT_SENSITIVITY)),
        Box::new(DefaultFailPattern::new()),
        Box::new(BranchPattern::new(DEFAULT_SENSITIVITY)),
        Box::new(DetectPattern::new(Vec::new())),
        Box::new(BypassPattern::new()),
        Box::new(DoubleCheckPattern::new()),
    ];

    println!("{}", "[*] Available Fault Patterns:".green().bold());
    println!("{}", "-".repeat(60).cyan());

    for pattern in &patterns {
        println!(
            "  {} [{}]",
            pattern.name().cyan().bold(),
            format!("{:?}", pattern.severity()).yellow()
        );
        println!("     {}", pattern.description().dimmed());
        println!();
    }
}
