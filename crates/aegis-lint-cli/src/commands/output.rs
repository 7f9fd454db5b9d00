//! Shared output formatting for checker results.

use aegis_lint_core::{Diagnostic, DiagnosticReport, LintResult, Severity};
use aegis_lint_rules::Checker;
use anyhow::Result;
use miette::GraphicalReportHandler;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::{self, Write};
use std::path::Path;

use crate::OutputFormat;

const WIDTH: usize = 70;

/// Print checker results in the specified format.
pub fn print(result: &LintResult, checker: Checker, root: &Path, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", render_text(result, checker, root)?),
        OutputFormat::Json => println!("{}", render_json(result, checker, root)?),
        OutputFormat::Compact => {
            if !result.diagnostics.is_empty() {
                println!("{}", render_compact(result));
            }
        }
        OutputFormat::Rich => print_rich(result, root)?,
    }
    Ok(())
}

/// How many errors and warnings a checker lists before eliding the rest.
const fn display_caps(checker: Checker) -> (Option<usize>, Option<usize>) {
    match checker {
        Checker::IsrSafety => (None, Some(10)),
        Checker::Traceability => (Some(15), Some(10)),
        Checker::Globals => (Some(50), None),
        Checker::Layering | Checker::Naming | Checker::All => (None, None),
    }
}

/// Renders the human-readable report.
pub fn render_text(result: &LintResult, checker: Checker, root: &Path) -> Result<String, fmt::Error> {
    let mut out = String::new();
    let (errors, warnings) = result.count_by_severity();
    let (error_cap, warning_cap) = display_caps(checker);

    writeln!(out, "{}: {}", checker.title(), root.display())?;
    writeln!(out, "{}", "=".repeat(WIDTH))?;

    write_block(
        &mut out,
        "\u{274c}",
        "error",
        &result.by_severity(Severity::Error),
        error_cap,
    )?;
    write_block(
        &mut out,
        "\u{26a0}\u{fe0f} ",
        "warning",
        &result.by_severity(Severity::Warning),
        warning_cap,
    )?;

    writeln!(out)?;
    writeln!(out, "{}", "=".repeat(WIDTH))?;
    writeln!(out, "Files checked: {}", result.files_checked)?;
    writeln!(out, "Errors: {errors}")?;
    writeln!(out, "Warnings: {warnings}")?;

    let mut by_code: BTreeMap<&str, usize> = BTreeMap::new();
    for diagnostic in &result.diagnostics {
        *by_code.entry(diagnostic.code.as_str()).or_default() += 1;
    }
    for (code, count) in by_code {
        writeln!(out, "  {code}: {count}")?;
    }

    writeln!(out)?;
    if errors == 0 {
        writeln!(out, "\u{2705} PASSED: no conformance errors")?;
    } else {
        writeln!(out, "\u{274c} FAILED: {errors} conformance error(s)")?;
    }

    Ok(out)
}

fn write_block(
    out: &mut String,
    icon: &str,
    noun: &str,
    diagnostics: &[&Diagnostic],
    cap: Option<usize>,
) -> fmt::Result {
    if diagnostics.is_empty() {
        return Ok(());
    }

    writeln!(out)?;
    writeln!(out, "{icon} {} {noun}(s):", diagnostics.len())?;
    writeln!(out, "{}", "-".repeat(WIDTH))?;

    let shown = cap.unwrap_or(diagnostics.len()).min(diagnostics.len());
    for diagnostic in &diagnostics[..shown] {
        writeln!(
            out,
            "  {}:{} [{}]",
            diagnostic.location.file.display(),
            diagnostic.location.line,
            diagnostic.code
        )?;
        writeln!(out, "    {}", diagnostic.message)?;
    }
    if shown < diagnostics.len() {
        writeln!(out, "  ... and {} more", diagnostics.len() - shown)?;
    }
    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    checker: &'static str,
    root: &'a Path,
    files_checked: usize,
    errors: usize,
    warnings: usize,
    diagnostics: &'a [Diagnostic],
}

fn render_json(result: &LintResult, checker: Checker, root: &Path) -> Result<String> {
    let (errors, warnings) = result.count_by_severity();
    let report = JsonReport {
        checker: checker.name(),
        root,
        files_checked: result.files_checked,
        errors,
        warnings,
        diagnostics: &result.diagnostics,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// One line per diagnostic.
pub fn render_compact(result: &LintResult) -> String {
    result
        .diagnostics
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

fn print_rich(result: &LintResult, root: &Path) -> Result<()> {
    let handler = GraphicalReportHandler::new();
    let mut sources: BTreeMap<&Path, Option<String>> = BTreeMap::new();

    for diagnostic in &result.diagnostics {
        let file = diagnostic.location.file.as_path();
        let source = sources.entry(file).or_insert_with(|| {
            std::fs::read(root.join(file))
                .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
                .ok()
        });

        let Some(source) = source else {
            println!("{diagnostic}");
            continue;
        };
        let report = DiagnosticReport::new(diagnostic, source.clone());
        let mut rendered = String::new();
        handler.render_report(&mut rendered, &report)?;
        println!("{rendered}");
    }

    let (errors, warnings) = result.count_by_severity();
    println!(
        "Found {errors} error(s), {warnings} warning(s) in {} file(s)",
        result.files_checked
    );
    Ok(())
}
