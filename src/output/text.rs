//! Terminal report: findings grouped by kind, optionally colored.

use colored::Colorize;

use super::OutputOptions;
use crate::diff::{DiffReport, Finding, FindingKind};

/// Render the capped plain-text summary.
///
/// Counts per kind come first, then up to `max_per_kind` findings of each
/// kind (`max_parse_errors` for parse errors) with their DDL/DML inlined.
pub fn render_text(report: &DiffReport, opts: &OutputOptions) -> String {
    let summary = report.summary();
    let mut out = String::new();

    out.push_str(&paint("=== lookupdiffer ===", opts, |s| s.bold().to_string()));
    out.push('\n');
    for (label, count) in [
        ("Missing tables", summary.missing_tables),
        ("Missing columns", summary.missing_columns),
        ("Missing primary keys", summary.missing_pks),
        ("Missing rows", summary.missing_rows),
        ("Mismatched rows", summary.mismatched_rows),
        ("Warnings", summary.warnings),
        ("Parse/analysis errors", summary.parse_errors)
    ] {
        out.push_str(&format!("{}: {}\n", label, count));
    }
    let verdict = if summary.is_clean() {
        paint("CLEAN", opts, |s| s.green().bold().to_string())
    } else {
        paint("DIFFERENCES FOUND", opts, |s| s.red().bold().to_string())
    };
    out.push_str(&format!("Result: {}\n", verdict));

    for kind in FindingKind::ALL {
        let total = summary.count(kind);
        if total == 0 {
            continue;
        }
        let cap = if kind == FindingKind::ParseError {
            opts.max_parse_errors
        } else {
            opts.max_per_kind
        };
        let title = if total > cap {
            format!("{} (top {}):", kind.title(), cap)
        } else {
            format!("{}:", kind.title())
        };
        out.push('\n');
        out.push_str(&paint(&title, opts, |s| {
            if kind.is_blocking() {
                s.red().bold().to_string()
            } else {
                s.yellow().bold().to_string()
            }
        }));
        out.push('\n');

        for finding in report.of_kind(kind).take(cap) {
            push_finding(&mut out, finding, opts);
        }
        if total > cap {
            out.push_str(&format!("  ... and {} more\n", total - cap));
        }
    }

    out
}

fn push_finding(out: &mut String, finding: &Finding, opts: &OutputOptions) {
    let location = paint(&finding.location(), opts, |s| s.dimmed().to_string());
    if finding.kind == FindingKind::ParseError {
        out.push_str(&format!("- {}\n", location));
    } else {
        let table = paint(&finding.table, opts, |s| s.cyan().to_string());
        out.push_str(&format!("- {} @ {}\n", table, location));
    }
    push_indented(out, &finding.message);
    for sql in [&finding.ddl, &finding.dml].into_iter().flatten() {
        push_indented(out, sql);
    }
}

fn push_indented(out: &mut String, text: &str) {
    for line in text.lines() {
        out.push_str("  ");
        out.push_str(line);
        out.push('\n');
    }
}

fn paint(text: &str, opts: &OutputOptions, style: impl Fn(&str) -> String) -> String {
    if opts.colored { style(text) } else { text.to_string() }
}
