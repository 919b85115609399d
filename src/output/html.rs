//! Standalone HTML report with a summary and one table of findings.

use crate::diff::{DiffReport, Finding, FindingKind};

/// Escape text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c)
        }
    }
    out
}

/// Render a self-contained HTML report.
///
/// The page has one summary card per finding kind and a findings table
/// that a text box filters client-side on any visible cell text.
pub fn render_html(report: &DiffReport) -> String {
    let summary = report.summary();

    let mut cards = String::new();
    for kind in FindingKind::ALL {
        let class = if summary.count(kind) == 0 {
            "ok"
        } else if kind.is_blocking() {
            "bad"
        } else {
            "warn"
        };
        cards.push_str(&format!(
            r#"<div class="card {}"><div class="count">{}</div><div class="label">{}</div></div>"#,
            class,
            summary.count(kind),
            kind.as_str()
        ));
        cards.push('\n');
    }

    let mut rows = String::new();
    for finding in &report.findings {
        rows.push_str(&table_row(finding));
        rows.push('\n');
    }

    let verdict = if summary.is_clean() {
        r#"<span class="verdict ok">CLEAN</span>"#
    } else {
        r#"<span class="verdict bad">DIFFERENCES FOUND</span>"#
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>lookupdiffer report</title>
<style>
body {{ font-family: sans-serif; margin: 24px; color: #222; }}
h1 {{ font-size: 20px; }}
.cards {{ display: flex; flex-wrap: wrap; gap: 12px; margin-bottom: 16px; }}
.card {{ border-radius: 6px; padding: 12px 16px; min-width: 140px; background: #f4f4f4; }}
.card.ok {{ border-left: 4px solid #2e7d32; }}
.card.warn {{ border-left: 4px solid #f9a825; }}
.card.bad {{ border-left: 4px solid #c62828; }}
.count {{ font-size: 24px; font-weight: bold; }}
.label {{ font-size: 12px; color: #555; }}
.verdict.ok {{ color: #2e7d32; }}
.verdict.bad {{ color: #c62828; }}
#filter {{ width: 100%; padding: 6px; margin-bottom: 8px; box-sizing: border-box; }}
table {{ border-collapse: collapse; width: 100%; font-size: 13px; }}
th, td {{ border: 1px solid #ddd; padding: 4px 6px; text-align: left; vertical-align: top; }}
th {{ background: #eee; }}
pre {{ margin: 0; white-space: pre-wrap; }}
</style>
</head>
<body>
<h1>lookupdiffer report {verdict}</h1>
<div class="cards">
{cards}</div>
<input id="filter" type="text" placeholder="Filter findings...">
<table id="findings">
<thead><tr><th>Kind</th><th>Table</th><th>Location</th><th>Message</th><th>SQL</th></tr></thead>
<tbody>
{rows}</tbody>
</table>
<script>
document.getElementById('filter').addEventListener('input', function () {{
  var needle = this.value.toLowerCase();
  document.querySelectorAll('#findings tbody tr').forEach(function (row) {{
    row.style.display = row.textContent.toLowerCase().indexOf(needle) === -1 ? 'none' : '';
  }});
}});
</script>
</body>
</html>
"#,
        verdict = verdict,
        cards = cards,
        rows = rows
    )
}

fn table_row(finding: &Finding) -> String {
    let sql: Vec<&str> = [&finding.ddl, &finding.dml]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .collect();
    format!(
        r#"<tr class="{}"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td><pre>{}</pre></td></tr>"#,
        finding.kind.as_str().to_lowercase(),
        finding.kind.as_str(),
        escape_html(&finding.table),
        escape_html(&finding.location()),
        escape_html(&finding.message),
        escape_html(&sql.join("\n"))
    )
}
