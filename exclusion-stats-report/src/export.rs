//! Delimited text output for summary tables and alerts

use exclusion_stats_core::{Columns, SummaryTable, TableRow, ThresholdAlert};

pub const DEFAULT_DELIMITER: char = ',';

/// Render a table as delimited text: header, rows, then the totals row
pub fn to_delimited<R: TableRow>(
    table: &SummaryTable<R>,
    columns: Columns,
    delimiter: char,
) -> String {
    let mut out = String::new();
    push_line(&mut out, R::headers(columns).into_iter(), delimiter);
    for row in table.rows.iter().chain(std::iter::once(&table.totals)) {
        push_line(&mut out, row.cells(columns).iter().map(String::as_str), delimiter);
    }
    out
}

/// One `"<LEVEL>: <message>"` line per alert
pub fn render_alerts(alerts: &[ThresholdAlert]) -> String {
    alerts.iter().map(|a| format!("{}\n", a)).collect()
}

fn push_line<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>, delimiter: char) {
    for (i, field) in fields.enumerate() {
        if i > 0 {
            out.push(delimiter);
        }
        out.push_str(&escape(field, delimiter));
    }
    out.push('\n');
}

fn escape(field: &str, delimiter: char) -> String {
    if field.contains(delimiter) || field.contains(['"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
