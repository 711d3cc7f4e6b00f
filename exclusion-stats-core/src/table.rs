//! Summary tables consumed by the reporting layer

use serde::{Deserialize, Serialize};

use crate::PolicyExclusionCount;

/// Label of the column-totals row
pub const TOTALS_LABEL: &str = "Total";

/// Which columns a rendering should include
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Columns {
    /// Human-facing columns
    Display,
    /// Display columns plus tracked-only counters
    Persisted,
}

/// A row of a summary table
pub trait TableRow: Clone {
    fn policy_name(&self) -> &str;

    /// Sum of the row's category counts
    fn total(&self) -> u64;

    fn headers(columns: Columns) -> Vec<&'static str>;

    fn cells(&self, columns: Columns) -> Vec<String>;

    /// Column totals over `rows`
    fn totals<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a Self>,
        Self: 'a;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileExclusionRow {
    pub policy_name: String,
    pub path: u64,
    pub file_extension: u64,
    pub wildcard: u64,
    pub total: u64,
}

impl From<&PolicyExclusionCount> for FileExclusionRow {
    fn from(record: &PolicyExclusionCount) -> Self {
        Self {
            policy_name: record.policy_name.clone(),
            path: record.path_count,
            file_extension: record.file_extension_count,
            wildcard: record.wildcard_count,
            total: record.total_file_exclusions(),
        }
    }
}

impl TableRow for FileExclusionRow {
    fn policy_name(&self) -> &str {
        &self.policy_name
    }

    fn total(&self) -> u64 {
        self.total
    }

    fn headers(_columns: Columns) -> Vec<&'static str> {
        vec![
            "Policy Name",
            "Path",
            "File Extension",
            "Wildcard",
            "Total Exclusions",
        ]
    }

    fn cells(&self, _columns: Columns) -> Vec<String> {
        vec![
            self.policy_name.clone(),
            self.path.to_string(),
            self.file_extension.to_string(),
            self.wildcard.to_string(),
            self.total.to_string(),
        ]
    }

    fn totals<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a Self>,
    {
        rows.into_iter().fold(
            Self {
                policy_name: TOTALS_LABEL.to_string(),
                ..Default::default()
            },
            |mut acc, row| {
                acc.path += row.path;
                acc.file_extension += row.file_extension;
                acc.wildcard += row.wildcard;
                acc.total += row.total;
                acc
            },
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessExclusionRow {
    pub policy_name: String,
    pub file_scan: u64,
    pub system_process_protection: u64,
    pub malicious_activity: u64,
    /// Persisted only; not part of the display columns
    pub child_process: u64,
    pub total: u64,
}

impl From<&PolicyExclusionCount> for ProcessExclusionRow {
    fn from(record: &PolicyExclusionCount) -> Self {
        Self {
            policy_name: record.policy_name.clone(),
            file_scan: record.file_scan_count,
            system_process_protection: record.system_protection_count,
            malicious_activity: record.malicious_activity_count,
            child_process: record.child_process_count,
            total: record.total_process_exclusions(),
        }
    }
}

impl TableRow for ProcessExclusionRow {
    fn policy_name(&self) -> &str {
        &self.policy_name
    }

    fn total(&self) -> u64 {
        self.total
    }

    fn headers(columns: Columns) -> Vec<&'static str> {
        let mut headers = vec![
            "Policy Name",
            "File Scan",
            "System Process Protection",
            "Malicious Activity",
        ];
        if columns == Columns::Persisted {
            headers.push("Child Process");
        }
        headers.push("Total Exclusions");
        headers
    }

    fn cells(&self, columns: Columns) -> Vec<String> {
        let mut cells = vec![
            self.policy_name.clone(),
            self.file_scan.to_string(),
            self.system_process_protection.to_string(),
            self.malicious_activity.to_string(),
        ];
        if columns == Columns::Persisted {
            cells.push(self.child_process.to_string());
        }
        cells.push(self.total.to_string());
        cells
    }

    fn totals<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a Self>,
    {
        rows.into_iter().fold(
            Self {
                policy_name: TOTALS_LABEL.to_string(),
                ..Default::default()
            },
            |mut acc, row| {
                acc.file_scan += row.file_scan;
                acc.system_process_protection += row.system_process_protection;
                acc.malicious_activity += row.malicious_activity;
                acc.child_process += row.child_process;
                acc.total += row.total;
                acc
            },
        )
    }
}

/// Ordered rows in policy enumeration order, plus column totals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryTable<R> {
    pub rows: Vec<R>,
    pub totals: R,
}

impl<R: TableRow> SummaryTable<R> {
    pub fn from_rows(rows: Vec<R>) -> Self {
        let totals = R::totals(&rows);
        Self { rows, totals }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, policy_name: &str) -> Option<&R> {
        self.rows.iter().find(|r| r.policy_name() == policy_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, path: u64, ext: u64, wild: u64) -> PolicyExclusionCount {
        PolicyExclusionCount {
            policy_name: name.to_string(),
            path_count: path,
            file_extension_count: ext,
            wildcard_count: wild,
            ..Default::default()
        }
    }

    #[test]
    fn test_file_row_total() {
        let row = FileExclusionRow::from(&record("a", 6, 0, 2));
        assert_eq!(row.total, 8);
        assert_eq!(row.cells(Columns::Display), vec!["a", "6", "0", "2", "8"]);
    }

    #[test]
    fn test_table_column_totals() {
        let rows = vec![
            FileExclusionRow::from(&record("a", 6, 0, 2)),
            FileExclusionRow::from(&record("b", 152, 28, 96)),
        ];
        let table = SummaryTable::from_rows(rows);
        assert_eq!(table.totals.policy_name, TOTALS_LABEL);
        assert_eq!(table.totals.path, 158);
        assert_eq!(table.totals.total, 284);
        assert_eq!(table.row("b").map(|r| r.total), Some(276));
    }

    #[test]
    fn test_process_child_column_only_when_persisted() {
        let display = ProcessExclusionRow::headers(Columns::Display);
        let persisted = ProcessExclusionRow::headers(Columns::Persisted);
        assert!(!display.contains(&"Child Process"));
        assert!(persisted.contains(&"Child Process"));
        assert_eq!(persisted.len(), display.len() + 1);
    }

    #[test]
    fn test_empty_table() {
        let table: SummaryTable<ProcessExclusionRow> = SummaryTable::from_rows(Vec::new());
        assert!(table.is_empty());
        assert_eq!(table.totals.total, 0);
    }
}
