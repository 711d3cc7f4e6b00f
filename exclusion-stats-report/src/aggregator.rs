//! Aggregates per-policy counts into summary tables

use exclusion_stats_core::{
    CoreError, FileExclusionRow, PolicyExclusionCount, ProcessExclusionRow, SummaryTable,
};

pub type FileExclusionTable = SummaryTable<FileExclusionRow>;
pub type ProcessExclusionTable = SummaryTable<ProcessExclusionRow>;

pub struct Aggregator;

impl Aggregator {
    /// Project every record into the file and process tables.
    ///
    /// Rows keep the order of `records`; an empty slice yields two empty
    /// tables with zero totals.
    pub fn aggregate(
        records: &[PolicyExclusionCount],
    ) -> (FileExclusionTable, ProcessExclusionTable) {
        let file_rows = records.iter().map(FileExclusionRow::from).collect();
        let process_rows = records.iter().map(ProcessExclusionRow::from).collect();

        (
            SummaryTable::from_rows(file_rows),
            SummaryTable::from_rows(process_rows),
        )
    }

    /// Same as [`Aggregator::aggregate`], but requires at least one record
    pub fn aggregate_non_empty(
        records: &[PolicyExclusionCount],
    ) -> Result<(FileExclusionTable, ProcessExclusionTable), CoreError> {
        if records.is_empty() {
            return Err(CoreError::EmptyInput);
        }
        Ok(Self::aggregate(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn built_in_mac() -> PolicyExclusionCount {
        PolicyExclusionCount {
            policy_name: "Built-In Mac".to_string(),
            path_count: 6,
            wildcard_count: 2,
            file_scan_count: 2,
            ..Default::default()
        }
    }

    fn standard() -> PolicyExclusionCount {
        PolicyExclusionCount {
            policy_name: "NAME - Standard".to_string(),
            path_count: 152,
            file_extension_count: 28,
            wildcard_count: 96,
            file_scan_count: 84,
            system_protection_count: 24,
            malicious_activity_count: 2,
            child_process_count: 7,
        }
    }

    #[test]
    fn test_row_totals() {
        let (files, processes) = Aggregator::aggregate(&[built_in_mac(), standard()]);

        let file_totals: Vec<u64> = files.rows.iter().map(|r| r.total).collect();
        let process_totals: Vec<u64> = processes.rows.iter().map(|r| r.total).collect();
        assert_eq!(file_totals, vec![8, 276]);
        assert_eq!(process_totals, vec![2, 110]);
        assert_eq!(processes.rows[1].child_process, 7);
        assert_eq!(files.totals.total, 284);
        assert_eq!(processes.totals.total, 112);
    }

    #[test]
    fn test_totals_match_constituents() {
        let (files, processes) = Aggregator::aggregate(&[built_in_mac(), standard()]);
        for row in &files.rows {
            assert_eq!(row.total, row.path + row.file_extension + row.wildcard);
        }
        for row in &processes.rows {
            assert_eq!(
                row.total,
                row.file_scan + row.system_process_protection + row.malicious_activity
            );
        }
    }

    #[test]
    fn test_preserves_input_order() {
        let forward = [built_in_mac(), standard()];
        let reversed = [standard(), built_in_mac()];

        let (files_fwd, processes_fwd) = Aggregator::aggregate(&forward);
        let (files_rev, processes_rev) = Aggregator::aggregate(&reversed);

        assert_eq!(files_fwd.rows[0].policy_name, "Built-In Mac");
        assert_eq!(files_rev.rows[0].policy_name, "NAME - Standard");
        assert_eq!(files_fwd.rows[0], files_rev.rows[1]);
        assert_eq!(processes_fwd.rows[1], processes_rev.rows[0]);
        assert_eq!(files_fwd.totals, files_rev.totals);
    }

    #[test]
    fn test_does_not_mutate_input() {
        let records = vec![standard()];
        let before = records.clone();
        let _ = Aggregator::aggregate(&records);
        assert_eq!(records, before);
    }

    #[test]
    fn test_empty_input() {
        let (files, processes) = Aggregator::aggregate(&[]);
        assert!(files.is_empty());
        assert!(processes.is_empty());
        assert_eq!(files.totals.total, 0);

        let err = Aggregator::aggregate_non_empty(&[]).unwrap_err();
        assert!(matches!(err, CoreError::EmptyInput));
    }
}
