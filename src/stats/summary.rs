use crate::data::model::Dataset;

use super::{mean, quantile_sorted, sample_std, sorted};

/// Row labels of the summary table, in display order.
pub const STAT_NAMES: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Descriptive statistics for one numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    /// One entry per [`STAT_NAMES`] row; `None` when undefined.
    pub stats: [Option<f64>; 8],
}

/// The summary table: one column per numeric column of the input.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SummaryTable {
    pub columns: Vec<ColumnSummary>,
}

impl SummaryTable {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Cell text: undefined statistics show as `NaN`.
    pub fn format_cell(value: Option<f64>) -> String {
        match value {
            Some(v) => format!("{v:.6}"),
            None => "NaN".to_string(),
        }
    }
}

fn summarize(values: &[f64]) -> [Option<f64>; 8] {
    let s = sorted(values);
    [
        Some(values.len() as f64),
        mean(values),
        sample_std(values),
        s.first().copied(),
        quantile_sorted(&s, 0.25),
        quantile_sorted(&s, 0.5),
        quantile_sorted(&s, 0.75),
        s.last().copied(),
    ]
}

/// count / mean / std / min / quartiles / max for every numeric column,
/// skipping missing cells.
pub fn describe(dataset: &Dataset) -> SummaryTable {
    SummaryTable {
        columns: dataset
            .numeric_columns()
            .into_iter()
            .map(|col| ColumnSummary {
                name: col.name.clone(),
                stats: summarize(&col.numeric_values()),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    #[test]
    fn one_column_per_numeric_column() {
        let ds = Dataset::from_rows(
            vec!["id".into(), "name".into(), "score".into()],
            vec![
                vec![CellValue::Integer(1), CellValue::String("a".into()), CellValue::Float(10.0)],
                vec![CellValue::Integer(2), CellValue::String("b".into()), CellValue::Null],
                vec![CellValue::Integer(3), CellValue::String("c".into()), CellValue::Float(30.0)],
            ],
        );
        let table = describe(&ds);
        let names: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "score"]);

        let score = &table.columns[1].stats;
        assert_eq!(score[0], Some(2.0));
        assert_eq!(score[1], Some(20.0));
        assert_eq!(score[3], Some(10.0));
        assert_eq!(score[5], Some(20.0));
        assert_eq!(score[7], Some(30.0));

        let id = &table.columns[0].stats;
        assert_eq!(id[2], Some(1.0));
        assert_eq!(id[4], Some(1.5));
        assert_eq!(id[6], Some(2.5));
    }

    #[test]
    fn empty_dataset_gives_empty_table() {
        assert!(describe(&Dataset::default()).is_empty());
    }

    #[test]
    fn all_missing_column_has_zero_count_and_nan_stats() {
        let ds = Dataset::from_rows(vec!["x".into()], vec![vec![CellValue::Null]]);
        let table = describe(&ds);
        assert_eq!(table.columns[0].stats[0], Some(0.0));
        assert!(table.columns[0].stats[1..].iter().all(Option::is_none));
        assert_eq!(SummaryTable::format_cell(None), "NaN");
    }
}
