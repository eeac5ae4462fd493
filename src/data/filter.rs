use std::collections::BTreeSet;

use super::model::{CellValue, Dataset};

/// Column the sidebar filter works on.
pub const STATUS_COLUMN: &str = "completion_status";

// ---------------------------------------------------------------------------
// Completion-status selection
// ---------------------------------------------------------------------------

/// Multi-select state over the distinct values of the status column.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusFilter {
    /// Distinct non-missing values, in order of first appearance.
    pub options: Vec<CellValue>,
    /// Currently selected values. Starts as every option.
    pub selected: BTreeSet<CellValue>,
}

impl StatusFilter {
    /// Build the filter for a dataset, or `None` if it has no status column.
    pub fn for_dataset(dataset: &Dataset) -> Option<Self> {
        if !dataset.has_column(STATUS_COLUMN) {
            return None;
        }
        let options = dataset.distinct_non_missing(STATUS_COLUMN);
        let selected = options.iter().cloned().collect();
        Some(StatusFilter { options, selected })
    }

    pub fn is_selected(&self, value: &CellValue) -> bool {
        self.selected.contains(value)
    }

    /// Flip one value in or out of the selection.
    pub fn toggle(&mut self, value: &CellValue) {
        if !self.selected.remove(value) {
            self.selected.insert(value.clone());
        }
    }

    pub fn select_all(&mut self) {
        self.selected = self.options.iter().cloned().collect();
    }

    pub fn select_none(&mut self) {
        self.selected.clear();
    }
}

/// Restrict the dataset to rows whose status is selected.
///
/// Rows with a missing status never match. Without a filter (no status
/// column) the dataset is returned unchanged.
pub fn working_subset(dataset: &Dataset, filter: Option<&StatusFilter>) -> Dataset {
    let (Some(filter), Some(status)) = (filter, dataset.column(STATUS_COLUMN)) else {
        return dataset.clone();
    };

    let keep: Vec<usize> = status
        .values
        .iter()
        .enumerate()
        .filter(|(_, v)| filter.is_selected(v))
        .map(|(i, _)| i)
        .collect();
    dataset.take_rows(&keep)
}
