//! One render cycle: `(dataset, selections) -> DashboardView`.
//!
//! The steps run top to bottom like the page reads. The working subset is
//! described before the score columns are coerced. The correlation and
//! boxplot steps see the coerced columns.

use eframe::egui::Color32;

use crate::color::{self, LIGHT_GREEN, SKY_BLUE};
use crate::config::DashboardConfig;
use crate::data::filter::{StatusFilter, working_subset};
use crate::data::model::{CellValue, Dataset};
use crate::stats::boxplot::{BoxStats, box_stats};
use crate::stats::correlation::{CorrelationMatrix, correlation_matrix};
use crate::stats::distribution::{Histogram, histogram, kde_curve};
use crate::stats::summary::{SummaryTable, describe};

pub const ID_COLUMN: &str = "id";
pub const SUCCESS_MESSAGE: &str = "Dashboard rendered successfully!";

/// Score columns drawn as histograms, left then right.
const DISTRIBUTIONS: [(&str, &str, Color32); 2] = [
    ("final_score", "Final Score Distribution", SKY_BLUE),
    (
        "attendance_final_score",
        "Attendance Score Distribution",
        LIGHT_GREEN,
    ),
];

// ---------------------------------------------------------------------------
// Widget selections
// ---------------------------------------------------------------------------

/// Everything the user can change between render cycles.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Selections {
    /// `None` when the dataset has no completion-status column.
    pub status: Option<StatusFilter>,
    pub student_id: Option<CellValue>,
}

impl Selections {
    /// Initial widget state: every status selected, first student chosen.
    pub fn for_dataset(dataset: &Dataset) -> Self {
        Self {
            status: StatusFilter::for_dataset(dataset),
            student_id: dataset.distinct_non_missing(ID_COLUMN).into_iter().next(),
        }
    }
}

// ---------------------------------------------------------------------------
// Derived view
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct DistributionChart {
    pub column: String,
    pub title: String,
    pub color: Color32,
    /// Non-missing values after coercion.
    pub values: Vec<f64>,
    pub histogram: Histogram,
    pub kde: Option<Vec<[f64; 2]>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxplotChart {
    pub title: String,
    /// Column name and its box; `None` for a column with no numeric data.
    pub boxes: Vec<(String, Option<BoxStats>)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricBar {
    pub metric: String,
    /// `None` draws no bar for that metric.
    pub value: Option<f64>,
    pub color: Color32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StudentChart {
    pub title: String,
    pub bars: Vec<MetricBar>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StudentSection {
    /// Distinct non-missing ids of the full dataset.
    pub ids: Vec<CellValue>,
    pub selected: Option<CellValue>,
    pub chart: Option<StudentChart>,
}

/// Everything the UI draws in one cycle, in page order.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub title: String,
    pub total_rows: usize,
    pub working_rows: usize,
    pub summary: SummaryTable,
    /// Left and right halves; `None` when the column is absent.
    pub distributions: [Option<DistributionChart>; 2],
    pub correlation: CorrelationMatrix,
    pub boxplot: Option<BoxplotChart>,
    /// `None` when the dataset has no id column.
    pub student: Option<StudentSection>,
    pub success: &'static str,
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

fn distribution(
    working: &mut Dataset,
    column: &str,
    title: &str,
    color: Color32,
    config: &DashboardConfig,
) -> Option<DistributionChart> {
    if !working.coerce_numeric(column) {
        return None;
    }
    let values = working.column(column)?.numeric_values();
    let histogram = histogram(&values, config.histogram_bins);
    let kde = kde_curve(&values, config.kde_gridsize, histogram.bin_width());
    Some(DistributionChart {
        column: column.to_string(),
        title: title.to_string(),
        color,
        values,
        histogram,
        kde,
    })
}

fn boxplot(working: &Dataset, config: &DashboardConfig) -> Option<BoxplotChart> {
    let numeric = working.numeric_columns();
    if numeric.len() < config.boxplot_columns || config.boxplot_columns == 0 {
        return None;
    }
    let boxes = numeric
        .into_iter()
        .take(config.boxplot_columns)
        .map(|col| (col.name.clone(), box_stats(&col.numeric_values())))
        .collect();
    Some(BoxplotChart {
        title: format!(
            "Boxplot of First {} Assignment/Quiz Scores",
            config.boxplot_columns
        ),
        boxes,
    })
}

/// The per-student section reads the unfiltered dataset: a student hidden
/// by the status filter can still be charted.
fn student_section(dataset: &Dataset, requested: Option<&CellValue>) -> Option<StudentSection> {
    if !dataset.has_column(ID_COLUMN) {
        return None;
    }
    let ids = dataset.distinct_non_missing(ID_COLUMN);
    let selected = requested
        .filter(|id| ids.contains(id))
        .cloned()
        .or_else(|| ids.first().cloned());

    let chart = selected.as_ref().and_then(|id| {
        let row = dataset.find_row(ID_COLUMN, id)?;
        let numeric = dataset.numeric_columns();
        if numeric.is_empty() {
            return None;
        }
        let palette = color::viridis_palette(numeric.len());
        let bars = numeric
            .iter()
            .zip(palette)
            .map(|(col, color)| MetricBar {
                metric: col.name.clone(),
                value: col.values.get(row).and_then(CellValue::as_f64),
                color,
            })
            .collect();
        Some(StudentChart {
            title: format!("Grades and Attendance for Student {id}"),
            bars,
        })
    });

    Some(StudentSection {
        ids,
        selected,
        chart,
    })
}

/// Run one render cycle.
pub fn build_view(
    dataset: &Dataset,
    selections: &Selections,
    config: &DashboardConfig,
) -> DashboardView {
    let mut working = working_subset(dataset, selections.status.as_ref());
    log::debug!(
        "building view: {} of {} rows selected",
        working.row_count(),
        dataset.row_count()
    );

    let summary = describe(&working);

    let distributions = DISTRIBUTIONS
        .map(|(column, title, color)| distribution(&mut working, column, title, color, config));

    let correlation = correlation_matrix(&working);
    let boxplot = boxplot(&working, config);
    // Same score coercion on the full rows the student picker reads.
    let mut full = dataset.clone();
    for (column, _, _) in DISTRIBUTIONS {
        full.coerce_numeric(column);
    }
    let student = student_section(&full, selections.student_id.as_ref());

    DashboardView {
        title: config.title.clone(),
        total_rows: dataset.row_count(),
        working_rows: working.row_count(),
        summary,
        distributions,
        correlation,
        boxplot,
        student,
        success: SUCCESS_MESSAGE,
    }
}
