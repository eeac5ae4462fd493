use std::collections::HashSet;
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring the spreadsheet cell types.
/// Filter selections live in `BTreeSet`s, so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// ISO-8601 date string kept as text for simplicity.
    Date(String),
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
                Date(_) => 5,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) | (Date(a), Date(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) | CellValue::Date(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Date(d) => write!(f, "{d}"),
            CellValue::Null => write!(f, "<missing>"),
        }
    }
}

impl CellValue {
    /// Build a float cell, mapping NaN to `Null` so "missing" has one spelling.
    pub fn from_f64(v: f64) -> Self {
        if v.is_nan() {
            CellValue::Null
        } else {
            CellValue::Float(v)
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Numeric view of an already-numeric cell.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Lenient conversion used by [`Dataset::coerce_numeric`]: anything that
    /// does not read as a number becomes `None`.
    pub fn coerce_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            CellValue::String(s) => s.trim().parse::<f64>().ok().filter(|v| !v.is_nan()),
            CellValue::Date(_) | CellValue::Null => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Column
// ---------------------------------------------------------------------------

/// Storage type of a column, fixed at load time (dtype).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Float,
    Boolean,
    Text,
}

impl ColumnKind {
    /// Integer and float columns take part in statistics and charts.
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnKind::Integer | ColumnKind::Float)
    }

    /// Infer the kind from the cells of a column.
    ///
    /// An all-missing column in a non-empty table is `Float`, the way a
    /// column of NaNs would be.
    pub fn infer(values: &[CellValue]) -> Self {
        let mut saw_int = false;
        let mut saw_float = false;
        let mut saw_bool = false;
        let mut saw_other = false;
        for v in values {
            match v {
                CellValue::Null => {}
                CellValue::Integer(_) => saw_int = true,
                CellValue::Float(_) => saw_float = true,
                CellValue::Bool(_) => saw_bool = true,
                CellValue::String(_) | CellValue::Date(_) => saw_other = true,
            }
        }
        match (saw_int, saw_float, saw_bool, saw_other) {
            (_, _, _, true) => ColumnKind::Text,
            (true, false, false, false) => ColumnKind::Integer,
            (_, true, false, false) => ColumnKind::Float,
            (false, false, true, false) => ColumnKind::Boolean,
            (false, false, false, false) if !values.is_empty() => ColumnKind::Float,
            _ => ColumnKind::Text,
        }
    }
}

/// One named column of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub values: Vec<CellValue>,
}

impl Column {
    /// Build a column and infer its kind.
    pub fn new(name: impl Into<String>, values: Vec<CellValue>) -> Self {
        let kind = ColumnKind::infer(&values);
        Column {
            name: name.into(),
            kind,
            values,
        }
    }

    /// Numeric cells with missing values removed.
    pub fn numeric_values(&self) -> Vec<f64> {
        self.values.iter().filter_map(CellValue::as_f64).collect()
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// A columnar table: declared column order and row order are preserved.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    columns: Vec<Column>,
    rows: usize,
}

impl Dataset {
    /// Build a table from columns. Columns shorter than the longest one are
    /// padded with `Null`.
    pub fn from_columns(mut columns: Vec<Column>) -> Self {
        let rows = columns.iter().map(|c| c.values.len()).max().unwrap_or(0);
        for col in &mut columns {
            if col.values.len() < rows {
                col.values.resize(rows, CellValue::Null);
                col.kind = ColumnKind::infer(&col.values);
            }
        }
        Dataset { columns, rows }
    }

    /// Build a table from named, row-major records. Every record must have
    /// one cell per header.
    pub fn from_rows(headers: Vec<String>, records: Vec<Vec<CellValue>>) -> Self {
        let mut cols: Vec<Vec<CellValue>> = vec![Vec::with_capacity(records.len()); headers.len()];
        for record in records {
            let mut cells = record.into_iter();
            for col in cols.iter_mut() {
                col.push(cells.next().unwrap_or(CellValue::Null));
            }
        }
        let columns = headers
            .into_iter()
            .zip(cols)
            .map(|(name, values)| Column::new(name, values))
            .collect();
        Dataset::from_columns(columns)
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Integer and float columns, in declared order.
    pub fn numeric_columns(&self) -> Vec<&Column> {
        self.columns.iter().filter(|c| c.kind.is_numeric()).collect()
    }

    /// Keep only the given rows, in the given order.
    pub fn take_rows(&self, indices: &[usize]) -> Dataset {
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                kind: c.kind,
                values: indices
                    .iter()
                    .filter_map(|&i| c.values.get(i).cloned())
                    .collect(),
            })
            .collect();
        Dataset {
            columns,
            rows: indices.iter().filter(|&&i| i < self.rows).count(),
        }
    }

    /// Distinct non-missing values of a column in order of first appearance.
    /// Empty when the column does not exist.
    pub fn distinct_non_missing(&self, name: &str) -> Vec<CellValue> {
        let Some(col) = self.column(name) else {
            return Vec::new();
        };
        let mut seen = HashSet::new();
        col.values
            .iter()
            .filter(|v| !v.is_null())
            .filter(|v| seen.insert((*v).clone()))
            .cloned()
            .collect()
    }

    /// Index of the first row whose `column` cell equals `value`.
    pub fn find_row(&self, column: &str, value: &CellValue) -> Option<usize> {
        self.column(column)?.values.iter().position(|v| v == value)
    }

    /// Convert a column to numbers in place: unparsable cells become `Null`.
    ///
    /// Numeric columns are left untouched. Returns `false` when the column
    /// does not exist.
    pub fn coerce_numeric(&mut self, name: &str) -> bool {
        let Some(col) = self.columns.iter_mut().find(|c| c.name == name) else {
            return false;
        };
        if col.kind.is_numeric() {
            return true;
        }

        let parsed: Vec<Option<f64>> = col.values.iter().map(CellValue::coerce_f64).collect();
        let lossless = parsed.iter().all(|v| v.is_some());
        let integral = parsed
            .iter()
            .flatten()
            .all(|v| v.fract() == 0.0 && v.abs() < i64::MAX as f64);

        if lossless && integral && !parsed.is_empty() {
            col.values = parsed
                .into_iter()
                .flatten()
                .map(|v| CellValue::Integer(v as i64))
                .collect();
            col.kind = ColumnKind::Integer;
        } else {
            col.values = parsed
                .into_iter()
                .map(|v| v.map_or(CellValue::Null, CellValue::from_f64))
                .collect();
            col.kind = ColumnKind::Float;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> CellValue {
        CellValue::String(v.to_string())
    }

    fn sample() -> Dataset {
        Dataset::from_rows(
            vec!["id".into(), "final_score".into(), "completion_status".into()],
            vec![
                vec![CellValue::Integer(1), CellValue::Integer(80), s("done")],
                vec![CellValue::Integer(2), s("bad"), s("dropped")],
                vec![CellValue::Integer(3), CellValue::Integer(95), s("done")],
            ],
        )
    }

    #[test]
    fn kinds_are_inferred_per_column() {
        let ds = sample();
        assert_eq!(ds.column("id").unwrap().kind, ColumnKind::Integer);
        assert_eq!(ds.column("final_score").unwrap().kind, ColumnKind::Text);
        assert_eq!(ds.column("completion_status").unwrap().kind, ColumnKind::Text);
        assert_eq!(ds.row_count(), 3);
    }

    #[test]
    fn mixed_int_and_float_is_float_and_all_null_is_float() {
        assert_eq!(
            ColumnKind::infer(&[CellValue::Integer(1), CellValue::Float(1.5), CellValue::Null]),
            ColumnKind::Float
        );
        assert_eq!(ColumnKind::infer(&[CellValue::Null, CellValue::Null]), ColumnKind::Float);
        assert_eq!(ColumnKind::infer(&[]), ColumnKind::Text);
        assert_eq!(
            ColumnKind::infer(&[CellValue::Bool(true), CellValue::Null]),
            ColumnKind::Boolean
        );
    }

    #[test]
    fn coercion_turns_bad_text_into_missing() {
        let mut ds = sample();
        assert!(ds.coerce_numeric("final_score"));
        let col = ds.column("final_score").unwrap();
        assert_eq!(col.kind, ColumnKind::Float);
        assert_eq!(
            col.values,
            vec![CellValue::Float(80.0), CellValue::Null, CellValue::Float(95.0)]
        );
        assert_eq!(col.numeric_values(), vec![80.0, 95.0]);
    }

    #[test]
    fn coercion_is_idempotent_on_numeric_columns() {
        let mut ds = sample();
        ds.coerce_numeric("final_score");
        let once = ds.clone();
        ds.coerce_numeric("final_score");
        ds.coerce_numeric("id");
        assert_eq!(ds, once);
    }

    #[test]
    fn coercion_of_clean_integer_text_yields_integers() {
        let mut ds = Dataset::from_rows(
            vec!["score".into()],
            vec![vec![s("10")], vec![s(" 20 ")]],
        );
        ds.coerce_numeric("score");
        let col = ds.column("score").unwrap();
        assert_eq!(col.kind, ColumnKind::Integer);
        assert_eq!(col.values, vec![CellValue::Integer(10), CellValue::Integer(20)]);
    }

    #[test]
    fn coercion_of_missing_column_reports_false() {
        let mut ds = sample();
        assert!(!ds.coerce_numeric("attendance_final_score"));
    }

    #[test]
    fn distinct_values_keep_first_appearance_order() {
        let ds = Dataset::from_rows(
            vec!["status".into()],
            vec![vec![s("b")], vec![CellValue::Null], vec![s("a")], vec![s("b")]],
        );
        assert_eq!(ds.distinct_non_missing("status"), vec![s("b"), s("a")]);
        assert!(ds.distinct_non_missing("nope").is_empty());
    }

    #[test]
    fn take_rows_preserves_order_and_kinds() {
        let ds = sample();
        let sub = ds.take_rows(&[0, 2]);
        assert_eq!(sub.row_count(), 2);
        assert_eq!(
            sub.column("id").unwrap().values,
            vec![CellValue::Integer(1), CellValue::Integer(3)]
        );
        assert_eq!(sub.column("final_score").unwrap().kind, ColumnKind::Text);
    }

    #[test]
    fn numeric_columns_follow_declared_order() {
        let ds = Dataset::from_rows(
            vec!["b".into(), "name".into(), "a".into()],
            vec![vec![CellValue::Float(1.0), s("x"), CellValue::Integer(2)]],
        );
        let names: Vec<&str> = ds.numeric_columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn nan_floats_are_missing() {
        assert!(CellValue::from_f64(f64::NAN).is_null());
        assert_eq!(s("nan").coerce_f64(), None);
    }
}
