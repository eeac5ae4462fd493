use crate::data::model::{CellValue, Dataset};

/// Pairwise Pearson correlations between numeric columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    /// Row-major, `labels.len()` squared entries. `None` where undefined.
    pub values: Vec<Option<f64>>,
}

impl CorrelationMatrix {
    pub fn size(&self) -> usize {
        self.labels.len()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get(row * self.size() + col).copied().flatten()
    }

    /// Largest absolute coefficient, used to centre the colour scale.
    pub fn max_abs(&self) -> f64 {
        self.values
            .iter()
            .flatten()
            .fold(0.0_f64, |acc, v| acc.max(v.abs()))
    }
}

/// Pearson r over rows where both cells are present.
/// `None` below two complete pairs or when either side has no variance.
pub fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mx = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let my = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mx;
        let dy = y - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx <= 0.0 || syy <= 0.0 {
        return None;
    }
    Some((sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0))
}

/// Correlate every numeric column with every other. Zero or one numeric
/// column gives a 0×0 or 1×1 matrix.
pub fn correlation_matrix(dataset: &Dataset) -> CorrelationMatrix {
    let columns = dataset.numeric_columns();
    let series: Vec<Vec<Option<f64>>> = columns
        .iter()
        .map(|c| c.values.iter().map(CellValue::as_f64).collect())
        .collect();

    let n = series.len();
    let mut values = vec![None; n * n];
    for i in 0..n {
        for j in i..n {
            let r = pearson(&series[i], &series[j]);
            values[i * n + j] = r;
            values[j * n + i] = r;
        }
    }

    CorrelationMatrix {
        labels: columns.iter().map(|c| c.name.clone()).collect(),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Column;

    fn int_col(v: &[i64]) -> Vec<CellValue> {
        v.iter().map(|&i| CellValue::Integer(i)).collect()
    }

    #[test]
    fn perfect_positive_and_negative() {
        let a = [Some(1.0), Some(2.0), Some(3.0)];
        let b = [Some(2.0), Some(4.0), Some(6.0)];
        let c = [Some(3.0), Some(2.0), Some(1.0)];
        assert!((pearson(&a, &b).unwrap() - 1.0).abs() < 1e-12);
        assert!((pearson(&a, &c).unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn uses_pairwise_complete_rows() {
        let a = [Some(1.0), None, Some(2.0), Some(3.0)];
        let b = [Some(1.0), Some(100.0), Some(2.0), Some(3.0)];
        assert!((pearson(&a, &b).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn constant_series_is_undefined() {
        let a = [Some(1.0), Some(1.0)];
        let b = [Some(1.0), Some(2.0)];
        assert_eq!(pearson(&a, &b), None);
    }

    #[test]
    fn matrix_is_symmetric_over_numeric_columns() {
        let ds = Dataset::from_columns(vec![
            Column::new("a", int_col(&[1, 2, 3, 4])),
            Column::new("name", vec![CellValue::String("x".into()); 4]),
            Column::new("b", int_col(&[4, 3, 2, 1])),
        ]);
        let m = correlation_matrix(&ds);
        assert_eq!(m.labels, vec!["a", "b"]);
        assert!((m.get(0, 0).unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(m.get(0, 1), m.get(1, 0));
        assert!((m.get(0, 1).unwrap() + 1.0).abs() < 1e-12);
        assert!((m.max_abs() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_shapes_do_not_fail() {
        let empty = correlation_matrix(&Dataset::default());
        assert_eq!(empty.size(), 0);
        assert_eq!(empty.max_abs(), 0.0);

        let one = Dataset::from_columns(vec![Column::new("only", int_col(&[5]))]);
        let m = correlation_matrix(&one);
        assert_eq!(m.size(), 1);
        assert_eq!(m.get(0, 0), None);
    }
}
