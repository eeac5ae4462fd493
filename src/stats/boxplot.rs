use super::{quantile_sorted, sorted};

/// Five-number summary plus outliers for one boxplot.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

/// Quartiles, whiskers at the furthest point within 1.5·IQR of the box,
/// and everything beyond them as outliers. `None` for no data.
pub fn box_stats(values: &[f64]) -> Option<BoxStats> {
    let s = sorted(values);
    let q1 = quantile_sorted(&s, 0.25)?;
    let median = quantile_sorted(&s, 0.5)?;
    let q3 = quantile_sorted(&s, 0.75)?;
    let iqr = q3 - q1;
    let lo_fence = q1 - 1.5 * iqr;
    let hi_fence = q3 + 1.5 * iqr;

    let lower_whisker = s.iter().copied().find(|&v| v >= lo_fence).unwrap_or(q1);
    let upper_whisker = s.iter().rev().copied().find(|&v| v <= hi_fence).unwrap_or(q3);
    let outliers = s
        .iter()
        .copied()
        .filter(|&v| v < lower_whisker || v > upper_whisker)
        .collect();

    Some(BoxStats {
        lower_whisker,
        q1,
        median,
        q3,
        upper_whisker,
        outliers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whiskers_stop_at_fences() {
        let mut v: Vec<f64> = (1..=9).map(f64::from).collect();
        v.push(100.0);
        let b = box_stats(&v).unwrap();
        assert_eq!(b.q1, 3.25);
        assert_eq!(b.median, 5.5);
        assert_eq!(b.q3, 7.75);
        assert_eq!(b.lower_whisker, 1.0);
        assert_eq!(b.upper_whisker, 9.0);
        assert_eq!(b.outliers, vec![100.0]);
    }

    #[test]
    fn single_value_collapses() {
        let b = box_stats(&[4.0]).unwrap();
        assert_eq!((b.lower_whisker, b.q1, b.median, b.q3, b.upper_whisker), (4.0, 4.0, 4.0, 4.0, 4.0));
        assert!(b.outliers.is_empty());
    }

    #[test]
    fn no_data_no_box() {
        assert!(box_stats(&[]).is_none());
    }
}
