use super::sample_std;

/// One histogram bin `[start, end)`; the last bin is closed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl Bin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Equal-width histogram over the data range.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Histogram {
    pub bins: Vec<Bin>,
}

impl Histogram {
    pub fn bin_width(&self) -> f64 {
        self.bins.first().map_or(0.0, Bin::width)
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}

/// Count `values` into `bins` equal-width bins spanning `[min, max]`.
/// A single distinct value spans `[v - 0.5, v + 0.5]`. No data, no bins.
pub fn histogram(values: &[f64], bins: usize) -> Histogram {
    if values.is_empty() || bins == 0 {
        return Histogram::default();
    }
    let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if (hi - lo).abs() < f64::EPSILON {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    Histogram {
        bins: counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| Bin {
                start: lo + width * i as f64,
                end: lo + width * (i + 1) as f64,
                count,
            })
            .collect(),
    }
}

/// Gaussian kernel density estimate with Scott's bandwidth, evaluated on
/// `gridsize` points across the data range and scaled to histogram counts
/// (`density * n * bin_width`).
///
/// `None` below two values or when all values are equal.
pub fn kde_curve(values: &[f64], gridsize: usize, bin_width: f64) -> Option<Vec<[f64; 2]>> {
    let n = values.len();
    let sd = sample_std(values)?;
    if sd <= 0.0 || gridsize < 2 {
        return None;
    }
    let bw = sd * (n as f64).powf(-0.2);

    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let step = (hi - lo) / (gridsize - 1) as f64;
    let norm = 1.0 / (n as f64 * bw * (2.0 * std::f64::consts::PI).sqrt());
    let scale = n as f64 * bin_width;

    Some(
        (0..gridsize)
            .map(|i| {
                let x = lo + step * i as f64;
                let density: f64 = values
                    .iter()
                    .map(|&v| (-0.5 * ((x - v) / bw).powi(2)).exp())
                    .sum::<f64>()
                    * norm;
                [x, density * scale]
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_every_value_once() {
        let values: Vec<f64> = (0..100).map(f64::from).collect();
        let h = histogram(&values, 20);
        assert_eq!(h.bins.len(), 20);
        assert_eq!(h.total(), 100);
        assert!(h.bins.iter().all(|b| b.count == 5));
        assert!((h.bin_width() - 99.0 / 20.0).abs() < 1e-12);
    }

    #[test]
    fn maximum_lands_in_last_bin() {
        let h = histogram(&[80.0, 95.0], 20);
        assert_eq!(h.bins[0].count, 1);
        assert_eq!(h.bins[19].count, 1);
        assert_eq!(h.bins[0].start, 80.0);
        assert!((h.bins[19].end - 95.0).abs() < 1e-9);
    }

    #[test]
    fn constant_data_gets_unit_range() {
        let h = histogram(&[7.0, 7.0, 7.0], 20);
        assert!((h.bins[0].start - 6.5).abs() < 1e-12);
        assert!((h.bins[19].end - 7.5).abs() < 1e-9);
        assert_eq!(h.total(), 3);
    }

    #[test]
    fn no_values_no_bins() {
        assert!(histogram(&[], 20).bins.is_empty());
    }

    #[test]
    fn kde_integrates_to_roughly_the_sample_size() {
        let values: Vec<f64> = (0..200).map(|i| 50.0 + (i % 21) as f64).collect();
        let h = histogram(&values, 20);
        let curve = kde_curve(&values, 400, h.bin_width()).unwrap();
        assert_eq!(curve.len(), 400);
        let dx = curve[1][0] - curve[0][0];
        let area: f64 = curve.iter().map(|p| p[1] * dx).sum::<f64>() / h.bin_width();
        // Clipped to the data range, so a little mass is lost at the edges.
        assert!(area > 150.0 && area < 200.0, "area {area}");
    }

    #[test]
    fn kde_needs_spread() {
        assert!(kde_curve(&[1.0], 200, 1.0).is_none());
        assert!(kde_curve(&[3.0, 3.0, 3.0], 200, 1.0).is_none());
    }
}
