/// Above this many samples the density is evaluated from a fine pre-binning
/// of the data instead of from every sample.
const FINE_BINS: usize = 2048;

/// An equal-width histogram with a kernel density overlay in count units.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Histogram {
    /// `bins + 1` ascending bin edges.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
    /// `(x, expected count per bin)` points of the density curve.
    pub density: Vec<(f64, f64)>,
}

impl Histogram {
    /// Bins `values` into `bins` equal-width buckets spanning their range.
    ///
    /// The last bucket is closed on the right. A constant sample gets a unit
    /// wide range centred on its value. Non-finite values are ignored.
    pub fn compute(values: &[f64], bins: usize, grid: usize) -> Self {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() || bins == 0 {
            return Self::default();
        }

        let (mut lo, mut hi) = finite
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let edges: Vec<f64> = (0..=bins)
            .map(|i| if i == bins { hi } else { lo + width * i as f64 })
            .collect();
        let counts = bin_counts(&finite, lo, hi, bins);
        let density = kde_counts(&finite, lo, hi, width, grid);

        Self {
            edges,
            counts,
            density,
        }
    }

    pub fn bin_width(&self) -> f64 {
        match self.edges.as_slice() {
            [first, second, ..] => second - first,
            _ => 0.0,
        }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

fn bin_counts(values: &[f64], lo: f64, hi: f64, bins: usize) -> Vec<usize> {
    let mut counts = vec![0usize; bins];
    let span = hi - lo;
    for &v in values {
        let idx = (((v - lo) / span) * bins as f64) as usize;
        counts[idx.min(bins - 1)] += 1;
    }
    counts
}

/// Gaussian KDE with Scott's rule, scaled so the curve is comparable to the
/// histogram bars: `density(x) * n * bin_width`.
fn kde_counts(values: &[f64], lo: f64, hi: f64, bin_width: f64, grid: usize) -> Vec<(f64, f64)> {
    let n = values.len();
    if n < 2 || grid < 2 {
        return Vec::new();
    }

    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let std_dev = variance.sqrt();
    if std_dev == 0.0 || !std_dev.is_finite() {
        return Vec::new();
    }
    let bandwidth = std_dev * (n as f64).powf(-0.2);

    let support = weighted_support(values, lo, hi);
    let norm = (2.0 * std::f64::consts::PI).sqrt() * bandwidth;
    let step = (hi - lo) / (grid - 1) as f64;

    (0..grid)
        .map(|i| {
            let x = lo + step * i as f64;
            let kernel_sum: f64 = support
                .iter()
                .map(|&(center, weight)| {
                    let z = (x - center) / bandwidth;
                    weight * (-0.5 * z * z).exp()
                })
                .sum();
            // kernel_sum / (n * norm) is the density; times n * bin_width.
            (x, kernel_sum / norm * bin_width)
        })
        .collect()
}

/// The points the kernel is summed over, with their multiplicity.
fn weighted_support(values: &[f64], lo: f64, hi: f64) -> Vec<(f64, f64)> {
    if values.len() <= FINE_BINS {
        return values.iter().map(|&v| (v, 1.0)).collect();
    }

    let counts = bin_counts(values, lo, hi, FINE_BINS);
    let width = (hi - lo) / FINE_BINS as f64;
    counts
        .into_iter()
        .enumerate()
        .filter(|&(_, count)| count > 0)
        .map(|(i, count)| (lo + width * (i as f64 + 0.5), count as f64))
        .collect()
}
