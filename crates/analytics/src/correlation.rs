/// A symmetric Pearson correlation matrix over named numeric columns.
///
/// Cells that cannot be computed (fewer than two complete pairs, or a
/// constant column) are `NaN`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorrelationMatrix {
    pub names: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Computes pairwise correlations. Each pair uses only the rows where
    /// both columns are present and not `NaN`.
    pub fn compute(columns: &[(String, Vec<Option<f64>>)]) -> Self {
        let k = columns.len();
        let mut values = vec![vec![f64::NAN; k]; k];

        for i in 0..k {
            for j in i..k {
                let r = pearson(&columns[i].1, &columns[j].1);
                let r = if i == j && !r.is_nan() { 1.0 } else { r };
                values[i][j] = r;
                values[j][i] = r;
            }
        }

        Self {
            names: columns.iter().map(|(name, _)| name.clone()).collect(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Looks a cell up by column names.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.names.iter().position(|n| n == a)?;
        let j = self.names.iter().position(|n| n == b)?;
        Some(self.values[i][j])
    }
}

fn present(v: Option<f64>) -> Option<f64> {
    v.filter(|v| !v.is_nan())
}

fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> f64 {
    let pairs = || {
        xs.iter()
            .zip(ys)
            .filter_map(|(&x, &y)| Some((present(x)?, present(y)?)))
    };

    let (n, sum_x, sum_y) = pairs().fold((0usize, 0.0, 0.0), |(n, sx, sy), (x, y)| {
        (n + 1, sx + x, sy + y)
    });
    if n < 2 {
        return f64::NAN;
    }
    let mean_x = sum_x / n as f64;
    let mean_y = sum_y / n as f64;

    let (sxx, syy, sxy) = pairs().fold((0.0, 0.0, 0.0), |(sxx, syy, sxy), (x, y)| {
        let dx = x - mean_x;
        let dy = y - mean_y;
        (sxx + dx * dx, syy + dy * dy, sxy + dx * dy)
    });
    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(name: &str, values: &[Option<f64>]) -> (String, Vec<Option<f64>>) {
        (name.to_string(), values.to_vec())
    }

    #[test]
    fn perfectly_linear_columns_correlate_fully() {
        let matrix = CorrelationMatrix::compute(&[
            col("a", &[Some(1.0), Some(2.0), Some(3.0)]),
            col("b", &[Some(2.0), Some(4.0), Some(6.0)]),
            col("c", &[Some(3.0), Some(2.0), Some(1.0)]),
        ]);
        assert_eq!(matrix.get("a", "a"), Some(1.0));
        assert!((matrix.get("a", "b").unwrap() - 1.0).abs() < 1e-12);
        assert!((matrix.get("a", "c").unwrap() + 1.0).abs() < 1e-12);
        assert_eq!(matrix.get("b", "c"), matrix.get("c", "b"));
    }

    #[test]
    fn uses_pairwise_complete_observations() {
        let matrix = CorrelationMatrix::compute(&[
            col("a", &[Some(1.0), Some(2.0), None, Some(4.0)]),
            col("b", &[Some(1.0), Some(2.0), Some(100.0), Some(f64::NAN)]),
        ]);
        assert!((matrix.get("a", "b").unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn constant_or_sparse_columns_are_nan() {
        let matrix = CorrelationMatrix::compute(&[
            col("flat", &[Some(5.0), Some(5.0), Some(5.0)]),
            col("x", &[Some(1.0), Some(2.0), Some(3.0)]),
            col("lonely", &[None, None, Some(1.0)]),
        ]);
        assert!(matrix.get("flat", "flat").unwrap().is_nan());
        assert!(matrix.get("flat", "x").unwrap().is_nan());
        assert!(matrix.get("lonely", "x").unwrap().is_nan());
        assert_eq!(matrix.get("x", "x"), Some(1.0));
        assert_eq!(matrix.get("x", "missing"), None);
    }
}
