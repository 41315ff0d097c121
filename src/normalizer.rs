//! Signal normalization
//!
//! Standardizes each column of the signal matrix to zero mean and unit
//! variance, computed over the full recording rather than per window. Pure
//! function; no state carries across subjects.

use ndarray::Array2;

/// Normalizer for per-column z-score standardization
pub struct Normalizer;

impl Normalizer {
    /// Z-score every column in place (ddof = 0).
    ///
    /// A constant column has zero variance and is left unchanged rather than
    /// divided by zero.
    pub fn standardize(matrix: &mut Array2<f64>) {
        let rows = matrix.nrows();
        if rows == 0 {
            return;
        }
        for mut column in matrix.columns_mut() {
            let n = rows as f64;
            let mean = column.iter().sum::<f64>() / n;
            let var = column.iter().map(|&v| (v - mean) * (v - mean)).sum::<f64>() / n;
            let std = var.sqrt();
            if std > 0.0 {
                column.mapv_inplace(|v| (v - mean) / std);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::Array2;

    #[test]
    fn test_columns_standardized_independently() {
        let mut matrix = Array2::from_shape_fn((512, 3), |(r, c)| {
            (r as f64 * 0.1 + c as f64 * 3.7).sin() * (10.0 + c as f64 * 100.0)
        });

        Normalizer::standardize(&mut matrix);

        for column in matrix.columns() {
            let n = column.len() as f64;
            let mean = column.iter().sum::<f64>() / n;
            let var = column.iter().map(|&v| (v - mean) * (v - mean)).sum::<f64>() / n;
            assert_abs_diff_eq!(mean, 0.0, epsilon = 1e-9);
            assert_abs_diff_eq!(var.sqrt(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_constant_column_unchanged() {
        let mut matrix = Array2::from_elem((128, 2), 7.0);
        // Give the second column some spread.
        for r in 0..128 {
            matrix[[r, 1]] = r as f64;
        }

        Normalizer::standardize(&mut matrix);

        for r in 0..128 {
            assert_abs_diff_eq!(matrix[[r, 0]], 7.0, epsilon = 1e-12);
        }
        let mean1: f64 = matrix.column(1).iter().sum::<f64>() / 128.0;
        assert_abs_diff_eq!(mean1, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_empty_matrix_no_panic() {
        let mut matrix: Array2<f64> = Array2::zeros((0, 4));
        Normalizer::standardize(&mut matrix);
        assert_eq!(matrix.nrows(), 0);
    }
}
