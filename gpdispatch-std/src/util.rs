//! Numerical defaults and small array helpers.

use nalgebra::{DMatrix, DVector};

/// Jitter added to covariance diagonals before factorization.
pub const fn default_jitter() -> f64 {
    1e-6
}

/// A `num_rows x num_columns` identity scaled by `value`.
///
/// `num_columns` defaults to `num_rows`, `value` to [`default_jitter`].
pub fn default_jitter_eye(
    num_rows: usize,
    num_columns: Option<usize>,
    value: Option<f64>,
) -> DMatrix<f64> {
    let value = value.unwrap_or_else(default_jitter);
    let num_columns = num_columns.unwrap_or(num_rows);
    DMatrix::identity(num_rows, num_columns) * value
}

/// Apply `op` to every pair of elements of `a` and `b`.
///
/// `a` has shape `[n]`, `b` has shape `[m]`; the result has shape `[n, m]` with
/// `result[(i, j)] = op(a[i], b[j])`.
pub fn broadcasting_elementwise<F>(op: F, a: &DVector<f64>, b: &DVector<f64>) -> DMatrix<f64>
where
    F: Fn(f64, f64) -> f64,
{
    DMatrix::from_fn(a.len(), b.len(), |i, j| op(a[i], b[j]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jitter_eye_defaults() {
        let eye = default_jitter_eye(3, None, None);
        assert_eq!(eye.shape(), (3, 3));
        assert_eq!(eye[(1, 1)], 1e-6);
        assert_eq!(eye[(0, 1)], 0.0);
    }

    #[test]
    fn test_jitter_eye_rectangular() {
        let eye = default_jitter_eye(2, Some(4), Some(0.5));
        assert_eq!(eye.shape(), (2, 4));
        assert_eq!(eye.sum(), 1.0);
    }

    #[test]
    fn test_broadcasting_elementwise() {
        let a = DVector::from_vec(vec![1.0, 2.0, 3.0]);
        let b = DVector::from_vec(vec![10.0, 20.0]);

        let sums = broadcasting_elementwise(|x, y| x + y, &a, &b);
        assert_eq!(sums.shape(), (3, 2));
        assert_eq!(sums[(2, 1)], 23.0);

        let diffs = broadcasting_elementwise(|x, y| x - y, &a, &b);
        assert_eq!(diffs[(0, 1)], -19.0);
    }
}
