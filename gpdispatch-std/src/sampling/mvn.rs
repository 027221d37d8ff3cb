//! Multivariate normal sampling.
//!
//! Draws `N` independent `D`-dimensional Gaussians at once. The mean is an
//! `[N, D]` matrix; the covariance is either the `[N, D]` matrix of marginal
//! variances or `N` full `[D, D]` blocks.

use gpdispatch_core::SampleError;
use nalgebra::{Cholesky, DMatrix, DVector};
use rand::Rng;
use rand_distr::StandardNormal;

/// Covariance of `N` independent `D`-dimensional Gaussians.
#[derive(Debug, Clone, Copy)]
pub enum Covariance<'a> {
    /// Marginal variances, `[N, D]`.
    Diag(&'a DMatrix<f64>),
    /// One `[D, D]` covariance per row of the mean.
    Full(&'a [DMatrix<f64>]),
}

impl Covariance<'_> {
    /// Name of the covariance structure.
    pub fn structure(&self) -> &'static str {
        match self {
            Covariance::Diag(_) => "diag",
            Covariance::Full(_) => "full",
        }
    }
}

/// Draw samples from `N(mean, cov)`.
///
/// Returns `num_samples` matrices of shape `[N, D]`, or a single one when
/// `num_samples` is `None`. Full covariance blocks are factorized after adding
/// `jitter` to their diagonal.
pub fn sample_mvn<R>(
    mean: &DMatrix<f64>,
    cov: Covariance<'_>,
    num_samples: Option<usize>,
    jitter: f64,
    rng: &mut R,
) -> Result<Vec<DMatrix<f64>>, SampleError>
where
    R: Rng + ?Sized,
{
    let (n, d) = mean.shape();
    let num_samples = num_samples.unwrap_or(1);

    match cov {
        Covariance::Diag(var) => {
            if var.shape() != (n, d) {
                return Err(SampleError::ShapeMismatch {
                    what: "diagonal covariance",
                    expected: vec![n, d],
                    got: vec![var.nrows(), var.ncols()],
                });
            }
            if let Some(((row, col), value)) = var
                .iter()
                .enumerate()
                .map(|(i, v)| ((i % n, i / n), *v))
                .find(|(_, v)| *v < 0.0)
            {
                return Err(SampleError::NegativeVariance { row, col, value });
            }

            let std = var.map(f64::sqrt);
            let samples = (0..num_samples)
                .map(|_| {
                    let eps = DMatrix::from_fn(n, d, |_, _| rng.sample::<f64, _>(StandardNormal));
                    mean + std.component_mul(&eps)
                })
                .collect();
            Ok(samples)
        }
        Covariance::Full(blocks) => {
            if blocks.len() != n {
                return Err(SampleError::ShapeMismatch {
                    what: "full covariance blocks",
                    expected: vec![n],
                    got: vec![blocks.len()],
                });
            }

            let jitter_eye = DMatrix::identity(d, d) * jitter;
            let mut factors = Vec::with_capacity(n);
            for (index, block) in blocks.iter().enumerate() {
                if block.shape() != (d, d) {
                    return Err(SampleError::ShapeMismatch {
                        what: "full covariance block",
                        expected: vec![d, d],
                        got: vec![block.nrows(), block.ncols()],
                    });
                }
                let chol = Cholesky::new(block + &jitter_eye)
                    .ok_or(SampleError::NotPositiveDefinite { index })?;
                factors.push(chol.unpack());
            }

            let samples = (0..num_samples)
                .map(|_| {
                    let mut sample = mean.clone();
                    for (row, factor) in factors.iter().enumerate() {
                        let eps = DVector::from_fn(d, |_, _| rng.sample::<f64, _>(StandardNormal));
                        let draw = factor * eps;
                        for col in 0..d {
                            sample[(row, col)] += draw[col];
                        }
                    }
                    sample
                })
                .collect();
            Ok(samples)
        }
    }
}
