//! # Conditional sampling
//!
//! [`SampleConditional`] draws samples from a GP conditional `p(f(Xnew) | u)`.
//! Which routine draws them depends on the kinds of the inducing feature and
//! the kernel: some combinations have cheaper samplers than "compute the mean
//! and covariance, then sample a multivariate normal". The routines are held
//! in a [`Dispatcher`] keyed by `(FeatureKind, KernelKind)`, so the most
//! specific one is chosen automatically.
//!
//! The conditional mean and covariance themselves come from the caller, via
//! [`Conditional`].
//!
//! # Shapes
//!
//! With `N` new inputs and `P` outputs the mean is `[N, P]` and the covariance
//! is one of
//!
//! - [`ConditionalCov::Diag`]: `[N, P]` marginal variances,
//! - [`ConditionalCov::FullOutput`]: `N` blocks of `[P, P]`,
//! - [`ConditionalCov::Full`]: `P` blocks of `[N, N]`.
//!
//! Samples are `S` matrices of `[N, P]`.

use crate::{
    dispatcher::Dispatcher,
    kinds::{FeatureKind, InducingFeature, Kernel, KernelKind},
    sampling::mvn::{Covariance, sample_mvn},
    util::default_jitter,
};
use gpdispatch_core::{BoxError, DispatchError, SampleError};
#[cfg(feature = "tracing")]
use gpdispatch_core::Kind;
use nalgebra::DMatrix;
use rand::RngCore;

/// Covariance returned by a [`Conditional`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionalCov {
    /// Marginal variances, `[N, P]`.
    Diag(DMatrix<f64>),
    /// Covariance between outputs at each input, `N x [P, P]`.
    FullOutput(Vec<DMatrix<f64>>),
    /// Covariance between inputs for each output, `P x [N, N]`.
    Full(Vec<DMatrix<f64>>),
}

impl ConditionalCov {
    /// Name of the covariance structure.
    pub fn structure(&self) -> &'static str {
        match self {
            ConditionalCov::Diag(_) => "diag",
            ConditionalCov::FullOutput(_) => "full_output",
            ConditionalCov::Full(_) => "full",
        }
    }
}

/// Options for a conditional sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleOptions {
    /// Return the covariance between inputs.
    pub full_cov: bool,
    /// Return the covariance between outputs.
    pub full_output_cov: bool,
    /// Whether the inducing outputs are whitened.
    pub white: bool,
    /// Number of samples; `None` draws one.
    pub num_samples: Option<usize>,
    /// Diagonal jitter added before Cholesky factorization.
    pub jitter: f64,
}

impl Default for SampleOptions {
    fn default() -> Self {
        Self {
            full_cov: false,
            full_output_cov: false,
            white: false,
            num_samples: None,
            jitter: default_jitter(),
        }
    }
}

impl SampleOptions {
    /// Request the covariance between inputs.
    pub fn with_full_cov(mut self, full_cov: bool) -> Self {
        self.full_cov = full_cov;
        self
    }

    /// Request the covariance between outputs.
    pub fn with_full_output_cov(mut self, full_output_cov: bool) -> Self {
        self.full_output_cov = full_output_cov;
        self
    }

    /// Mark the inducing outputs as whitened.
    pub fn with_white(mut self, white: bool) -> Self {
        self.white = white;
        self
    }

    /// Draw `num_samples` samples.
    pub fn with_num_samples(mut self, num_samples: usize) -> Self {
        self.num_samples = Some(num_samples);
        self
    }

    /// Override the factorization jitter.
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter;
        self
    }
}

/// Computes the conditional mean and covariance of a GP.
///
/// Implemented by the modelling code; this crate only consumes the result.
pub trait Conditional: Send + Sync {
    /// Mean `[N, P]` and covariance at `xnew`, with the covariance structure
    /// selected by `options.full_cov` and `options.full_output_cov`.
    fn conditional(
        &self,
        xnew: &DMatrix<f64>,
        feature: &dyn InducingFeature,
        kernel: &dyn Kernel,
        options: &SampleOptions,
    ) -> Result<(DMatrix<f64>, ConditionalCov), BoxError>;
}

/// Everything a sampler needs.
pub struct SampleRequest<'a> {
    /// New inputs, one per row.
    pub xnew: &'a DMatrix<f64>,
    /// The inducing feature.
    pub feature: &'a dyn InducingFeature,
    /// The kernel.
    pub kernel: &'a dyn Kernel,
    /// Source of the conditional mean and covariance.
    pub conditional: &'a dyn Conditional,
    /// Sampling options.
    pub options: SampleOptions,
}

/// Samples with the moments they were drawn from.
#[derive(Debug, Clone)]
pub struct ConditionalSample {
    /// `S` samples of shape `[N, P]`.
    pub samples: Vec<DMatrix<f64>>,
    /// Conditional mean, `[N, P]`.
    pub mean: DMatrix<f64>,
    /// Conditional covariance.
    pub cov: ConditionalCov,
}

/// A sampling routine registered with [`SampleConditional`].
pub type SamplerFn =
    fn(&SampleRequest<'_>, &mut dyn RngCore) -> Result<ConditionalSample, SampleError>;

/// Sample from the conditional by computing its moments and drawing from the
/// resulting multivariate normal.
pub fn sample_conditional_generic(
    request: &SampleRequest<'_>,
    rng: &mut dyn RngCore,
) -> Result<ConditionalSample, SampleError> {
    let options = &request.options;
    if options.full_cov && options.full_output_cov {
        return Err(SampleError::FullCovAndFullOutputCov);
    }

    let (mean, cov) = request
        .conditional
        .conditional(request.xnew, request.feature, request.kernel, options)
        .map_err(SampleError::Conditional)?;

    let n = request.xnew.nrows();
    let p = request.kernel.num_outputs();
    if mean.shape() != (n, p) {
        return Err(SampleError::ShapeMismatch {
            what: "conditional mean",
            expected: vec![n, p],
            got: vec![mean.nrows(), mean.ncols()],
        });
    }

    let samples = match (&cov, options.full_cov, options.full_output_cov) {
        (ConditionalCov::Full(blocks), true, _) => {
            // Each output is an N-dimensional Gaussian: sample [P, N] and transpose back.
            let drawn = sample_mvn(
                &mean.transpose(),
                Covariance::Full(blocks),
                options.num_samples,
                options.jitter,
                rng,
            )?;
            drawn.into_iter().map(|s| s.transpose()).collect()
        }
        (ConditionalCov::FullOutput(blocks), false, true) => sample_mvn(
            &mean,
            Covariance::Full(blocks),
            options.num_samples,
            options.jitter,
            rng,
        )?,
        (ConditionalCov::Diag(var), false, false) => sample_mvn(
            &mean,
            Covariance::Diag(var),
            options.num_samples,
            options.jitter,
            rng,
        )?,
        (other, full_cov, full_output_cov) => {
            let expected = if full_cov {
                "full"
            } else if full_output_cov {
                "full_output"
            } else {
                "diag"
            };
            return Err(SampleError::CovarianceStructure {
                expected,
                got: other.structure(),
            });
        }
    };

    Ok(ConditionalSample { samples, mean, cov })
}

/// Conditional sampling front end, dispatching on feature and kernel kinds.
#[derive(Debug)]
pub struct SampleConditional {
    dispatcher: Dispatcher<FeatureKind, KernelKind, SamplerFn>,
}

impl SampleConditional {
    /// Name of the underlying dispatcher.
    pub const NAME: &'static str = "sample_conditional";

    /// Create a front end with no samplers registered.
    pub fn new() -> Result<Self, DispatchError> {
        Ok(Self {
            dispatcher: Dispatcher::new(Self::NAME)?,
        })
    }

    /// Create a front end with [`sample_conditional_generic`] registered for
    /// raw arrays, tensors and any inducing feature, with any kernel.
    pub fn with_defaults() -> Result<Self, DispatchError> {
        let mut this = Self::new()?;
        for feature in [
            FeatureKind::Array,
            FeatureKind::Tensor,
            FeatureKind::InducingFeature,
        ] {
            this.register(feature, KernelKind::Kernel, sample_conditional_generic)?;
        }
        Ok(this)
    }

    /// Register a sampler for a feature/kernel kind pair.
    pub fn register(
        &mut self,
        feature: FeatureKind,
        kernel: KernelKind,
        sampler: SamplerFn,
    ) -> Result<(), DispatchError> {
        self.dispatcher.register(feature, kernel).to(sampler)?;
        Ok(())
    }

    /// The underlying dispatcher.
    pub fn dispatcher(&self) -> &Dispatcher<FeatureKind, KernelKind, SamplerFn> {
        &self.dispatcher
    }

    /// Draw samples with the most specific sampler for the request's feature
    /// and kernel.
    pub fn sample<R: RngCore>(
        &self,
        request: &SampleRequest<'_>,
        rng: &mut R,
    ) -> Result<ConditionalSample, SampleError> {
        let resolved = self.dispatcher.resolve_for(request.feature, request.kernel)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            feature = request.feature.kind().name(),
            kernel = request.kernel.kind().name(),
            sampler_feature = resolved.key().0.name(),
            sampler_kernel = resolved.key().1.name(),
            num_samples = ?request.options.num_samples,
            "sampling conditional"
        );

        (resolved.value())(request, rng)
    }
}
