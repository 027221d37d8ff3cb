//! Testing utilities for gpdispatch.
//!
//! This module provides stand-ins that make dispatch and sampling easy to
//! exercise without a modelling library.
//!
//! # Features
//!
//! - [`FixedConditional`]: A [`Conditional`] that returns preset moments and records its calls
//! - [`TestFeature`]: An inducing feature of any [`FeatureKind`]
//! - [`TestKernel`]: A kernel of any [`KernelKind`]

use crate::{
    kinds::{FeatureKind, InducingFeature, Kernel, KernelKind},
    sampling::{Conditional, ConditionalCov, SampleOptions},
};
use gpdispatch_core::{BoxError, Kinded};
use nalgebra::DMatrix;
use std::sync::{Arc, Mutex};

// ============================================================================
// Fixed Conditional
// ============================================================================

/// A conditional that always returns the same mean and covariance.
///
/// Every call records the kinds and options it was invoked with. Clones share
/// the record.
///
/// # Example
///
/// ```rust,ignore
/// let conditional = FixedConditional::new(mean, ConditionalCov::Diag(var));
/// let recorder = conditional.clone();
///
/// front.sample(&request, &mut rng)?;
///
/// assert_eq!(recorder.calls(), 1);
/// ```
#[derive(Clone)]
pub struct FixedConditional {
    mean: DMatrix<f64>,
    cov: ConditionalCov,
    calls: Arc<Mutex<Vec<ConditionalCall>>>,
}

/// One recorded call of a [`FixedConditional`].
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalCall {
    /// Kind of the feature passed in.
    pub feature: FeatureKind,
    /// Kind of the kernel passed in.
    pub kernel: KernelKind,
    /// Options passed in.
    pub options: SampleOptions,
}

impl FixedConditional {
    /// Create a conditional returning `mean` and `cov`.
    pub fn new(mean: DMatrix<f64>, cov: ConditionalCov) -> Self {
        Self {
            mean,
            cov,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get a clone of the recorded calls.
    pub fn recorded(&self) -> Vec<ConditionalCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Get the number of recorded calls.
    pub fn calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Clear all recorded calls.
    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl Conditional for FixedConditional {
    fn conditional(
        &self,
        _xnew: &DMatrix<f64>,
        feature: &dyn InducingFeature,
        kernel: &dyn Kernel,
        options: &SampleOptions,
    ) -> Result<(DMatrix<f64>, ConditionalCov), BoxError> {
        self.calls
            .lock()
            .map_err(|_| "conditional record poisoned")?
            .push(ConditionalCall {
                feature: feature.kind(),
                kernel: kernel.kind(),
                options: *options,
            });
        Ok((self.mean.clone(), self.cov.clone()))
    }
}

// ============================================================================
// Feature and Kernel stand-ins
// ============================================================================

/// An inducing feature that only carries a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestFeature {
    kind: FeatureKind,
}

impl TestFeature {
    /// Create a feature of `kind`.
    pub fn new(kind: FeatureKind) -> Self {
        Self { kind }
    }
}

impl Kinded for TestFeature {
    type Kind = FeatureKind;

    fn kind(&self) -> FeatureKind {
        self.kind
    }
}

impl InducingFeature for TestFeature {}

/// A kernel that only carries a kind and an output count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestKernel {
    kind: KernelKind,
    num_outputs: usize,
}

impl TestKernel {
    /// Create a single-output kernel of `kind`.
    pub fn new(kind: KernelKind) -> Self {
        Self {
            kind,
            num_outputs: 1,
        }
    }

    /// Set the number of outputs.
    pub fn with_outputs(mut self, num_outputs: usize) -> Self {
        self.num_outputs = num_outputs;
        self
    }
}

impl Kinded for TestKernel {
    type Kind = KernelKind;

    fn kind(&self) -> KernelKind {
        self.kind
    }
}

impl Kernel for TestKernel {
    fn num_outputs(&self) -> usize {
        self.num_outputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_conditional_records_calls() {
        let conditional = FixedConditional::new(
            DMatrix::zeros(1, 1),
            ConditionalCov::Diag(DMatrix::zeros(1, 1)),
        );
        let recorder = conditional.clone();
        let xnew = DMatrix::zeros(1, 1);
        let feature = TestFeature::new(FeatureKind::Multiscale);
        let kernel = TestKernel::new(KernelKind::Sum).with_outputs(2);

        let (mean, _) = conditional
            .conditional(&xnew, &feature, &kernel, &SampleOptions::default())
            .unwrap();

        assert_eq!(mean.shape(), (1, 1));
        assert_eq!(
            recorder.recorded(),
            vec![ConditionalCall {
                feature: FeatureKind::Multiscale,
                kernel: KernelKind::Sum,
                options: SampleOptions::default(),
            }]
        );
        assert_eq!(kernel.num_outputs(), 2);

        recorder.clear();
        assert_eq!(conditional.calls(), 0);
    }
}
