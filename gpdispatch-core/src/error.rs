//! Error types for gpdispatch.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`GpError`] - Top-level error type for all gpdispatch operations
//! - [`DispatchError`] - Registration and resolution errors
//! - [`HierarchyError`] - Malformed kind hierarchies
//! - [`SampleError`] - Errors from conditional and multivariate-normal sampling

use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all gpdispatch operations.
#[derive(Error, Debug)]
pub enum GpError {
    /// An error occurred while registering or resolving an implementation.
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// A kind hierarchy could not be linearized.
    #[error("hierarchy error: {0}")]
    Hierarchy(#[from] HierarchyError),

    /// An error occurred while sampling.
    #[error("sampling error: {0}")]
    Sample(#[from] SampleError),

    /// A custom error occurred.
    #[error(transparent)]
    Custom(BoxError),
}

/// Errors raised by a dispatcher.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The exact key pair already has an implementation.
    #[error("{dispatcher}({a}, {b}) has already been registered")]
    AlreadyRegistered {
        /// Name of the dispatcher.
        dispatcher: String,
        /// Kind of the first argument.
        a: &'static str,
        /// Kind of the second argument.
        b: &'static str,
    },

    /// No registered pair is reachable from the argument kinds.
    #[error("{dispatcher}: no implementation registered for ({a}, {b}) or any of their ancestors")]
    Unresolved {
        /// Name of the dispatcher.
        dispatcher: String,
        /// Kind of the first argument.
        a: &'static str,
        /// Kind of the second argument.
        b: &'static str,
    },

    /// One of the argument hierarchies is malformed.
    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),
}

/// Errors raised while computing a method resolution order.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HierarchyError {
    /// The kind is (transitively) its own base.
    #[error("kind `{kind}` inherits from itself")]
    Cycle {
        /// The kind at which the cycle was detected.
        kind: &'static str,
    },

    /// The bases of a kind admit no consistent linearization.
    #[error("cannot create a consistent method resolution order for `{kind}`")]
    Inconsistent {
        /// The kind whose bases conflict.
        kind: &'static str,
    },
}

/// Errors raised while drawing samples.
#[derive(Error, Debug)]
pub enum SampleError {
    /// Full covariance over both inputs and outputs was requested.
    #[error("the combination of both `full_cov` and `full_output_cov` is not permitted")]
    FullCovAndFullOutputCov,

    /// An operand does not have the expected shape.
    #[error("shape mismatch for {what}: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Which operand was checked.
        what: &'static str,
        /// Expected shape.
        expected: Vec<usize>,
        /// Actual shape.
        got: Vec<usize>,
    },

    /// The covariance has a different structure than the one requested.
    #[error("expected {expected} covariance, got {got}")]
    CovarianceStructure {
        /// Structure required by the sampling options.
        expected: &'static str,
        /// Structure that was supplied.
        got: &'static str,
    },

    /// A covariance block has no Cholesky factor, even after adding jitter.
    #[error("covariance block {index} is not positive definite")]
    NotPositiveDefinite {
        /// Index of the offending block.
        index: usize,
    },

    /// A diagonal covariance entry is negative.
    #[error("negative variance {value} at ({row}, {col})")]
    NegativeVariance {
        /// Row of the entry.
        row: usize,
        /// Column of the entry.
        col: usize,
        /// The offending value.
        value: f64,
    },

    /// No sampler could be selected.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// The caller-supplied conditional failed.
    #[error("conditional failed")]
    Conditional(#[source] BoxError),
}

// Convenience conversions
impl From<BoxError> for GpError {
    fn from(err: BoxError) -> Self {
        GpError::Custom(err)
    }
}

impl From<BoxError> for SampleError {
    fn from(err: BoxError) -> Self {
        SampleError::Conditional(err)
    }
}
