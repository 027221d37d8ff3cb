//! # gpdispatch-std
//!
//! Standard implementations for the gpdispatch kind-pair dispatcher.
//!
//! This crate provides:
//! - **Dispatch**: [`Dispatcher`], selecting the most specific implementation for two argument kinds
//! - **GP kinds**: [`FeatureKind`] and [`KernelKind`] with the [`InducingFeature`] and [`Kernel`] traits
//! - **Sampling**: [`sample_mvn`] and the dispatching [`SampleConditional`] front end
//! - **Utilities**: jitter defaults and [`broadcasting_elementwise`]
//! - **Testing**: stand-ins for conditionals, features and kernels

#![warn(missing_docs)]

// Re-export core traits
pub use gpdispatch_core;

// Modules
pub mod dispatcher;
pub mod kinds;
pub mod sampling;
pub mod testing;
pub mod util;

pub use dispatcher::{Dispatcher, Registration, Resolved, Specificity};
pub use kinds::{FeatureKind, InducingFeature, Kernel, KernelKind};
pub use sampling::{
    Conditional, ConditionalCov, ConditionalSample, Covariance, SampleConditional, SampleOptions,
    SampleRequest, SamplerFn, sample_conditional_generic, sample_mvn,
};
pub use util::{broadcasting_elementwise, default_jitter, default_jitter_eye};
