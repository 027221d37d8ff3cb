//! Sampling from Gaussian-process conditionals.
//!
//! - [`mvn`]: multivariate normal draws with diagonal or full covariance
//! - [`conditional`]: the dispatching `sample_conditional` front end

pub mod conditional;
pub mod mvn;

pub use conditional::{
    Conditional, ConditionalCov, ConditionalSample, SampleConditional, SampleOptions,
    SampleRequest, SamplerFn, sample_conditional_generic,
};
pub use mvn::{Covariance, sample_mvn};
