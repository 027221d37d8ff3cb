//! # gpdispatch - Kind-Pair Dispatch for Gaussian-Process Routines
//!
//! `gpdispatch` selects specialized two-argument routines, such as conditional
//! samplers for a given (inducing feature, kernel) combination, without
//! branching at the call site. Argument types are described by closed kind
//! hierarchies; a [`Dispatcher`] picks the registration whose key is closest to
//! the arguments' kinds.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gpdispatch::{Dispatcher, Kind};
//!
//! #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Kind)]
//! enum Value {
//!     #[kind(root)]
//!     Object,
//!     Int,
//!     #[kind(extends(Int))]
//!     Bool,
//!     Str,
//! }
//!
//! let mut dispatcher = Dispatcher::<Value, Value, &str>::new("describe")?;
//! dispatcher.register(Value::Int, Value::Str).to("int, str")?;
//!
//! // `Bool` derives from `Int`, so the (Int, Str) entry is the closest match.
//! let resolved = dispatcher.resolve(Value::Bool, Value::Str)?;
//! assert_eq!(*resolved.value(), "int, str");
//! ```
//!
//! ## Conditional Sampling
//!
//! ```rust,ignore
//! let front = SampleConditional::with_defaults()?;
//! let result = front.sample(&SampleRequest { xnew: &xnew, feature: &feature, kernel: &kernel,
//!     conditional: &my_conditional, options: SampleOptions::default().with_num_samples(10) }, &mut rng)?;
//! ```

#![warn(missing_docs)]

pub use gpdispatch_core::{
    // Error types
    BoxError,
    DispatchError,
    GpError,
    // Kinds
    Hierarchy,
    HierarchyError,
    Kind,
    Kinded,
    SampleError,
    linearize,
};

// Dispatch
pub use gpdispatch_std::dispatcher::{Dispatcher, Registration, Resolved, Specificity};

// GP kinds
pub use gpdispatch_std::kinds::{FeatureKind, InducingFeature, Kernel, KernelKind};

/// Sampling from Gaussian-process conditionals.
pub mod sampling {
    pub use gpdispatch_std::sampling::{
        Conditional, ConditionalCov, ConditionalSample, Covariance, SampleConditional,
        SampleOptions, SampleRequest, SamplerFn, sample_conditional_generic, sample_mvn,
    };
}

pub use sampling::{SampleConditional, SampleOptions, SampleRequest};

/// Numerical defaults and array helpers.
pub mod util {
    pub use gpdispatch_std::util::{broadcasting_elementwise, default_jitter, default_jitter_eye};
}

/// Testing utilities.
pub mod testing {
    pub use gpdispatch_std::testing::{ConditionalCall, FixedConditional, TestFeature, TestKernel};
}

/// Prelude module - common imports for gpdispatch.
///
/// # Usage
///
/// ```rust,ignore
/// use gpdispatch::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        DispatchError, Dispatcher, FeatureKind, GpError, InducingFeature, Kernel, KernelKind,
        Kind, Kinded, SampleConditional, SampleError, SampleOptions, SampleRequest,
    };
}

#[cfg(feature = "macros")]
pub use gpdispatch_macros::Kind;

pub use nalgebra;
