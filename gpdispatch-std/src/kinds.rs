//! Kind hierarchies for Gaussian-process inducing features and kernels.
//!
//! These mirror the class hierarchies that conditional and sampling routines
//! specialize on. Types from a modelling crate join dispatch by implementing
//! [`InducingFeature`] or [`Kernel`].

use gpdispatch_core::Kinded;
use gpdispatch_macros::Kind;

/// Kinds of inducing variables, including raw input arrays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Kind)]
#[kind(crate = "::gpdispatch_core")]
pub enum FeatureKind {
    /// Anything.
    #[kind(root)]
    Any,
    /// A host array of inducing inputs.
    Array,
    /// A framework tensor of inducing inputs.
    Tensor,
    /// Any inducing feature.
    InducingFeature,
    /// Inducing points in the input space.
    #[kind(extends(InducingFeature))]
    InducingPoints,
    /// Multi-scale inducing points.
    #[kind(extends(InducingPoints))]
    Multiscale,
    /// Inducing features for multi-output models.
    #[kind(extends(InducingFeature))]
    MultioutputFeature,
    /// One set of inducing features shared by all outputs.
    #[kind(extends(MultioutputFeature))]
    SharedIndependentMof,
    /// One set of inducing features per output.
    #[kind(extends(MultioutputFeature))]
    SeparateIndependentMof,
    /// Shared inducing features placed on the latent processes of a mixed kernel.
    #[kind(extends(SharedIndependentMof))]
    MixedKernelSharedMof,
}

/// Kinds of covariance functions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Kind)]
#[kind(crate = "::gpdispatch_core")]
pub enum KernelKind {
    /// Anything.
    #[kind(root)]
    Any,
    /// Any kernel.
    Kernel,
    /// Kernels depending only on `x - x'`.
    #[kind(extends(Kernel))]
    Stationary,
    /// Kernels built from other kernels.
    #[kind(extends(Kernel))]
    Combination,
    /// Sum of kernels.
    #[kind(extends(Combination))]
    Sum,
    /// Product of kernels.
    #[kind(extends(Combination))]
    Product,
    /// Multi-output kernel.
    #[kind(extends(Kernel))]
    Mok,
    /// One kernel shared by all outputs.
    #[kind(extends(Mok))]
    SharedIndependentMok,
    /// One kernel per output.
    #[kind(extends(Mok, Combination))]
    SeparateIndependentMok,
    /// Independent latent processes mixed linearly into the outputs.
    #[kind(extends(Mok, Combination))]
    SeparateMixedMok,
}

/// An inducing feature that takes part in dispatch.
pub trait InducingFeature: Kinded<Kind = FeatureKind> {}

/// A kernel that takes part in dispatch.
pub trait Kernel: Kinded<Kind = KernelKind> {
    /// Number of outputs `P`, the column count of a conditional mean.
    fn num_outputs(&self) -> usize {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpdispatch_core::{Hierarchy, Kind};

    #[test]
    fn test_feature_mro() {
        assert_eq!(
            FeatureKind::MixedKernelSharedMof.mro().unwrap(),
            vec![
                FeatureKind::MixedKernelSharedMof,
                FeatureKind::SharedIndependentMof,
                FeatureKind::MultioutputFeature,
                FeatureKind::InducingFeature,
                FeatureKind::Any,
            ]
        );
    }

    #[test]
    fn test_multiple_bases_linearize() {
        assert_eq!(
            KernelKind::SeparateIndependentMok.mro().unwrap(),
            vec![
                KernelKind::SeparateIndependentMok,
                KernelKind::Mok,
                KernelKind::Combination,
                KernelKind::Kernel,
                KernelKind::Any,
            ]
        );
    }

    #[test]
    fn test_hierarchies_build() {
        let features = Hierarchy::<FeatureKind>::build().unwrap();
        let kernels = Hierarchy::<KernelKind>::build().unwrap();
        assert_eq!(features.len(), FeatureKind::ALL.len());
        assert_eq!(kernels.len(), KernelKind::ALL.len());
        assert!(!features.is_subkind(FeatureKind::Array, FeatureKind::InducingFeature));
        assert!(kernels.is_subkind(KernelKind::Sum, KernelKind::Kernel));
    }

    #[test]
    fn test_names() {
        assert_eq!(KernelKind::Mok.name(), "Mok");
        assert_eq!(FeatureKind::InducingPoints.name(), "InducingPoints");
        assert_eq!(KernelKind::ROOT, KernelKind::Any);
    }
}
