//! # gpdispatch-core
//!
//! Core traits for the gpdispatch kind-pair dispatcher.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! extensions that only need to describe their argument kinds, without the
//! dispatcher and sampling machinery of `gpdispatch-std`.
//!
//! # Kinds
//!
//! Dispatch selects an implementation from the runtime *kinds* of two
//! arguments. A kind is a member of a closed hierarchy ([`Kind`]) with a single
//! root. Each kind's ancestor chain ([`Kind::mro`]) ranks how specific a
//! registered implementation is for it; [`Hierarchy`] precomputes those chains
//! for a whole enum.
//!
//! # Error Types
//!
//! - [`GpError`] - Top-level error type
//! - [`DispatchError`] - Registration and resolution errors
//! - [`HierarchyError`] - Malformed hierarchies
//! - [`SampleError`] - Sampling errors

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod error;
mod kind;

// Re-exports
pub use error::{BoxError, DispatchError, GpError, HierarchyError, SampleError};
pub use kind::{Hierarchy, Kind, Kinded, linearize};
