use proc_macro::TokenStream;

mod kind;

/// Derive macro for implementing the `Kind` trait on a unit enum.
///
/// Variant attributes:
/// - `#[kind(root)]` marks the most general kind (exactly one is required).
/// - `#[kind(extends(A, B))]` lists direct bases, most important first.
/// - `#[kind(name = "...")]` overrides the display name.
///
/// Container attribute `#[kind(crate = "path")]` sets the path of the crate
/// exporting `Kind` (defaults to `::gpdispatch`).
#[proc_macro_derive(Kind, attributes(kind))]
pub fn derive_kind(input: TokenStream) -> TokenStream {
    kind::derive_kind_impl(input)
}
