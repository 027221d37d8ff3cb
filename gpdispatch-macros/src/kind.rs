//! `#[derive(Kind)]` - describe a kind hierarchy on a unit enum.
//!
//! ```rust,ignore
//! #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Kind)]
//! enum KernelKind {
//!     #[kind(root)]
//!     Any,
//!     Kernel,
//!     #[kind(extends(Kernel))]
//!     Mok,
//!     #[kind(extends(Mok, Combination), name = "SeparateIndependentMok")]
//!     SeparateIndependent,
//!     // ...
//! }
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, Ident, LitStr, Path, parse_macro_input};

/// Parsed `#[kind(...)]` attributes of one variant.
struct VariantArgs {
    root: bool,
    bases: Vec<Ident>,
    name: Option<LitStr>,
}

impl VariantArgs {
    fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut args = VariantArgs {
            root: false,
            bases: Vec::new(),
            name: None,
        };

        for attr in attrs.iter().filter(|a| a.path().is_ident("kind")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("root") {
                    args.root = true;
                    Ok(())
                } else if meta.path.is_ident("extends") {
                    meta.parse_nested_meta(|base| {
                        let ident = base
                            .path
                            .get_ident()
                            .cloned()
                            .ok_or_else(|| base.error("expected a variant name"))?;
                        args.bases.push(ident);
                        Ok(())
                    })
                } else if meta.path.is_ident("name") {
                    args.name = Some(meta.value()?.parse()?);
                    Ok(())
                } else {
                    Err(meta.error("unknown kind attribute, expected `root`, `extends` or `name`"))
                }
            })?;
        }

        Ok(args)
    }
}

/// Path of the core crate, from `#[kind(crate = "...")]` on the enum.
fn crate_path(attrs: &[Attribute]) -> syn::Result<Path> {
    let mut path: Path = syn::parse_quote!(::gpdispatch);
    for attr in attrs.iter().filter(|a| a.path().is_ident("kind")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("crate") {
                let lit: LitStr = meta.value()?.parse()?;
                path = lit.parse()?;
                Ok(())
            } else {
                Err(meta.error("unknown kind attribute, expected `crate`"))
            }
        })?;
    }
    Ok(path)
}

fn expand(input: DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Kind cannot be derived for generic enums",
        ));
    }

    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            name,
            "Kind can only be derived for unit enums",
        ));
    };

    let krate = crate_path(&input.attrs)?;

    let mut root: Option<&Ident> = None;
    let mut variants = Vec::with_capacity(data.variants.len());
    let mut base_arms = Vec::with_capacity(data.variants.len());
    let mut name_arms = Vec::with_capacity(data.variants.len());

    for variant in &data.variants {
        let ident = &variant.ident;
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "Kind variants cannot carry data",
            ));
        }

        let args = VariantArgs::parse(&variant.attrs)?;
        if args.root {
            if root.is_some() {
                return Err(syn::Error::new_spanned(
                    ident,
                    "only one variant can be marked `#[kind(root)]`",
                ));
            }
            if !args.bases.is_empty() {
                return Err(syn::Error::new_spanned(
                    ident,
                    "the root kind cannot extend other kinds",
                ));
            }
            root = Some(ident);
        }

        let bases = &args.bases;
        let display = args
            .name
            .unwrap_or_else(|| LitStr::new(&ident.to_string(), ident.span()));

        variants.push(quote! { Self::#ident });
        base_arms.push(quote! { Self::#ident => &[#(Self::#bases),*] });
        name_arms.push(quote! { Self::#ident => #display });
    }

    let Some(root) = root else {
        return Err(syn::Error::new_spanned(
            name,
            "one variant must be marked `#[kind(root)]`",
        ));
    };

    Ok(quote! {
        impl #krate::Kind for #name {
            const ROOT: Self = Self::#root;
            const ALL: &'static [Self] = &[#(#variants),*];

            fn bases(self) -> &'static [Self] {
                match self {
                    #(#base_arms,)*
                }
            }

            fn name(self) -> &'static str {
                match self {
                    #(#name_arms,)*
                }
            }
        }
    })
}

/// Implementation of the `#[derive(Kind)]` macro.
pub fn derive_kind_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
