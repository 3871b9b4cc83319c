use proc_macro2::Span;
use quote::format_ident;
use syn::parse_quote;

#[derive(Debug)]
pub struct SymbolGenerator {
    placement: syn::Path,
}

impl SymbolGenerator {
    pub fn new(placement: Option<syn::Path>) -> Self {
        Self {
            placement: placement.unwrap_or_else(|| parse_quote! { ::placement }),
        }
    }

    pub fn trait_trivial(&self) -> syn::Path {
        let placement = &self.placement;
        parse_quote! { #placement::Trivial }
    }

    pub fn trait_default_init(&self) -> syn::Path {
        let placement = &self.placement;
        parse_quote! { #placement::DefaultInit }
    }

    pub fn trait_value_init(&self) -> syn::Path {
        let placement = &self.placement;
        parse_quote! { #placement::ValueInit }
    }

    pub fn expr_construct_at(&self) -> syn::Expr {
        let placement = &self.placement;
        parse_quote! { #placement::construct_at }
    }
}

pub fn gen_slot_var() -> syn::Ident {
    format_ident!("__placement_slot", span = Span::call_site())
}

pub fn gen_assert_fn() -> syn::Ident {
    format_ident!("__placement_assert_trivial", span = Span::call_site())
}

pub fn path_core() -> syn::Path {
    parse_quote! { ::core }
}

pub fn expr_default(ty: &syn::Type) -> syn::Expr {
    let core = path_core();
    parse_quote! {
        <#ty as #core::default::Default>::default()
    }
}
