use proc_macro2::TokenStream;
use quote::quote;
use syn::parse_quote;

use crate::{
    meta::{Field, Header},
    sgen::{self, SymbolGenerator},
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldIdent {
    Named(syn::Ident),
    Unnamed(usize),
}

impl quote::ToTokens for FieldIdent {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        match self {
            Self::Named(ident) => ident.to_tokens(tokens),
            Self::Unnamed(index) => {
                let index = syn::Index::from(*index);
                index.to_tokens(tokens);
            }
        }
    }
}

/// Generates `DefaultInit` and `ValueInit` implementations that initialize a
/// struct field by field through a pointer to its slot.
#[derive(Debug)]
pub struct InitBuilder {
    sgen: SymbolGenerator,
    ident: syn::Ident,
    generics: syn::Generics,
    slot: syn::Ident,
    default_stmts: Vec<syn::Stmt>,
    value_stmts: Vec<syn::Stmt>,
    default_bounds: Vec<syn::WherePredicate>,
    value_bounds: Vec<syn::WherePredicate>,
}

impl InitBuilder {
    pub fn new(header: Header) -> Self {
        let Header {
            ident,
            generics,
            crate_path,
            default: _,
        } = header;
        Self {
            sgen: SymbolGenerator::new(crate_path),
            ident,
            generics,
            slot: sgen::gen_slot_var(),
            default_stmts: vec![],
            value_stmts: vec![],
            default_bounds: vec![],
            value_bounds: vec![],
        }
    }

    fn is_generic(&self) -> bool {
        self.generics.type_params().next().is_some()
    }

    /// Constructs the whole struct from `Default::default()`.
    pub fn use_default_trait(&mut self) {
        let slot = &self.slot;
        let construct_at = self.sgen.expr_construct_at();
        let value = sgen::expr_default(&parse_quote! { Self });
        let stmt: syn::Stmt = parse_quote! { #construct_at::<Self>(#slot, #value); };
        self.default_stmts.push(stmt.clone());
        self.value_stmts.push(stmt);

        if self.is_generic() {
            let core = sgen::path_core();
            let bound: syn::WherePredicate = parse_quote! { Self: #core::default::Default };
            self.default_bounds.push(bound.clone());
            self.value_bounds.push(bound);
        }
    }

    pub fn add_field(&mut self, field: Field) {
        let Field { ident, ty, value } = field;
        let slot = &self.slot;
        let place: syn::Expr = parse_quote! { &raw mut (*#slot).#ident };

        if let Some(value) = value {
            let construct_at = self.sgen.expr_construct_at();
            let stmt: syn::Stmt = parse_quote! { #construct_at::<#ty>(#place, #value); };
            self.default_stmts.push(stmt.clone());
            self.value_stmts.push(stmt);
            return;
        }

        let default_init = self.sgen.trait_default_init();
        let value_init = self.sgen.trait_value_init();
        self.default_stmts
            .push(parse_quote! { <#ty as #default_init>::default_init(#place); });
        self.value_stmts
            .push(parse_quote! { <#ty as #value_init>::value_init(#place); });

        if self.is_generic() {
            self.default_bounds.push(parse_quote! { #ty: #default_init });
            self.value_bounds.push(parse_quote! { #ty: #value_init });
        }
    }

    pub fn build(self) -> TokenStream {
        let default_init = self.sgen.trait_default_init();
        let value_init = self.sgen.trait_value_init();
        let default_impl = self.gen_impl(
            &default_init,
            &parse_quote! { default_init },
            &self.default_stmts,
            &self.default_bounds,
        );
        let value_impl = self.gen_impl(
            &value_init,
            &parse_quote! { value_init },
            &self.value_stmts,
            &self.value_bounds,
        );
        quote! {
            #default_impl
            #value_impl
        }
    }

    fn gen_impl(
        &self,
        trait_: &syn::Path,
        method: &syn::Ident,
        stmts: &[syn::Stmt],
        bounds: &[syn::WherePredicate],
    ) -> TokenStream {
        let ident = &self.ident;
        let slot = &self.slot;
        let generics = with_bounds(&self.generics, bounds);
        let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

        let body = if stmts.is_empty() {
            quote! { let _ = #slot; }
        } else {
            quote! { unsafe { #( #stmts )* } }
        };

        quote! {
            #[automatically_derived]
            impl #impl_generics #trait_ for #ident #ty_generics #where_clause {
                #[inline]
                unsafe fn #method(#slot: *mut Self) {
                    #body
                }
            }
        }
    }
}

/// Generates a `Trivial` implementation.
///
/// Structs with generic parameters require every field type to be trivial,
/// and the struct itself to be `Copy`, in the where clause of the impl. Other
/// structs get a compile-time check per field instead.
#[derive(Debug)]
pub struct TrivialBuilder {
    sgen: SymbolGenerator,
    ident: syn::Ident,
    generics: syn::Generics,
    field_tys: Vec<syn::Type>,
}

impl TrivialBuilder {
    pub fn new(header: Header) -> Result<Self, darling::Error> {
        let Header {
            ident,
            generics,
            crate_path,
            default,
        } = header;
        if default {
            return Err(darling::Error::custom(
                "`#[placement(default)]` is not supported by `#[derive(Trivial)]`",
            )
            .with_span(&ident));
        }
        Ok(Self {
            sgen: SymbolGenerator::new(crate_path),
            ident,
            generics,
            field_tys: vec![],
        })
    }

    pub fn add_field(&mut self, field: Field) -> Result<(), darling::Error> {
        let Field { ident: _, ty, value } = field;
        if let Some(value) = value {
            return Err(darling::Error::custom(
                "`#[placement(value = ...)]` is not supported by `#[derive(Trivial)]`",
            )
            .with_span(&value));
        }
        self.field_tys.push(ty);
        Ok(())
    }

    pub fn build(self) -> TokenStream {
        let trivial = self.sgen.trait_trivial();
        let ident = &self.ident;
        let field_tys = &self.field_tys;

        if !self.generics.params.is_empty() {
            let core = sgen::path_core();
            let bounds = field_tys
                .iter()
                .map(|ty| parse_quote! { #ty: #trivial })
                .chain([parse_quote! { Self: #core::marker::Copy }])
                .collect::<Vec<syn::WherePredicate>>();
            let generics = with_bounds(&self.generics, &bounds);
            let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
            return quote! {
                #[automatically_derived]
                unsafe impl #impl_generics #trivial for #ident #ty_generics #where_clause {}
            };
        }

        let (impl_generics, ty_generics, where_clause) = self.generics.split_for_impl();
        let assert_fn = sgen::gen_assert_fn();
        quote! {
            #[automatically_derived]
            unsafe impl #impl_generics #trivial for #ident #ty_generics #where_clause {}

            const _: () = {
                fn #assert_fn<T: #trivial>() {}
                #( let _ = #assert_fn::<#field_tys>; )*
            };
        }
    }
}

fn with_bounds(generics: &syn::Generics, bounds: &[syn::WherePredicate]) -> syn::Generics {
    let mut generics = generics.clone();
    if !bounds.is_empty() {
        generics
            .make_where_clause()
            .predicates
            .extend(bounds.iter().cloned());
    }
    generics
}
