use darling::{FromDeriveInput, FromField, ast::Data, util::Ignored};

use crate::FieldIdent;

#[derive(Debug, FromDeriveInput)]
#[darling(attributes(placement), supports(struct_any))]
pub struct Input {
    pub data: Data<Ignored, InputField>,
    pub ident: syn::Ident,
    pub generics: syn::Generics,
    #[darling(default, rename = "crate")]
    pub crate_path: Option<syn::Path>,
    #[darling(default)]
    pub default: bool,
}

impl Input {
    pub fn take_fields(self) -> (Header, Vec<Field>) {
        let Self {
            data,
            ident,
            generics,
            crate_path,
            default,
        } = self;
        let header = Header {
            ident,
            generics,
            crate_path,
            default,
        };
        let fields = data
            .take_struct()
            .map(|fields| fields.fields)
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(i, field)| Field {
                ident: match field.ident {
                    Some(ident) => FieldIdent::Named(ident),
                    None => FieldIdent::Unnamed(i),
                },
                ty: field.ty,
                value: field.value,
            })
            .collect();
        (header, fields)
    }
}

#[derive(Debug)]
pub struct Header {
    pub ident: syn::Ident,
    pub generics: syn::Generics,
    pub crate_path: Option<syn::Path>,
    pub default: bool,
}

#[derive(Debug, FromField)]
#[darling(attributes(placement))]
pub struct InputField {
    pub ident: Option<syn::Ident>,
    pub ty: syn::Type,
    #[darling(default)]
    pub value: Option<syn::Expr>,
}

#[derive(Debug)]
pub struct Field {
    pub ident: FieldIdent,
    pub ty: syn::Type,
    pub value: Option<syn::Expr>,
}
