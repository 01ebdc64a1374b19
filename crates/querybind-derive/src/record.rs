//! `QueryRecord` derive implementation.
//!
//! Emits a `querybind::Record` impl whose schema is built once in a
//! `OnceLock`, one builder call per field in declaration order.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{DeriveInput, ext::IdentExt, parse_macro_input};

use crate::utils::{FieldOptions, validate_struct_with_named_fields};

pub fn derive_query_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match derive_query_record_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn derive_query_record_impl(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let fields = validate_struct_with_named_fields(input, "QueryRecord")?;

    let mut bindings = Vec::with_capacity(fields.len());
    for field in fields {
        let options = FieldOptions::from_field(field)?;
        if options.skip {
            continue;
        }

        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected named field"))?;
        let field_name = ident.unraw().to_string();
        let key = match &options.rename {
            Some(key) => quote! { ::core::option::Option::Some(#key) },
            None => quote! { ::core::option::Option::None },
        };
        let ty = &field.ty;

        bindings.push(if options.readonly {
            quote! { .readonly::<#ty>(#field_name, #key) }
        } else {
            quote! { .bind(#field_name, #key, |record: &mut #name| &mut record.#ident) }
        });
    }

    Ok(quote! {
        impl ::querybind::Record for #name {
            fn schema() -> &'static ::querybind::RecordSchema<Self> {
                static SCHEMA: ::std::sync::OnceLock<::querybind::RecordSchema<#name>> =
                    ::std::sync::OnceLock::new();
                SCHEMA.get_or_init(|| {
                    ::querybind::RecordSchema::<#name>::builder()
                        #(#bindings)*
                        .build()
                })
            }
        }
    })
}
