//! `QueryValue` derive implementation.
//!
//! Parsing runs against a fresh `Default` value that replaces the field only
//! on success, so a failed parse never leaves a half-written field.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{DeriveInput, ext::IdentExt, parse_macro_input, parse_quote};

pub fn derive_query_value(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive_query_value_impl(&input).into()
}

fn derive_query_value_impl(input: &DeriveInput) -> TokenStream2 {
    let name = &input.ident;
    let type_name = name.unraw().to_string();
    let mut generics = input.generics.clone();
    generics
        .make_where_clause()
        .predicates
        .push(parse_quote!(Self: ::core::default::Default));
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    quote! {
        impl #impl_generics ::querybind::FromQueryValue for #name #ty_generics #where_clause {
            fn kind() -> ::querybind::FieldKind {
                ::querybind::FieldKind::custom(#type_name)
            }

            fn assign_from_query(
                &mut self,
                raw: &str,
            ) -> ::core::result::Result<(), ::querybind::ConvertError> {
                let mut parsed: Self = ::core::default::Default::default();
                ::querybind::ParseQuery::parse_query(&mut parsed, raw)
                    .map_err(|source| ::querybind::ConvertError::custom(raw, #type_name, source))?;
                *self = parsed;
                ::core::result::Result::Ok(())
            }
        }
    }
}
