//! Shared helpers for the derive macros.

use proc_macro2::Span;
use syn::{
    Data, DeriveInput, Field, Fields, LitStr, punctuated::Punctuated, spanned::Spanned,
    token::Comma,
};

/// Validate that the input is a non-generic struct with named fields, returning the fields.
pub fn validate_struct_with_named_fields<'a>(
    input: &'a DeriveInput,
    macro_name: &str,
) -> syn::Result<&'a Punctuated<Field, Comma>> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            format!("{macro_name} derive does not support generic structs"),
        ));
    }

    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => Ok(&fields.named),
            _ => Err(syn::Error::new_spanned(
                &input.ident,
                format!("{macro_name} derive only supports structs with named fields"),
            )),
        },
        _ => Err(syn::Error::new_spanned(
            &input.ident,
            format!("{macro_name} derive only supports structs"),
        )),
    }
}

/// Options collected from `#[query(...)]` attributes on one field.
#[derive(Default)]
pub struct FieldOptions {
    pub rename: Option<LitStr>,
    pub readonly: bool,
    pub skip: bool,
}

impl FieldOptions {
    pub fn from_field(field: &Field) -> syn::Result<Self> {
        let mut options = Self::default();
        let mut skip_span: Option<Span> = None;

        for attr in &field.attrs {
            if !attr.path().is_ident("query") {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    if options.rename.is_some() {
                        return Err(meta.error("duplicate `rename`"));
                    }
                    let key: LitStr = meta.value()?.parse()?;
                    if key.value().is_empty() {
                        return Err(syn::Error::new_spanned(key, "`rename` must not be empty"));
                    }
                    options.rename = Some(key);
                    Ok(())
                } else if meta.path.is_ident("readonly") {
                    options.readonly = true;
                    Ok(())
                } else if meta.path.is_ident("skip") {
                    options.skip = true;
                    skip_span = Some(meta.path.span());
                    Ok(())
                } else {
                    Err(meta.error("expected `rename = \"...\"`, `readonly` or `skip`"))
                }
            })?;
        }

        if let Some(span) = skip_span.filter(|_| options.readonly || options.rename.is_some()) {
            return Err(syn::Error::new(
                span,
                "`skip` cannot be combined with other query options",
            ));
        }

        Ok(options)
    }
}
