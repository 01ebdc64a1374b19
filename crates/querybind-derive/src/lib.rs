//! Derive macros for `querybind`.
//!
//! `QueryRecord` builds the per-type field dispatch table behind
//! `querybind::Record`. `QueryValue` lets a type implementing
//! `querybind::ParseQuery` appear as a record field.
//!
//! Generated code refers to the `::querybind` crate by path.

use proc_macro::TokenStream;

mod record;
mod utils;
mod value;

/// Derive `querybind::Record` for a struct with named fields.
///
/// Field attributes:
/// - `#[query(rename = "key")]` reads the field from `key` instead of the
///   lower-cased field name.
/// - `#[query(readonly)]` declares the field but rejects any value for it.
/// - `#[query(skip)]` leaves the field out of the schema.
#[proc_macro_derive(QueryRecord, attributes(query))]
pub fn derive_query_record(input: TokenStream) -> TokenStream {
    record::derive_query_record(input)
}

/// Derive `querybind::FromQueryValue` by delegating to `querybind::ParseQuery`.
///
/// The type must also implement `Default`.
#[proc_macro_derive(QueryValue)]
pub fn derive_query_value(input: TokenStream) -> TokenStream {
    value::derive_query_value(input)
}
