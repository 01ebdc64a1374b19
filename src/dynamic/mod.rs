//! Records whose field layout is loaded at runtime instead of derived.
//!
//! A [`DynamicSchema`] lists field descriptors read from TOML:
//!
//! ```toml
//! name = "search"
//!
//! [[fields]]
//! name = "Term"
//! kind = "text"
//!
//! [[fields]]
//! name = "Ids"
//! kind = "[i64]"
//! key = "id"
//! ```
//!
//! Custom kinds resolve through a [`ParserRegistry`]; a kind with no parser is
//! reported as unsupported when a value for it shows up.

mod parsers;
mod record;
mod schema;

pub use parsers::ParserRegistry;
pub use record::{DynamicRecord, DynamicValue};
pub use schema::{DynamicSchema, SchemaError};
