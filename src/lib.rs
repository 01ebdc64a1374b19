//! Bind decoded URL query parameters onto typed records.
//!
//! Each record type carries a [`RecordSchema`]: an ordered table of field
//! bindings built once (by `#[derive(QueryRecord)]` or by hand through
//! [`RecordSchema::builder`]) and walked on every [`bind`] call. A field is fed
//! by the query key named in its override, or by its lower-cased name, and the
//! raw string is converted through [`FromQueryValue`]. Types without a built-in
//! rule opt in with [`ParseQuery`] plus `#[derive(QueryValue)]`.
//!
//! ```
//! use querybind::{QueryRecord, QuerySource, bind};
//!
//! #[derive(Debug, Default, QueryRecord)]
//! struct Search {
//!     term: String,
//!     #[query(rename = "n")]
//!     limit: i32,
//!     tags: Vec<String>,
//! }
//!
//! let mut search = Search::default();
//! bind(&mut search, &QuerySource::parse("term=rust&n=20&tags=web,cli")).unwrap();
//! assert_eq!(search.limit, 20);
//! assert_eq!(search.tags, ["web", "cli"]);
//! ```

extern crate self as querybind;

pub mod config;
pub mod convert;
pub mod dynamic;
pub mod error;
pub mod extract;
pub mod record;
pub mod registry;
pub mod schema;
pub mod source;
pub mod telemetry;

pub use convert::{ConvertError, FromQueryValue, ParseQuery, ParseQueryError, SEQUENCE_DELIMITER};
pub use error::BindError;
pub use extract::{BindRejection, BoundQuery};
pub use querybind_derive::{QueryRecord, QueryValue};
pub use record::{Record, bind, bind_query};
pub use registry::RecordRegistry;
pub use schema::{FieldDescriptor, FieldKind, IntKind, RecordSchema, RecordSchemaBuilder};
pub use source::QuerySource;
