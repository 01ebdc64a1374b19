use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::schema::{FieldDescriptor, FieldKind, KindParseError};

use super::record::DynamicRecord;

const DEFAULT_SCHEMA_NAME: &str = "record";

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to read schema `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse schema: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid kind for field `{field}`: {source}")]
    Kind {
        field: String,
        #[source]
        source: KindParseError,
    },
    #[error("field name must not be empty")]
    EmptyFieldName,
    #[error("field `{0}` is declared more than once")]
    DuplicateField(String),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSchema {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    fields: Vec<RawField>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawField {
    name: String,
    kind: String,
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    readonly: bool,
}

/// Named, ordered field descriptors for a runtime record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicSchema {
    name: String,
    fields: Vec<FieldDescriptor>,
}

impl DynamicSchema {
    /// Validate and wrap `fields`. Names must be non-empty and unique.
    pub fn new(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Result<Self, SchemaError> {
        let mut seen = HashSet::new();
        for field in &fields {
            if field.name().trim().is_empty() {
                return Err(SchemaError::EmptyFieldName);
            }
            if !seen.insert(field.name().to_string()) {
                return Err(SchemaError::DuplicateField(field.name().to_string()));
            }
        }

        Ok(Self {
            name: name.into(),
            fields,
        })
    }

    pub fn from_toml_str(text: &str) -> Result<Self, SchemaError> {
        let raw: RawSchema = toml::from_str(text)?;

        let fields = raw
            .fields
            .into_iter()
            .map(|field| {
                let kind: FieldKind = field.kind.parse().map_err(|source| SchemaError::Kind {
                    field: field.name.clone(),
                    source,
                })?;
                let mut descriptor = FieldDescriptor::new(field.name, kind);
                if let Some(key) = field.key {
                    descriptor = descriptor.with_key(key);
                }
                if field.readonly {
                    descriptor = descriptor.readonly();
                }
                Ok(descriptor)
            })
            .collect::<Result<Vec<_>, SchemaError>>()?;

        Self::new(
            raw.name.unwrap_or_else(|| DEFAULT_SCHEMA_NAME.to_string()),
            fields,
        )
    }

    pub fn from_path(path: &Path) -> Result<Self, SchemaError> {
        let text = fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// An empty record laid out by this schema.
    pub fn record(&self) -> DynamicRecord<'_> {
        DynamicRecord::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::IntKind;

    const SEARCH: &str = r#"
name = "search"

[[fields]]
name = "Term"
kind = "text"

[[fields]]
name = "Ids"
kind = "[i64]"
key = "id"

[[fields]]
name = "Owner"
kind = "FullName"
readonly = true
"#;

    #[test]
    fn loads_fields_in_order() {
        let schema = DynamicSchema::from_toml_str(SEARCH).expect("schema");

        assert_eq!(schema.name(), "search");
        let names: Vec<&str> = schema.fields().iter().map(FieldDescriptor::name).collect();
        assert_eq!(names, ["Term", "Ids", "Owner"]);

        let ids = &schema.fields()[1];
        assert_eq!(ids.kind(), &FieldKind::sequence(FieldKind::Integer(IntKind::I64)));
        assert_eq!(ids.lookup_key(), "id");
        assert!(!schema.fields()[2].is_settable());
    }

    #[test]
    fn schema_name_defaults() {
        let schema = DynamicSchema::from_toml_str("").expect("empty schema");
        assert_eq!(schema.name(), "record");
        assert!(schema.fields().is_empty());
    }

    #[test]
    fn rejects_duplicate_fields() {
        let text = r#"
[[fields]]
name = "Term"
kind = "text"

[[fields]]
name = "Term"
kind = "i32"
"#;
        let err = DynamicSchema::from_toml_str(text).expect_err("duplicate");
        assert!(matches!(err, SchemaError::DuplicateField(ref name) if name == "Term"));
    }

    #[test]
    fn rejects_bad_kind_with_field_context() {
        let text = r#"
[[fields]]
name = "Ids"
kind = "[i64"
"#;
        let err = DynamicSchema::from_toml_str(text).expect_err("bad kind");
        insta::assert_snapshot!(
            err.to_string(),
            @"invalid kind for field `Ids`: unterminated sequence kind `[i64`"
        );
    }

    #[test]
    fn rejects_unknown_keys() {
        let text = r#"
[[fields]]
name = "Term"
kind = "text"
tag = "t"
"#;
        assert!(matches!(
            DynamicSchema::from_toml_str(text),
            Err(SchemaError::Toml(_))
        ));
    }

    #[test]
    fn reports_missing_file() {
        let err = DynamicSchema::from_path(Path::new("/nonexistent/schema.toml"))
            .expect_err("missing file");
        assert!(matches!(err, SchemaError::Io { .. }));
    }
}
