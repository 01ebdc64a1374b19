use thiserror::Error;

use crate::convert::ConvertError;

/// Failure reported by a bind pass. Field-level variants carry the field name.
#[derive(Debug, Error)]
pub enum BindError {
    #[error("invalid destination: {reason}")]
    InvalidDestination { reason: String },
    #[error("field `{field}` cannot be set from the query")]
    UnsettableField { field: String },
    #[error("field `{field}`: {source}")]
    Conversion {
        field: String,
        #[source]
        source: ConvertError,
    },
    #[error("field `{field}` has unsupported type `{type_name}`")]
    UnsupportedType { field: String, type_name: String },
}

impl BindError {
    pub fn invalid_destination(reason: impl Into<String>) -> Self {
        Self::InvalidDestination {
            reason: reason.into(),
        }
    }

    pub fn unsettable(field: impl Into<String>) -> Self {
        Self::UnsettableField {
            field: field.into(),
        }
    }

    pub fn conversion(field: impl Into<String>, source: ConvertError) -> Self {
        Self::Conversion {
            field: field.into(),
            source,
        }
    }

    pub fn unsupported(field: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::UnsupportedType {
            field: field.into(),
            type_name: type_name.into(),
        }
    }

    /// Name of the field that failed, when the failure is field-scoped.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidDestination { .. } => None,
            Self::UnsettableField { field }
            | Self::Conversion { field, .. }
            | Self::UnsupportedType { field, .. } => Some(field),
        }
    }

    /// Stable machine-readable code for the variant.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidDestination { .. } => "invalid_destination",
            Self::UnsettableField { .. } => "unsettable_field",
            Self::Conversion { .. } => "conversion_error",
            Self::UnsupportedType { .. } => "unsupported_type",
        }
    }
}
