//! Field descriptors and the per-type dispatch table.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::{debug, trace};

use crate::convert::{ConvertError, FromQueryValue};
use crate::error::BindError;
use crate::source::QuerySource;

/// Every integer width a field may be declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntKind {
    I8,
    I16,
    I32,
    I64,
    I128,
    Isize,
    U8,
    U16,
    U32,
    U64,
    U128,
    Usize,
}

impl IntKind {
    pub fn as_str(self) -> &'static str {
        match self {
            IntKind::I8 => "i8",
            IntKind::I16 => "i16",
            IntKind::I32 => "i32",
            IntKind::I64 => "i64",
            IntKind::I128 => "i128",
            IntKind::Isize => "isize",
            IntKind::U8 => "u8",
            IntKind::U16 => "u16",
            IntKind::U32 => "u32",
            IntKind::U64 => "u64",
            IntKind::U128 => "u128",
            IntKind::Usize => "usize",
        }
    }

    pub fn is_signed(self) -> bool {
        matches!(
            self,
            IntKind::I8
                | IntKind::I16
                | IntKind::I32
                | IntKind::I64
                | IntKind::I128
                | IntKind::Isize
        )
    }

    /// Resolve a kind from its schema name. `int` and `uint` alias the 64-bit widths.
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name {
            "i8" => IntKind::I8,
            "i16" => IntKind::I16,
            "i32" => IntKind::I32,
            "i64" | "int" => IntKind::I64,
            "i128" => IntKind::I128,
            "isize" => IntKind::Isize,
            "u8" => IntKind::U8,
            "u16" => IntKind::U16,
            "u32" => IntKind::U32,
            "u64" | "uint" => IntKind::U64,
            "u128" => IntKind::U128,
            "usize" => IntKind::Usize,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for IntKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared shape of a field, used to pick its conversion rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer(IntKind),
    Sequence(Box<FieldKind>),
    Optional(Box<FieldKind>),
    Custom(Cow<'static, str>),
}

impl FieldKind {
    pub fn sequence(element: FieldKind) -> Self {
        Self::Sequence(Box::new(element))
    }

    pub fn optional(inner: FieldKind) -> Self {
        Self::Optional(Box::new(inner))
    }

    pub fn custom(type_name: impl Into<Cow<'static, str>>) -> Self {
        Self::Custom(type_name.into())
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Text => f.write_str("text"),
            FieldKind::Integer(kind) => write!(f, "{kind}"),
            FieldKind::Sequence(element) => write!(f, "[{element}]"),
            FieldKind::Optional(inner) => write!(f, "{inner}?"),
            FieldKind::Custom(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KindParseError {
    #[error("field kind is empty")]
    Empty,
    #[error("unterminated sequence kind `{0}`")]
    UnterminatedSequence(String),
    #[error("`{0}` is not a valid type name")]
    InvalidName(String),
}

/// Parses the schema grammar: `text`, an integer name, `[kind]`, `kind?`, or a custom type name.
impl FromStr for FieldKind {
    type Err = KindParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();
        if input.is_empty() {
            return Err(KindParseError::Empty);
        }

        if let Some(inner) = input.strip_suffix('?') {
            return Ok(FieldKind::optional(inner.parse()?));
        }

        if let Some(rest) = input.strip_prefix('[') {
            let element = rest
                .strip_suffix(']')
                .ok_or_else(|| KindParseError::UnterminatedSequence(input.to_string()))?;
            return Ok(FieldKind::sequence(element.parse()?));
        }

        if input == "text" || input == "string" {
            return Ok(FieldKind::Text);
        }

        if let Some(kind) = IntKind::from_name(input) {
            return Ok(FieldKind::Integer(kind));
        }

        let valid = input
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == ':')
            && !input.starts_with(|ch: char| ch.is_ascii_digit());
        if !valid {
            return Err(KindParseError::InvalidName(input.to_string()));
        }

        Ok(FieldKind::Custom(Cow::Owned(input.to_string())))
    }
}

/// Name, kind and source key of one record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: Cow<'static, str>,
    kind: FieldKind,
    key: Option<Cow<'static, str>>,
    settable: bool,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<Cow<'static, str>>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            key: None,
            settable: true,
        }
    }

    /// Override the query key. An empty override keeps the default key.
    pub fn with_key(mut self, key: impl Into<Cow<'static, str>>) -> Self {
        let key = key.into();
        self.key = (!key.is_empty()).then_some(key);
        self
    }

    pub fn readonly(mut self) -> Self {
        self.settable = false;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn key_override(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn is_settable(&self) -> bool {
        self.settable
    }

    /// Query key feeding this field: the override, else the lower-cased name.
    pub fn lookup_key(&self) -> Cow<'_, str> {
        match &self.key {
            Some(key) => Cow::Borrowed(key.as_ref()),
            None => Cow::Owned(self.name.to_lowercase()),
        }
    }

    /// Raw value for this field, or `None` when the key is absent or empty.
    pub(crate) fn lookup<'s>(&self, source: &'s QuerySource) -> Option<&'s str> {
        let key = self.lookup_key();
        match source.get(&key) {
            Some(raw) if !raw.is_empty() => Some(raw),
            _ => {
                trace!(field = %self.name, key = %key, "query key absent or empty; keeping value");
                None
            }
        }
    }
}

type Setter<T> = Box<dyn Fn(&mut T, &str) -> Result<(), ConvertError> + Send + Sync>;

struct FieldBinding<T> {
    descriptor: FieldDescriptor,
    setter: Option<Setter<T>>,
}

/// Ordered dispatch table mapping each field of `T` to its conversion.
pub struct RecordSchema<T> {
    type_name: &'static str,
    fields: Vec<FieldBinding<T>>,
}

impl<T> fmt::Debug for RecordSchema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordSchema")
            .field("type_name", &self.type_name)
            .field(
                "fields",
                &self
                    .fields
                    .iter()
                    .map(|binding| &binding.descriptor)
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<T: 'static> RecordSchema<T> {
    pub fn builder() -> RecordSchemaBuilder<T> {
        RecordSchemaBuilder {
            type_name: std::any::type_name::<T>(),
            fields: Vec::new(),
        }
    }
}

impl<T> RecordSchema<T> {
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().map(|binding| &binding.descriptor)
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields().find(|descriptor| descriptor.name() == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Populate `record` from `source` in declaration order.
    ///
    /// Stops at the first failing field. Fields converted before it keep
    /// their new values.
    pub fn apply(&self, record: &mut T, source: &QuerySource) -> Result<(), BindError> {
        for binding in &self.fields {
            let descriptor = &binding.descriptor;
            let Some(raw) = descriptor.lookup(source) else {
                continue;
            };

            let Some(setter) = binding.setter.as_ref() else {
                debug!(record = self.type_name, field = descriptor.name(), "field is read-only");
                return Err(BindError::unsettable(descriptor.name()));
            };

            setter(record, raw).map_err(|source| {
                debug!(
                    record = self.type_name,
                    field = descriptor.name(),
                    error = %source,
                    "field conversion failed"
                );
                BindError::conversion(descriptor.name(), source)
            })?;
            trace!(record = self.type_name, field = descriptor.name(), "field assigned");
        }

        Ok(())
    }
}

/// Builds a [`RecordSchema`] one field at a time, in declaration order.
pub struct RecordSchemaBuilder<T> {
    type_name: &'static str,
    fields: Vec<FieldBinding<T>>,
}

impl<T: 'static> RecordSchemaBuilder<T> {
    /// Bind a field read from its lower-cased name.
    pub fn field<V>(self, name: &'static str, accessor: fn(&mut T) -> &mut V) -> Self
    where
        V: FromQueryValue + 'static,
    {
        self.bind(name, None, accessor)
    }

    /// Bind a field, optionally overriding the query key that feeds it.
    pub fn bind<V>(
        mut self,
        name: &'static str,
        key: Option<&'static str>,
        accessor: fn(&mut T) -> &mut V,
    ) -> Self
    where
        V: FromQueryValue + 'static,
    {
        let descriptor = describe::<V>(name, key);
        let setter: Setter<T> =
            Box::new(move |record: &mut T, raw: &str| accessor(record).assign_from_query(raw));
        self.fields.push(FieldBinding {
            descriptor,
            setter: Some(setter),
        });
        self
    }

    /// Declare a field that is part of the record but may not be assigned.
    pub fn readonly<V>(mut self, name: &'static str, key: Option<&'static str>) -> Self
    where
        V: FromQueryValue,
    {
        self.fields.push(FieldBinding {
            descriptor: describe::<V>(name, key).readonly(),
            setter: None,
        });
        self
    }

    pub fn build(self) -> RecordSchema<T> {
        RecordSchema {
            type_name: self.type_name,
            fields: self.fields,
        }
    }
}

fn describe<V: FromQueryValue>(name: &'static str, key: Option<&'static str>) -> FieldDescriptor {
    let descriptor = FieldDescriptor::new(name, V::kind());
    match key {
        Some(key) => descriptor.with_key(key),
        None => descriptor,
    }
}
