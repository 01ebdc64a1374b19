use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::convert::{ConvertError, FromQueryValue, SEQUENCE_DELIMITER};
use crate::error::BindError;
use crate::schema::{FieldKind, IntKind};
use crate::source::QuerySource;

use super::parsers::ParserRegistry;
use super::schema::DynamicSchema;

/// A converted field value of a runtime record.
#[derive(Debug, Clone, PartialEq)]
pub enum DynamicValue {
    Text(String),
    Signed(i128),
    Unsigned(u128),
    Sequence(Vec<DynamicValue>),
    Custom(Value),
}

impl DynamicValue {
    /// JSON rendering. Integers outside the 64-bit range become strings.
    pub fn to_json(&self) -> Value {
        match self {
            DynamicValue::Text(text) => Value::String(text.clone()),
            DynamicValue::Signed(value) => i64::try_from(*value)
                .map(Value::from)
                .unwrap_or_else(|_| Value::String(value.to_string())),
            DynamicValue::Unsigned(value) => u64::try_from(*value)
                .map(Value::from)
                .unwrap_or_else(|_| Value::String(value.to_string())),
            DynamicValue::Sequence(items) => {
                Value::Array(items.iter().map(DynamicValue::to_json).collect())
            }
            DynamicValue::Custom(value) => value.clone(),
        }
    }
}

/// Field values laid out by a [`DynamicSchema`]; every slot starts unset.
#[derive(Debug, Clone)]
pub struct DynamicRecord<'s> {
    schema: &'s DynamicSchema,
    values: Vec<Option<DynamicValue>>,
}

enum Failure {
    Convert(ConvertError),
    Unsupported(String),
}

impl<'s> DynamicRecord<'s> {
    pub fn new(schema: &'s DynamicSchema) -> Self {
        Self {
            schema,
            values: vec![None; schema.fields().len()],
        }
    }

    pub fn schema(&self) -> &'s DynamicSchema {
        self.schema
    }

    pub fn get(&self, name: &str) -> Option<&DynamicValue> {
        let position = self
            .schema
            .fields()
            .iter()
            .position(|field| field.name() == name)?;
        self.values[position].as_ref()
    }

    /// Populate the record from `source`, resolving custom kinds through `parsers`.
    ///
    /// Same contract as a static bind: absent or empty keys are skipped, the
    /// first failure stops the pass, and earlier fields keep their values.
    pub fn bind(&mut self, source: &QuerySource, parsers: &ParserRegistry) -> Result<(), BindError> {
        for (descriptor, slot) in self.schema.fields().iter().zip(self.values.iter_mut()) {
            let Some(raw) = descriptor.lookup(source) else {
                continue;
            };

            if !descriptor.is_settable() {
                debug!(record = self.schema.name(), field = descriptor.name(), "field is read-only");
                return Err(BindError::unsettable(descriptor.name()));
            }

            let value = convert(descriptor.kind(), raw, parsers).map_err(|failure| {
                debug!(
                    record = self.schema.name(),
                    field = descriptor.name(),
                    "field conversion failed"
                );
                match failure {
                    Failure::Convert(source) => BindError::conversion(descriptor.name(), source),
                    Failure::Unsupported(type_name) => {
                        BindError::unsupported(descriptor.name(), type_name)
                    }
                }
            })?;

            *slot = Some(value);
            trace!(record = self.schema.name(), field = descriptor.name(), "field assigned");
        }

        Ok(())
    }

    /// Field names mapped to their values, `null` when unset.
    pub fn to_json(&self) -> Value {
        let fields: Map<String, Value> = self
            .schema
            .fields()
            .iter()
            .zip(&self.values)
            .map(|(descriptor, value)| {
                let json = value.as_ref().map_or(Value::Null, DynamicValue::to_json);
                (descriptor.name().to_string(), json)
            })
            .collect();
        Value::Object(fields)
    }
}

fn convert(kind: &FieldKind, raw: &str, parsers: &ParserRegistry) -> Result<DynamicValue, Failure> {
    match kind {
        FieldKind::Text => Ok(DynamicValue::Text(raw.to_string())),
        FieldKind::Integer(kind) => convert_integer(*kind, raw).map_err(Failure::Convert),
        FieldKind::Optional(inner) => convert(inner, raw, parsers),
        FieldKind::Sequence(element) => {
            if raw.is_empty() {
                return Ok(DynamicValue::Sequence(Vec::new()));
            }
            let items = raw
                .split(SEQUENCE_DELIMITER)
                .enumerate()
                .map(|(index, part)| {
                    convert(element, part, parsers).map_err(|failure| match failure {
                        Failure::Convert(err) => Failure::Convert(ConvertError::element(index, err)),
                        unsupported => unsupported,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(DynamicValue::Sequence(items))
        }
        FieldKind::Custom(type_name) => match parsers.parse(type_name, raw) {
            Some(Ok(value)) => Ok(DynamicValue::Custom(value)),
            Some(Err(err)) => Err(Failure::Convert(ConvertError::custom(
                raw,
                type_name.clone(),
                err,
            ))),
            None => Err(Failure::Unsupported(type_name.to_string())),
        },
    }
}

fn parse<V: FromQueryValue + Default>(raw: &str) -> Result<V, ConvertError> {
    let mut value = V::default();
    value.assign_from_query(raw)?;
    Ok(value)
}

fn convert_integer(kind: IntKind, raw: &str) -> Result<DynamicValue, ConvertError> {
    let value = match kind {
        IntKind::I8 => DynamicValue::Signed(parse::<i8>(raw)?.into()),
        IntKind::I16 => DynamicValue::Signed(parse::<i16>(raw)?.into()),
        IntKind::I32 => DynamicValue::Signed(parse::<i32>(raw)?.into()),
        IntKind::I64 => DynamicValue::Signed(parse::<i64>(raw)?.into()),
        IntKind::I128 => DynamicValue::Signed(parse::<i128>(raw)?),
        IntKind::Isize => DynamicValue::Signed(parse::<isize>(raw)? as i128),
        IntKind::U8 => DynamicValue::Unsigned(parse::<u8>(raw)?.into()),
        IntKind::U16 => DynamicValue::Unsigned(parse::<u16>(raw)?.into()),
        IntKind::U32 => DynamicValue::Unsigned(parse::<u32>(raw)?.into()),
        IntKind::U64 => DynamicValue::Unsigned(parse::<u64>(raw)?.into()),
        IntKind::U128 => DynamicValue::Unsigned(parse::<u128>(raw)?),
        IntKind::Usize => DynamicValue::Unsigned(parse::<usize>(raw)? as u128),
    };
    Ok(value)
}
