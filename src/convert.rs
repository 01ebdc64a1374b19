//! Per-kind conversion from a raw query string into a field value.

use std::borrow::Cow;

use thiserror::Error;

use crate::schema::{FieldKind, IntKind};

/// Separator between elements of a sequence value.
pub const SEQUENCE_DELIMITER: char = ',';

/// Failure converting one raw value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConvertError {
    #[error("`{value}` is not a valid {kind}: {reason}")]
    InvalidInteger {
        value: String,
        kind: IntKind,
        reason: String,
    },
    #[error("cannot parse `{value}` as {type_name}: {source}")]
    Custom {
        value: String,
        type_name: Cow<'static, str>,
        #[source]
        source: ParseQueryError,
    },
    #[error("element {index}: {source}")]
    Element {
        index: usize,
        #[source]
        source: Box<ConvertError>,
    },
}

impl ConvertError {
    pub fn invalid_integer(value: &str, kind: IntKind, reason: impl Into<String>) -> Self {
        Self::InvalidInteger {
            value: value.to_string(),
            kind,
            reason: reason.into(),
        }
    }

    pub fn custom(
        value: &str,
        type_name: impl Into<Cow<'static, str>>,
        source: ParseQueryError,
    ) -> Self {
        Self::Custom {
            value: value.to_string(),
            type_name: type_name.into(),
            source,
        }
    }

    pub fn element(index: usize, source: ConvertError) -> Self {
        Self::Element {
            index,
            source: Box::new(source),
        }
    }
}

/// Failure reported by a [`ParseQuery`] implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ParseQueryError {
    message: String,
}

impl ParseQueryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Self-parsing capability for types with no built-in conversion.
///
/// Pair with `#[derive(QueryValue)]` (which also needs `Default`) to use the
/// type as a record field. The derive parses into a fresh default value, so
/// an implementation may fail after writing part of `self`.
pub trait ParseQuery {
    fn parse_query(&mut self, raw: &str) -> Result<(), ParseQueryError>;
}

/// Built-in conversion rule for a field type.
pub trait FromQueryValue {
    /// Declared kind reported in the field descriptor.
    fn kind() -> FieldKind;

    /// Replace `self` with the value parsed from `raw`.
    fn assign_from_query(&mut self, raw: &str) -> Result<(), ConvertError>;
}

impl FromQueryValue for String {
    fn kind() -> FieldKind {
        FieldKind::Text
    }

    fn assign_from_query(&mut self, raw: &str) -> Result<(), ConvertError> {
        raw.clone_into(self);
        Ok(())
    }
}

macro_rules! integer_from_query {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl FromQueryValue for $ty {
                fn kind() -> FieldKind {
                    FieldKind::Integer(IntKind::$kind)
                }

                fn assign_from_query(&mut self, raw: &str) -> Result<(), ConvertError> {
                    *self = raw.parse::<$ty>().map_err(|err| {
                        ConvertError::invalid_integer(raw, IntKind::$kind, err.to_string())
                    })?;
                    Ok(())
                }
            }
        )*
    };
}

integer_from_query! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    i128 => I128,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    u128 => U128,
    usize => Usize,
}

/// Comma-separated values, one element per substring. An empty value clears
/// the sequence. The field is only replaced once every element converts.
impl<T> FromQueryValue for Vec<T>
where
    T: FromQueryValue + Default,
{
    fn kind() -> FieldKind {
        FieldKind::sequence(T::kind())
    }

    fn assign_from_query(&mut self, raw: &str) -> Result<(), ConvertError> {
        if raw.is_empty() {
            self.clear();
            return Ok(());
        }

        let parts: Vec<&str> = raw.split(SEQUENCE_DELIMITER).collect();
        let mut items = Vec::with_capacity(parts.len());
        for (index, part) in parts.into_iter().enumerate() {
            let mut item = T::default();
            item.assign_from_query(part)
                .map_err(|err| ConvertError::element(index, err))?;
            items.push(item);
        }

        *self = items;
        Ok(())
    }
}

/// Lazily default-constructs the slot before converting into it. A failed
/// conversion into a freshly created slot leaves it empty.
impl<T> FromQueryValue for Option<T>
where
    T: FromQueryValue + Default,
{
    fn kind() -> FieldKind {
        FieldKind::optional(T::kind())
    }

    fn assign_from_query(&mut self, raw: &str) -> Result<(), ConvertError> {
        let was_empty = self.is_none();
        let result = self.get_or_insert_with(T::default).assign_from_query(raw);
        if result.is_err() && was_empty {
            *self = None;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Pair {
        left: String,
        right: String,
    }

    impl ParseQuery for Pair {
        fn parse_query(&mut self, raw: &str) -> Result<(), ParseQueryError> {
            let (left, right) = raw
                .split_once(':')
                .ok_or_else(|| ParseQueryError::new("expected `left:right`"))?;
            self.left = left.to_string();
            self.right = right.to_string();
            Ok(())
        }
    }

    impl FromQueryValue for Pair {
        fn kind() -> FieldKind {
            FieldKind::custom("Pair")
        }

        fn assign_from_query(&mut self, raw: &str) -> Result<(), ConvertError> {
            self.parse_query(raw)
                .map_err(|source| ConvertError::custom(raw, "Pair", source))
        }
    }

    #[test]
    fn integers_parse_base_ten_with_sign() {
        let mut value = 0i64;
        value.assign_from_query("-42").expect("negative");
        assert_eq!(value, -42);
        value.assign_from_query("+7").expect("explicit plus");
        assert_eq!(value, 7);
    }

    #[test]
    fn integer_overflow_is_a_conversion_error() {
        let mut value = 0u8;
        let err = value.assign_from_query("256").expect_err("out of range");
        assert!(matches!(
            err,
            ConvertError::InvalidInteger {
                kind: IntKind::U8,
                ..
            }
        ));
        assert_eq!(value, 0);
    }

    #[test]
    fn sequence_splits_on_comma() {
        let mut values: Vec<i32> = Vec::new();
        values.assign_from_query("1,2,3").expect("sequence");
        assert_eq!(values, [1, 2, 3]);

        values.assign_from_query("").expect("empty clears");
        assert!(values.is_empty());
    }

    #[test]
    fn sequence_failure_keeps_previous_value_and_reports_index() {
        let mut values = vec![9i32];
        let err = values.assign_from_query("1,x,3").expect_err("bad element");

        assert_eq!(values, [9]);
        insta::assert_snapshot!(
            err.to_string(),
            @"element 1: `x` is not a valid i32: invalid digit found in string"
        );
    }

    #[test]
    fn text_sequence_keeps_empty_elements() {
        let mut values: Vec<String> = Vec::new();
        values.assign_from_query("a,,b").expect("text elements");
        assert_eq!(values, ["a", "", "b"]);
    }

    #[test]
    fn option_allocates_default_before_converting() {
        let mut slot: Option<Pair> = None;
        slot.assign_from_query("duc:hoang").expect("custom parse");
        assert_eq!(
            slot,
            Some(Pair {
                left: "duc".into(),
                right: "hoang".into(),
            })
        );
    }

    #[test]
    fn option_stays_empty_when_conversion_fails() {
        let mut slot: Option<Pair> = None;
        let err = slot.assign_from_query("duchoang").expect_err("no delimiter");
        assert!(slot.is_none());
        insta::assert_snapshot!(
            err.to_string(),
            @"cannot parse `duchoang` as Pair: expected `left:right`"
        );
    }

    #[test]
    fn nested_kinds_describe_their_shape() {
        assert_eq!(<Vec<Option<u16>>>::kind().to_string(), "[u16?]");
        assert_eq!(<Option<Vec<Pair>>>::kind().to_string(), "[Pair]?");
    }
}
