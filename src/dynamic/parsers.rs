use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::convert::{FromQueryValue, ParseQueryError};

type Parser = Box<dyn Fn(&str) -> Result<Value, ParseQueryError> + Send + Sync>;

/// Named parsers backing the custom kinds of a [`super::DynamicSchema`].
#[derive(Default)]
pub struct ParserRegistry {
    parsers: HashMap<String, Parser>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, type_name: impl Into<String>, parser: F) -> &mut Self
    where
        F: Fn(&str) -> Result<Value, ParseQueryError> + Send + Sync + 'static,
    {
        self.parsers.insert(type_name.into(), Box::new(parser));
        self
    }

    /// Expose a statically typed field value under `type_name`, rendered through serde.
    pub fn register_value<T>(&mut self, type_name: impl Into<String>) -> &mut Self
    where
        T: FromQueryValue + Default + Serialize + 'static,
    {
        self.register(type_name, |raw| {
            let mut value = T::default();
            value
                .assign_from_query(raw)
                .map_err(|err| ParseQueryError::new(err.to_string()))?;
            serde_json::to_value(&value).map_err(|err| ParseQueryError::new(err.to_string()))
        })
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.parsers.contains_key(type_name)
    }

    pub(crate) fn parse(&self, type_name: &str, raw: &str) -> Option<Result<Value, ParseQueryError>> {
        self.parsers.get(type_name).map(|parser| parser(raw))
    }
}

impl fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.parsers.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("ParserRegistry")
            .field("parsers", &names)
            .finish()
    }
}
