//! Binding into destinations whose concrete type is only known at runtime.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use tracing::debug;

use crate::error::BindError;
use crate::record::Record;
use crate::source::QuerySource;

type ErasedBind = fn(&mut dyn Any, &QuerySource) -> Result<(), BindError>;

#[derive(Clone, Copy)]
struct Entry {
    type_name: &'static str,
    bind: ErasedBind,
}

/// Record types that may be bound through an untyped `&mut dyn Any`.
#[derive(Default)]
pub struct RecordRegistry {
    entries: HashMap<TypeId, Entry>,
}

impl RecordRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T: Record>(&mut self) -> &mut Self {
        self.entries.insert(
            TypeId::of::<T>(),
            Entry {
                type_name: T::schema().type_name(),
                bind: bind_erased::<T>,
            },
        );
        self
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    pub fn type_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.values().map(|entry| entry.type_name)
    }

    /// Bind onto `destination`, which must be present and of a registered record type.
    ///
    /// Both checks happen before any field is inspected.
    pub fn bind_any(
        &self,
        destination: Option<&mut dyn Any>,
        source: &QuerySource,
    ) -> Result<(), BindError> {
        let Some(destination) = destination else {
            debug!("bind destination is missing");
            return Err(BindError::invalid_destination("destination is missing"));
        };

        let type_id = (*destination).type_id();
        let Some(entry) = self.entries.get(&type_id) else {
            debug!("bind destination is not a registered record type");
            return Err(BindError::invalid_destination(
                "destination is not a registered record type",
            ));
        };

        (entry.bind)(destination, source)
    }
}

impl std::fmt::Debug for RecordRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.type_names()).finish()
    }
}

fn bind_erased<T: Record>(destination: &mut dyn Any, source: &QuerySource) -> Result<(), BindError> {
    let record = destination
        .downcast_mut::<T>()
        .ok_or_else(|| BindError::invalid_destination("destination type changed during bind"))?;
    T::schema().apply(record, source)
}
