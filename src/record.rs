use crate::error::BindError;
use crate::schema::RecordSchema;
use crate::source::QuerySource;

/// A record type with a statically built field dispatch table.
///
/// Usually derived with `#[derive(QueryRecord)]`; hand-written impls build
/// the table once, typically in a `OnceLock`, through [`RecordSchema::builder`].
pub trait Record: Sized + 'static {
    fn schema() -> &'static RecordSchema<Self>;
}

/// Populate `record` in place from `source`.
///
/// Absent or empty keys leave the matching field untouched. The first failing
/// field aborts the pass; fields before it stay converted.
pub fn bind<T: Record>(record: &mut T, source: &QuerySource) -> Result<(), BindError> {
    T::schema().apply(record, source)
}

/// Decode `query` and bind it onto a fresh default record.
pub fn bind_query<T>(query: &str) -> Result<T, BindError>
where
    T: Record + Default,
{
    let mut record = T::default();
    bind(&mut record, &QuerySource::parse(query))?;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use std::sync::OnceLock;

    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Paging {
        page: u32,
        size: u32,
    }

    impl Record for Paging {
        fn schema() -> &'static RecordSchema<Self> {
            static SCHEMA: OnceLock<RecordSchema<Paging>> = OnceLock::new();
            SCHEMA.get_or_init(|| {
                RecordSchema::builder()
                    .field("Page", |paging: &mut Paging| &mut paging.page)
                    .bind("Size", Some("per_page"), |paging: &mut Paging| {
                        &mut paging.size
                    })
                    .build()
            })
        }
    }

    #[test]
    fn hand_written_schema_binds() {
        let paging: Paging = bind_query("page=3&per_page=25").expect("bind");
        assert_eq!(paging, Paging { page: 3, size: 25 });
    }

    #[test]
    fn schema_is_built_once() {
        assert!(std::ptr::eq(Paging::schema(), Paging::schema()));
    }

    #[test]
    fn bind_keeps_values_for_missing_keys() {
        let mut paging = Paging { page: 1, size: 50 };
        bind(&mut paging, &QuerySource::parse("page=&size=10")).expect("bind");
        assert_eq!(paging, Paging { page: 1, size: 50 });
    }
}
