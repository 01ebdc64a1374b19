use std::marker::PhantomData;

use querybind::{ParseQuery, ParseQueryError, QueryRecord, QueryValue};

#[derive(Default, QueryValue)]
struct Tagged<T> {
    raw: String,
    marker: PhantomData<T>,
}

impl<T> ParseQuery for Tagged<T> {
    fn parse_query(&mut self, raw: &str) -> Result<(), ParseQueryError> {
        self.raw = raw.to_string();
        Ok(())
    }
}

#[derive(Default, QueryRecord)]
struct Lookup {
    #[query(rename = "id")]
    identifier: Tagged<u32>,
    aliases: Vec<Tagged<u32>>,
}

fn main() {
    let lookup: Lookup = querybind::bind_query("id=abc&aliases=x,y").unwrap();
    assert_eq!(lookup.identifier.raw, "abc");
    assert_eq!(lookup.aliases.len(), 2);
}
