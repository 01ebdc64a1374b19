#![allow(dead_code)]

use querybind::QueryRecord;

#[derive(QueryRecord)]
struct Search {
    #[query(flatten)]
    term: String,
}

fn main() {}
