#![allow(dead_code)]

use querybind::QueryRecord;

#[derive(QueryRecord)]
struct Search {
    #[query(skip, rename = "t")]
    term: String,
}

fn main() {}
