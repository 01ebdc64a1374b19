#![allow(dead_code)]

use querybind::QueryRecord;

#[derive(QueryRecord)]
struct Search {
    #[query(rename = "")]
    term: String,
}

fn main() {}
