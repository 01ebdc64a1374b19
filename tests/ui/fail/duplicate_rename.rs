#![allow(dead_code)]

use querybind::QueryRecord;

#[derive(QueryRecord)]
struct Search {
    #[query(rename = "q", rename = "t")]
    term: String,
}

fn main() {}
