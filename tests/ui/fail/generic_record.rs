#![allow(dead_code)]

use querybind::QueryRecord;

#[derive(QueryRecord)]
struct Page<T> {
    items: Vec<T>,
}

fn main() {}
