#![allow(dead_code)]

use querybind::QueryRecord;

#[derive(QueryRecord)]
enum Mode {
    Fast,
    Slow,
}

fn main() {}
