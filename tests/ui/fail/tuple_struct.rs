#![allow(dead_code)]

use querybind::QueryRecord;

#[derive(QueryRecord)]
struct Point(u32, u32);

fn main() {}
