use std::time::Instant;

use querybind::QueryRecord;

#[derive(QueryRecord)]
struct Request {
    path: String,
    #[query(skip)]
    received: Instant,
}

fn main() {
    let mut request = Request {
        path: String::new(),
        received: Instant::now(),
    };
    querybind::bind(&mut request, &querybind::QuerySource::parse("path=/posts")).unwrap();
    assert_eq!(request.path, "/posts");
    let _ = request.received;
}
