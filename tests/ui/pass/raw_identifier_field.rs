use querybind::{QueryRecord, Record};

#[derive(Default, QueryRecord)]
struct Filter {
    r#type: String,
}

fn main() {
    let filter: Filter = querybind::bind_query("type=post").unwrap();
    assert_eq!(filter.r#type, "post");
    assert_eq!(Filter::schema().len(), 1);
}
