use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
    routing::get,
};
use querybind::{BoundQuery, QueryRecord};
use serde_json::Value;
use tower::ServiceExt;

#[derive(Debug, Default, QueryRecord)]
struct ListQuery {
    status: String,
    #[query(rename = "per_page")]
    limit: u32,
    tags: Vec<String>,
}

async fn list(BoundQuery(query): BoundQuery<ListQuery>) -> String {
    format!("{}:{}:{}", query.status, query.limit, query.tags.join("|"))
}

fn router() -> Router {
    Router::new().route("/posts", get(list))
}

async fn send(uri: &str) -> (StatusCode, Vec<u8>) {
    let response = router()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
        .await
        .expect("response");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    (status, body.to_vec())
}

#[tokio::test]
async fn binds_query_into_handler_argument() {
    let (status, body) = send("/posts?status=draft&per_page=20&tags=rust,web").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(body).expect("utf8"), "draft:20:rust|web");
}

#[tokio::test]
async fn missing_query_uses_defaults() {
    let (status, body) = send("/posts").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(body).expect("utf8"), ":0:");
}

#[tokio::test]
async fn conversion_failure_is_a_bad_request() {
    let (status, body) = send("/posts?per_page=lots").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let json: Value = serde_json::from_slice(&body).expect("json body");
    assert_eq!(json["error"]["code"], "conversion_error");
    assert_eq!(json["error"]["message"], "Invalid query parameters");
    assert!(
        json["error"]["hint"]
            .as_str()
            .expect("hint")
            .starts_with("field `limit`:")
    );
}
