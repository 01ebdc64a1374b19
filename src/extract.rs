//! Axum extractor binding the request query onto a record.

use axum::Json;
use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::debug;

use crate::error::BindError;
use crate::record::{Record, bind};
use crate::source::QuerySource;

/// Extracts `T` by binding the request's query string onto `T::default()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for BoundQuery<T>
where
    T: Record + Default + Send,
    S: Send + Sync,
{
    type Rejection = BindRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let source = QuerySource::parse(parts.uri.query().unwrap_or_default());
        let mut record = T::default();
        bind(&mut record, &source).map_err(BindRejection::from)?;
        Ok(Self(record))
    }
}

#[derive(Debug, Serialize)]
pub struct RejectionBody {
    pub error: RejectionMessage,
}

#[derive(Debug, Serialize)]
pub struct RejectionMessage {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// Rejection returned when the query cannot be bound.
#[derive(Debug)]
pub struct BindRejection {
    error: BindError,
}

impl BindRejection {
    pub fn error(&self) -> &BindError {
        &self.error
    }

    pub fn into_inner(self) -> BindError {
        self.error
    }

    /// Every binding failure is reported as a bad request.
    pub fn status(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}

impl From<BindError> for BindRejection {
    fn from(error: BindError) -> Self {
        Self { error }
    }
}

impl IntoResponse for BindRejection {
    fn into_response(self) -> Response {
        let status = self.status();
        debug!(status = %status, error = %self.error, "rejecting query");

        let body = RejectionBody {
            error: RejectionMessage {
                code: self.error.code().to_string(),
                message: "Invalid query parameters".to_string(),
                hint: Some(self.error.to_string()),
            },
        };
        (status, Json(body)).into_response()
    }
}
