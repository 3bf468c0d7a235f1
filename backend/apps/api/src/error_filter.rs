//! Global error filter
//!
//! Error bodies produced from `AppError` carry an `ErrorTrace` extension.
//! This layer adds the request `path` to them and, in development, the
//! error's source chain as `stack`.

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use kernel::error::ErrorTrace;
use serde_json::Value;

/// Error bodies are small; anything bigger is passed through untouched
const MAX_ERROR_BODY: usize = 64 * 1024;

#[derive(Debug, Clone, Copy)]
pub struct ErrorFilterConfig {
    pub include_stack: bool,
}

pub async fn error_filter(
    State(config): State<ErrorFilterConfig>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let response = next.run(request).await;

    let Some(trace) = response.extensions().get::<ErrorTrace>().cloned() else {
        return response;
    };

    let (mut parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, MAX_ERROR_BODY).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, path = %path, "Could not buffer error body");
            return Response::from_parts(parts, Body::empty());
        }
    };

    let Ok(Value::Object(mut body)) = serde_json::from_slice::<Value>(&bytes) else {
        return Response::from_parts(parts, Body::from(bytes));
    };
    body.insert("path".to_string(), Value::from(path));
    if config.include_stack {
        body.insert("stack".to_string(), Value::from(trace.0));
    }

    let encoded = match serde_json::to_vec(&body) {
        Ok(encoded) => encoded,
        Err(_) => return Response::from_parts(parts, Body::from(bytes)),
    };
    parts.headers.remove(header::CONTENT_LENGTH);
    Response::from_parts(parts, Body::from(encoded))
}
