//! Validated JSON extractor
//!
//! `axum::Json` でデシリアライズした後に `validator::Validate` を実行する。
//! どちらの失敗も 400 として [`AppError`] のエンベロープで返す。

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;
use crate::id::Id;

/// バリデーション済み JSON ボディ
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    let message = match &rejection {
        JsonRejection::MissingJsonContentType(_) => {
            "Expected request with `Content-Type: application/json`".to_string()
        }
        _ => format!("Malformed JSON body: {}", rejection.body_text()),
    };
    AppError::bad_request(message).with_source(rejection)
}

/// `/{id}` パスパラメータを型付き ID として取り出す
///
/// UUID として解釈できない場合も JSON エンベロープの 400 を返す。
#[derive(Debug, Clone, Copy)]
pub struct PathId<T>(pub Id<T>);

impl<T, S> FromRequestParts<S> for PathId<T>
where
    T: Send + Sync,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::bad_request(e.body_text()).with_source(e))?;
        raw.parse::<Id<T>>()
            .map(PathId)
            .map_err(|e| AppError::bad_request(format!("Invalid id: {raw}")).with_source(e))
    }
}

/// クエリ文字列の取り出し。`?limit=abc` なども JSON エンベロープの 400 になる
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryParams<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                AppError::bad_request(format!("Invalid query string: {}", e.body_text()))
                    .with_source(e)
            })?;
        Ok(QueryParams(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, header};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    #[serde(rename_all = "camelCase")]
    struct CreateProbe {
        #[validate(length(min = 3))]
        title: String,
        #[validate(range(min = 1, max = 10000))]
        total_shares: i64,
    }

    fn json_request(body: &str) -> Request {
        HttpRequest::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_accepts_valid_body() {
        let req = json_request(r#"{"title":"North Field","totalShares":100}"#);
        let ValidatedJson(probe) = ValidatedJson::<CreateProbe>::from_request(req, &())
            .await
            .unwrap();
        assert_eq!(probe.title, "North Field");
        assert_eq!(probe.total_shares, 100);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let req = json_request("{not json");
        let err = ValidatedJson::<CreateProbe>::from_request(req, &())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(err.details().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_fields_are_listed() {
        let req = json_request(r#"{"title":"ab","totalShares":0}"#);
        let err = ValidatedJson::<CreateProbe>::from_request(req, &())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.details().len(), 2);
    }

    #[tokio::test]
    async fn test_path_id_rejects_non_uuid() {
        use crate::id::UserId;
        use axum::Router;
        use axum::routing::get;
        use tower::ServiceExt;

        async fn show(PathId(id): PathId<crate::id::markers::User>) -> String {
            id.to_string()
        }

        let app = Router::new().route("/users/{id}", get(show));

        let id = UserId::new();
        let ok = app
            .clone()
            .oneshot(
                HttpRequest::builder()
                    .uri(format!("/users/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(ok.status(), 200);

        let bad = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/users/not-a-uuid")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(bad.status(), 400);
    }

    #[tokio::test]
    async fn test_query_params_reject_with_envelope() {
        use axum::Router;
        use axum::routing::get;
        use tower::ServiceExt;

        #[derive(Deserialize)]
        struct Limit {
            limit: u32,
        }

        async fn show(QueryParams(q): QueryParams<Limit>) -> String {
            q.limit.to_string()
        }

        let app = Router::new().route("/items", get(show));

        let ok = app
            .clone()
            .oneshot(HttpRequest::builder().uri("/items?limit=5").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(ok.status(), 200);

        let bad = app
            .oneshot(HttpRequest::builder().uri("/items?limit=abc").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(bad.status(), 400);
        let bytes = axum::body::to_bytes(bad.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["statusCode"], 400);
    }
}
