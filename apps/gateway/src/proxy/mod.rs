//! Authenticated relays to the external backend API.
//!
//! Each handler checks the session cookie (via [`SessionToken`]), forwards the
//! request through [`crate::backend::BackendClient`] and maps the answer with
//! [`relay`]. Nothing here retries.
//!
//! [`SessionToken`]: crate::auth::SessionToken

pub mod auth;
pub mod profile;
pub mod relay;
pub mod resume;
pub mod sessions;

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde_json::Value;

use crate::backend::path_segment;
use crate::errors::AppError;

/// A JSON request body, kept as an untyped value so it can be forwarded
/// unchanged. Unreadable or invalid bodies become `400 Invalid JSON body`.
#[derive(Debug)]
pub struct JsonBody(pub Value);

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|_| AppError::Validation("Invalid JSON body".to_string()))?;
        serde_json::from_slice(&bytes)
            .map(JsonBody)
            .map_err(|_| AppError::Validation("Invalid JSON body".to_string()))
    }
}

/// A single `:id`-style route parameter, escaped for use as one segment of a
/// backend path. `.` and `..` are refused since URL parsing collapses them.
#[derive(Debug)]
pub struct PathSegment(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for PathSegment
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::Validation("Invalid path parameter".to_string()))?;
        match raw.as_str() {
            "" | "." | ".." => Err(AppError::Validation("Invalid path parameter".to_string())),
            _ => Ok(PathSegment(path_segment(&raw))),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use wiremock::matchers::any;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Every authenticated relay must answer 401 without touching the backend.
    #[tokio::test]
    async fn test_all_relays_require_session_cookie() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&server)
            .await;

        let cases: &[(Method, &str, bool)] = &[
            (Method::GET, "/api/auth/me", false),
            (Method::GET, "/api/profile", false),
            (Method::POST, "/api/profile", true),
            (Method::PUT, "/api/profile", true),
            (Method::POST, "/api/profile/image", false),
            (Method::GET, "/api/sessions", false),
            (Method::POST, "/api/sessions", true),
            (Method::GET, "/api/sessions/s1", false),
            (Method::POST, "/api/sessions/s1/message", true),
            (Method::POST, "/api/sessions/s1/end", false),
            (Method::GET, "/api/sessions/s1/analysis", false),
            (Method::GET, "/api/sessions/s1/report", false),
            (Method::GET, "/api/resume/sessions", false),
            (Method::POST, "/api/resume/sessions", true),
            (Method::GET, "/api/resume/sessions/r1", false),
            (Method::POST, "/api/resume/sessions/r1/message", true),
            (Method::GET, "/api/resume/by-session/r1", false),
            (Method::GET, "/api/resume/res1", false),
            (Method::POST, "/api/resume/res1/ats-score", false),
            (Method::PATCH, "/api/resume/res1/template", true),
            (Method::GET, "/api/resume/res1/download", false),
        ];

        for (method, uri, with_body) in cases {
            let body = with_body.then(|| json!({ "content": "hi" }));
            let response = send(app(&server.uri()), request(method.clone(), uri, None, body)).await;
            let (status, body) = json_of(response).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
            assert_eq!(body, json!({ "error": "Not authenticated" }), "{method} {uri}");
        }

        server.verify().await;
    }

    #[tokio::test]
    async fn test_invalid_json_body_is_rejected_locally() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let request = axum::http::Request::builder()
            .method(Method::POST)
            .uri("/api/sessions")
            .header("cookie", format!("iklavya-token={TOKEN}"))
            .header("content-type", "application/json")
            .body(axum::body::Body::from("{not json"))
            .unwrap();
        let (status, body) = json_of(send(app(&server.uri()), request).await).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid JSON body");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_internal_error() {
        let response = send(
            app("http://127.0.0.1:9"),
            request(Method::GET, "/api/sessions", Some(TOKEN), None),
        )
        .await;
        let (status, body) = json_of(response).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Internal server error" }));
    }

    #[tokio::test]
    async fn test_non_json_upstream_is_internal_error() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&server)
            .await;

        let response = send(
            app(&server.uri()),
            request(Method::GET, "/api/profile", Some(TOKEN), None),
        )
        .await;
        let (status, body) = json_of(response).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
    }
}
