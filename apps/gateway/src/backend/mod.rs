//! Backend client: the single point of entry for all calls to the external API.
//!
//! No handler builds its own HTTP request; everything goes through
//! [`BackendClient`], which owns the base URL and the bearer header format.
//! No retries and no total timeout: event streams may stay open indefinitely.

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::{multipart::Form, Client, RequestBuilder, Response};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

pub use reqwest::Method;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Backend response is missing `{0}`")]
    MissingField(&'static str),
}

/// Characters escaped when a caller-supplied id is placed in one path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Encodes `raw` so it stays a single segment of the backend path.
pub fn path_segment(raw: &str) -> String {
    utf8_percent_encode(raw, SEGMENT).to_string()
}

#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, connect_timeout: Duration) -> Result<Self, BackendError> {
        let base_url: String = base_url.into();
        Ok(Self {
            client: Client::builder().connect_timeout(connect_timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends a request with an optional JSON body, re-serialised unchanged.
    /// A `None` token sends no `Authorization` header (login, register).
    pub async fn send_json(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<&Value>,
    ) -> Result<Response, BackendError> {
        debug!(%method, path, "Calling backend");
        let mut builder = self.request(method, path, token);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        Ok(builder.send().await?)
    }

    /// Bodyless authenticated GET.
    pub async fn get(&self, path: &str, token: &str) -> Result<Response, BackendError> {
        self.send_json(Method::GET, path, Some(token), None).await
    }

    pub async fn send_multipart(
        &self,
        method: Method,
        path: &str,
        token: &str,
        form: Form,
    ) -> Result<Response, BackendError> {
        debug!(%method, path, "Calling backend (multipart)");
        Ok(self
            .request(method, path, Some(token))
            .multipart(form)
            .send()
            .await?)
    }
}
