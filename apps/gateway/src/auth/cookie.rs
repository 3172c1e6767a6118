//! The session cookie: one HTTP-only cookie holding the bearer token.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::errors::AppError;

pub const SESSION_COOKIE_NAME: &str = "iklavya-token";

/// Seven days, matching the backend's token lifetime.
pub const SESSION_MAX_AGE: time::Duration = time::Duration::days(7);

/// Writes and clears the session cookie with the gateway's fixed attributes.
#[derive(Debug, Clone, Copy)]
pub struct SessionCookie {
    secure: bool,
}

impl SessionCookie {
    /// `secure` should only be true in production; browsers drop `Secure`
    /// cookies on plain-http localhost.
    pub fn new(secure: bool) -> Self {
        Self { secure }
    }

    pub fn set(&self, jar: CookieJar, token: impl Into<String>) -> CookieJar {
        let cookie = Cookie::build((SESSION_COOKIE_NAME, token.into()))
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .path("/")
            .max_age(SESSION_MAX_AGE);
        jar.add(cookie)
    }

    /// Reads the raw token. Does not verify it.
    pub fn get(jar: &CookieJar) -> Option<String> {
        jar.get(SESSION_COOKIE_NAME)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
    }

    pub fn clear(&self, jar: CookieJar) -> CookieJar {
        jar.remove(Cookie::build(SESSION_COOKIE_NAME).path("/"))
    }
}

/// The caller's bearer token, taken from the session cookie.
///
/// Rejects with `401 Not authenticated` when the cookie is absent, before any
/// request body is read.
#[derive(Debug, Clone)]
pub struct SessionToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for SessionToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        SessionCookie::get(&jar)
            .map(SessionToken)
            .ok_or(AppError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderMap, HeaderValue};
    use axum::response::IntoResponse;

    fn set_cookie_headers(jar: CookieJar) -> Vec<String> {
        jar.into_response()
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_set_then_get_round_trips() {
        let token = "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiIxIn0.c2ln";
        let jar = SessionCookie::new(false).set(CookieJar::new(), token);
        assert_eq!(SessionCookie::get(&jar).as_deref(), Some(token));
    }

    #[test]
    fn test_round_trip_through_headers() {
        let token = "abc.def.ghi";
        let headers = set_cookie_headers(SessionCookie::new(false).set(CookieJar::new(), token));
        let pair = headers[0].split(';').next().unwrap().to_string();

        let mut request_headers = HeaderMap::new();
        request_headers.insert(header::COOKIE, HeaderValue::from_str(&pair).unwrap());
        let jar = CookieJar::from_headers(&request_headers);

        assert_eq!(SessionCookie::get(&jar).as_deref(), Some(token));
    }

    #[test]
    fn test_cookie_attributes() {
        let headers = set_cookie_headers(SessionCookie::new(false).set(CookieJar::new(), "t"));
        assert_eq!(headers.len(), 1);
        let cookie = &headers[0];
        assert!(cookie.starts_with("iklavya-token=t"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=604800"));
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn test_secure_flag_in_production() {
        let headers = set_cookie_headers(SessionCookie::new(true).set(CookieJar::new(), "t"));
        assert!(headers[0].contains("Secure"));
    }

    #[test]
    fn test_get_absent() {
        assert_eq!(SessionCookie::get(&CookieJar::new()), None);
    }

    #[test]
    fn test_clear_emits_removal() {
        let mut request_headers = HeaderMap::new();
        request_headers.insert(header::COOKIE, HeaderValue::from_static("iklavya-token=old"));
        let jar = SessionCookie::new(false).clear(CookieJar::from_headers(&request_headers));

        assert_eq!(SessionCookie::get(&jar), None);
        let headers = set_cookie_headers(jar);
        assert_eq!(headers.len(), 1);
        assert!(headers[0].starts_with("iklavya-token="));
        assert!(headers[0].contains("Max-Age=0"));
    }
}
