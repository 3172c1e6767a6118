//! Access gate run in front of every request.
//!
//! The decision is a pure function of the path and the session cookie so it
//! can be exercised without a server; [`access_gate`] only applies it.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use percent_encoding::percent_decode_str;
use tracing::{debug, warn};

use super::cookie::SessionCookie;
use super::token::TokenVerifier;
use crate::state::AppState;

/// Pages that require a verified session.
pub const PROTECTED_PREFIXES: &[&str] = &["/dashboard", "/admin", "/session", "/sessions", "/profile"];

/// Pages that signed-in users are bounced away from.
pub const AUTH_ONLY_PREFIXES: &[&str] = &["/login", "/register"];

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    Protected,
    AuthOnly,
    Public,
}

/// Resolves a request path the way the static file service does before
/// looking it up: percent-decoded, empty and `.` segments dropped, `..`
/// popping its parent.
pub fn canonical_path(raw: &str) -> String {
    let decoded = percent_decode_str(raw).decode_utf8_lossy();
    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    format!("/{}", segments.join("/"))
}

pub fn classify(path: &str) -> RouteClass {
    let path = canonical_path(path);
    if PROTECTED_PREFIXES.iter().any(|p| path.starts_with(p)) {
        RouteClass::Protected
    } else if AUTH_ONLY_PREFIXES.iter().any(|p| path.starts_with(p)) {
        RouteClass::AuthOnly
    } else {
        RouteClass::Public
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    RedirectToLogin { clear_cookie: bool },
    RedirectToDashboard,
}

pub fn decide(path: &str, token: Option<&str>, verifier: &TokenVerifier) -> GateDecision {
    match (classify(path), token) {
        (RouteClass::Protected, None) => GateDecision::RedirectToLogin {
            clear_cookie: false,
        },
        (RouteClass::Protected, Some(token)) => match verifier.verify(token) {
            Ok(payload) => {
                debug!(path, user_id = %payload.sub, role = %payload.role, "Verified session");
                GateDecision::Allow
            }
            Err(e) => {
                warn!(path, error = %e, "Rejected session token on protected page");
                GateDecision::RedirectToLogin { clear_cookie: true }
            }
        },
        (RouteClass::AuthOnly, Some(token)) => match verifier.verify(token) {
            Ok(_) => GateDecision::RedirectToDashboard,
            Err(_) => GateDecision::Allow,
        },
        (RouteClass::AuthOnly, None) | (RouteClass::Public, _) => GateDecision::Allow,
    }
}

/// Axum middleware applying [`decide`] to each incoming request.
pub async fn access_gate(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let token = SessionCookie::get(&jar);
    let decision = decide(request.uri().path(), token.as_deref(), &state.tokens);

    match decision {
        GateDecision::Allow => {
            debug!(path = %request.uri().path(), "Access gate: allow");
            next.run(request).await
        }
        GateDecision::RedirectToLogin { clear_cookie: true } => {
            (state.cookies.clear(jar), Redirect::temporary(LOGIN_PATH)).into_response()
        }
        GateDecision::RedirectToLogin { clear_cookie: false } => {
            Redirect::temporary(LOGIN_PATH).into_response()
        }
        GateDecision::RedirectToDashboard => Redirect::temporary(DASHBOARD_PATH).into_response(),
    }
}
