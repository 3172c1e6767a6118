pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::auth::access_gate;
use crate::proxy::{auth, profile, resume, sessions};
use crate::state::AppState;

/// Browser-facing relays to the backend, mounted under `/api`.
fn api_router() -> Router<AppState> {
    Router::new()
        // Auth
        .route("/auth/login", post(auth::handle_login))
        .route("/auth/register", post(auth::handle_register))
        .route("/auth/me", get(auth::handle_me))
        .route("/auth/logout", post(auth::handle_logout))
        // Profile
        .route(
            "/profile",
            get(profile::handle_get_profile)
                .post(profile::handle_create_profile)
                .put(profile::handle_update_profile),
        )
        .route(
            "/profile/image",
            post(profile::handle_upload_image)
                .layer(DefaultBodyLimit::max(profile::UPLOAD_BODY_LIMIT)),
        )
        // Interview sessions
        .route(
            "/sessions",
            get(sessions::handle_list_sessions).post(sessions::handle_create_session),
        )
        .route("/sessions/:id", get(sessions::handle_get_session))
        .route("/sessions/:id/message", post(sessions::handle_send_message))
        .route("/sessions/:id/end", post(sessions::handle_end_session))
        .route("/sessions/:id/analysis", get(sessions::handle_get_analysis))
        .route("/sessions/:id/report", get(sessions::handle_download_report))
        // Resume builder
        .route(
            "/resume/sessions",
            get(resume::handle_list_resume_sessions).post(resume::handle_create_resume_session),
        )
        .route("/resume/sessions/:id", get(resume::handle_get_resume_session))
        .route(
            "/resume/sessions/:id/message",
            post(resume::handle_send_resume_message),
        )
        .route(
            "/resume/by-session/:session_id",
            get(resume::handle_get_resume_by_session),
        )
        .route("/resume/:id", get(resume::handle_get_resume))
        .route("/resume/:id/ats-score", post(resume::handle_ats_score))
        .route("/resume/:id/template", patch(resume::handle_update_template))
        .route("/resume/:id/download", get(resume::handle_download_resume))
}

/// Full router: health, `/api` relays, and the static front end as fallback,
/// all behind the access gate.
pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(health::health_handler))
        .nest("/api", api_router());

    let router = match &state.config.static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router
        .layer(middleware::from_fn_with_state(state.clone(), access_gate))
        .with_state(state)
}
