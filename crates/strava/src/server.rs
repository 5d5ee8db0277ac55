use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use strava_core::flow::{FlowController, PassOutcome, Session};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::page;
use crate::sessions::SessionRegistry;

pub const SESSION_COOKIE: &str = "strava_session";
const PAGE_PATH: &str = "/";

/// Shared state for route handlers.
#[derive(Clone)]
pub struct AppState {
    flow: Arc<FlowController>,
    sessions: Arc<SessionRegistry>,
}

impl AppState {
    pub fn new(flow: FlowController) -> Self {
        Self {
            flow: Arc::new(flow),
            sessions: Arc::new(SessionRegistry::new()),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(PAGE_PATH, get(page_handler))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// One evaluation pass per request; a rerun is a redirect back to the bare page.
///
/// A browser gets a session entry and cookie only once a pass changes its
/// state, so visits that halt at the login page leave nothing behind.
async fn page_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let query_code = last_code(params);
    let existing = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
        .and_then(|id| state.sessions.get(id).map(|handle| (id, handle)));

    let (jar, outcome) = match existing {
        Some((session_id, handle)) => {
            let mut session = handle.lock().await;
            let outcome = state.flow.run_pass(&mut session, query_code).await;
            tracing::debug!(session = %session_id, stage = ?session.stage(), "pass finished");
            (jar, outcome)
        }
        None => {
            let mut session = Session::new();
            let outcome = state.flow.run_pass(&mut session, query_code).await;
            if session == Session::default() {
                (jar, outcome)
            } else {
                let (session_id, _) = state.sessions.insert(session);
                (jar.add(session_cookie(session_id)), outcome)
            }
        }
    };

    match outcome {
        PassOutcome::Rerun => (jar, Redirect::to(PAGE_PATH)).into_response(),
        PassOutcome::Halted(view) => match page::render(&state.flow.authorization_url(), &view) {
            Ok(html) => (jar, Html(html)).into_response(),
            Err(err) => {
                tracing::error!(error = %err, "failed to render page");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        },
    }
}

/// The provider's `code`; when repeated, the last value wins.
fn last_code(params: Vec<(String, String)>) -> Option<String> {
    params
        .into_iter()
        .rev()
        .find_map(|(key, value)| (key == "code").then_some(value))
}

/// Browser-session cookie: no max-age, so it ends with the browser session.
fn session_cookie(id: Uuid) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, id.to_string()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub sessions: usize,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        sessions: state.sessions.len(),
    })
}
