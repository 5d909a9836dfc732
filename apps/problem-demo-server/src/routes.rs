//! HTTP routes of the demo server.
//!
//! Every error the server reports is rendered as a problem details response.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use problem_details::{Problem, not_found};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::config::ProblemsConfig;

#[derive(Clone)]
struct AppState {
    problems: Arc<ProblemsConfig>,
}

/// Build the application router.
#[must_use]
pub fn router(problems: ProblemsConfig) -> Router {
    let state = AppState {
        problems: Arc::new(problems),
    };

    Router::new()
        .route("/", post(receive))
        .route("/healthz", get(healthz))
        .fallback(no_route)
        .method_not_allowed_fallback(wrong_method)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn receive(State(state): State<AppState>, body: Bytes) -> Response {
    if body.is_empty() {
        tracing::info!("rejecting request without a body");
        return Problem::new(
            StatusCode::BAD_REQUEST,
            "Problem parsing request body",
            "No content was received for the request body. Please check your request and try again",
        )
        .with_type(state.problems.type_url("bad-body"))
        .into_response();
    }

    tracing::debug!(bytes = body.len(), "request body received");
    Json(json!({ "received": body.len() })).into_response()
}

async fn healthz() -> &'static str {
    "ok"
}

async fn no_route(State(state): State<AppState>, uri: Uri) -> Problem {
    not_found(format!("No resource exists at '{}'", uri.path()))
        .with_type(state.problems.type_url("not-found"))
}

async fn wrong_method(State(state): State<AppState>, method: Method, uri: Uri) -> Problem {
    Problem::from(StatusCode::METHOD_NOT_ALLOWED)
        .with_type(state.problems.type_url("method-not-allowed"))
        .with_detail(format!("{method} is not supported on '{}'", uri.path()))
}
