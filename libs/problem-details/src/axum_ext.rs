//! Axum integration: make Problem directly usable as a response

use axum::body::Body;
use axum::response::{IntoResponse, Response};
use http::StatusCode;

use crate::problem::Problem;
use crate::writer::write_response;

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let mut buffered = http::Response::new(Vec::new());
        match write_response(self, &mut buffered) {
            Ok(()) => buffered.map(Body::from),
            // Already logged by the writer. Never send a partial problem body.
            Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}
