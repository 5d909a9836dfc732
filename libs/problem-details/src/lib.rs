//! RFC 7807 Problem Details responses for HTTP APIs
//!
//! This crate renders a structured error description onto an HTTP response:
//! - the `Problem` data model with `type`, `title`, `status` and `detail`
//! - `write_response`, which sets the problem headers, the status line and the
//!   JSON body on any `ResponseWriter`
//! - static problem definitions (`ErrDef`) for application error tables
//!
//! The `axum` feature makes `Problem` directly usable as an axum response.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod catalog;
pub mod error;
pub mod problem;
pub mod writer;

#[cfg(feature = "axum")]
mod axum_ext;

// Re-export commonly used types
pub use catalog::ErrDef;
pub use error::ProblemError;
pub use problem::{
    APPLICATION_PROBLEM_JSON, CONTENT_LANGUAGE_EN, DEFAULT_STATUS, Problem, bad_request, conflict,
    internal_error, not_found,
};
pub use writer::{ResponseWriter, write_response};
