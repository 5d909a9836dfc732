//! RFC 7807 Problem Details data model

use http::StatusCode;
use serde::{Deserialize, Serialize};

/// Content type for Problem Details as per RFC 7807.
pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";

/// Language of the human-readable `title` and `detail` members.
pub const CONTENT_LANGUAGE_EN: &str = "en";

/// Status used when a problem carries no status, or one that is not a valid HTTP code.
pub const DEFAULT_STATUS: StatusCode = StatusCode::INTERNAL_SERVER_ERROR;

/// RFC 7807 Problem Details for HTTP APIs.
///
/// Every member is serialized, including empty strings. A `status` of `0`
/// means the caller did not set one; it is resolved to [`DEFAULT_STATUS`]
/// when the problem is rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[must_use]
pub struct Problem {
    /// A URI reference that identifies the problem type.
    /// It is a stable identifier and need not be dereferenceable.
    #[serde(rename = "type")]
    pub type_url: String,
    /// A short, human-readable summary of the problem type.
    pub title: String,
    /// The HTTP status code for this occurrence of the problem.
    pub status: u16,
    /// A human-readable explanation specific to this occurrence of the problem.
    pub detail: String,
}

impl Problem {
    /// Create a new Problem with the given status, title, and detail.
    ///
    /// The type defaults to `about:blank`, meaning the problem has no
    /// semantics beyond its status code.
    pub fn new(status: StatusCode, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            type_url: "about:blank".to_owned(),
            title: title.into(),
            status: status.as_u16(),
            detail: detail.into(),
        }
    }

    pub fn with_type(mut self, type_url: impl Into<String>) -> Self {
        self.type_url = type_url.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status.as_u16();
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }

    /// Status this problem is rendered with.
    ///
    /// Unset (`0`) and out-of-range codes resolve to [`DEFAULT_STATUS`].
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(DEFAULT_STATUS)
    }

    /// Returns the problem with `status` replaced by [`Problem::status_code`],
    /// so the body and the status line agree.
    pub fn resolved(mut self) -> Self {
        self.status = self.status_code().as_u16();
        self
    }
}

impl From<StatusCode> for Problem {
    /// Problem carrying only a status and its canonical reason as the title.
    fn from(status: StatusCode) -> Self {
        Self::new(status, status.canonical_reason().unwrap_or_default(), "")
    }
}

pub fn bad_request(detail: impl Into<String>) -> Problem {
    Problem::new(StatusCode::BAD_REQUEST, "Bad Request", detail)
}

pub fn not_found(detail: impl Into<String>) -> Problem {
    Problem::new(StatusCode::NOT_FOUND, "Not Found", detail)
}

pub fn conflict(detail: impl Into<String>) -> Problem {
    Problem::new(StatusCode::CONFLICT, "Conflict", detail)
}

pub fn internal_error(detail: impl Into<String>) -> Problem {
    Problem::new(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal Server Error",
        detail,
    )
}
