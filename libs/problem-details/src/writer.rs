//! Rendering a [`Problem`] onto an HTTP response destination.
//!
//! Headers and the status line are always finalized before the body is
//! written: many response writers freeze their headers on the first body
//! write and drop later header changes silently.

use http::header::{CONTENT_LANGUAGE, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue, StatusCode};

use crate::error::ProblemError;
use crate::problem::{APPLICATION_PROBLEM_JSON, CONTENT_LANGUAGE_EN, Problem};

/// Destination a problem response is written to.
///
/// This is the surface a host server exposes for one response: a mutable
/// header collection, a status line, and a byte body. Implementations carry
/// no network stack requirements, so test doubles can implement it directly.
pub trait ResponseWriter {
    /// Headers that will be sent with the response.
    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Finalize the response status line.
    fn write_status(&mut self, status: StatusCode);

    /// Append bytes to the response body.
    ///
    /// # Errors
    /// Returns the transport error if the bytes could not be written.
    fn write_body(&mut self, body: &[u8]) -> std::io::Result<()>;
}

impl<W: ResponseWriter + ?Sized> ResponseWriter for &mut W {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        (**self).headers_mut()
    }

    fn write_status(&mut self, status: StatusCode) {
        (**self).write_status(status);
    }

    fn write_body(&mut self, body: &[u8]) -> std::io::Result<()> {
        (**self).write_body(body)
    }
}

/// Buffered response: the body accumulates in memory.
impl ResponseWriter for http::Response<Vec<u8>> {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        http::Response::headers_mut(self)
    }

    fn write_status(&mut self, status: StatusCode) {
        *self.status_mut() = status;
    }

    fn write_body(&mut self, body: &[u8]) -> std::io::Result<()> {
        self.body_mut().extend_from_slice(body);
        Ok(())
    }
}

/// Write `problem` as an `application/problem+json` response.
///
/// An unset or invalid status is replaced by
/// [`DEFAULT_STATUS`](crate::DEFAULT_STATUS) in both the status line and the
/// body. The problem is taken by value; the caller's copy is never modified.
///
/// # Errors
/// - [`ProblemError::Serialize`] if the problem cannot be encoded. The
///   destination is left untouched.
/// - [`ProblemError::Write`] if the destination rejects the body. Headers and
///   status have already been set at that point.
pub fn write_response<W>(problem: Problem, mut dst: W) -> Result<(), ProblemError>
where
    W: ResponseWriter,
{
    let problem = problem.resolved();
    let status = problem.status_code();

    let body = serde_json::to_vec(&problem).map_err(|e| {
        tracing::error!(error = %e, status = problem.status, "failed to serialize problem details");
        ProblemError::Serialize(e)
    })?;

    let headers = dst.headers_mut();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static(APPLICATION_PROBLEM_JSON),
    );
    headers.insert(
        CONTENT_LANGUAGE,
        HeaderValue::from_static(CONTENT_LANGUAGE_EN),
    );
    dst.write_status(status);

    tracing::debug!(
        status = problem.status,
        problem_type = %problem.type_url,
        "writing problem details response"
    );

    dst.write_body(&body).map_err(|e| {
        tracing::warn!(error = %e, status = problem.status, "failed to write problem details body");
        ProblemError::Write(e)
    })
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    /// Destination whose transport is gone.
    struct ClosedConnection {
        headers: HeaderMap,
        status: Option<StatusCode>,
    }

    impl ResponseWriter for ClosedConnection {
        fn headers_mut(&mut self) -> &mut HeaderMap {
            &mut self.headers
        }

        fn write_status(&mut self, status: StatusCode) {
            self.status = Some(status);
        }

        fn write_body(&mut self, _body: &[u8]) -> std::io::Result<()> {
            Err(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "connection closed by peer",
            ))
        }
    }

    #[test]
    fn buffered_response_receives_headers_status_and_body() {
        let mut resp = http::Response::new(Vec::new());
        write_response(
            Problem::new(StatusCode::CONFLICT, "Conflict", "already exists"),
            &mut resp,
        )
        .unwrap();

        assert_eq!(resp.status(), StatusCode::CONFLICT);
        assert_eq!(resp.headers()[CONTENT_TYPE], APPLICATION_PROBLEM_JSON);
        assert_eq!(resp.headers()[CONTENT_LANGUAGE], "en");
        assert_eq!(
            resp.body().as_slice(),
            br#"{"type":"about:blank","title":"Conflict","status":409,"detail":"already exists"}"#
        );
    }

    #[test]
    fn existing_content_type_is_replaced() {
        let mut resp = http::Response::new(Vec::new());
        resp.headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));

        write_response(Problem::default(), &mut resp).unwrap();

        let values: Vec<_> = resp.headers().get_all(CONTENT_TYPE).iter().collect();
        assert_eq!(values, vec![APPLICATION_PROBLEM_JSON]);
    }

    #[test]
    #[traced_test]
    fn body_write_failure_is_reported_after_headers_and_status() {
        let mut dst = ClosedConnection {
            headers: HeaderMap::new(),
            status: None,
        };

        let err = write_response(
            Problem::new(StatusCode::BAD_REQUEST, "Bad Request", "no body"),
            &mut dst,
        )
        .unwrap_err();

        assert!(matches!(err, ProblemError::Write(ref e) if e.kind() == std::io::ErrorKind::BrokenPipe));
        assert_eq!(dst.status, Some(StatusCode::BAD_REQUEST));
        assert_eq!(dst.headers[CONTENT_TYPE], APPLICATION_PROBLEM_JSON);
        assert!(logs_contain("failed to write problem details body"));
    }

    #[test]
    #[traced_test]
    fn rendered_problem_is_logged_at_debug() {
        let mut resp = http::Response::new(Vec::new());
        write_response(
            Problem::default().with_type("https://example.com/help#bad-body"),
            &mut resp,
        )
        .unwrap();

        assert!(logs_contain("writing problem details response"));
        assert!(logs_contain("https://example.com/help#bad-body"));
    }
}
