//! Static problem definitions for application error tables

use crate::problem::Problem;

/// Static problem definition from an application catalog.
///
/// ```
/// use problem_details::ErrDef;
///
/// const BAD_BODY: ErrDef = ErrDef::new(
///     400,
///     "Problem parsing request body",
///     "https://example.com/help#bad-body",
/// );
///
/// let problem = BAD_BODY.as_problem("No content was received");
/// assert_eq!(problem.status, 400);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrDef {
    pub status: u16,
    pub title: &'static str,
    pub type_url: &'static str,
}

impl ErrDef {
    #[must_use]
    pub const fn new(status: u16, title: &'static str, type_url: &'static str) -> Self {
        Self {
            status,
            title,
            type_url,
        }
    }

    /// Convert this definition into a Problem with the given detail
    #[inline]
    pub fn as_problem(&self, detail: impl Into<String>) -> Problem {
        // Invalid catalog codes fall back to 500
        Problem {
            type_url: self.type_url.to_owned(),
            title: self.title.to_owned(),
            status: self.status,
            detail: detail.into(),
        }
        .resolved()
    }
}
