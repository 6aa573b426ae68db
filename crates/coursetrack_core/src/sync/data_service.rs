//! External system-of-record contract.
//!
//! # Responsibility
//! - Define the seam through which working copies are submitted for
//!   acceptance by the external data service.
//! - Drive one submit-and-reconcile round trip for a course.
//!
//! # Invariants
//! - The engine never performs I/O itself; implementations own transport.
//! - `Rejected` rolls the course back; `Unavailable` keeps it pending so the
//!   caller may retry.

use crate::model::course::Course;
use crate::sync::session::{CourseSession, SessionError};
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure reported by a data service implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataServiceError {
    /// The server refused the submitted state (stale version, server-side
    /// validation mismatch...).
    Rejected(String),
    /// The server could not be reached or answered unusably.
    Unavailable(String),
}

impl Display for DataServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected(reason) => write!(f, "data service rejected request: {reason}"),
            Self::Unavailable(reason) => write!(f, "data service unavailable: {reason}"),
        }
    }
}

impl Error for DataServiceError {}

/// Persistence collaborator that accepts or rejects a course document.
pub trait CourseDataService {
    /// Submits the full course and returns the copy the server accepted.
    fn save_course(&self, course: &Course) -> Result<Course, DataServiceError>;
}

/// Submits the working copy of `code` and reconciles the session.
///
/// On acceptance every ticket pending at submit time is confirmed. On
/// rejection the course is rolled back and `SessionError::ServerRejected` is
/// returned. Courses with nothing pending are not submitted.
pub fn sync_course<S>(
    session: &mut CourseSession,
    service: &S,
    code: &str,
) -> Result<(), SessionError>
where
    S: CourseDataService + ?Sized,
{
    let Some(latest) = session.pending_tickets(code).last().cloned() else {
        if session.course(code).is_none() {
            return Err(SessionError::CourseNotFound(code.to_string()));
        }
        debug!("event=course_sync module=sync status=skipped course={code}");
        return Ok(());
    };
    let working = session
        .course(code)
        .cloned()
        .ok_or_else(|| SessionError::CourseNotFound(code.to_string()))?;

    match service.save_course(&working) {
        Ok(accepted) => session.confirm(&latest, accepted),
        Err(DataServiceError::Rejected(reason)) => {
            session.reject(&latest, &reason)?;
            Err(SessionError::ServerRejected {
                course_code: code.to_string(),
                reason,
            })
        }
        Err(err) => {
            warn!("event=course_sync module=sync status=error course={code} error={err}");
            Err(err.into())
        }
    }
}
