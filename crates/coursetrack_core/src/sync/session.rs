//! Per-session working set with optimistic reconciliation.
//!
//! # Responsibility
//! - Hydrate the course set from the application-start document.
//! - Apply assessment mutations locally and track them as pending tickets.
//! - Promote server-accepted copies or roll back to the last confirmed copy.
//!
//! # Invariants
//! - Every course keeps a confirmed snapshot and a working copy; with no
//!   pending tickets the two are equal.
//! - A rejected ticket restores the confirmed snapshot and discards every
//!   other pending ticket of that course.
//! - Course codes are unique within a session and never change.

use crate::model::assessment::{Assessment, AssessmentPatch};
use crate::model::course::{ApplicationStart, Course};
use crate::service::assessment_service::{
    add_assessment, delete_assessment, edit_assessment, MutationError,
};
use crate::service::projector::{refresh_marks, summarize, GradeSummary};
use crate::service::scheduler::{
    deadline_preview, upcoming_deadlines, DeadlinePreview, UpcomingDeadline,
};
use crate::service::validator::{validate_course, ValidationReport};
use crate::sync::data_service::DataServiceError;
use chrono::{DateTime, Utc};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Handle for one optimistic mutation awaiting server confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MutationTicket {
    pub id: Uuid,
    pub course_code: String,
}

impl MutationTicket {
    fn issue(course_code: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            course_code: course_code.to_string(),
        }
    }
}

/// Errors from session-level operations.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    CourseNotFound(String),
    DuplicateCourse(String),
    /// Course data violates model invariants.
    InvalidCourse {
        course_code: String,
        report: ValidationReport,
    },
    /// A server copy carries a different code than the tracked course.
    CourseCodeMismatch { expected: String, found: String },
    /// Local mutation rejected by validation or lookup.
    Mutation(MutationError),
    /// The system of record refused a mutation; the course was rolled back.
    ServerRejected { course_code: String, reason: String },
    /// Ticket was already settled or never issued.
    UnknownTicket(Uuid),
    /// Transport-level failure; pending mutations are kept.
    DataService(DataServiceError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CourseNotFound(code) => write!(f, "course not found: {code}"),
            Self::DuplicateCourse(code) => write!(f, "course already exists: {code}"),
            Self::InvalidCourse {
                course_code,
                report,
            } => write!(f, "course {course_code} is invalid: {report}"),
            Self::CourseCodeMismatch { expected, found } => {
                write!(f, "server returned course {found} for {expected}")
            }
            Self::Mutation(err) => write!(f, "{err}"),
            Self::ServerRejected {
                course_code,
                reason,
            } => write!(f, "server rejected change to {course_code}: {reason}"),
            Self::UnknownTicket(id) => write!(f, "unknown mutation ticket: {id}"),
            Self::DataService(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidCourse { report, .. } => Some(report),
            Self::Mutation(err) => Some(err),
            Self::DataService(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MutationError> for SessionError {
    fn from(value: MutationError) -> Self {
        Self::Mutation(value)
    }
}

impl From<DataServiceError> for SessionError {
    fn from(value: DataServiceError) -> Self {
        Self::DataService(value)
    }
}

#[derive(Debug, Clone)]
struct CourseEntry {
    working: Course,
    confirmed: Course,
    pending: Vec<MutationTicket>,
}

impl CourseEntry {
    fn confirmed(course: Course) -> Self {
        Self {
            working: course.clone(),
            confirmed: course,
            pending: Vec::new(),
        }
    }
}

/// Working set of courses held by one collaborator session.
#[derive(Debug, Clone, Default)]
pub struct CourseSession {
    entries: Vec<CourseEntry>,
    notification: String,
}

impl CourseSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a session from the application-start document.
    ///
    /// Every course is validated and its derived marks are recomputed; the
    /// first invalid or duplicate course aborts hydration.
    pub fn hydrate(start: ApplicationStart) -> Result<Self, SessionError> {
        let mut session = Self {
            entries: Vec::with_capacity(start.courses.len()),
            notification: start.notification,
        };
        for course in start.courses {
            session.add_course(course)?;
        }
        info!(
            "event=session_hydrate module=sync status=ok courses={}",
            session.entries.len()
        );
        Ok(session)
    }

    /// Startup notification text supplied by the data service.
    pub fn notification(&self) -> &str {
        self.notification.as_str()
    }

    /// Tracks a course already accepted by the system of record.
    pub fn add_course(&mut self, mut course: Course) -> Result<(), SessionError> {
        if self.entry(&course.code).is_some() {
            return Err(SessionError::DuplicateCourse(course.code));
        }
        let report = validate_course(&course);
        if !report.is_valid() {
            warn!(
                "event=course_add module=sync status=rejected course={} issues={}",
                course.code,
                report.issues().len()
            );
            return Err(SessionError::InvalidCourse {
                course_code: course.code,
                report,
            });
        }
        refresh_marks(&mut course);
        self.entries.push(CourseEntry::confirmed(course));
        Ok(())
    }

    /// Stops tracking a course; returns its working copy.
    pub fn remove_course(&mut self, code: &str) -> Result<Course, SessionError> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.working.code == code)
            .ok_or_else(|| SessionError::CourseNotFound(code.to_string()))?;
        Ok(self.entries.remove(index).working)
    }

    /// Working copies in hydration order.
    pub fn courses(&self) -> impl Iterator<Item = &Course> + '_ {
        self.entries.iter().map(|entry| &entry.working)
    }

    pub fn course(&self, code: &str) -> Option<&Course> {
        self.entry(code).map(|entry| &entry.working)
    }

    /// Last server-confirmed copy of a course.
    pub fn confirmed_course(&self, code: &str) -> Option<&Course> {
        self.entry(code).map(|entry| &entry.confirmed)
    }

    pub fn pending_tickets(&self, code: &str) -> &[MutationTicket] {
        self.entry(code)
            .map(|entry| entry.pending.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_pending(&self, code: &str) -> bool {
        !self.pending_tickets(code).is_empty()
    }

    pub fn add_assessment(
        &mut self,
        code: &str,
        assessment: Assessment,
    ) -> Result<MutationTicket, SessionError> {
        self.apply(code, |course| add_assessment(course, assessment))
    }

    pub fn edit_assessment(
        &mut self,
        code: &str,
        name: &str,
        patch: &AssessmentPatch,
    ) -> Result<MutationTicket, SessionError> {
        self.apply(code, |course| edit_assessment(course, name, patch))
    }

    /// Deletes an assessment; a missing name still yields a ticket.
    pub fn delete_assessment(
        &mut self,
        code: &str,
        name: &str,
    ) -> Result<MutationTicket, SessionError> {
        self.apply(code, |course| Ok(delete_assessment(course, name)))
    }

    /// Promotes the server-accepted copy for `ticket`.
    ///
    /// A copy that breaks course invariants is refused with
    /// `SessionError::InvalidCourse` and every ticket stays pending.
    ///
    /// Settles `ticket` and every ticket issued before it. When no later
    /// ticket is pending, the working copy becomes `accepted`; otherwise the
    /// newer local edits stay visible until they settle.
    pub fn confirm(
        &mut self,
        ticket: &MutationTicket,
        mut accepted: Course,
    ) -> Result<(), SessionError> {
        if accepted.code != ticket.course_code {
            return Err(SessionError::CourseCodeMismatch {
                expected: ticket.course_code.clone(),
                found: accepted.code,
            });
        }
        let entry = self.entry_mut(&ticket.course_code)?;
        let index = ticket_index(entry, ticket)?;
        let report = validate_course(&accepted);
        if !report.is_valid() {
            warn!(
                "event=mutation_confirm module=sync status=rejected course={} issues={}",
                ticket.course_code,
                report.issues().len()
            );
            return Err(SessionError::InvalidCourse {
                course_code: accepted.code,
                report,
            });
        }
        entry.pending.drain(..=index);

        refresh_marks(&mut accepted);
        if entry.pending.is_empty() {
            entry.working = accepted.clone();
        }
        entry.confirmed = accepted;
        info!(
            "event=mutation_confirm module=sync status=ok course={} pending={}",
            ticket.course_code,
            entry.pending.len()
        );
        Ok(())
    }

    /// Rolls the course of `ticket` back to its last confirmed copy.
    ///
    /// Returns the restored course.
    pub fn reject(
        &mut self,
        ticket: &MutationTicket,
        reason: &str,
    ) -> Result<&Course, SessionError> {
        let entry = self.entry_mut(&ticket.course_code)?;
        ticket_index(entry, ticket)?;

        let discarded = entry.pending.len();
        entry.pending.clear();
        entry.working = entry.confirmed.clone();
        warn!(
            "event=mutation_reject module=sync status=rolled_back course={} discarded={} reason_len={}",
            ticket.course_code,
            discarded,
            reason.len()
        );
        Ok(&entry.working)
    }

    /// Aggregate completion over the working copies.
    pub fn grade_summary(&self) -> GradeSummary {
        summarize(self.courses())
    }

    pub fn deadline_preview(&self, now: DateTime<Utc>) -> DeadlinePreview {
        deadline_preview(self.courses(), now)
    }

    pub fn upcoming_deadlines(&self, now: DateTime<Utc>) -> Vec<UpcomingDeadline> {
        upcoming_deadlines(self.courses(), now)
    }

    fn apply<F>(&mut self, code: &str, mutation: F) -> Result<MutationTicket, SessionError>
    where
        F: FnOnce(&Course) -> Result<Course, MutationError>,
    {
        let entry = self.entry_mut(code)?;
        entry.working = mutation(&entry.working)?;
        let ticket = MutationTicket::issue(code);
        entry.pending.push(ticket.clone());
        Ok(ticket)
    }

    fn entry(&self, code: &str) -> Option<&CourseEntry> {
        self.entries.iter().find(|entry| entry.working.code == code)
    }

    fn entry_mut(&mut self, code: &str) -> Result<&mut CourseEntry, SessionError> {
        self.entries
            .iter_mut()
            .find(|entry| entry.working.code == code)
            .ok_or_else(|| SessionError::CourseNotFound(code.to_string()))
    }
}

fn ticket_index(entry: &CourseEntry, ticket: &MutationTicket) -> Result<usize, SessionError> {
    entry
        .pending
        .iter()
        .position(|pending| pending.id == ticket.id)
        .ok_or(SessionError::UnknownTicket(ticket.id))
}

#[cfg(test)]
mod tests {
    use super::{CourseSession, SessionError};
    use crate::model::assessment::Assessment;
    use crate::model::course::{ApplicationStart, Course};

    #[test]
    fn hydrate_recomputes_derived_marks() {
        let mut course = Course::new("CS101");
        course.current_mark = 99.0;
        course
            .assessments
            .push(Assessment::new("A1", 25.0).with_mark(70.0));

        let session = CourseSession::hydrate(ApplicationStart {
            courses: vec![course],
            notification: "email".to_string(),
        })
        .unwrap();

        assert_eq!(session.course("CS101").unwrap().current_mark, 25.0);
        assert_eq!(session.notification(), "email");
    }

    #[test]
    fn hydrate_rejects_duplicate_course_codes() {
        let err = CourseSession::hydrate(ApplicationStart {
            courses: vec![Course::new("CS101"), Course::new("CS101")],
            notification: String::new(),
        })
        .unwrap_err();
        assert_eq!(err, SessionError::DuplicateCourse("CS101".to_string()));
    }

    #[test]
    fn remove_course_drops_it_from_projections() {
        let mut session = CourseSession::new();
        session.add_course(Course::new("CS101")).unwrap();
        session.remove_course("CS101").unwrap();

        assert!(session.course("CS101").is_none());
        assert!(session.grade_summary().is_no_data());
        assert!(matches!(
            session.remove_course("CS101"),
            Err(SessionError::CourseNotFound(_))
        ));
    }
}
