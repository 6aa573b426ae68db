//! Assessment and grade aggregation engine for course tracking.
//! This crate is the single source of truth for course/assessment invariants.

pub mod logging;
pub mod model;
pub mod service;
pub mod sync;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::assessment::{
    start_of_day_utc, Assessment, AssessmentKey, AssessmentPatch, AssessmentValidationError, Mark,
    UNGRADED_SENTINEL,
};
pub use model::course::{ApplicationStart, Course, WEIGHT_BUDGET, WEIGHT_EPSILON};
pub use service::assessment_service::{
    add_assessment, delete_assessment, edit_assessment, MutationError,
};
pub use service::projector::{
    course_marks, refresh_marks, resolved_weight, round2, summarize, CourseMarks, GradeSummary,
};
pub use service::scheduler::{
    deadline_preview, due_reminders, upcoming_deadlines, DeadlinePreview, DueReminder,
    UpcomingDeadline, DEADLINE_PREVIEW_LIMIT,
};
pub use service::validator::{validate, validate_course, ValidationIssue, ValidationReport};
pub use sync::data_service::{sync_course, CourseDataService, DataServiceError};
pub use sync::session::{CourseSession, MutationTicket, SessionError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
