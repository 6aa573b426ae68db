//! Assessment mutation use-cases.
//!
//! # Responsibility
//! - Apply add/edit/delete to one course's assessment set.
//! - Gate add/edit through the validator and refresh derived marks.
//!
//! # Invariants
//! - Inputs are never mutated; every call returns a new `Course` value.
//! - A rejected mutation leaves the caller's course untouched: no partial
//!   field application.
//! - Edits replace the record in place, keeping display order.
//! - Deleting a missing name is a no-op, not an error.

use crate::model::assessment::{Assessment, AssessmentKey, AssessmentPatch};
use crate::model::course::Course;
use crate::service::projector::refresh_marks;
use crate::service::validator::{validate, ValidationReport};
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from assessment mutations.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationError {
    /// One or more validation rules failed.
    Invalid(ValidationReport),
    /// No assessment with the requested name exists in the course.
    NotFound(AssessmentKey),
}

impl Display for MutationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(report) => write!(f, "assessment rejected: {report}"),
            Self::NotFound(key) => write!(f, "assessment not found: {key}"),
        }
    }
}

impl Error for MutationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(report) => Some(report),
            Self::NotFound(_) => None,
        }
    }
}

impl From<ValidationReport> for MutationError {
    fn from(value: ValidationReport) -> Self {
        Self::Invalid(value)
    }
}

/// Appends `assessment` to `course` when it passes validation.
pub fn add_assessment(course: &Course, assessment: Assessment) -> Result<Course, MutationError> {
    let report = validate(course, &assessment, None);
    if !report.is_valid() {
        info!(
            "event=assessment_add module=service status=rejected course={} issues={}",
            course.code,
            report.issues().len()
        );
        return Err(report.into());
    }

    let mut next = course.clone();
    next.assessments.push(assessment);
    refresh_marks(&mut next);
    debug!(
        "event=assessment_add module=service status=ok course={} count={}",
        next.code,
        next.assessments.len()
    );
    Ok(next)
}

/// Applies `patch` to the assessment called `name`.
///
/// The patched record is validated with `name` excluded, so a rename must be
/// unique against every other assessment. The weight budget only applies when
/// the edit grows the weight, so mark, date and rename edits always pass it.
/// Only the fields set in `patch` change; the rest keep their prior values.
pub fn edit_assessment(
    course: &Course,
    name: &str,
    patch: &AssessmentPatch,
) -> Result<Course, MutationError> {
    let index = course
        .position(name)
        .ok_or_else(|| MutationError::NotFound(course.key_for(name)))?;

    let current = &course.assessments[index];
    let candidate = patch.apply_to(current);
    let mut report = validate(course, &candidate, Some(name));
    if candidate.weight <= current.weight {
        report = report.without_weight_budget();
    }
    if !report.is_valid() {
        info!(
            "event=assessment_edit module=service status=rejected course={} issues={}",
            course.code,
            report.issues().len()
        );
        return Err(report.into());
    }

    let mut next = course.clone();
    next.assessments[index] = candidate;
    refresh_marks(&mut next);
    debug!(
        "event=assessment_edit module=service status=ok course={} renamed={}",
        next.code,
        patch.name.is_some()
    );
    Ok(next)
}

/// Removes the assessment called `name`, if present.
pub fn delete_assessment(course: &Course, name: &str) -> Course {
    let mut next = course.clone();
    match next.position(name) {
        Some(index) => {
            next.assessments.remove(index);
            refresh_marks(&mut next);
            debug!(
                "event=assessment_delete module=service status=ok course={} count={}",
                next.code,
                next.assessments.len()
            );
        }
        None => debug!(
            "event=assessment_delete module=service status=noop course={}",
            next.code
        ),
    }
    next
}
