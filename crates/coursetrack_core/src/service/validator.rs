//! Course-scoped assessment validation.
//!
//! # Responsibility
//! - Gate every proposed add/edit against the owning course's invariants.
//! - Report every failed rule at once so callers can flag several fields.
//!
//! # Invariants
//! - Validation is pure and deterministic; inputs are never mutated.
//! - The record named by `excluding` is ignored for both the duplicate and the
//!   weight check, so an edit never collides with its own prior version.
//! - Marks never participate in the weight budget.

use crate::model::assessment::{Assessment, AssessmentValidationError};
use crate::model::course::{Course, WEIGHT_BUDGET, WEIGHT_EPSILON};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One failed validation rule.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationIssue {
    /// A field of the proposed assessment is malformed.
    InvalidField(AssessmentValidationError),
    /// Another assessment in the course already uses this name.
    DuplicateName { name: String },
    /// Accepting the proposal would push the course past its weight budget.
    WeightBudgetExceeded { committed: f64, proposed: f64 },
    /// Course code is blank.
    BlankCourseCode,
}

impl ValidationIssue {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidField(err) => err.field(),
            Self::DuplicateName { .. } => "name",
            Self::WeightBudgetExceeded { .. } => "weight",
            Self::BlankCourseCode => "code",
        }
    }
}

impl Display for ValidationIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidField(err) => write!(f, "{err}"),
            Self::DuplicateName { name } => {
                write!(f, "an assessment named `{name}` already exists in this course")
            }
            Self::WeightBudgetExceeded {
                committed,
                proposed,
            } => write!(
                f,
                "total weight {} exceeds {WEIGHT_BUDGET} ({committed} committed + {proposed} proposed)",
                committed + proposed
            ),
            Self::BlankCourseCode => write!(f, "course code must not be blank"),
        }
    }
}

/// Composite outcome of one validation run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationReport {
    issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn has_duplicate_name(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| matches!(issue, ValidationIssue::DuplicateName { .. }))
    }

    pub fn exceeds_weight_budget(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| matches!(issue, ValidationIssue::WeightBudgetExceeded { .. }))
    }

    /// Distinct offending field names, in first-seen order.
    pub fn fields(&self) -> Vec<&'static str> {
        let mut seen = Vec::new();
        for issue in &self.issues {
            let field = issue.field();
            if !seen.contains(&field) {
                seen.push(field);
            }
        }
        seen
    }

    /// Converts into `Err(self)` when any rule failed.
    pub fn into_result(self) -> Result<(), ValidationReport> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Drops the budget issue, for edits that do not grow the course total.
    pub(crate) fn without_weight_budget(mut self) -> Self {
        self.issues
            .retain(|issue| !matches!(issue, ValidationIssue::WeightBudgetExceeded { .. }));
        self
    }

    fn push(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }
}

impl Display for ValidationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.issues.is_empty() {
            return write!(f, "valid");
        }
        for (index, issue) in self.issues.iter().enumerate() {
            if index > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl Error for ValidationReport {}

/// Validates `proposed` against the other assessments of `course`.
///
/// `excluding` names the record being replaced by an edit; pass `None` for
/// additions.
pub fn validate(
    course: &Course,
    proposed: &Assessment,
    excluding: Option<&str>,
) -> ValidationReport {
    let mut report = ValidationReport::default();
    for err in proposed.field_errors() {
        report.push(ValidationIssue::InvalidField(err));
    }

    if others(course, excluding).any(|item| item.name == proposed.name) {
        report.push(ValidationIssue::DuplicateName {
            name: proposed.name.clone(),
        });
    }

    let committed: f64 = others(course, excluding).map(|item| item.weight).sum();
    if exceeds_budget(committed + proposed.weight) {
        report.push(ValidationIssue::WeightBudgetExceeded {
            committed,
            proposed: proposed.weight,
        });
    }

    report
}

/// Validates a whole course, as received from hydration or a server copy.
///
/// Each assessment is checked against the ones listed before it, so a
/// duplicate or the first over-budget entry is reported once.
pub fn validate_course(course: &Course) -> ValidationReport {
    let mut report = ValidationReport::default();
    if course.code.trim().is_empty() {
        report.push(ValidationIssue::BlankCourseCode);
    }

    let mut names = HashSet::new();
    let mut committed = 0.0;
    let mut over_budget = false;
    for item in &course.assessments {
        for err in item.field_errors() {
            report.push(ValidationIssue::InvalidField(err));
        }
        if !names.insert(item.name.as_str()) {
            report.push(ValidationIssue::DuplicateName {
                name: item.name.clone(),
            });
        }
        if !over_budget && exceeds_budget(committed + item.weight) {
            over_budget = true;
            report.push(ValidationIssue::WeightBudgetExceeded {
                committed,
                proposed: item.weight,
            });
        }
        committed += item.weight;
    }

    report
}

fn others<'a>(
    course: &'a Course,
    excluding: Option<&'a str>,
) -> impl Iterator<Item = &'a Assessment> + 'a {
    course
        .assessments
        .iter()
        .filter(move |item| Some(item.name.as_str()) != excluding)
}

fn exceeds_budget(total: f64) -> bool {
    total > WEIGHT_BUDGET + WEIGHT_EPSILON
}
