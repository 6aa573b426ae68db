//! Grade completion projection.
//!
//! # Responsibility
//! - Compute resolved (graded) weight per course.
//! - Aggregate completion across enrolled courses for dashboard display.
//!
//! # Invariants
//! - Pure functions; safe to recompute on every render.
//! - Any `Mark::Graded` counts as resolved, whatever its range.
//! - An empty course set yields `GradeSummary::NO_DATA`, never a 0% summary.

use crate::model::course::{Course, WEIGHT_BUDGET};
use serde::Serialize;

/// Derived per-course percentages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseMarks {
    pub current: f64,
    pub expected: f64,
}

/// Aggregate completion across all enrolled courses, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GradeSummary {
    pub completed: f64,
    pub left: f64,
}

impl GradeSummary {
    /// Aggregate for an empty course set.
    ///
    /// A real course set always has `completed + left` near 100, so this value
    /// cannot be confused with true 0% completion.
    pub const NO_DATA: GradeSummary = GradeSummary {
        completed: 0.0,
        left: 0.0,
    };

    pub fn is_no_data(&self) -> bool {
        *self == Self::NO_DATA
    }
}

/// Sum of weights whose assessment has a recorded mark.
pub fn resolved_weight(course: &Course) -> f64 {
    course
        .assessments
        .iter()
        .filter(|item| item.mark.is_graded())
        .map(|item| item.weight)
        .sum()
}

pub fn course_marks(course: &Course) -> CourseMarks {
    let resolved = resolved_weight(course);
    CourseMarks {
        current: resolved,
        expected: resolved,
    }
}

/// Recomputes the derived mark fields of `course`.
pub fn refresh_marks(course: &mut Course) {
    let marks = course_marks(course);
    course.current_mark = marks.current;
    course.expected_mark = marks.expected;
}

/// Averages resolved weight over the given courses.
pub fn summarize<'a, I>(courses: I) -> GradeSummary
where
    I: IntoIterator<Item = &'a Course>,
{
    let (count, resolved) = courses
        .into_iter()
        .fold((0usize, 0.0), |(count, total), course| {
            (count + 1, total + resolved_weight(course))
        });
    if count == 0 {
        return GradeSummary::NO_DATA;
    }

    let count = count as f64;
    GradeSummary {
        completed: round2(resolved / count),
        left: round2((WEIGHT_BUDGET * count - resolved) / count),
    }
}

/// Rounds half-up to two decimal places.
///
/// Decimal halves such as `1.005` sit just below the half in binary, so the
/// scaled value gets a relative nudge of a few ulps before flooring.
pub fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    (scaled + scaled.abs() * 4.0 * f64::EPSILON + 0.5).floor() / 100.0
}
