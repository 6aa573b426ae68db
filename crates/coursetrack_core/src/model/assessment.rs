//! Assessment domain model.
//!
//! # Responsibility
//! - Define the graded item record owned by a course.
//! - Model the ungraded mark sentinel and the composite identity key.
//! - Describe field-level edits as an explicit patch.
//!
//! # Invariants
//! - `name` is non-blank and unique within its owning course.
//! - `weight` is finite and strictly positive.
//! - `mark` is either `Mark::Ungraded` or a finite number.
//! - Weight and mark are independent axes: marks never enter weight checks.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Wire value that marks an assessment as not graded yet.
pub const UNGRADED_SENTINEL: f64 = -1.0;

/// Grade percentage for one assessment.
///
/// Serialized as a plain number; `Ungraded` is written as `-1` and read back
/// from either `-1` or `null`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "f64")]
pub enum Mark {
    /// No mark recorded yet.
    #[default]
    Ungraded,
    /// Recorded percentage. Not clamped to `[0, 100]`.
    Graded(f64),
}

impl Mark {
    /// Returns whether a mark has been recorded.
    pub fn is_graded(self) -> bool {
        matches!(self, Self::Graded(_))
    }

    /// Returns the recorded value, if any.
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Ungraded => None,
            Self::Graded(value) => Some(value),
        }
    }
}

impl From<Option<f64>> for Mark {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(raw) if raw != UNGRADED_SENTINEL => Self::Graded(raw),
            _ => Self::Ungraded,
        }
    }
}

impl From<Mark> for f64 {
    fn from(value: Mark) -> Self {
        value.value().unwrap_or(UNGRADED_SENTINEL)
    }
}

/// Composite identity of one assessment across all courses.
///
/// Ordered by course code first, then assessment name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentKey {
    pub course_code: String,
    pub name: String,
}

impl AssessmentKey {
    pub fn new(course_code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            course_code: course_code.into(),
            name: name.into(),
        }
    }
}

impl Display for AssessmentKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "`{}` in course {}", self.name, self.course_code)
    }
}

/// One graded item of a course (assignment, exam, quiz...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    /// Unique (case-sensitive) within the owning course.
    pub name: String,
    /// Percentage contribution to the course grade.
    pub weight: f64,
    #[serde(default)]
    pub mark: Mark,
    /// Submission due date.
    #[serde(default, deserialize_with = "deserialize_optional_instant")]
    pub deadline: Option<DateTime<Utc>>,
    /// Notification trigger date, independent of `deadline`.
    #[serde(default, deserialize_with = "deserialize_optional_instant")]
    pub reminder: Option<DateTime<Utc>>,
}

impl Assessment {
    /// Creates an ungraded assessment with no dates set.
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight,
            mark: Mark::Ungraded,
            deadline: None,
            reminder: None,
        }
    }

    pub fn with_mark(mut self, mark: f64) -> Self {
        self.mark = Mark::Graded(mark);
        self
    }

    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_reminder(mut self, reminder: DateTime<Utc>) -> Self {
        self.reminder = Some(reminder);
        self
    }

    /// Returns the composite key of this assessment inside `course_code`.
    pub fn key(&self, course_code: &str) -> AssessmentKey {
        AssessmentKey::new(course_code, self.name.as_str())
    }

    /// Collects every field-level violation of this record.
    ///
    /// Course-scoped rules (uniqueness, weight budget) live in the validator.
    pub fn field_errors(&self) -> Vec<AssessmentValidationError> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(AssessmentValidationError::BlankName);
        }
        if !self.weight.is_finite() {
            errors.push(AssessmentValidationError::NonFiniteWeight);
        } else if self.weight <= 0.0 {
            errors.push(AssessmentValidationError::NonPositiveWeight(self.weight));
        }
        if let Mark::Graded(value) = self.mark {
            if !value.is_finite() {
                errors.push(AssessmentValidationError::NonFiniteMark);
            }
        }
        errors
    }

    /// Validates field-level invariants, returning the first violation.
    pub fn validate(&self) -> Result<(), AssessmentValidationError> {
        match self.field_errors().into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Field-level assessment invariant violations.
#[derive(Debug, Clone, PartialEq)]
pub enum AssessmentValidationError {
    BlankName,
    NonFiniteWeight,
    NonPositiveWeight(f64),
    NonFiniteMark,
}

impl AssessmentValidationError {
    /// Name of the offending field, for targeted form feedback.
    pub fn field(&self) -> &'static str {
        match self {
            Self::BlankName => "name",
            Self::NonFiniteWeight | Self::NonPositiveWeight(_) => "weight",
            Self::NonFiniteMark => "mark",
        }
    }
}

impl Display for AssessmentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "assessment name must not be blank"),
            Self::NonFiniteWeight => write!(f, "assessment weight must be a finite number"),
            Self::NonPositiveWeight(weight) => {
                write!(f, "assessment weight must be > 0, got {weight}")
            }
            Self::NonFiniteMark => write!(f, "assessment mark must be a finite number"),
        }
    }
}

impl Error for AssessmentValidationError {}

/// Field-level replacement for one assessment.
///
/// `None` keeps the prior value. For the optional dates, `Some(None)` clears
/// the field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssessmentPatch {
    pub name: Option<String>,
    pub weight: Option<f64>,
    pub mark: Option<Mark>,
    pub deadline: Option<Option<DateTime<Utc>>>,
    pub reminder: Option<Option<DateTime<Utc>>>,
}

impl AssessmentPatch {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn weight(weight: f64) -> Self {
        Self {
            weight: Some(weight),
            ..Self::default()
        }
    }

    pub fn mark(mark: Mark) -> Self {
        Self {
            mark: Some(mark),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Returns a copy of `base` with every specified field overwritten.
    pub fn apply_to(&self, base: &Assessment) -> Assessment {
        let mut next = base.clone();
        if let Some(name) = &self.name {
            next.name = name.clone();
        }
        if let Some(weight) = self.weight {
            next.weight = weight;
        }
        if let Some(mark) = self.mark {
            next.mark = mark;
        }
        if let Some(deadline) = self.deadline {
            next.deadline = deadline;
        }
        if let Some(reminder) = self.reminder {
            next.reminder = reminder;
        }
        next
    }
}

/// Maps a calendar date to the UTC instant that starts it.
pub fn start_of_day_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Accepts RFC 3339 instants, bare `YYYY-MM-DD` dates, `null`, or `""`.
fn deserialize_optional_instant<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(Some(instant.with_timezone(&Utc)));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(|date| Some(start_of_day_utc(date)))
        .map_err(|_| serde::de::Error::custom(format!("invalid date `{trimmed}`")))
}
