//! Course domain model.
//!
//! # Responsibility
//! - Define the enrollment unit that owns an ordered set of assessments.
//! - Define the application-start hydration envelope.
//!
//! # Invariants
//! - `code` is stable for the course lifetime; renaming is delete+recreate.
//! - Assessment order is preserved for display and never used in computation.
//! - `current_mark`/`expected_mark` are derived and recomputed after every
//!   mutation; callers never author them.

use crate::model::assessment::{Assessment, AssessmentKey};
use serde::{Deserialize, Serialize};

/// Maximum sum of assessment weights within one course.
pub const WEIGHT_BUDGET: f64 = 100.0;

/// Tolerance applied to weight-sum comparisons to absorb float accumulation.
pub const WEIGHT_EPSILON: f64 = 1e-9;

/// One enrolled course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub code: String,
    #[serde(default)]
    pub assessments: Vec<Assessment>,
    /// Derived: resolved (graded) weight percentage.
    #[serde(default)]
    pub current_mark: f64,
    /// Derived: equals `current_mark` until a target model exists.
    #[serde(default)]
    pub expected_mark: f64,
}

impl Course {
    /// Creates an empty course.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            assessments: Vec::new(),
            current_mark: 0.0,
            expected_mark: 0.0,
        }
    }

    /// Finds one assessment by exact (case-sensitive) name.
    pub fn find(&self, name: &str) -> Option<&Assessment> {
        self.assessments.iter().find(|item| item.name == name)
    }

    pub(crate) fn position(&self, name: &str) -> Option<usize> {
        self.assessments.iter().position(|item| item.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Composite key for an assessment of this course.
    pub fn key_for(&self, name: &str) -> AssessmentKey {
        AssessmentKey::new(self.code.as_str(), name)
    }

    /// Sum of every assessment weight.
    pub fn total_weight(&self) -> f64 {
        self.assessments.iter().map(|item| item.weight).sum()
    }

    /// Weight still available under the course budget, never negative.
    pub fn remaining_weight(&self) -> f64 {
        (WEIGHT_BUDGET - self.total_weight()).max(0.0)
    }
}

/// Startup document supplied by the external data service.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationStart {
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub notification: String,
}
