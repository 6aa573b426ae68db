//! Course and assessment entity model.
//!
//! # Responsibility
//! - Define the records the engine hydrates, mutates and projects.
//! - Keep behavior limited to construction, lookup and field checks.
//!
//! # Invariants
//! - Within one course, assessment names are unique.
//! - Within one course, the sum of assessment weights is <= 100.
//! - Assessments are identified by `(course_code, name)`, never by a
//!   concatenated string.

pub mod assessment;
pub mod course;
