//! Engine use-cases over the course model.
//!
//! # Responsibility
//! - Validate and apply assessment mutations.
//! - Derive grade projections and deadline schedules for presentation.
//!
//! # Invariants
//! - Every function here is synchronous and free of I/O other than logging.

pub mod assessment_service;
pub mod projector;
pub mod scheduler;
pub mod validator;
