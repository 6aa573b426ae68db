//! Session state and reconciliation with the external data service.
//!
//! Mutations are optimistic: they apply locally at once and stay provisional
//! until the system of record confirms them.

pub mod data_service;
pub mod session;
