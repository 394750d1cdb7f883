//! Service Module
//!
//! Business logic layer for the orchestrator.
//! Services sit between the HTTP handlers and the store.

pub mod generation;
pub mod lease;
pub mod problem;
pub mod prompt;

pub use generation::{GenerationError, Generator};
pub use problem as problem_service;
