//! Core domain types
//!
//! This module contains the core domain structures used across Forge services.
//! These types are shared between the orchestrator (which persists and advances
//! them) and the client/CLI (which display them).

pub mod focus_area;
pub mod job;
pub mod model;
pub mod problem;
