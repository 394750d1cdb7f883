//! Data Transfer Objects
//!
//! This module contains DTOs exchanged between the orchestrator API and its
//! clients. DTOs are lightweight request/response shapes built around the
//! domain entities.

pub mod model;
pub mod problem;
