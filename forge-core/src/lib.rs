//! Forge Core
//!
//! Core types and abstractions for the Forge problem generation system.
//!
//! This crate contains:
//! - Domain types: Core business entities (Problem, GenerationJob, etc.)
//! - DTOs: Data transfer objects for communication with the orchestrator

pub mod domain;
pub mod dto;
