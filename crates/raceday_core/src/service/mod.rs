//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validators and repository calls into use-case level APIs.
//! - Own the race lifecycle: the single `Draft` -> `Completed` transition.
//!
//! # Invariants
//! - Validation failures are returned values, never panics.
//! - Nothing is persisted when a validator reports violations.

pub mod race_service;
pub mod student_service;
