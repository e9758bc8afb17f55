//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls and pure engine planning into use cases.
//! - Keep front ends decoupled from storage keys and ordering rules.

pub mod kanban_service;
