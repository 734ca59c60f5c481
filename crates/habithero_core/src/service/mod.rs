//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs: the composite
//!   toggle flow, day summaries and history reconstruction.
//! - Keep callers decoupled from SQL details.

pub mod clock;
pub mod history_service;
pub mod mission_service;
