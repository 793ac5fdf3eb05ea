//! # Observability subsystem
//!
//! Structured JSON logging for manager lifecycle events.
//!
//! Principles:
//! 1. Observability is read-only
//! 2. No side effects on results
//! 3. No async or background threads
//! 4. Deterministic output

mod logger;

pub use logger::{Logger, Severity};
