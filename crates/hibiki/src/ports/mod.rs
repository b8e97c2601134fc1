//! Ports (Interfaces)
//!
//! Abstract interfaces that define how the reply orchestrator
//! interacts with external systems (stores, completion backends,
//! realtime transport, classifiers).
//!
//! Implementations of these traits live in the infrastructure layer
//! or in `domain::services` for the built-in heuristics.

pub mod repositories;
pub mod services;

// Re-exports
pub use repositories::*;
pub use services::*;
