//! Infrastructure Adapters
//!
//! Implementations of domain ports for external systems.

pub mod completion;
pub mod history_classifier;
pub mod notification;
pub mod postgres;

// Re-exports
pub use completion::HttpCompletionFactory;
pub use history_classifier::LlmHistoryClassifier;
pub use notification::{HttpNotificationPublisher, TracingPublisher};
pub use postgres::PgMessageStore;
