//! Service Ports
//!
//! Abstract interfaces for external services and classifiers.

mod analysis;
mod completion;
mod notification;
mod persona_classifier;
mod tool_executor;

pub use analysis::*;
pub use completion::*;
pub use notification::*;
pub use persona_classifier::*;
pub use tool_executor::*;
