//! Repository Ports
//!
//! Abstract interfaces for data persistence operations.

mod message_store;
mod tenant_repository;

pub use message_store::*;
pub use tenant_repository::*;
