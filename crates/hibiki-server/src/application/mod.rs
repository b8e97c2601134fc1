//! Application Layer (Use Cases)
//!
//! Orchestrates domain operations and coordinates between
//! the message store, completion clients and the realtime publisher.

pub mod dispatcher;
pub mod reply;

#[cfg(test)]
pub(crate) mod testing;

pub use dispatcher::ReplyDispatcher;
pub use reply::{ReplyError, ReplyOrchestrator};
