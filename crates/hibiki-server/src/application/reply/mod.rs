//! Persona reply use case
//!
//! - `orchestrator`: state machine driving one reply
//! - `selector`: which persona answers
//! - `context`: sentiment, tools and the resulting prompt plan
//! - `history`: labelled recent history
//! - `generator`: the completion call
//! - `presence`: read receipts, typing bracket, delivery

mod context;
mod error;
mod generator;
mod history;
mod orchestrator;
mod presence;
mod selector;

pub use error::ReplyError;
pub use orchestrator::ReplyOrchestrator;
