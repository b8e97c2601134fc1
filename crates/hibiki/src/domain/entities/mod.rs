//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - Persona: Configured automated chat participant
//! - Message / Room: Projections of the chat store
//! - Conversation: Labelled history rebuilt per reply
//! - Sentiment / Tool / Role: Transient context assembly results
//! - Reply: Orchestration request and outcome
//! - Event: Realtime notification payloads

mod conversation;
mod event;
mod message;
mod persona;
mod reply;
mod role;
mod sentiment;
mod settings;
mod tool;

pub use conversation::*;
pub use event::*;
pub use message::*;
pub use persona::*;
pub use reply::*;
pub use role::*;
pub use sentiment::*;
pub use settings::*;
pub use tool::*;
