//! PostgreSQL Repository Implementations

mod message_store;

pub use message_store::PgMessageStore;
