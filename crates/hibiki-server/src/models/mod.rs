//! Hibiki API Models
//!
//! - Reply: reply jobs and inline runs
//! - Persona: read-only persona catalog

mod persona;
mod reply;

pub use persona::*;
pub use reply::*;
