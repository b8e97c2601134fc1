//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod input_quality;
mod persona_kind;
mod vendor;

pub use input_quality::*;
pub use persona_kind::*;
pub use vendor::*;
