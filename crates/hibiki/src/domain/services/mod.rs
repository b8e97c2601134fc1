//! Domain Services
//!
//! Pure, deterministic-given-a-`Dice` building blocks of the reply
//! pipeline, plus built-in heuristic implementations of the
//! classifier ports.

mod dice;
mod input_quality;
mod lottery;
mod persona_classifier;
mod prompt;
mod roles;
mod sentiment;
mod tools;

pub use dice::*;
pub use input_quality::*;
pub use lottery::*;
pub use persona_classifier::*;
pub use prompt::*;
pub use roles::*;
pub use sentiment::*;
pub use tools::*;
