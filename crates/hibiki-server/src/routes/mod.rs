//! Hibiki API Routes
//!
//! - /hibiki/replies - Queue a persona reply (background job)
//! - /hibiki/replies/run - Run a persona reply inline
//! - /hibiki/personas - Persona catalog

pub mod persona;
pub mod reply;
pub mod swagger;
