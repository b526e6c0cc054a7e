//! Shared types for the Oolong floor server
//!
//! Data models, wire DTOs and small utilities used by the server crate.
//! No business logic lives here.

pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
