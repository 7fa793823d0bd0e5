//! # Teamforge-Core
//!
//! Data model for personality-aware team composition: OCEAN trait
//! vectors on a bounded scale, people with skill inventories, role
//! requirements, candidate teams and their cost evaluations.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use traits::*;
pub use types::*;
