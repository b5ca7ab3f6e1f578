//! Models Module - Data Structures & Errors
//!
//! Single source of truth untuk Config, wire types, dan error taxonomy.

pub mod config;
pub mod errors;
pub mod types;

pub use config::*;
pub use errors::*;
pub use types::*;
