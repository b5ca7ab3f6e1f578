//! Utils Module - Helper Functions & Shared Utilities
//!
//! Konstanta dan helper yang dipakai di seluruh crate.

pub mod constants;
pub mod notify;

pub use constants::*;
pub use notify::*;
