//! Providers Module - Config Store implementations
//!
//! Jalur data ke store of record: HTTP client dan in-memory store.

pub mod http;
pub mod memory;
pub mod store;

pub use http::*;
pub use memory::*;
pub use store::*;
