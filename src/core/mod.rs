//! Core Module - Editor state machine & synchronization
//!
//! Otak aplikasi: working copy lokal, protokol sync ke Config Store,
//! dan propagasi ke shared user state.

pub mod editor;
pub mod page;
pub mod sync;
pub mod user_state;

pub use editor::*;
pub use page::*;
pub use sync::*;
pub use user_state::*;
