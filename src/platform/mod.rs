//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (millisecond clock)
//! - Input events (movement keys, pointer, fire button)
//! - Storage (LocalStorage on web, in-memory elsewhere)

pub mod input;
pub mod storage;
pub mod time;

pub use input::{InputState, MoveKey};
pub use storage::{KeyValueStore, MemoryStore, StoreError};
pub use time::{Clock, ManualClock};
