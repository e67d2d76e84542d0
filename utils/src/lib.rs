//! Shared infrastructure utilities for the board client.
//!
//! - **`fs_slot`**: crash-safe single-file persistence (temp + rename) and
//!   tolerant removal, used by the durable identity slot.

pub mod fs_slot;

pub use fs_slot::{atomic_write, remove_if_exists};
