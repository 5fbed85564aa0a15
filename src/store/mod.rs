//! Store module — the on-disk secret map.
//!
//! This module provides:
//! - `entry_key` for building map keys from `(service, user)` (`entry`)
//! - `StoreFile` and its read-modify-write `Transaction` (`file`)

pub mod entry;
pub mod file;

// Re-export the most commonly used items.
pub use entry::entry_key;
pub use file::{home_root, Entries, StoreFile, Transaction, WriteMode};
