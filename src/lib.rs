#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod error;

/// Resumable cursor over the occupied slots of a table.
pub mod entry_iterator;

/// Slot storage and the `Free` / `Occupied` / `Deleted` slot lifecycle.
pub mod hash_entry;

pub mod hash_function;

/// A HashMap implementation over the linear-probing table.
///
/// This module provides a `HashMap` that wraps the `HashTable` and applies the
/// load-factor driven growth and shrink policy.
pub mod hash_map;

/// A hash set implementation over the linear-probing table.
///
/// This module provides a `HashSet` that wraps a key-only `HashTable` and
/// applies the same policy as the map.
pub mod hash_set;

/// The open-addressing engine: linear probing, tombstone removal and
/// rehash-on-resize.
pub mod hash_table;

pub use entry_iterator::EntryIterator;
pub use error::Error;
pub use error::Result;
pub use hash_entry::EntryState;
pub use hash_entry::HashEntry;
pub use hash_function::DefaultHash;
#[cfg(feature = "foldhash")]
pub use hash_function::FoldHash;
pub use hash_function::Fnv1;
pub use hash_function::HashFunction;
pub use hash_function::Id;
pub use hash_map::Entry;
pub use hash_map::HashMap;
pub use hash_set::HashSet;
pub use hash_table::HashTable;
