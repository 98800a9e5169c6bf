//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the note data-access contract.
//! - Isolate SQLite query details and the tag JSON codec from callers.
//!
//! # Invariants
//! - Repository APIs return typed errors; converting them into UI-safe
//!   sentinels is the store facade's job.
//! - Malformed persisted values are repaired on read, never rejected.

pub mod note_repo;
