//! Domain model for locally stored notes.
//!
//! # Responsibility
//! - Define the note record, its mutable draft, and list projections.
//! - Hold tag presets and tag-editing helpers shared by UI adapters.
//!
//! # Invariants
//! - Every note is identified by a store-assigned `NoteId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod note;
pub mod tag;
