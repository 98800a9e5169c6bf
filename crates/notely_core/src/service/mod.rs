//! Core use-case services.
//!
//! # Responsibility
//! - Wrap repository calls in the UI-safe note store facade.
//! - Own editor autosave and PIN-gated note access flows.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod autosave;
pub mod editor_session;
pub mod note_access;
pub mod note_store;
