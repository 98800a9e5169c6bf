//! Device-wide PIN gate for locked notes.
//!
//! # Responsibility
//! - Store, verify, and clear one PIN checksum in a secure key-value store.
//! - Drive the keypad unlock and PIN setup flows.
//!
//! # Invariants
//! - This is a viewing gate only: note content is stored in plain text
//!   whether or not it is locked.
//! - One PIN covers every locked note; there is no per-note key.
//! - Gate operations never return errors; failures read as `false`.

pub mod pin;
pub mod pin_flow;
pub mod secret_store;
