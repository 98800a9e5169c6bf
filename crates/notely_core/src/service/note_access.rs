//! PIN-gated note access.
//!
//! Locked notes are listed with placeholder title/preview and their content
//! is only handed out after the PIN verifies.

use crate::model::note::{Note, NoteId, NoteSummary};
use crate::security::pin::PinGate;
use crate::security::secret_store::SecretStore;
use crate::service::note_store::NoteStore;
use log::info;

/// Result of opening a note from the list.
#[derive(Debug, Clone, PartialEq)]
pub enum NoteAccess {
    Open(Note),
    Locked(NoteId),
    Missing,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UnlockOutcome {
    Revealed(Note),
    IncorrectPin,
    Missing,
    /// PIN verified but the lock flag could not be written.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockOutcome {
    Locked,
    /// Locking needs a configured PIN first.
    PinRequired,
    Failed,
}

pub fn open_note(store: &mut NoteStore, id: NoteId) -> NoteAccess {
    match store.get_by_id(id) {
        Some(note) if note.is_locked => NoteAccess::Locked(note.id),
        Some(note) => NoteAccess::Open(note),
        None => NoteAccess::Missing,
    }
}

/// Reveals a locked note for this viewing only; the lock flag stays set.
pub fn unlock_note<S: SecretStore>(
    store: &mut NoteStore,
    gate: &PinGate<S>,
    id: NoteId,
    pin: &str,
) -> UnlockOutcome {
    let Some(note) = store.get_by_id(id) else {
        return UnlockOutcome::Missing;
    };
    if !note.is_locked || gate.verify_pin(pin) {
        info!("event=note_reveal module=access status=ok note_id={id}");
        UnlockOutcome::Revealed(note)
    } else {
        info!("event=note_reveal module=access status=denied note_id={id}");
        UnlockOutcome::IncorrectPin
    }
}

pub fn lock_note<S: SecretStore>(
    store: &mut NoteStore,
    gate: &PinGate<S>,
    id: NoteId,
) -> LockOutcome {
    if !gate.is_pin_configured() {
        return LockOutcome::PinRequired;
    }
    if store.set_locked(id, true) {
        LockOutcome::Locked
    } else {
        LockOutcome::Failed
    }
}

/// Clears the lock flag after the PIN verifies.
pub fn remove_lock<S: SecretStore>(
    store: &mut NoteStore,
    gate: &PinGate<S>,
    id: NoteId,
    pin: &str,
) -> UnlockOutcome {
    match unlock_note(store, gate, id, pin) {
        UnlockOutcome::Revealed(note) => {
            if store.set_locked(id, false) {
                UnlockOutcome::Revealed(Note {
                    is_locked: false,
                    ..note
                })
            } else {
                UnlockOutcome::Failed
            }
        }
        other => other,
    }
}

/// List rows for the notes screen; a blank query lists everything.
pub fn list_summaries(store: &mut NoteStore, query: &str) -> Vec<NoteSummary> {
    let notes = if query.trim().is_empty() {
        store.get_all()
    } else {
        store.search(query)
    };
    notes.iter().map(Note::summary).collect()
}
