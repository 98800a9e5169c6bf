//! Keypad state machines for unlocking a note and setting up a PIN.
//!
//! Unlock: `Entering -> (4th digit) -> verified -> Unlocked | Entering with
//! "Incorrect PIN" and a cleared entry`.
//!
//! Setup: `Entering (step 1) -> Confirming (step 2) -> Committed |
//! "PINs do not match" back to step 1`.

use super::pin::{PinGate, PIN_LENGTH};
use super::secret_store::SecretStore;

pub const INCORRECT_PIN: &str = "Incorrect PIN";
pub const PINS_DO_NOT_MATCH: &str = "PINs do not match";
pub const FAILED_TO_SET_PIN: &str = "Failed to set PIN";

/// What a keypad press did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeypadEvent {
    /// Key ignored (not a digit, entry full, or flow already finished).
    Ignored,
    /// Digit recorded; more digits needed.
    Accepted,
    /// Unlock flow: PIN verified.
    Unlocked,
    /// Unlock flow: PIN mismatch, entry cleared.
    Rejected,
    /// Setup flow: first entry complete, now confirming.
    ConfirmRequested,
    /// Setup flow: PIN stored.
    Committed,
    /// Setup flow: confirmation differed, restarted at step 1.
    Mismatch,
    /// Setup flow: the secret store refused the write.
    StoreFailed,
}

/// Unlock keypad for a locked note.
#[derive(Debug, Default)]
pub struct UnlockFlow {
    entered: String,
    error: Option<&'static str>,
    unlocked: bool,
}

impl UnlockFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one digit; the fourth digit triggers verification.
    pub fn push_digit<S: SecretStore>(&mut self, digit: char, gate: &PinGate<S>) -> KeypadEvent {
        if self.unlocked || !digit.is_ascii_digit() || self.entered.len() >= PIN_LENGTH {
            return KeypadEvent::Ignored;
        }
        self.error = None;
        self.entered.push(digit);
        if self.entered.len() < PIN_LENGTH {
            return KeypadEvent::Accepted;
        }

        if gate.verify_pin(&self.entered) {
            self.unlocked = true;
            KeypadEvent::Unlocked
        } else {
            self.entered.clear();
            self.error = Some(INCORRECT_PIN);
            KeypadEvent::Rejected
        }
    }

    pub fn backspace(&mut self) {
        if !self.unlocked {
            self.error = None;
            self.entered.pop();
        }
    }

    /// Number of digits shown as filled dots.
    pub fn entered_len(&self) -> usize {
        self.entered.len()
    }

    pub fn error(&self) -> Option<&'static str> {
        self.error
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }
}

/// Step of the setup flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStep {
    Entering,
    Confirming,
    Committed,
}

/// Two-step PIN setup keypad.
#[derive(Debug)]
pub struct SetupFlow {
    step: SetupStep,
    first: String,
    confirm: String,
    error: Option<&'static str>,
}

impl Default for SetupFlow {
    fn default() -> Self {
        Self {
            step: SetupStep::Entering,
            first: String::new(),
            confirm: String::new(),
            error: None,
        }
    }
}

impl SetupFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one digit in the current step.
    pub fn push_digit<S: SecretStore>(&mut self, digit: char, gate: &PinGate<S>) -> KeypadEvent {
        if !digit.is_ascii_digit() {
            return KeypadEvent::Ignored;
        }
        match self.step {
            SetupStep::Committed => KeypadEvent::Ignored,
            SetupStep::Entering => {
                if self.first.len() >= PIN_LENGTH {
                    return KeypadEvent::Ignored;
                }
                self.error = None;
                self.first.push(digit);
                if self.first.len() < PIN_LENGTH {
                    return KeypadEvent::Accepted;
                }
                self.step = SetupStep::Confirming;
                KeypadEvent::ConfirmRequested
            }
            SetupStep::Confirming => {
                if self.confirm.len() >= PIN_LENGTH {
                    return KeypadEvent::Ignored;
                }
                self.error = None;
                self.confirm.push(digit);
                if self.confirm.len() < PIN_LENGTH {
                    return KeypadEvent::Accepted;
                }
                self.finish(gate)
            }
        }
    }

    fn finish<S: SecretStore>(&mut self, gate: &PinGate<S>) -> KeypadEvent {
        if self.first != self.confirm {
            self.restart(PINS_DO_NOT_MATCH);
            return KeypadEvent::Mismatch;
        }
        if gate.set_pin(&self.first) {
            self.step = SetupStep::Committed;
            self.first.clear();
            self.confirm.clear();
            KeypadEvent::Committed
        } else {
            self.restart(FAILED_TO_SET_PIN);
            KeypadEvent::StoreFailed
        }
    }

    fn restart(&mut self, error: &'static str) {
        self.step = SetupStep::Entering;
        self.first.clear();
        self.confirm.clear();
        self.error = Some(error);
    }

    pub fn backspace(&mut self) {
        self.error = None;
        match self.step {
            SetupStep::Entering => {
                self.first.pop();
            }
            SetupStep::Confirming => {
                self.confirm.pop();
            }
            SetupStep::Committed => {}
        }
    }

    pub fn step(&self) -> SetupStep {
        self.step
    }

    /// Digits entered in the current step.
    pub fn entered_len(&self) -> usize {
        match self.step {
            SetupStep::Entering => self.first.len(),
            SetupStep::Confirming => self.confirm.len(),
            SetupStep::Committed => 0,
        }
    }

    pub fn error(&self) -> Option<&'static str> {
        self.error
    }
}

#[cfg(test)]
mod tests {
    use super::{
        KeypadEvent, SetupFlow, SetupStep, UnlockFlow, INCORRECT_PIN, PINS_DO_NOT_MATCH,
    };
    use crate::security::pin::PinGate;
    use crate::security::secret_store::MemorySecretStore;

    fn type_pin<F: FnMut(char) -> KeypadEvent>(pin: &str, mut press: F) -> KeypadEvent {
        let mut last = KeypadEvent::Ignored;
        for digit in pin.chars() {
            last = press(digit);
        }
        last
    }

    #[test]
    fn unlock_succeeds_on_matching_pin() {
        let gate = PinGate::new(MemorySecretStore::new());
        assert!(gate.set_pin("1357"));
        let mut flow = UnlockFlow::new();
        assert_eq!(type_pin("1357", |d| flow.push_digit(d, &gate)), KeypadEvent::Unlocked);
        assert!(flow.is_unlocked());
        assert_eq!(flow.push_digit('1', &gate), KeypadEvent::Ignored);
    }

    #[test]
    fn unlock_mismatch_clears_entry_and_reports_error() {
        let gate = PinGate::new(MemorySecretStore::new());
        assert!(gate.set_pin("1357"));
        let mut flow = UnlockFlow::new();
        assert_eq!(type_pin("0000", |d| flow.push_digit(d, &gate)), KeypadEvent::Rejected);
        assert_eq!(flow.entered_len(), 0);
        assert_eq!(flow.error(), Some(INCORRECT_PIN));

        assert_eq!(flow.push_digit('1', &gate), KeypadEvent::Accepted);
        assert_eq!(flow.error(), None);
    }

    #[test]
    fn unlock_backspace_removes_one_digit() {
        let gate = PinGate::new(MemorySecretStore::new());
        let mut flow = UnlockFlow::new();
        flow.push_digit('1', &gate);
        flow.push_digit('2', &gate);
        flow.backspace();
        assert_eq!(flow.entered_len(), 1);
        assert_eq!(flow.push_digit('x', &gate), KeypadEvent::Ignored);
    }

    #[test]
    fn setup_commits_when_confirmation_matches() {
        let gate = PinGate::new(MemorySecretStore::new());
        let mut flow = SetupFlow::new();
        assert_eq!(
            type_pin("2468", |d| flow.push_digit(d, &gate)),
            KeypadEvent::ConfirmRequested
        );
        assert_eq!(flow.step(), SetupStep::Confirming);
        assert_eq!(type_pin("2468", |d| flow.push_digit(d, &gate)), KeypadEvent::Committed);
        assert_eq!(flow.step(), SetupStep::Committed);
        assert!(gate.verify_pin("2468"));
    }

    #[test]
    fn setup_mismatch_restarts_at_step_one() {
        let gate = PinGate::new(MemorySecretStore::new());
        let mut flow = SetupFlow::new();
        type_pin("2468", |d| flow.push_digit(d, &gate));
        assert_eq!(type_pin("8642", |d| flow.push_digit(d, &gate)), KeypadEvent::Mismatch);
        assert_eq!(flow.step(), SetupStep::Entering);
        assert_eq!(flow.entered_len(), 0);
        assert_eq!(flow.error(), Some(PINS_DO_NOT_MATCH));
        assert!(!gate.is_pin_configured());
    }
}
