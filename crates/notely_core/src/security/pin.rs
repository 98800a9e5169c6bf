//! PIN checksum storage and verification.
//!
//! The checksum is a 32-bit rolling `hash * 31 + unit` over the UTF-16 units
//! of a salted string. It is not a cryptographic hash and only keeps the PIN
//! out of plain sight. Checksums written by earlier app builds keep verifying.

use super::secret_store::SecretStore;
use log::{error, info, warn};

/// Secret-store key holding the PIN checksum.
pub const PIN_KEY: &str = "notely_pin_hash";
/// Number of digits in a PIN.
pub const PIN_LENGTH: usize = 4;

/// Returns whether `pin` is exactly four ASCII digits.
pub fn is_valid_pin(pin: &str) -> bool {
    pin.len() == PIN_LENGTH && pin.bytes().all(|byte| byte.is_ascii_digit())
}

/// Deterministic, non-cryptographic checksum of a PIN.
pub fn pin_checksum(pin: &str) -> String {
    let salted = format!("notely_{pin}_salt");
    let hash = salted
        .encode_utf16()
        .fold(0i32, |hash, unit| {
            hash.wrapping_mul(31).wrapping_add(i32::from(unit))
        });
    hash.to_string()
}

/// Single device-wide PIN gate over a secret store.
#[derive(Debug)]
pub struct PinGate<S: SecretStore> {
    store: S,
}

impl<S: SecretStore> PinGate<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns true iff a PIN checksum is stored.
    pub fn is_pin_configured(&self) -> bool {
        match self.store.get(PIN_KEY) {
            Ok(value) => value.is_some(),
            Err(err) => {
                error!("event=pin_status module=security status=error error={err}");
                false
            }
        }
    }

    /// Stores the checksum of `pin`, replacing any previous PIN.
    ///
    /// Returns `false` for input that is not four digits or when the store
    /// write fails.
    pub fn set_pin(&self, pin: &str) -> bool {
        if !is_valid_pin(pin) {
            warn!("event=pin_set module=security status=rejected reason=invalid_format");
            return false;
        }
        match self.store.set(PIN_KEY, &pin_checksum(pin)) {
            Ok(()) => {
                info!("event=pin_set module=security status=ok");
                true
            }
            Err(err) => {
                error!("event=pin_set module=security status=error error={err}");
                false
            }
        }
    }

    /// Returns true only when a PIN is set and `pin` matches it.
    pub fn verify_pin(&self, pin: &str) -> bool {
        match self.store.get(PIN_KEY) {
            Ok(Some(stored)) => stored == pin_checksum(pin),
            Ok(None) => false,
            Err(err) => {
                error!("event=pin_verify module=security status=error error={err}");
                false
            }
        }
    }

    /// Deletes the stored PIN.
    ///
    /// Locked notes stay locked; unlocking them is a separate note update.
    pub fn clear_pin(&self) -> bool {
        match self.store.delete(PIN_KEY) {
            Ok(()) => {
                info!("event=pin_clear module=security status=ok");
                true
            }
            Err(err) => {
                error!("event=pin_clear module=security status=error error={err}");
                false
            }
        }
    }
}
