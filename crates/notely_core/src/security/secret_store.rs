//! Secure key-value store seam used by the PIN gate.

use log::debug;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Mutex;

pub type SecretResult<T> = Result<T, SecretStoreError>;

/// Failure reported by a secret store backend.
#[derive(Debug)]
pub enum SecretStoreError {
    Backend(String),
}

impl Display for SecretStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Backend(message) => write!(f, "secret store failure: {message}"),
        }
    }
}

impl Error for SecretStoreError {}

/// String-valued secure storage addressed by key.
pub trait SecretStore {
    /// Returns the value for `key`, or `None` when absent.
    fn get(&self, key: &str) -> SecretResult<Option<String>>;
    /// Stores `value`, overwriting any previous value.
    fn set(&self, key: &str, value: &str) -> SecretResult<()>;
    /// Removes `key`. Removing an absent key succeeds.
    fn delete(&self, key: &str) -> SecretResult<()>;
}

/// OS credential store (Keychain, Credential Manager, Secret Service).
#[derive(Debug, Clone)]
pub struct KeyringSecretStore {
    service: String,
}

impl KeyringSecretStore {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, key: &str) -> SecretResult<keyring::Entry> {
        keyring::Entry::new(&self.service, key)
            .map_err(|err| SecretStoreError::Backend(err.to_string()))
    }
}

impl SecretStore for KeyringSecretStore {
    fn get(&self, key: &str) -> SecretResult<Option<String>> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(SecretStoreError::Backend(err.to_string())),
        }
    }

    fn set(&self, key: &str, value: &str) -> SecretResult<()> {
        self.entry(key)?
            .set_password(value)
            .map_err(|err| SecretStoreError::Backend(err.to_string()))
    }

    fn delete(&self, key: &str) -> SecretResult<()> {
        match self.entry(key)?.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => {
                debug!("event=secret_delete module=security status=ok detail=absent");
                Ok(())
            }
            Err(err) => Err(SecretStoreError::Backend(err.to_string())),
        }
    }
}

/// Process-local store for tests and hosts without a credential service.
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_entries<T>(
        &self,
        f: impl FnOnce(&mut BTreeMap<String, String>) -> T,
    ) -> SecretResult<T> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| SecretStoreError::Backend("memory store lock poisoned".to_string()))?;
        Ok(f(&mut entries))
    }
}

impl SecretStore for MemorySecretStore {
    fn get(&self, key: &str) -> SecretResult<Option<String>> {
        self.with_entries(|entries| entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> SecretResult<()> {
        self.with_entries(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn delete(&self, key: &str) -> SecretResult<()> {
        self.with_entries(|entries| {
            entries.remove(key);
        })
    }
}

impl<S: SecretStore + ?Sized> SecretStore for &S {
    fn get(&self, key: &str) -> SecretResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> SecretResult<()> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> SecretResult<()> {
        (**self).delete(key)
    }
}

#[cfg(test)]
mod tests {
    use super::{MemorySecretStore, SecretStore};

    #[test]
    fn memory_store_round_trips_and_deletes() {
        let store = MemorySecretStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v1").unwrap();
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));
        store.delete("k").unwrap();
        store.delete("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }
}
