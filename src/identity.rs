//! User identity: created lazily once per profile, persisted, never changed.

use std::fmt;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::KeyValueStore;

/// Storage key under which the identity is persisted.
pub const USER_ID_STORAGE_KEY: &str = "bookingAppUserId";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Capability that hands out the current user's identity.
pub trait IdentityProvider: Send + Sync {
    fn get_or_create(&self) -> UserId;
}

/// Identity backed by a [`KeyValueStore`].
///
/// The store is consulted at most once; the resolved id is cached for the
/// lifetime of the provider. Storage failures never surface: a fresh id is
/// used for the session instead.
pub struct StoredIdentity {
    store: Arc<dyn KeyValueStore>,
    cached: OnceLock<UserId>,
}

impl StoredIdentity {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            cached: OnceLock::new(),
        }
    }

    fn load_or_generate(&self) -> UserId {
        match self.store.get(USER_ID_STORAGE_KEY) {
            Ok(Some(stored)) if !stored.trim().is_empty() => return UserId::new(stored),
            Ok(_) => {}
            Err(e) => tracing::warn!("failed to read stored user id: {e}"),
        }

        let generated = UserId::generate();
        if let Err(e) = self.store.set(USER_ID_STORAGE_KEY, generated.as_str()) {
            tracing::warn!("failed to persist generated user id: {e}");
        }
        tracing::info!("generated new user id {generated}");
        generated
    }
}

impl IdentityProvider for StoredIdentity {
    fn get_or_create(&self) -> UserId {
        self.cached.get_or_init(|| self.load_or_generate()).clone()
    }
}

/// Identity fixed at construction time.
#[derive(Debug, Clone)]
pub struct FixedIdentity(pub UserId);

impl IdentityProvider for FixedIdentity {
    fn get_or_create(&self) -> UserId {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::storage::{MemoryStore, StorageError};

    struct CountingStore {
        inner: MemoryStore,
        reads: AtomicUsize,
    }

    impl KeyValueStore for CountingStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.inner.set(key, value)
        }
    }

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Backend("disk on fire".to_string()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Backend("disk on fire".to_string()))
        }
    }

    #[test]
    fn generates_and_persists_on_first_use() {
        let store = Arc::new(MemoryStore::new());
        let identity = StoredIdentity::new(store.clone());

        let user = identity.get_or_create();
        assert_eq!(
            store.get(USER_ID_STORAGE_KEY).unwrap().as_deref(),
            Some(user.as_str())
        );
        assert_eq!(identity.get_or_create(), user);
    }

    #[test]
    fn reuses_an_identity_persisted_by_a_previous_run() {
        let store = Arc::new(MemoryStore::new());
        store.set(USER_ID_STORAGE_KEY, "returning-user").unwrap();

        let identity = StoredIdentity::new(store);
        assert_eq!(identity.get_or_create().as_str(), "returning-user");
    }

    #[test]
    fn blank_stored_value_is_replaced() {
        let store = Arc::new(MemoryStore::new());
        store.set(USER_ID_STORAGE_KEY, "").unwrap();

        let user = StoredIdentity::new(store.clone()).get_or_create();
        assert!(!user.as_str().is_empty());
        assert_eq!(
            store.get(USER_ID_STORAGE_KEY).unwrap().as_deref(),
            Some(user.as_str())
        );
    }

    #[test]
    fn store_is_read_only_once() {
        let store = Arc::new(CountingStore {
            inner: MemoryStore::new(),
            reads: AtomicUsize::new(0),
        });
        let identity = StoredIdentity::new(store.clone());
        for _ in 0..5 {
            identity.get_or_create();
        }
        assert_eq!(store.reads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn storage_failures_fall_back_to_a_session_identity() {
        let identity = StoredIdentity::new(Arc::new(BrokenStore));
        let user = identity.get_or_create();
        assert!(!user.as_str().is_empty());
        assert_eq!(identity.get_or_create(), user);
    }
}
