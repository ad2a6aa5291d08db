//! The signed-in user, held in memory and mirrored to storage.
//!
//! # Design
//! `Session` owns its storage and is passed explicitly to whatever needs the
//! current user. Mutators take `&mut self`, so `begin` and `end` can never
//! interleave on one instance. Each mutator touches storage first and only
//! updates memory once storage succeeded: a failed write leaves the session
//! exactly as it was.

use log::{info, warn};
use thiserror::Error;

use crate::serializer::UserSerializer;
use crate::storage::{KeyValueStorage, StorageError};
use crate::types::User;

/// Storage key of the user snapshot.
pub const SESSION_KEY: &str = "current_user";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("failed to encode user snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

#[derive(Debug)]
pub struct Session<S> {
    storage: S,
    serializer: UserSerializer,
    current: Option<User>,
}

impl<S: KeyValueStorage> Session<S> {
    /// Create the session, restoring the user from a stored snapshot.
    ///
    /// A snapshot that cannot be decoded is discarded and the session starts
    /// signed out, even if removing it from storage fails.
    pub fn restore(mut storage: S) -> Result<Self, SessionError> {
        let serializer = UserSerializer;
        let current = match storage.get(SESSION_KEY)? {
            Some(snapshot) => match serializer.deserialize(&snapshot) {
                Ok(user) => {
                    info!("restored session for {}", user.username);
                    Some(user)
                }
                Err(e) => {
                    warn!("discarding unreadable session snapshot: {e}");
                    if let Err(e) = storage.remove(SESSION_KEY) {
                        warn!("could not remove unreadable session snapshot: {e}");
                    }
                    None
                }
            },
            None => None,
        };
        Ok(Self {
            storage,
            serializer,
            current,
        })
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.current.is_some()
    }

    /// Make `user` the current user, replacing any previous one.
    pub fn begin(&mut self, user: User) -> Result<(), SessionError> {
        let snapshot = self.serializer.serialize(&user)?;
        self.storage.put(SESSION_KEY, &snapshot)?;
        info!("session started for {}", user.username);
        self.current = Some(user);
        Ok(())
    }

    /// Forget the current user. Ending an empty session is a no-op.
    pub fn end(&mut self) -> Result<(), SessionError> {
        self.storage.remove(SESSION_KEY)?;
        if let Some(user) = self.current.take() {
            info!("session ended for {}", user.username);
        }
        Ok(())
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::types::Email;

    fn ervin() -> User {
        User {
            id: 2,
            name: "Ervin Howell".to_string(),
            username: "Antonette".to_string(),
            email: Email::new("Shanna@melissa.tv"),
        }
    }

    /// Storage whose writes always fail.
    struct ReadOnly(MemoryStorage);

    impl KeyValueStorage for ReadOnly {
        fn put(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io {
                path: "readonly".into(),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            })
        }

        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.get(key)
        }

        fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Io {
                path: "readonly".into(),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            })
        }
    }

    #[test]
    fn starts_empty_without_snapshot() {
        let session = Session::restore(MemoryStorage::new()).unwrap();
        assert!(session.current_user().is_none());
        assert!(!session.is_signed_in());
    }

    #[test]
    fn begin_sets_user_and_writes_snapshot() {
        let mut session = Session::restore(MemoryStorage::new()).unwrap();
        session.begin(ervin()).unwrap();

        assert_eq!(session.current_user(), Some(&ervin()));
        let snapshot = session.storage().get(SESSION_KEY).unwrap().unwrap();
        assert_eq!(UserSerializer.deserialize(&snapshot).unwrap(), ervin());
    }

    #[test]
    fn end_clears_user_and_snapshot() {
        let mut session = Session::restore(MemoryStorage::new()).unwrap();
        session.begin(ervin()).unwrap();
        session.end().unwrap();

        assert!(session.current_user().is_none());
        assert_eq!(session.storage().get(SESSION_KEY).unwrap(), None);
        session.end().unwrap();
    }

    #[test]
    fn restore_hydrates_from_snapshot() {
        let mut session = Session::restore(MemoryStorage::new()).unwrap();
        session.begin(ervin()).unwrap();

        let restored = Session::restore(session.into_storage()).unwrap();
        assert_eq!(restored.current_user(), Some(&ervin()));
    }

    #[test]
    fn restore_discards_corrupt_snapshot() {
        let mut storage = MemoryStorage::new();
        storage.put(SESSION_KEY, "{broken").unwrap();

        let session = Session::restore(storage).unwrap();
        assert!(session.current_user().is_none());
        assert_eq!(session.storage().get(SESSION_KEY).unwrap(), None);
    }

    #[test]
    fn corrupt_snapshot_in_read_only_storage_starts_signed_out() {
        let mut inner = MemoryStorage::new();
        inner.put(SESSION_KEY, "{broken").unwrap();

        let session = Session::restore(ReadOnly(inner)).unwrap();
        assert!(session.current_user().is_none());
    }

    #[test]
    fn failed_write_keeps_previous_state() {
        let mut session = Session::restore(ReadOnly(MemoryStorage::new())).unwrap();
        assert!(matches!(session.begin(ervin()), Err(SessionError::Storage(_))));
        assert!(session.current_user().is_none());
    }

    #[test]
    fn failed_remove_keeps_user() {
        let mut inner = MemoryStorage::new();
        inner
            .put(SESSION_KEY, &UserSerializer.serialize(&ervin()).unwrap())
            .unwrap();
        let mut session = Session::restore(ReadOnly(inner)).unwrap();

        assert!(session.end().is_err());
        assert_eq!(session.current_user(), Some(&ervin()));
    }
}
