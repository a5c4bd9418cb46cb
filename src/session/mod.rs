//! Owned session context: bearer token plus signed-in identity.
//!
//! One [`SessionContext`] is shared by reference between the transport and whatever
//! needs to know who is signed in. All transitions go through named operations
//! (`login`, `set_token`, `logout`, `invalidate`); readers observe changes through
//! [`SessionContext::subscribe`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use tokio::sync::watch;

use crate::errors::StoreError;
use crate::models::user::AdminIdentity;

/// Storage key of the bearer token.
pub const TOKEN_KEY: &str = "adminToken";

/// Storage key of the serialized identity.
pub const USER_KEY: &str = "adminUser";

/// Durable key/value storage for credentials.
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Process-local store; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
        Ok(())
    }
}

/// JSON object on disk, one entry per key. The file is rewritten on every change.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_vec_pretty(entries)?)?;
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut entries = self.read_all()?;
        f(&mut entries);
        self.write_all(&entries)
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.read_all() {
            Ok(mut entries) => entries.remove(key),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Unreadable credential store");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.remove(key);
        })
    }
}

/// Observable session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Anonymous,
    Authenticated,
    /// Cleared by a 401; callers should route the user to sign-in.
    Expired,
}

#[derive(Debug, Default)]
struct SessionState {
    token: Option<String>,
    user: Option<AdminIdentity>,
}

pub struct SessionContext {
    store: Box<dyn CredentialStore>,
    state: RwLock<SessionState>,
    status: watch::Sender<SessionStatus>,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("status", &*self.status.borrow())
            .field("user", &self.current_user().map(|u| u.username))
            .finish()
    }
}

impl SessionContext {
    /// Load whatever credentials the store already holds.
    ///
    /// An identity that no longer parses is removed from the store and the session
    /// starts signed out.
    pub fn restore(store: Box<dyn CredentialStore>) -> Self {
        let token = store.get(TOKEN_KEY);
        let user = store.get(USER_KEY).and_then(|raw| {
            match serde_json::from_str::<AdminIdentity>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::warn!(error = %e, "Discarding unparseable stored identity");
                    if let Err(e) = store.remove(USER_KEY) {
                        tracing::warn!(error = %e, "Failed to clear stored identity");
                    }
                    None
                }
            }
        });

        let status = if user.is_some() && token.is_some() {
            SessionStatus::Authenticated
        } else {
            SessionStatus::Anonymous
        };
        let (tx, _rx) = watch::channel(status);

        Self {
            store,
            state: RwLock::new(SessionState { token, user }),
            status: tx,
        }
    }

    /// Empty in-memory session.
    pub fn in_memory() -> Self {
        Self::restore(Box::new(MemoryCredentialStore::default()))
    }

    /// Record a successful sign-in.
    pub fn login(&self, token: String, user: AdminIdentity) {
        match serde_json::to_string(&user) {
            Ok(raw) => self.persist(USER_KEY, &raw),
            Err(e) => tracing::warn!(error = %e, "Failed to serialize identity"),
        }
        self.persist(TOKEN_KEY, &token);

        tracing::info!(username = %user.username, "Signed in");
        if let Ok(mut state) = self.state.write() {
            state.token = Some(token);
            state.user = Some(user);
        }
        self.status.send_replace(SessionStatus::Authenticated);
    }

    /// Replace the bearer token, keeping the identity.
    pub fn set_token(&self, token: String) {
        self.persist(TOKEN_KEY, &token);
        if let Ok(mut state) = self.state.write() {
            state.token = Some(token);
        }
    }

    /// Voluntary sign-out.
    pub fn logout(&self) {
        self.clear();
        tracing::info!("Signed out");
        self.status.send_replace(SessionStatus::Anonymous);
    }

    /// Forced sign-out after the server rejected the credential.
    pub fn invalidate(&self) {
        self.clear();
        tracing::info!("Session invalidated by server");
        self.status.send_replace(SessionStatus::Expired);
    }

    pub fn token(&self) -> Option<String> {
        self.state.read().ok()?.token.clone()
    }

    pub fn current_user(&self) -> Option<AdminIdentity> {
        self.state.read().ok()?.user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }

    pub fn status(&self) -> SessionStatus {
        *self.status.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status.subscribe()
    }

    fn clear(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.store.remove(key) {
                tracing::warn!(key, error = %e, "Failed to clear credential");
            }
        }
        if let Ok(mut state) = self.state.write() {
            *state = SessionState::default();
        }
    }

    fn persist(&self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            tracing::warn!(key, error = %e, "Failed to persist credential");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::UserRole;

    fn identity() -> AdminIdentity {
        AdminIdentity {
            id: "a1".to_string(),
            username: "root".to_string(),
            email: "root@example.com".to_string(),
            role: UserRole::SuperAdmin,
            profile_image: None,
        }
    }

    #[test]
    fn login_persists_both_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/session.json");

        let session = SessionContext::restore(Box::new(FileCredentialStore::new(&path)));
        assert_eq!(session.status(), SessionStatus::Anonymous);
        session.login("tok".to_string(), identity());

        let store = FileCredentialStore::new(&path);
        assert_eq!(store.get(TOKEN_KEY).as_deref(), Some("tok"));
        assert!(store.get(USER_KEY).unwrap().contains("root"));

        let restored = SessionContext::restore(Box::new(store));
        assert_eq!(restored.status(), SessionStatus::Authenticated);
        assert_eq!(restored.current_user(), Some(identity()));
        assert_eq!(restored.token().as_deref(), Some("tok"));
    }

    #[test]
    fn invalidate_clears_store_and_signals_expired() {
        let session = SessionContext::in_memory();
        session.login("tok".to_string(), identity());
        let mut rx = session.subscribe();

        session.invalidate();

        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), SessionStatus::Expired);
        assert!(session.token().is_none());
        assert!(!session.is_authenticated());
        assert!(session.store.get(TOKEN_KEY).is_none());
        assert!(session.store.get(USER_KEY).is_none());
    }

    #[test]
    fn logout_is_anonymous_not_expired() {
        let session = SessionContext::in_memory();
        session.login("tok".to_string(), identity());
        session.logout();
        assert_eq!(session.status(), SessionStatus::Anonymous);
    }

    #[test]
    fn corrupt_identity_is_discarded() {
        let store = MemoryCredentialStore::default();
        store.set(TOKEN_KEY, "tok").unwrap();
        store.set(USER_KEY, "{not json").unwrap();

        let session = SessionContext::restore(Box::new(store));
        assert!(session.current_user().is_none());
        assert_eq!(session.status(), SessionStatus::Anonymous);
        assert!(session.store.get(USER_KEY).is_none());
    }

    #[test]
    fn set_token_keeps_identity() {
        let session = SessionContext::in_memory();
        session.login("old".to_string(), identity());
        session.set_token("new".to_string());
        assert_eq!(session.token().as_deref(), Some("new"));
        assert!(session.is_authenticated());
    }
}
