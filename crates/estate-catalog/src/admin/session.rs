use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::{debug, warn};

/// Where the admin bearer token outlives a single page visit.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<String>, TokenStoreError>;
    fn save(&self, token: &str) -> Result<(), TokenStoreError>;
    fn clear(&self) -> Result<(), TokenStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TokenStoreError {
    #[error("token store io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("token store unavailable")]
    Unavailable,
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, TokenStoreError> {
        let guard = self.token.lock().map_err(|_| TokenStoreError::Unavailable)?;
        Ok(guard.clone())
    }

    fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        let mut guard = self.token.lock().map_err(|_| TokenStoreError::Unavailable)?;
        *guard = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        let mut guard = self.token.lock().map_err(|_| TokenStoreError::Unavailable)?;
        *guard = None;
        Ok(())
    }
}

/// Keeps the token in a single file so CLI invocations share a session.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, TokenStoreError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        fs::write(&self.path, token)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated { token: String },
    /// The backend rejected the token; a fresh login is required.
    Expired,
}

/// Explicit admin session handed to the pages that need it.
#[derive(Debug)]
pub struct AdminSession<S> {
    store: S,
    state: SessionState,
}

impl<S: TokenStore> AdminSession<S> {
    /// Picks up a previously stored token, if any.
    pub fn restore(store: S) -> Self {
        let state = match store.load() {
            Ok(Some(token)) => SessionState::Authenticated { token },
            Ok(None) => SessionState::Unauthenticated,
            Err(err) => {
                warn!(error = %err, "could not read stored admin token");
                SessionState::Unauthenticated
            }
        };
        Self { store, state }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn bearer(&self) -> Option<&str> {
        match &self.state {
            SessionState::Authenticated { token } => Some(token),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.bearer().is_some()
    }

    pub fn sign_in(&mut self, token: impl Into<String>) -> Result<(), TokenStoreError> {
        let token = token.into();
        self.store.save(&token)?;
        self.state = SessionState::Authenticated { token };
        debug!("admin session authenticated");
        Ok(())
    }

    pub fn sign_out(&mut self) {
        self.forget();
        self.state = SessionState::Unauthenticated;
    }

    /// Called when the backend answers 401.
    pub fn expire(&mut self) {
        self.forget();
        self.state = SessionState::Expired;
    }

    fn forget(&self) {
        if let Err(err) = self.store.clear() {
            warn!(error = %err, "could not clear stored admin token");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restore_without_token_is_unauthenticated() {
        let session = AdminSession::restore(MemoryTokenStore::default());
        assert_eq!(session.state(), &SessionState::Unauthenticated);
        assert!(session.bearer().is_none());
    }

    #[test]
    fn sign_in_persists_token() {
        let mut session = AdminSession::restore(MemoryTokenStore::default());
        session.sign_in("abc123").expect("token saved");
        assert_eq!(session.bearer(), Some("abc123"));
        assert_eq!(
            session.store().load().expect("load"),
            Some("abc123".to_string())
        );
    }

    #[test]
    fn expire_clears_token_and_marks_session() {
        let mut session = AdminSession::restore(MemoryTokenStore::with_token("stale"));
        assert!(session.is_authenticated());

        session.expire();
        assert_eq!(session.state(), &SessionState::Expired);
        assert!(session.bearer().is_none());
        assert_eq!(session.store().load().expect("load"), None);
    }

    #[test]
    fn sign_out_returns_to_unauthenticated() {
        let mut session = AdminSession::restore(MemoryTokenStore::with_token("live"));
        session.sign_out();
        assert_eq!(session.state(), &SessionState::Unauthenticated);
        assert_eq!(session.store().load().expect("load"), None);
    }

    #[test]
    fn file_store_round_trips_and_clears() {
        let path = std::env::temp_dir().join(format!(
            "estate-admin-token-{}",
            uuid::Uuid::new_v4().simple()
        ));
        let store = FileTokenStore::new(&path);
        assert_eq!(store.load().expect("missing file is empty"), None);

        store.save("file-token").expect("save");
        let session = AdminSession::restore(FileTokenStore::new(&path));
        assert_eq!(session.bearer(), Some("file-token"));

        store.clear().expect("clear");
        store.clear().expect("clearing twice is fine");
        assert!(!path.exists());
    }
}
