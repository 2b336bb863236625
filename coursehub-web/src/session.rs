//! The session store: single owner of the signed-in identity and its token.
//!
//! The session is read from storage once, when the store is loaded, and kept
//! in memory afterwards. Identity and token live in one [`Session`] value, so
//! a reader can never see one without the other.

use shared::models::{Identity, UserRole};
use std::cell::RefCell;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::storage::{KeyValueStorage, StorageError};

/// Storage key holding the raw bearer token.
pub const TOKEN_KEY: &str = "token";
/// Storage key holding the JSON identity record.
pub const USER_KEY: &str = "user";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Credentials {
    identity: Identity,
    token: String,
}

/// A snapshot of who is signed in. Empty when nobody is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    credentials: Option<Credentials>,
}

impl Session {
    /// The signed-out session.
    #[must_use]
    pub const fn empty() -> Self {
        Self { credentials: None }
    }

    /// A signed-in session.
    pub fn authenticated(identity: Identity, token: impl Into<String>) -> Self {
        Self {
            credentials: Some(Credentials {
                identity,
                token: token.into(),
            }),
        }
    }

    /// The signed-in user.
    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        self.credentials.as_ref().map(|credentials| &credentials.identity)
    }

    /// The bearer token for authenticated requests.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.credentials
            .as_ref()
            .map(|credentials| credentials.token.as_str())
    }

    /// Role of the signed-in user.
    #[must_use]
    pub fn role(&self) -> Option<UserRole> {
        self.identity().map(|identity| identity.role)
    }

    /// Whether somebody is signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.credentials.is_some()
    }
}

/// Why persisted state could not be turned into a session.
#[derive(Debug, Error)]
enum LoadFailure {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("stored identity is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("stored session is incomplete: {0}")]
    Incomplete(&'static str),
}

/// Owns the current [`Session`] and keeps it in step with durable storage.
pub struct SessionStore {
    storage: Box<dyn KeyValueStorage>,
    current: RefCell<Session>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.current.borrow().is_authenticated())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Reads the persisted session once. Missing, unreadable or half-written
    /// state yields a signed-out store; it is logged, never returned.
    pub fn load(storage: impl KeyValueStorage + 'static) -> Self {
        let session = match Self::read(&storage) {
            Ok(session) => session,
            Err(failure) => {
                warn!(error = %failure, "discarding persisted session");
                if !matches!(failure, LoadFailure::Storage(_)) {
                    scrub(&storage);
                }
                Session::empty()
            }
        };

        debug!(
            authenticated = session.is_authenticated(),
            "session store loaded"
        );

        Self {
            storage: Box::new(storage),
            current: RefCell::new(session),
        }
    }

    fn read(storage: &dyn KeyValueStorage) -> Result<Session, LoadFailure> {
        let token = storage.get(TOKEN_KEY)?;
        let user = storage.get(USER_KEY)?;

        match (token, user) {
            (None, None) => Ok(Session::empty()),
            (Some(token), Some(user)) => {
                if token.trim().is_empty() {
                    return Err(LoadFailure::Incomplete("token is blank"));
                }
                let identity: Identity = serde_json::from_str(&user)?;
                Ok(Session::authenticated(identity, token))
            }
            (Some(_), None) => Err(LoadFailure::Incomplete("token without user")),
            (None, Some(_)) => Err(LoadFailure::Incomplete("user without token")),
        }
    }

    /// A copy of the in-memory session. Storage is not consulted.
    #[must_use]
    pub fn current(&self) -> Session {
        self.current.borrow().clone()
    }

    /// Replaces the session with `identity` and `token`.
    ///
    /// The in-memory session changes in one step. Storage receives both
    /// entries or, if a write fails, neither. A blank token is refused and
    /// leaves the session untouched.
    pub fn set(&self, identity: Identity, token: impl Into<String>) {
        let token = token.into();
        if token.trim().is_empty() {
            warn!("refusing to store a session without a token");
            return;
        }

        if let Err(err) = self.persist(&identity, &token) {
            warn!(error = %err, "session not persisted; it will not survive a reload");
        }

        info!(user_id = %identity.id, role = %identity.role, "session established");
        *self.current.borrow_mut() = Session::authenticated(identity, token);
    }

    fn persist(&self, identity: &Identity, token: &str) -> Result<(), StorageError> {
        let user = serde_json::to_string(identity)
            .map_err(|err| StorageError::Backend(err.to_string()))?;

        let written = self
            .storage
            .set(USER_KEY, &user)
            .and_then(|()| self.storage.set(TOKEN_KEY, token));

        if written.is_err() {
            scrub(self.storage.as_ref());
        }
        written
    }

    /// Signs out. Clearing an empty session is a no-op.
    pub fn clear(&self) {
        let was_authenticated = self.current.borrow().is_authenticated();

        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(err) = self.storage.remove(key) {
                warn!(error = %err, key, "failed to remove persisted session entry");
            }
        }
        *self.current.borrow_mut() = Session::empty();

        if was_authenticated {
            info!("session cleared");
        }
    }
}

fn scrub(storage: &dyn KeyValueStorage) {
    for key in [TOKEN_KEY, USER_KEY] {
        let _ = storage.remove(key);
    }
}
