//! User-facing session actions: finishing a login and logging out.

use shared::models::Identity;
use std::fmt;
use std::rc::Rc;
use tracing::info;

use crate::navigation::Navigator;
use crate::routes::AppRoute;
use crate::session::{Session, SessionStore};

/// Called with the outgoing session before a logout clears it.
pub type RevokeHook = Rc<dyn Fn(&Session)>;

/// Pairs each session mutation with the navigation that follows it.
#[derive(Clone)]
pub struct SessionActions {
    store: Rc<SessionStore>,
    navigator: Rc<dyn Navigator>,
    revoke: Option<RevokeHook>,
}

impl fmt::Debug for SessionActions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionActions")
            .field("store", &self.store)
            .field("revoke", &self.revoke.is_some())
            .finish_non_exhaustive()
    }
}

impl SessionActions {
    /// Actions over `store`, navigating with `navigator`.
    pub fn new(store: Rc<SessionStore>, navigator: Rc<dyn Navigator>) -> Self {
        Self {
            store,
            navigator,
            revoke: None,
        }
    }

    /// Runs `hook` on logout, e.g. to tell the server to drop the token.
    #[must_use]
    pub fn with_revoke(mut self, hook: impl Fn(&Session) + 'static) -> Self {
        self.revoke = Some(Rc::new(hook));
        self
    }

    /// The store these actions mutate.
    #[must_use]
    pub const fn store(&self) -> &Rc<SessionStore> {
        &self.store
    }

    /// The navigator used after each action.
    #[must_use]
    pub fn navigator(&self) -> &dyn Navigator {
        self.navigator.as_ref()
    }

    /// Stores the new session, then goes to `destination`.
    pub fn complete_login(&self, identity: Identity, token: &str, destination: &AppRoute) {
        self.store.set(identity, token);
        self.navigator.navigate(destination);
    }

    /// Clears the session, then goes to `destination`. Never fails.
    pub fn logout(&self, destination: &AppRoute) {
        let outgoing = self.store.current();
        if outgoing.is_authenticated() {
            if let Some(revoke) = self.revoke.as_ref() {
                revoke(&outgoing);
            }
            info!("logging out");
        }
        self.store.clear();
        self.navigator.navigate(destination);
    }
}
