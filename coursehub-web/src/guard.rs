//! Mount-time access control for client routes.

use yew_router::Routable;

use crate::routes::{AppRoute, is_instructor_area, is_public_auth_page};
use crate::session::{Session, SessionStore};

/// The guard's verdict for one navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDecision {
    /// Whether the page may render.
    pub allow: bool,
    /// Where to send the user instead, when `allow` is false.
    pub redirect_to: Option<AppRoute>,
}

impl RouteDecision {
    /// Proceed to the requested page.
    #[must_use]
    pub const fn allow() -> Self {
        Self {
            allow: true,
            redirect_to: None,
        }
    }

    /// Go to `route` instead.
    #[must_use]
    pub const fn redirect(route: AppRoute) -> Self {
        Self {
            allow: false,
            redirect_to: Some(route),
        }
    }

    /// Where a denied render must go: `redirect_to`, or the sign-in page when
    /// no target was set. `None` when the page may render.
    #[must_use]
    pub fn denial_target(&self) -> Option<AppRoute> {
        if self.allow {
            return None;
        }
        Some(self.redirect_to.clone().unwrap_or(AppRoute::SignIn))
    }

    /// The redirect target as a path, e.g. `/sign-in`.
    #[must_use]
    pub fn redirect_path(&self) -> Option<String> {
        self.redirect_to.as_ref().map(Routable::to_path)
    }
}

/// Decides whether a page may render for the given session.
///
/// Public auth pages and general pages are open to everyone. Pages under
/// `/instructor` require an instructor session; anyone else is sent to the
/// sign-in page. The result depends only on the arguments.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteGuard;

impl RouteGuard {
    /// Evaluates a raw path.
    #[must_use]
    pub fn evaluate(path: &str, session: &Session) -> RouteDecision {
        if is_public_auth_page(path) {
            return RouteDecision::allow();
        }

        if is_instructor_area(path) {
            return match session.role() {
                Some(role) if role.is_instructor() => RouteDecision::allow(),
                _ => RouteDecision::redirect(AppRoute::SignIn),
            };
        }

        RouteDecision::allow()
    }

    /// Evaluates a recognised route.
    #[must_use]
    pub fn evaluate_route(route: &AppRoute, session: &Session) -> RouteDecision {
        Self::evaluate(&route.to_path(), session)
    }

    /// Evaluates `route` against the store's current session.
    #[must_use]
    pub fn check(route: &AppRoute, store: &SessionStore) -> RouteDecision {
        Self::evaluate_route(route, &store.current())
    }
}
