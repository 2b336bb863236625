//! Session context and the guard component that wraps every routed page.

use std::ops::Deref;
use std::rc::Rc;
use tracing::debug;
use yew::{Html, Properties, function_component, html, use_context};
use yew_router::prelude::Redirect;

use crate::guard::RouteGuard;
use crate::routes::AppRoute;
use crate::session::{Session, SessionStore};

/// The session store as a Yew context value. Two handles are equal when they
/// point at the same store.
#[derive(Debug, Clone)]
pub struct SessionHandle(pub Rc<SessionStore>);

impl PartialEq for SessionHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for SessionHandle {
    type Target = SessionStore;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Props for [`GuardedRoute`].
#[derive(Properties, PartialEq)]
pub struct GuardedRouteProps {
    /// Page being rendered.
    pub route: AppRoute,
    /// Page content, shown only when the guard allows it.
    #[prop_or_default]
    pub children: Html,
}

/// Renders its children only when the guard allows `route` for the current
/// session; otherwise redirects. Evaluated on every render.
#[function_component(GuardedRoute)]
pub fn guarded_route(props: &GuardedRouteProps) -> Html {
    let session = use_context::<SessionHandle>()
        .map(|handle| handle.current())
        .unwrap_or_else(Session::empty);

    let decision = RouteGuard::evaluate_route(&props.route, &session);
    match decision.denial_target() {
        Some(target) => {
            debug!(?target, "route guard redirect");
            html! { <Redirect<AppRoute> to={target} /> }
        }
        None => props.children.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn handles_compare_by_store() {
        let store = Rc::new(SessionStore::load(MemoryStorage::new()));
        let a = SessionHandle(store.clone());
        let b = SessionHandle(store);
        let other = SessionHandle(Rc::new(SessionStore::load(MemoryStorage::new())));

        assert_eq!(a, b);
        assert_ne!(a, other);
        assert!(!a.current().is_authenticated());
    }
}
