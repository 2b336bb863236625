//! Root component and browser entry point.

use yew::{ContextProvider, Html, Properties, function_component, html};
use yew_router::prelude::*;

use crate::components::{GuardedRoute, SessionHandle, Sidebar};
use crate::routes::AppRoute;

/// Props for [`App`].
#[derive(Properties, PartialEq)]
pub struct AppProps {
    /// Session shared with every guarded page.
    pub session: SessionHandle,
}

/// Application shell: provides the session to the tree and guards every
/// routed page.
#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    html! {
        <ContextProvider<SessionHandle> context={props.session.clone()}>
            <BrowserRouter>
                <Shell />
            </BrowserRouter>
        </ContextProvider<SessionHandle>>
    }
}

#[function_component(Shell)]
fn shell() -> Html {
    let current_route = use_route::<AppRoute>();

    html! {
        <div class="flex h-screen">
            <aside class="w-56">
                <Sidebar {current_route} />
            </aside>
            <main class="flex-1">
                <Switch<AppRoute> render={switch} />
            </main>
        </div>
    }
}

fn switch(route: AppRoute) -> Html {
    let path = route.to_path();
    html! {
        <GuardedRoute {route}>
            <section data-route={path.clone()}>{path}</section>
        </GuardedRoute>
    }
}

/// Mounts [`App`] on the page body with a session loaded from
/// `localStorage`.
#[cfg(target_arch = "wasm32")]
pub fn start() {
    use std::rc::Rc;

    use crate::session::SessionStore;
    use crate::storage::BrowserStorage;

    let session = SessionHandle(Rc::new(SessionStore::load(BrowserStorage)));
    yew::Renderer::<App>::with_props(AppProps { session }).render();
}
