//! Navigation links for the current route.

use yew::{Html, Properties, classes, function_component, html};
use yew_router::prelude::{Link, Routable};

use crate::routes::{AppRoute, sidebar_links};

/// Props for [`Sidebar`].
#[derive(Properties, PartialEq, Eq)]
pub struct SidebarProps {
    /// Route being shown, used to highlight its link.
    pub current_route: Option<AppRoute>,
}

/// Sidebar listing the links for the current path.
#[function_component(Sidebar)]
pub fn sidebar(props: &SidebarProps) -> Html {
    let path = props
        .current_route
        .as_ref()
        .map_or_else(|| "/".to_string(), Routable::to_path);

    html! {
        <nav class="flex flex-col w-full">
            {
                for sidebar_links(&path).into_iter().map(|link| {
                    let active = props.current_route.as_ref() == Some(&link.route);
                    html! {
                        <Link<AppRoute>
                            to={link.route}
                            classes={classes!("sidebar-item", active.then_some("sidebar-item-active"))}
                        >
                            {link.label}
                        </Link<AppRoute>>
                    }
                })
            }
        </nav>
    }
}
