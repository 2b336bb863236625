//! Yew components shared by every page.

pub(crate) mod guarded_route;
pub(crate) mod sidebar;

pub use guarded_route::{GuardedRoute, SessionHandle};
pub use sidebar::Sidebar;
