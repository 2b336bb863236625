//! Navigation and notification collaborators.

use strum::Display;
use tracing::{info, warn};
use yew_router::Routable;

use crate::routes::AppRoute;

/// Moves the app to another page.
pub trait Navigator {
    /// Navigates to `to`.
    fn navigate(&self, to: &AppRoute);
}

impl Navigator for yew_router::navigator::Navigator {
    fn navigate(&self, to: &AppRoute) {
        info!(path = %to.to_path(), "navigating");
        self.push(to);
    }
}

/// Tone of a user notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum NoticeKind {
    /// Positive outcome.
    Success,
    /// Failure.
    Error,
}

/// A message for the user, typically rendered as a toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Tone.
    pub kind: NoticeKind,
    /// Text.
    pub message: String,
}

impl Notice {
    /// A success notice.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    /// An error notice.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

/// Surfaces notices to the user.
pub trait Notifier {
    /// Shows `notice`.
    fn notify(&self, notice: Notice);
}

/// Writes notices to the log. Used where no toast layer is mounted.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.kind {
            NoticeKind::Success => info!(kind = %notice.kind, message = %notice.message, "notice"),
            NoticeKind::Error => warn!(kind = %notice.kind, message = %notice.message, "notice"),
        }
    }
}
