//! Route table for the CourseHub client and the path helpers the guard and
//! the navigation chrome share.

use yew_router::prelude::*;

/// Every page the client knows about.
#[derive(Debug, Clone, PartialEq, Eq, Routable)]
pub enum AppRoute {
    /// Landing page.
    #[at("/")]
    Home,
    /// Signed-in overview.
    #[at("/dashboard")]
    Dashboard,
    /// Course search.
    #[at("/search")]
    Search,
    /// Sign-in form.
    #[at("/sign-in")]
    SignIn,
    /// Account creation form.
    #[at("/sign-up")]
    SignUp,
    /// Password reset request form.
    #[at("/forgot-password")]
    ForgotPassword,
    /// Password reset form for an emailed token.
    #[at("/reset-password/:token")]
    ResetPassword {
        /// Reset token from the email link.
        token: String,
    },
    /// Email verification for an emailed token.
    #[at("/verify-email/:token")]
    VerifyEmail {
        /// Verification token from the email link.
        token: String,
    },
    /// Instructor's course list.
    #[at("/instructor/course")]
    InstructorCourses,
    /// New course form.
    #[at("/instructor/course/create")]
    CreateCourse,
    /// One course, instructor view.
    #[at("/instructor/course/:course_id")]
    InstructorCourse {
        /// Course identifier.
        course_id: String,
    },
    /// Course edit form.
    #[at("/instructor/course/:course_id/edit")]
    EditCourse {
        /// Course identifier.
        course_id: String,
    },
    /// Instructor analytics.
    #[at("/instructor/analytics")]
    InstructorAnalytics,
    /// Anything the table does not know.
    #[not_found]
    #[at("/404")]
    NotFound,
}

impl AppRoute {
    /// Resolves a configured path to a route, falling back to the dashboard
    /// for anything the table does not know.
    #[must_use]
    pub fn from_path_or_dashboard(path: &str) -> Self {
        match Self::recognize(normalize_path(path)) {
            Some(Self::NotFound) | None => Self::Dashboard,
            Some(route) => route,
        }
    }
}

/// First path segments of the pages reachable without a session.
const PUBLIC_AUTH_SEGMENTS: &[&str] = &[
    "sign-in",
    "sign-up",
    "reset-password",
    "forgot-password",
    "verify-email",
];

const INSTRUCTOR_SEGMENT: &str = "instructor";

/// Drops query string, fragment and trailing slashes. The root stays `/`.
#[must_use]
pub fn normalize_path(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let trimmed = path[..end].trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

fn first_segment(path: &str) -> Option<&str> {
    normalize_path(path)
        .split('/')
        .find(|segment| !segment.is_empty())
}

/// Whether `path` is one of the sign-in/sign-up/reset/forgot/verify pages.
#[must_use]
pub fn is_public_auth_page(path: &str) -> bool {
    first_segment(path).is_some_and(|segment| PUBLIC_AUTH_SEGMENTS.contains(&segment))
}

/// Whether `path` is `/instructor` or below it.
#[must_use]
pub fn is_instructor_area(path: &str) -> bool {
    first_segment(path) == Some(INSTRUCTOR_SEGMENT)
}

/// An entry in the sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    /// Text shown for the link.
    pub label: &'static str,
    /// Where it goes.
    pub route: AppRoute,
}

/// Sidebar entries for the page at `path`: course management links inside
/// the instructor area, browsing links everywhere else.
#[must_use]
pub fn sidebar_links(path: &str) -> Vec<NavLink> {
    if is_instructor_area(path) {
        vec![
            NavLink {
                label: "Courses",
                route: AppRoute::InstructorCourses,
            },
            NavLink {
                label: "Analytics",
                route: AppRoute::InstructorAnalytics,
            },
        ]
    } else {
        vec![
            NavLink {
                label: "Dashboard",
                route: AppRoute::Home,
            },
            NavLink {
                label: "Browse",
                route: AppRoute::Search,
            },
        ]
    }
}
