use serde::Serialize;

use crate::services::session::SessionStore;

/// A navigation link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub label: String,
    pub href: String,
}

impl NavLink {
    fn new(label: &str, href: &str) -> Self {
        Self {
            label: label.to_string(),
            href: href.to_string(),
        }
    }
}

/// The navigation bar, derived from the session on every render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavbarView {
    pub links: Vec<NavLink>,
    /// `username (ROLE)` when signed in.
    pub user_badge: Option<String>,
    /// Login and Register when signed out, Logout when signed in.
    pub actions: Vec<NavLink>,
}

impl NavbarView {
    pub fn from_session(session: &SessionStore) -> Self {
        let mut links = vec![NavLink::new("Home", "/"), NavLink::new("Products", "/products")];

        match session.user() {
            Some(user) => {
                if session.is_admin() {
                    links.push(NavLink::new("Admin", "/admin"));
                }
                Self {
                    links,
                    user_badge: Some(format!("{} ({})", user.username, user.display_role())),
                    actions: vec![NavLink::new("Logout", "/auth/logout")],
                }
            }
            None => Self {
                links,
                user_badge: None,
                actions: vec![NavLink::new("Login", "/login"), NavLink::new("Register", "/register")],
            },
        }
    }
}
