//! # Security Module
//!
//! Access model used by the route guard.
//!
//! A route declares what it needs through [`AccessProps`] (taken from its
//! view config). Whether the current user satisfies that is decided by an
//! [`AuthProvider`], which also reports whether the authentication state
//! is still being resolved.
//!
//! ```rust
//! use clientgen::security::{AccessProps, AuthProvider, StaticAuth};
//!
//! let admin_only = AccessProps {
//!     roles_allowed: vec!["ADMIN".to_string()],
//!     ..AccessProps::default()
//! };
//!
//! assert!(StaticAuth::user("ada", ["ADMIN"]).has_access(&admin_only));
//! assert!(!StaticAuth::user("bob", ["USER"]).has_access(&admin_only));
//! assert!(!StaticAuth::anonymous().has_access(&admin_only));
//! ```

use serde::{Deserialize, Serialize};

/// What a route requires from the current user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccessProps {
    pub login_required: bool,
    /// Older spelling of `login_required`
    pub requires_login: bool,
    /// Any one of these roles grants access; empty means any signed-in user
    pub roles_allowed: Vec<String>,
}

impl AccessProps {
    /// Whether the route is protected at all.
    pub fn requires_auth(&self) -> bool {
        self.login_required || self.requires_login || !self.roles_allowed.is_empty()
    }
}

/// Signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl User {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Authentication state as seen by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// Nothing known yet
    Initializing,
    /// A check is in flight
    Loading,
    /// Resolved; `None` is an anonymous visitor
    Resolved(Option<User>),
    /// Resolution failed; treated like no access
    Failed(String),
}

impl AuthState {
    pub fn is_pending(&self) -> bool {
        matches!(self, AuthState::Initializing | AuthState::Loading)
    }
}

/// Source of authentication state.
///
/// Implementations own any timeout or retry policy; callers only read the
/// current state.
pub trait AuthProvider: Send + Sync {
    fn state(&self) -> AuthState;

    /// Whether the current state satisfies `access`.
    ///
    /// Pending and failed states never grant access to a protected route.
    fn has_access(&self, access: &AccessProps) -> bool {
        if !access.requires_auth() {
            return true;
        }
        match self.state() {
            AuthState::Resolved(Some(user)) => {
                access.roles_allowed.is_empty()
                    || access.roles_allowed.iter().any(|role| user.has_role(role))
            }
            AuthState::Resolved(None)
            | AuthState::Initializing
            | AuthState::Loading
            | AuthState::Failed(_) => false,
        }
    }
}

/// Provider with a fixed state.
#[derive(Debug, Clone)]
pub struct StaticAuth {
    state: AuthState,
}

impl StaticAuth {
    pub fn new(state: AuthState) -> Self {
        Self { state }
    }

    pub fn anonymous() -> Self {
        Self::new(AuthState::Resolved(None))
    }

    pub fn user<I, S>(name: &str, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(AuthState::Resolved(Some(User {
            name: name.to_string(),
            roles: roles.into_iter().map(Into::into).collect(),
        })))
    }

    pub fn loading() -> Self {
        Self::new(AuthState::Loading)
    }
}

impl AuthProvider for StaticAuth {
    fn state(&self) -> AuthState {
        self.state.clone()
    }
}
