//! Read-only session capability and role gating.
//!
//! Consumers that only need to know who is logged in take `&impl SessionView`
//! rather than the whole store.

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;

use crate::user::{Role, Session};

pub trait SessionView {
    fn session(&self) -> &Session;

    fn is_logged_in(&self) -> bool {
        self.session().is_logged_in()
    }

    fn has_role(&self, roles: impl AsRef<[Role]>) -> bool {
        self.session().has_role(roles)
    }
}

impl SessionView for Session {
    fn session(&self) -> &Session {
        self
    }
}

/// Gate content on the viewer holding one of a set of roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleGuard {
    allowed: Vec<Role>,
}

impl RoleGuard {
    #[must_use]
    pub fn new(allowed: impl Into<Vec<Role>>) -> Self {
        Self { allowed: allowed.into() }
    }

    #[must_use]
    pub fn admin_only() -> Self {
        Self::new([Role::Admin])
    }

    /// Logged out viewers are never allowed, whatever the role set.
    #[must_use]
    pub fn allows(&self, view: &impl SessionView) -> bool {
        view.is_logged_in() && view.has_role(&self.allowed)
    }

    /// `content()` when allowed, otherwise `fallback()`.
    pub fn render<T>(&self, view: &impl SessionView, content: impl FnOnce() -> T, fallback: impl FnOnce() -> T) -> T {
        if self.allows(view) { content() } else { fallback() }
    }
}
