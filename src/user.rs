//! User, role, and session types shared by the store, repository, and slot.
//!
//! DESIGN
//! ======
//! `Session` keeps its fields private so the logged-in flag can never drift
//! from user presence. The persisted record still carries both fields
//! (`{ user, isLoggedIn }`), but on the way back in only `user` decides the
//! state.

#[cfg(test)]
#[path = "user_test.rs"]
mod tests;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

// =============================================================================
// ROLE
// =============================================================================

/// Coarse capability tag used for feature gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Viewer,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Viewer => "viewer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown role `{0}` (expected `admin` or `viewer`)")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "viewer" => Ok(Self::Viewer),
            _ => Err(UnknownRole(raw.to_owned())),
        }
    }
}

// =============================================================================
// USER
// =============================================================================

/// A known user, as exposed outside the registry. Never carries the secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Registry identifier (decimal string).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Login key; unique across the registry.
    pub email: String,
    pub role: Role,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Partial update merged into a user by `SessionStore::update_user`.
///
/// `id` is deliberately absent: an update never changes identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub created_at: Option<OffsetDateTime>,
}

impl UserPatch {
    /// Patch that only renames the user.
    #[must_use]
    pub fn name(name: impl Into<String>) -> Self {
        Self { name: Some(name.into()), ..Self::default() }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.role.is_none() && self.created_at.is_none()
    }

    /// Overwrite every field present in the patch.
    pub fn apply(&self, user: &mut User) {
        if let Some(name) = &self.name {
            user.name.clone_from(name);
        }
        if let Some(email) = &self.email {
            user.email.clone_from(email);
        }
        if let Some(role) = self.role {
            user.role = role;
        }
        if let Some(created_at) = self.created_at {
            user.created_at = created_at;
        }
    }
}

// =============================================================================
// SECRET
// =============================================================================

/// Plaintext login secret held by the mock registry.
///
/// Placeholder only: a real registry stores a password hash. The value is
/// never serialized and is redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Exact, case-sensitive comparison.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        self.0 == candidate
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl From<&str> for Secret {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// Current authentication state: either logged out or bound to one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "SessionRecord")]
pub struct Session {
    user: Option<User>,
    is_logged_in: bool,
}

impl Session {
    #[must_use]
    pub fn logged_out() -> Self {
        Self { user: None, is_logged_in: false }
    }

    #[must_use]
    pub fn logged_in(user: User) -> Self {
        Self { user: Some(user), is_logged_in: true }
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub(crate) fn user_mut(&mut self) -> Option<&mut User> {
        self.user.as_mut()
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.is_logged_in
    }

    /// Role of the current user, if any.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    /// True iff logged in with a role in `roles`. Accepts `[role]`, slices, or vecs.
    #[must_use]
    pub fn has_role(&self, roles: impl AsRef<[Role]>) -> bool {
        self.role().is_some_and(|role| roles.as_ref().contains(&role))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::logged_out()
    }
}

/// Wire shape of a persisted session. Only `user` is trusted.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionRecord {
    user: Option<User>,
    #[serde(default)]
    #[allow(dead_code)]
    is_logged_in: bool,
}

impl From<SessionRecord> for Session {
    fn from(record: SessionRecord) -> Self {
        match record.user {
            Some(user) => Self::logged_in(user),
            None => Self::logged_out(),
        }
    }
}
