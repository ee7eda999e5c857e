//! User registry — lookup, insert, and partial update of known users.
//!
//! DESIGN
//! ======
//! The store only talks to the `UserRepository` trait so tests can inject a
//! fake and a real backend can replace the in-memory list later. The
//! in-memory registry is process-local: registrations are lost on restart,
//! only the session slot is durable.

#[cfg(test)]
#[path = "repository_test.rs"]
mod tests;

use time::OffsetDateTime;

use crate::user::{Role, Secret, User, UserPatch};

/// A registry entry: the public user plus its credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUser {
    pub user: User,
    pub secret: Secret,
}

/// Input for `UserRepository::insert`. The repository assigns the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub secret: Secret,
    pub role: Role,
    pub created_at: OffsetDateTime,
}

pub trait UserRepository {
    /// Exact, case-sensitive email lookup.
    fn find_by_email(&self, email: &str) -> Option<StoredUser>;

    /// Append a user and return it with its assigned id.
    fn insert(&mut self, new_user: NewUser) -> User;

    /// Merge `patch` into the entry with `id`. Returns false if no entry matched.
    fn update_by_id(&mut self, id: &str, patch: &UserPatch) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// =============================================================================
// IN-MEMORY REGISTRY
// =============================================================================

#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Vec<StoredUser>,
}

impl InMemoryUserRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the two demo accounts (`admin@electron.com`,
    /// `viewer@electron.com`), both created now.
    #[must_use]
    pub fn seeded() -> Self {
        let now = OffsetDateTime::now_utc();
        let mut repo = Self::new();
        repo.insert(NewUser {
            name: "Admin Usuario".into(),
            email: "admin@electron.com".into(),
            secret: Secret::from("admin123"),
            role: Role::Admin,
            created_at: now,
        });
        repo.insert(NewUser {
            name: "Usuario Visualizador".into(),
            email: "viewer@electron.com".into(),
            secret: Secret::from("viewer123"),
            role: Role::Viewer,
            created_at: now,
        });
        repo
    }

    /// Public view of every entry, in insertion order.
    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.iter().map(|stored| &stored.user)
    }
}

impl UserRepository for InMemoryUserRepository {
    fn find_by_email(&self, email: &str) -> Option<StoredUser> {
        self.users.iter().find(|stored| stored.user.email == email).cloned()
    }

    fn insert(&mut self, new_user: NewUser) -> User {
        let user = User {
            id: (self.users.len() + 1).to_string(),
            name: new_user.name,
            email: new_user.email,
            role: new_user.role,
            created_at: new_user.created_at,
        };
        self.users.push(StoredUser { user: user.clone(), secret: new_user.secret });
        user
    }

    fn update_by_id(&mut self, id: &str, patch: &UserPatch) -> bool {
        let Some(stored) = self.users.iter_mut().find(|stored| stored.user.id == id) else {
            return false;
        };
        patch.apply(&mut stored.user);
        true
    }

    fn len(&self) -> usize {
        self.users.len()
    }
}
