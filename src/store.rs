//! Session store — the single source of truth for who is logged in.
//!
//! DESIGN
//! ======
//! One `SessionStore` is built per process and passed explicitly: readers
//! take `&impl SessionView`, writers take `&mut SessionStore`. Every
//! successful transition replaces the in-memory session, writes (or removes)
//! the durable slot, then notifies observers synchronously in subscription
//! order. Failed operations touch nothing.
//!
//! TRADE-OFFS
//! ==========
//! Slot write failures are logged and swallowed. The in-memory session stays
//! authoritative for the running process; the only cost is that a restart
//! may come back logged out.

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;

use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::guard::SessionView;
use crate::repository::{NewUser, UserRepository};
use crate::slot::SessionSlot;
use crate::user::{Role, Secret, Session, User, UserPatch};

// =============================================================================
// ERROR TYPE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Unknown email and wrong secret are deliberately indistinguishable.
    #[error("invalid email or secret")]
    InvalidCredentials,
    #[error("email already registered")]
    DuplicateEmail,
    #[error("no active session")]
    NoActiveSession,
}

// =============================================================================
// OBSERVERS
// =============================================================================

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&Session)>;

// =============================================================================
// SESSION STORE
// =============================================================================

pub struct SessionStore<R, S> {
    repository: R,
    slot: S,
    session: Session,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl<R: UserRepository, S: SessionSlot> SessionStore<R, S> {
    /// Build the store and restore any session left in `slot`.
    ///
    /// A missing or unreadable slot starts logged out. A record that fails to
    /// parse is discarded.
    pub fn open(repository: R, slot: S) -> Self {
        let session = restore(&slot);
        Self { repository, slot, session, observers: Vec::new(), next_subscription: 0 }
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn current_user(&self) -> Option<&User> {
        self.session.user()
    }

    #[must_use]
    pub fn has_role(&self, roles: impl AsRef<[Role]>) -> bool {
        self.session.has_role(roles)
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    // -------------------------------------------------------------------------
    // Boolean API
    // -------------------------------------------------------------------------

    /// Log in with an exact email/secret match. Returns false on mismatch
    /// and leaves the current session untouched.
    pub fn login(&mut self, email: &str, secret: &str) -> bool {
        self.try_login(email, secret).is_ok()
    }

    /// Register a viewer and log in as them. Returns false if the email is taken.
    pub fn register(&mut self, name: &str, email: &str, secret: &str) -> bool {
        self.try_register(name, email, secret).is_ok()
    }

    /// Merge `patch` into the current user. No-op when logged out.
    pub fn update_user(&mut self, patch: UserPatch) {
        let _ = self.try_update_user(patch);
    }

    /// Clear the session and the durable slot. Always succeeds.
    pub fn logout(&mut self) {
        let user_id = self.session.user().map(|u| u.id.clone());
        self.session = Session::logged_out();
        if let Err(e) = self.slot.remove() {
            warn!(error = %e, "session slot remove failed");
        }
        info!(user_id = user_id.as_deref().unwrap_or("-"), "logged out");
        self.notify();
    }

    // -------------------------------------------------------------------------
    // Typed API
    // -------------------------------------------------------------------------

    /// # Errors
    ///
    /// `InvalidCredentials` if no registry entry matches both email and secret.
    pub fn try_login(&mut self, email: &str, secret: &str) -> Result<User, AuthError> {
        let stored = self
            .repository
            .find_by_email(email)
            .filter(|stored| stored.secret.matches(secret))
            .ok_or_else(|| {
                debug!("login rejected");
                AuthError::InvalidCredentials
            })?;

        info!(user_id = %stored.user.id, role = %stored.user.role, "logged in");
        self.begin_session(stored.user.clone());
        Ok(stored.user)
    }

    /// # Errors
    ///
    /// `DuplicateEmail` if the email already exists; the registry and the
    /// current session are left unchanged.
    pub fn try_register(&mut self, name: &str, email: &str, secret: &str) -> Result<User, AuthError> {
        if self.repository.find_by_email(email).is_some() {
            debug!("registration rejected: duplicate email");
            return Err(AuthError::DuplicateEmail);
        }

        let user = self.repository.insert(NewUser {
            name: name.to_owned(),
            email: email.to_owned(),
            secret: Secret::new(secret),
            role: Role::Viewer,
            created_at: OffsetDateTime::now_utc(),
        });

        info!(user_id = %user.id, registry_len = self.repository.len(), "registered");
        self.begin_session(user.clone());
        Ok(user)
    }

    /// # Errors
    ///
    /// `NoActiveSession` when logged out; nothing is persisted or notified.
    pub fn try_update_user(&mut self, patch: UserPatch) -> Result<User, AuthError> {
        let Some(user) = self.session.user_mut() else {
            return Err(AuthError::NoActiveSession);
        };
        patch.apply(user);
        let updated = user.clone();

        self.persist();
        if !self.repository.update_by_id(&updated.id, &patch) {
            debug!(user_id = %updated.id, "session user not in registry; registry left as is");
        }

        info!(user_id = %updated.id, "user updated");
        self.notify();
        Ok(updated)
    }

    // -------------------------------------------------------------------------
    // Observers
    // -------------------------------------------------------------------------

    /// Register `observer` to be called with the new session after every change.
    pub fn subscribe(&mut self, observer: impl FnMut(&Session) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn begin_session(&mut self, user: User) {
        self.session = Session::logged_in(user);
        self.persist();
        self.notify();
    }

    fn persist(&self) {
        match serde_json::to_string(&self.session) {
            Ok(record) => {
                if let Err(e) = self.slot.store(&record) {
                    warn!(error = %e, "session slot write failed");
                }
            }
            Err(e) => warn!(error = %e, "session serialize failed"),
        }
    }

    fn notify(&mut self) {
        for (_, observer) in &mut self.observers {
            observer(&self.session);
        }
    }
}

impl<R: UserRepository, S: SessionSlot> SessionView for SessionStore<R, S> {
    fn session(&self) -> &Session {
        &self.session
    }
}

fn restore(slot: &impl SessionSlot) -> Session {
    let record = match slot.load() {
        Ok(Some(record)) => record,
        Ok(None) => return Session::logged_out(),
        Err(e) => {
            warn!(error = %e, "session slot unreadable; starting logged out");
            return Session::logged_out();
        }
    };

    match serde_json::from_str::<Session>(&record) {
        Ok(session) => {
            debug!(logged_in = session.is_logged_in(), "restored session from slot");
            session
        }
        Err(e) => {
            warn!(error = %e, "discarding corrupt session record");
            if let Err(e) = slot.remove() {
                warn!(error = %e, "session slot remove failed");
            }
            Session::logged_out()
        }
    }
}
