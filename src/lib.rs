//! Storefront session store.
//!
//! ARCHITECTURE
//! ============
//! `SessionStore` owns the current session and drives two injected seams:
//! a `UserRepository` (who exists, and with which secret) and a
//! `SessionSlot` (the one durable record that survives a restart). Readers
//! that only need the session take `&impl SessionView`.

pub mod config;
pub mod guard;
pub mod repository;
pub mod slot;
pub mod store;
pub mod user;

pub use config::SessionConfig;
pub use guard::{RoleGuard, SessionView};
pub use repository::{InMemoryUserRepository, NewUser, StoredUser, UserRepository};
pub use slot::{FileSlot, MemorySlot, SessionSlot, SlotError};
pub use store::{AuthError, SessionStore, SubscriptionId};
pub use user::{Role, Secret, Session, User, UserPatch};
