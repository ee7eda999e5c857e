//! Session store configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::path::PathBuf;

use crate::slot::DEFAULT_SLOT_KEY;

pub const DEFAULT_SLOT_DIR: &str = ".storefront";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Directory holding the file-backed session slot.
    pub slot_dir: PathBuf,
    /// Slot key; the record lives at `<slot_dir>/<slot_key>.json`.
    pub slot_key: String,
    /// Seed the registry with the demo admin and viewer accounts.
    pub seed_users: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { slot_dir: PathBuf::from(DEFAULT_SLOT_DIR), slot_key: DEFAULT_SLOT_KEY.to_owned(), seed_users: true }
    }
}

impl SessionConfig {
    /// Build config from environment variables. Unset or unparsable values
    /// fall back to defaults.
    ///
    /// - `STOREFRONT_SLOT_DIR`: default `.storefront`
    /// - `STOREFRONT_SLOT_KEY`: default `userSession`
    /// - `STOREFRONT_SEED_USERS`: `true`/`false` (also `1`/`0`, `yes`/`no`, `on`/`off`), default `true`
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            slot_dir: env_string("STOREFRONT_SLOT_DIR").map_or(defaults.slot_dir, PathBuf::from),
            slot_key: env_string("STOREFRONT_SLOT_KEY").unwrap_or(defaults.slot_key),
            seed_users: env_bool("STOREFRONT_SEED_USERS").unwrap_or(defaults.seed_users),
        }
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}
