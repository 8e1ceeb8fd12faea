//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session is the only state shared across views. `App` hydrates it once
//! from durable storage and provides it as `RwSignal<Session>`; route guards
//! and the shell read it, and only login/logout mutate it.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::net::types::Role;

pub const TOKEN_KEY: &str = "token";
pub const ROLE_KEY: &str = "role";

/// Durable key/value storage backing the session.
///
/// Browser builds use `localStorage` (see `util::storage`); tests inject an
/// in-memory map.
pub trait SessionStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Bearer token and role of the signed-in user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub role: Option<Role>,
    /// Durable storage has not been read yet; guards wait.
    pub loading: bool,
}

impl Session {
    /// Placeholder used until the browser storage is read after hydration.
    #[must_use]
    pub fn restoring() -> Self {
        Self { loading: true, ..Self::default() }
    }

    /// Restore a session persisted by a previous page load.
    ///
    /// A missing, empty, or literal `"null"` token means signed out.
    pub fn hydrate(storage: &dyn SessionStorage) -> Self {
        let token = storage.get(TOKEN_KEY).filter(|t| usable_token(t));
        let Some(token) = token else {
            return Self::default();
        };
        let role = storage.get(ROLE_KEY).as_deref().and_then(Role::parse);
        if role.is_none() {
            log::warn!("stored session has no recognized role");
        }
        Self { token: Some(token), role, loading: false }
    }

    /// Persist and adopt a freshly issued token.
    pub fn login(&mut self, storage: &dyn SessionStorage, token: &str, role: Option<Role>) {
        storage.set(TOKEN_KEY, token);
        match role {
            Some(role) => storage.set(ROLE_KEY, role.as_str()),
            None => storage.remove(ROLE_KEY),
        }
        self.token = Some(token.to_owned());
        self.role = role;
        self.loading = false;
    }

    /// Forget the session both in memory and in durable storage.
    pub fn logout(&mut self, storage: &dyn SessionStorage) {
        storage.remove(TOKEN_KEY);
        storage.remove(ROLE_KEY);
        *self = Self::default();
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Administrator)
    }

    #[must_use]
    pub fn role_label(&self) -> &'static str {
        self.role.map_or("Usuario", Role::label)
    }
}

fn usable_token(token: &str) -> bool {
    let trimmed = token.trim();
    !trimmed.is_empty() && trimmed != "null" && trimmed != "undefined"
}
