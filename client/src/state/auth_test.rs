use std::cell::RefCell;
use std::collections::HashMap;

use super::*;

#[derive(Default)]
struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    fn with(pairs: &[(&str, &str)]) -> Self {
        let storage = Self::default();
        for (k, v) in pairs {
            storage.set(k, v);
        }
        storage
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.items.borrow_mut().insert(key.to_owned(), value.to_owned());
    }

    fn remove(&self, key: &str) {
        self.items.borrow_mut().remove(key);
    }
}

// =============================================================
// hydrate
// =============================================================

#[test]
fn hydrate_empty_storage_is_signed_out() {
    let session = Session::hydrate(&MemoryStorage::default());
    assert_eq!(session, Session::default());
    assert!(!session.is_authenticated());
}

#[test]
fn hydrate_restores_token_and_role() {
    let storage = MemoryStorage::with(&[("token", "abc"), ("role", "administrador")]);
    let session = Session::hydrate(&storage);
    assert_eq!(session.token.as_deref(), Some("abc"));
    assert_eq!(session.role, Some(Role::Administrator));
    assert!(session.is_admin());
}

#[test]
fn hydrate_ignores_literal_null_token() {
    let storage = MemoryStorage::with(&[("token", "null"), ("role", "radiologo")]);
    let session = Session::hydrate(&storage);
    assert!(!session.is_authenticated());
    assert_eq!(session.role, None);
}

#[test]
fn hydrate_unknown_role_keeps_token_without_role() {
    let storage = MemoryStorage::with(&[("token", "abc"), ("role", "root")]);
    let session = Session::hydrate(&storage);
    assert!(session.is_authenticated());
    assert_eq!(session.role, None);
    assert!(!session.is_admin());
    assert_eq!(session.role_label(), "Usuario");
}

// =============================================================
// login / logout
// =============================================================

#[test]
fn login_persists_token_and_role() {
    let storage = MemoryStorage::default();
    let mut session = Session::default();
    session.login(&storage, "tok", Some(Role::Radiologist));

    assert_eq!(session.token.as_deref(), Some("tok"));
    assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("tok"));
    assert_eq!(storage.get(ROLE_KEY).as_deref(), Some("radiologo"));
    assert_eq!(Session::hydrate(&storage), session);
}

#[test]
fn login_without_role_clears_stale_role() {
    let storage = MemoryStorage::with(&[("role", "administrador")]);
    let mut session = Session::default();
    session.login(&storage, "tok", None);
    assert_eq!(storage.get(ROLE_KEY), None);
    assert_eq!(session.role, None);
}

#[test]
fn logout_clears_memory_and_storage() {
    let storage = MemoryStorage::default();
    let mut session = Session::default();
    session.login(&storage, "tok", Some(Role::Administrator));
    session.logout(&storage);

    assert_eq!(session, Session::default());
    assert_eq!(storage.get(TOKEN_KEY), None);
    assert_eq!(storage.get(ROLE_KEY), None);
    assert!(!Session::hydrate(&storage).is_authenticated());
}

#[test]
fn restoring_session_is_loading_until_hydrated() {
    let pending = Session::restoring();
    assert!(pending.loading);
    assert!(!pending.is_authenticated());
    let storage = MemoryStorage::with(&[("token", "abc"), ("role", "radiologo")]);
    assert!(!Session::hydrate(&storage).loading);
}
