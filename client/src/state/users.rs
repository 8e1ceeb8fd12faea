//! Radiologist account management state.
//!
//! DESIGN
//! ======
//! The cached listing is only changed by a fresh fetch or by a confirmed,
//! successful delete. Deletion is two-step: `request_delete` arms a pending
//! id, `confirm_delete` hands it to the caller for the network call, and
//! `cancel_delete` disarms it without touching the list.
//!
//! Only one mutation runs at a time: `begin_submit` and `confirm_delete` set
//! `saving`, and `finish_saving` clears it once the response lands.

#[cfg(test)]
#[path = "users_test.rs"]
mod users_test;

use crate::net::types::{Radiologist, UserPayload};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum UserFormError {
    #[error("El nombre de usuario es obligatorio.")]
    MissingUsername,
    #[error("La contraseña es obligatoria para crear un usuario.")]
    MissingPassword,
    #[error("Hay una operación en curso. Espera a que termine.")]
    Busy,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserForm {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, Default)]
pub struct UsersState {
    pub items: Vec<Radiologist>,
    pub loading: bool,
    pub error: Option<String>,
    pub filter: String,
    pub form: UserForm,
    /// Id of the account being edited; `None` means the form creates.
    pub editing_id: Option<String>,
    /// A create, update or delete is in flight.
    pub saving: bool,
    pending_delete: Option<String>,
}

impl UsersState {
    #[must_use]
    pub fn loading() -> Self {
        Self { loading: true, ..Self::default() }
    }

    pub fn set_items(&mut self, items: Vec<Radiologist>) {
        self.items = items;
        self.loading = false;
        self.error = None;
    }

    /// Accounts whose username contains the filter, case-insensitively.
    #[must_use]
    pub fn filtered(&self) -> Vec<Radiologist> {
        let term = self.filter.trim().to_lowercase();
        self.items
            .iter()
            .filter(|u| term.is_empty() || u.username.to_lowercase().contains(&term))
            .cloned()
            .collect()
    }

    /// Load an account into the form. The password starts blank so an
    /// untouched field keeps the stored one.
    pub fn start_edit(&mut self, id: &str) {
        let Some(user) = self.items.iter().find(|u| u.id == id) else {
            return;
        };
        self.form = UserForm { username: user.username.clone(), password: String::new() };
        self.editing_id = Some(user.id.clone());
    }

    pub fn reset_form(&mut self) {
        self.form = UserForm::default();
        self.editing_id = None;
    }

    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.editing_id.is_some()
    }

    /// Validate the form into a request body.
    ///
    /// # Errors
    ///
    /// [`UserFormError::Busy`] while a mutation is in flight. A blank
    /// username always fails; a blank password fails only on create.
    pub fn payload(&self) -> Result<UserPayload, UserFormError> {
        if self.saving {
            return Err(UserFormError::Busy);
        }
        let username = self.form.username.trim();
        if username.is_empty() {
            return Err(UserFormError::MissingUsername);
        }
        let password = self.form.password.trim();
        if password.is_empty() && !self.is_editing() {
            return Err(UserFormError::MissingPassword);
        }
        Ok(UserPayload {
            username: username.to_owned(),
            password: (!password.is_empty()).then(|| password.to_owned()),
        })
    }

    /// Validate the form and mark the save as in flight. Returns the id being
    /// edited (`None` creates) and the body to send.
    ///
    /// # Errors
    ///
    /// Same as [`Self::payload`]; `saving` is left untouched on error.
    pub fn begin_submit(&mut self) -> Result<(Option<String>, UserPayload), UserFormError> {
        let payload = self.payload()?;
        self.saving = true;
        Ok((self.editing_id.clone(), payload))
    }

    pub fn finish_saving(&mut self) {
        self.saving = false;
    }

    pub fn request_delete(&mut self, id: &str) {
        if self.saving {
            return;
        }
        if self.items.iter().any(|u| u.id == id) {
            self.pending_delete = Some(id.to_owned());
        }
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    #[must_use]
    pub fn pending_delete(&self) -> Option<&Radiologist> {
        let id = self.pending_delete.as_deref()?;
        self.items.iter().find(|u| u.id == id)
    }

    /// Disarm the pending delete and return the id to send. Nothing is
    /// returned while another mutation is in flight.
    pub fn confirm_delete(&mut self) -> Option<String> {
        if self.saving {
            return None;
        }
        let id = self.pending_delete.take()?;
        self.saving = true;
        Some(id)
    }

    /// Drop an account from the cache after the backend accepted the delete.
    pub fn remove(&mut self, id: &str) {
        self.items.retain(|u| u.id != id);
        if self.editing_id.as_deref() == Some(id) {
            self.reset_form();
        }
    }
}
