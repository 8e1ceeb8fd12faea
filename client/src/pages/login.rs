//! Login page: username/password against `POST /auth/login`.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::config::ClientConfig;
use crate::net::api::{ApiClient, ApiError};
use crate::net::types::Role;
use crate::state::auth::Session;
use crate::util::auth::HOME_PATH;
use crate::util::storage::BrowserStorage;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LoginError {
    #[error("Completa usuario y contraseña.")]
    MissingCredentials,
    #[error("Usuario o contraseña incorrectos.")]
    Rejected,
    #[error("No se pudo conectar con el servidor.")]
    Unreachable,
}

impl From<ApiError> for LoginError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Status { status: 400 | 401 | 403 | 404 | 422 } => Self::Rejected,
            _ => Self::Unreachable,
        }
    }
}

/// Trim both fields and require them.
///
/// # Errors
///
/// [`LoginError::MissingCredentials`] when either field is blank.
pub fn validate_credentials(username: &str, password: &str) -> Result<(String, String), LoginError> {
    let username = username.trim();
    let password = password.trim();
    if username.is_empty() || password.is_empty() {
        return Err(LoginError::MissingCredentials);
    }
    Ok((username.to_owned(), password.to_owned()))
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let session = expect_context::<RwSignal<Session>>();
    let config = expect_context::<ClientConfig>();

    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    // Already signed in: skip the form.
    let navigate_home = use_navigate();
    Effect::new(move || {
        let s = session.get();
        if !s.loading && s.is_authenticated() {
            navigate_home(HOME_PATH, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let (user, pass) = match validate_credentials(&username.get_untracked(), &password.get_untracked()) {
            Ok(pair) => pair,
            Err(e) => {
                error.set(Some(e.to_string()));
                return;
            }
        };
        busy.set(true);
        error.set(None);
        let client = ApiClient::new(&config.api_base_url, None);
        leptos::task::spawn_local(async move {
            match client.login(&user, &pass).await {
                Ok(resp) => {
                    let role = Role::parse(&resp.role);
                    if role.is_none() {
                        log::warn!("login: unrecognized role {:?}", resp.role);
                    }
                    session.update(|s| s.login(&BrowserStorage, &resp.access_token, role));
                }
                Err(e) => {
                    log::warn!("login failed: {e}");
                    error.set(Some(LoginError::from(e).to_string()));
                }
            }
            busy.set(false);
        });
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"ToraxVIEW"</h1>
                <p class="login-card__subtitle">"Triaje de radiografías de tórax"</p>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="text"
                        autocomplete="username"
                        placeholder="Usuario"
                        prop:value=move || username.get()
                        on:input=move |ev| username.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        autocomplete="current-password"
                        placeholder="Contraseña"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        {move || if busy.get() { "Ingresando..." } else { "Ingresar" }}
                    </button>
                </form>
                <Show when=move || error.get().is_some()>
                    <p class="login-message">{move || error.get().unwrap_or_default()}</p>
                </Show>
            </div>
        </div>
    }
}
