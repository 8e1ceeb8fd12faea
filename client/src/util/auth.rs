//! Shared route-guard and session helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every protected page applies the same redirect rules, and every page
//! builds its backend client from the same session and config.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::config::ClientConfig;
use crate::net::api::ApiClient;
use crate::state::auth::Session;
use crate::util::storage::BrowserStorage;

pub const LOGIN_PATH: &str = "/";
pub const HOME_PATH: &str = "/dashboard";

/// Which pages a route admits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    SignedIn,
    AdminOnly,
}

/// Where a visitor must be sent instead of the requested page, if anywhere.
/// Nothing is decided while the session is still being restored.
#[must_use]
pub fn redirect_target(session: &Session, access: Access) -> Option<&'static str> {
    if session.loading {
        return None;
    }
    if !session.is_authenticated() {
        return Some(LOGIN_PATH);
    }
    if access == Access::AdminOnly && !session.is_admin() {
        return Some(HOME_PATH);
    }
    None
}

/// Redirect away whenever the session stops satisfying `access`.
pub fn install_route_guard<F>(session: RwSignal<Session>, access: Access, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        if let Some(target) = redirect_target(&session.get(), access) {
            navigate(target, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });
}

/// The page may render its content.
#[must_use]
pub fn may_render(session: &Session, access: Access) -> bool {
    !session.loading && redirect_target(session, access).is_none()
}

/// Backend client carrying the current bearer token.
#[must_use]
pub fn api_client(config: &ClientConfig, session: &Session) -> ApiClient {
    ApiClient::new(&config.api_base_url, session.token.clone())
}

/// Clear the session everywhere; the guard then sends the user to login.
pub fn sign_out(session: RwSignal<Session>) {
    session.update(|s| s.logout(&BrowserStorage));
}
