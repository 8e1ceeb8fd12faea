use super::*;
use crate::net::types::Role;

fn session(token: Option<&str>, role: Option<Role>) -> Session {
    Session { token: token.map(str::to_owned), role, loading: false }
}

#[test]
fn signed_out_visitor_goes_to_login() {
    let s = session(None, None);
    assert_eq!(redirect_target(&s, Access::SignedIn), Some(LOGIN_PATH));
    assert_eq!(redirect_target(&s, Access::AdminOnly), Some(LOGIN_PATH));
}

#[test]
fn radiologist_is_kept_out_of_admin_pages() {
    let s = session(Some("t"), Some(Role::Radiologist));
    assert_eq!(redirect_target(&s, Access::SignedIn), None);
    assert_eq!(redirect_target(&s, Access::AdminOnly), Some(HOME_PATH));
}

#[test]
fn unknown_role_is_treated_as_non_admin() {
    let s = session(Some("t"), None);
    assert_eq!(redirect_target(&s, Access::SignedIn), None);
    assert_eq!(redirect_target(&s, Access::AdminOnly), Some(HOME_PATH));
}

#[test]
fn administrator_passes_every_guard() {
    let s = session(Some("t"), Some(Role::Administrator));
    assert_eq!(redirect_target(&s, Access::SignedIn), None);
    assert_eq!(redirect_target(&s, Access::AdminOnly), None);
}

#[test]
fn api_client_carries_session_token() {
    let config = ClientConfig::default();
    let client = api_client(&config, &session(Some("abc"), Some(Role::Radiologist)));
    assert_eq!(client, ApiClient::new(&config.api_base_url, Some("abc".to_owned())));
}

#[test]
fn nothing_is_decided_while_restoring() {
    let s = Session::restoring();
    assert_eq!(redirect_target(&s, Access::AdminOnly), None);
    assert!(!may_render(&s, Access::SignedIn));
}

#[test]
fn may_render_follows_guard() {
    assert!(may_render(&session(Some("t"), Some(Role::Radiologist)), Access::SignedIn));
    assert!(!may_render(&session(Some("t"), Some(Role::Radiologist)), Access::AdminOnly));
    assert!(!may_render(&session(None, None), Access::SignedIn));
}
