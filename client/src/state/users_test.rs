use super::*;

fn user(id: &str, name: &str) -> Radiologist {
    Radiologist { id: id.to_owned(), username: name.to_owned() }
}

fn loaded() -> UsersState {
    let mut state = UsersState::default();
    state.set_items(vec![user("1", "ana"), user("2", "Bruno"), user("3", "carla")]);
    state
}

fn ids(items: &[Radiologist]) -> Vec<&str> {
    items.iter().map(|u| u.id.as_str()).collect()
}

// =============================================================
// delete confirmation
// =============================================================

#[test]
fn cancel_delete_leaves_list_unchanged() {
    let mut state = loaded();
    state.request_delete("2");
    assert_eq!(state.pending_delete().map(|u| u.username.as_str()), Some("Bruno"));

    state.cancel_delete();
    assert!(state.pending_delete().is_none());
    assert_eq!(state.confirm_delete(), None);
    assert_eq!(ids(&state.items), vec!["1", "2", "3"]);
}

#[test]
fn confirmed_delete_removes_only_after_success() {
    let mut state = loaded();
    state.request_delete("2");
    let id = state.confirm_delete();
    assert_eq!(id.as_deref(), Some("2"));
    assert_eq!(state.items.len(), 3, "list untouched until the backend answers");

    state.remove("2");
    assert_eq!(ids(&state.items), vec!["1", "3"]);
}

#[test]
fn request_delete_for_unknown_id_is_ignored() {
    let mut state = loaded();
    state.request_delete("99");
    assert!(state.pending_delete().is_none());
}

#[test]
fn removing_edited_user_resets_form() {
    let mut state = loaded();
    state.start_edit("3");
    state.remove("3");
    assert!(!state.is_editing());
    assert_eq!(state.form, UserForm::default());
}

// =============================================================
// form payload
// =============================================================

#[test]
fn create_requires_username_and_password() {
    let mut state = UsersState::default();
    assert_eq!(state.payload(), Err(UserFormError::MissingUsername));

    state.form.username = "  dora ".to_owned();
    assert_eq!(state.payload(), Err(UserFormError::MissingPassword));

    state.form.password = "secreto".to_owned();
    assert_eq!(
        state.payload(),
        Ok(UserPayload { username: "dora".to_owned(), password: Some("secreto".to_owned()) })
    );
}

#[test]
fn update_with_blank_password_omits_it() {
    let mut state = loaded();
    state.start_edit("1");
    assert_eq!(state.form.username, "ana");
    assert!(state.form.password.is_empty());

    state.form.username = "ana.m".to_owned();
    let payload = state.payload().expect("valid edit");
    assert_eq!(payload.password, None);
    let json = serde_json::to_value(&payload).expect("serialize");
    assert!(json.get("password").is_none());
}

#[test]
fn update_still_requires_username() {
    let mut state = loaded();
    state.start_edit("1");
    state.form.username = "   ".to_owned();
    assert_eq!(state.payload(), Err(UserFormError::MissingUsername));
}

#[test]
fn reset_form_returns_to_create_mode() {
    let mut state = loaded();
    state.start_edit("2");
    state.form.password = "x".to_owned();
    state.reset_form();
    assert!(!state.is_editing());
    assert!(state.form.username.is_empty());
}

// =============================================================
// filter
// =============================================================

#[test]
fn filter_matches_username_case_insensitively() {
    let mut state = loaded();
    state.filter = "BR".to_owned();
    assert_eq!(ids(&state.filtered()), vec!["2"]);
    state.filter = "a".to_owned();
    assert_eq!(ids(&state.filtered()), vec!["1", "3"]);
    state.filter = " ".to_owned();
    assert_eq!(state.filtered().len(), 3);
}

#[test]
fn loading_state_has_nothing_pending() {
    let mut state = UsersState::loading();
    assert!(state.loading);
    assert!(!state.saving);
    assert!(state.items.is_empty());
    assert!(state.pending_delete().is_none());
    assert_eq!(state.confirm_delete(), None);
}

// =============================================================
// in-flight guard
// =============================================================

fn filled(state: &mut UsersState) {
    state.form = UserForm { username: "diego".to_owned(), password: "secreta".to_owned() };
}

#[test]
fn second_submit_is_refused_while_saving() {
    let mut state = loaded();
    filled(&mut state);
    let (id, payload) = state.begin_submit().expect("first submit");
    assert_eq!(id, None);
    assert_eq!(payload.username, "diego");
    assert!(state.saving);

    assert_eq!(state.begin_submit(), Err(UserFormError::Busy));
    assert_eq!(state.payload(), Err(UserFormError::Busy));

    state.finish_saving();
    assert!(state.begin_submit().is_ok());
}

#[test]
fn invalid_submit_does_not_mark_saving() {
    let mut state = loaded();
    assert_eq!(state.begin_submit(), Err(UserFormError::MissingUsername));
    assert!(!state.saving);
}

#[test]
fn edit_submit_carries_the_edited_id() {
    let mut state = loaded();
    state.start_edit("2");
    let (id, payload) = state.begin_submit().expect("valid edit");
    assert_eq!(id.as_deref(), Some("2"));
    assert_eq!(payload.password, None);
}

#[test]
fn confirm_delete_is_refused_while_saving() {
    let mut state = loaded();
    state.request_delete("1");
    assert_eq!(state.confirm_delete().as_deref(), Some("1"));
    assert!(state.saving);

    state.request_delete("2");
    assert!(state.pending_delete().is_none(), "no new delete armed mid-flight");
    assert_eq!(state.confirm_delete(), None);

    state.finish_saving();
    state.request_delete("2");
    assert_eq!(state.confirm_delete().as_deref(), Some("2"));
}

#[test]
fn delete_is_refused_during_pending_submit() {
    let mut state = loaded();
    state.request_delete("3");
    filled(&mut state);
    state.begin_submit().expect("submit");
    assert_eq!(state.confirm_delete(), None);
    assert_eq!(state.pending_delete().map(|u| u.id.as_str()), Some("3"));
}
