//! "Usuarios": administrator CRUD over radiologist accounts.
//!
//! SYSTEM CONTEXT
//! ==============
//! The list call doubles as a token check: any failure there signs the user
//! out. Mutations reload the list on success and surface a notice either way;
//! their buttons stay disabled while one is in flight.

use leptos::prelude::*;

use crate::app::Clock;
use crate::components::app_shell::AppShell;
use crate::components::confirm_dialog::ConfirmDialog;
use crate::components::notice_toast::{NoticeToast, install_notice_expiry};
use crate::config::ClientConfig;
use crate::net::api::ApiClient;
use crate::state::auth::Session;
use crate::state::notice::{NoticeKind, NoticeQueue};
use crate::state::users::UsersState;
use crate::util::auth::{Access, api_client, sign_out};
use crate::util::format::now_ms;

#[component]
pub fn UsersPage() -> impl IntoView {
    let session = expect_context::<RwSignal<Session>>();
    let config = expect_context::<ClientConfig>();
    let clock = expect_context::<Clock>();
    let users = RwSignal::new(UsersState::loading());
    let notices = RwSignal::new(NoticeQueue::default());
    install_notice_expiry(clock, notices);

    let ttl = config.notice_ttl_ms;
    let notify = move |kind: NoticeKind, text: &str| {
        notices.update(|q| {
            q.push(kind, text, now_ms(), ttl);
        });
    };
    let client = {
        let config = config.clone();
        move || api_client(&config, &session.get_untracked())
    };

    let reload = {
        let client = client.clone();
        move || {
            users.update(|u| u.loading = true);
            let client = client();
            leptos::task::spawn_local(load_users(client, users, session));
        }
    };

    let requested = RwSignal::new(false);
    let initial_load = reload.clone();
    Effect::new(move || {
        let s = session.get();
        if requested.get_untracked() || !s.is_admin() {
            return;
        }
        requested.set(true);
        initial_load();
    });

    let on_submit = {
        let client = client.clone();
        let reload = reload.clone();
        move |ev: leptos::ev::SubmitEvent| {
            ev.prevent_default();
            let (editing_id, payload) = match users.try_update(UsersState::begin_submit) {
                Some(Ok(submit)) => submit,
                Some(Err(e)) => {
                    notify(NoticeKind::Warning, &e.to_string());
                    return;
                }
                None => return,
            };
            let client = client();
            let reload = reload.clone();
            leptos::task::spawn_local(async move {
                let outcome = match editing_id.as_deref() {
                    Some(id) => client.update_radiologist(id, &payload).await,
                    None => client.create_radiologist(&payload).await,
                };
                users.update(UsersState::finish_saving);
                match outcome {
                    Ok(()) => {
                        notify(NoticeKind::Success, "Usuario guardado correctamente");
                        users.update(UsersState::reset_form);
                        reload();
                    }
                    Err(e) => {
                        log::warn!("users: save failed: {e}");
                        notify(NoticeKind::Error, "Error al guardar el usuario");
                    }
                }
            });
        }
    };

    let on_confirm_delete = Callback::new({
        let client = client.clone();
        move |()| {
            let Some(id) = users.try_update(UsersState::confirm_delete).flatten() else {
                return;
            };
            let client = client();
            leptos::task::spawn_local(async move {
                let outcome = client.delete_radiologist(&id).await;
                users.update(UsersState::finish_saving);
                match outcome {
                    Ok(()) => {
                        users.update(|u| u.remove(&id));
                        notify(NoticeKind::Success, "Usuario eliminado");
                    }
                    Err(e) => {
                        log::warn!("users: delete {id} failed: {e}");
                        notify(NoticeKind::Error, "Error al eliminar el usuario");
                    }
                }
            });
        }
    });
    let on_cancel_delete = Callback::new(move |()| users.update(UsersState::cancel_delete));
    let on_dismiss = Callback::new(move |id: u64| notices.update(|q| q.dismiss(id)));
    let on_refresh = move |_| reload();

    view! {
        <AppShell access=Access::AdminOnly title="Usuarios">
            <NoticeToast notices=notices on_dismiss=on_dismiss/>
            <form class="user-form" on:submit=on_submit.clone()>
                <h2>{move || if users.get().is_editing() { "Editar radiólogo" } else { "Nuevo radiólogo" }}</h2>
                <input
                    class="user-form__input"
                    type="text"
                    placeholder="Usuario"
                    prop:value=move || users.get().form.username
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        users.update(|u| u.form.username = value);
                    }
                />
                <input
                    class="user-form__input"
                    type="password"
                    placeholder=move || {
                        if users.get().is_editing() { "Nueva contraseña (opcional)" } else { "Contraseña" }
                    }
                    prop:value=move || users.get().form.password
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        users.update(|u| u.form.password = value);
                    }
                />
                <div class="user-form__actions">
                    <button class="btn btn--primary" type="submit" disabled=move || users.get().saving>
                        {move || if users.get().is_editing() { "Actualizar" } else { "Crear" }}
                    </button>
                    <button class="btn" type="button" on:click=move |_| users.update(UsersState::reset_form)>
                        "Limpiar"
                    </button>
                </div>
            </form>
            <div class="users-toolbar">
                <input
                    class="users-toolbar__search"
                    type="search"
                    placeholder="Filtrar por usuario"
                    prop:value=move || users.get().filter
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        users.update(|u| u.filter = value);
                    }
                />
                <button class="btn" on:click=on_refresh.clone()>
                    "Actualizar lista"
                </button>
            </div>
            <Show
                when=move || !users.get().loading
                fallback=|| view! { <p class="users__loading">"Cargando usuarios..."</p> }
            >
                <table class="users">
                    <thead>
                        <tr>
                            <th>"ID"</th>
                            <th>"Usuario"</th>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || {
                            users
                                .get()
                                .filtered()
                                .into_iter()
                                .map(|user| {
                                    let edit_id = user.id.clone();
                                    let delete_id = user.id.clone();
                                    view! {
                                        <tr>
                                            <td>{user.id}</td>
                                            <td>{user.username}</td>
                                            <td class="users__actions">
                                                <button
                                                    class="btn"
                                                    disabled=move || users.get().saving
                                                    on:click=move |_| users.update(|u| u.start_edit(&edit_id))
                                                >
                                                    "Editar"
                                                </button>
                                                <button
                                                    class="btn btn--danger"
                                                    disabled=move || users.get().saving
                                                    on:click=move |_| users.update(|u| u.request_delete(&delete_id))
                                                >
                                                    "Eliminar"
                                                </button>
                                            </td>
                                        </tr>
                                    }
                                })
                                .collect::<Vec<_>>()
                        }}
                    </tbody>
                </table>
            </Show>
            <Show when=move || users.get().pending_delete().is_some()>
                <ConfirmDialog
                    title="Eliminar radiólogo"
                    message=Signal::derive(move || {
                        let name = users.get().pending_delete().map(|u| u.username.clone()).unwrap_or_default();
                        format!("¿Eliminar la cuenta de {name}? Esta acción no se puede deshacer.")
                    })
                    on_confirm=on_confirm_delete
                    on_cancel=on_cancel_delete
                />
            </Show>
        </AppShell>
    }
}

async fn load_users(client: ApiClient, users: RwSignal<UsersState>, session: RwSignal<Session>) {
    match client.radiologists().await {
        Ok(items) => users.update(|u| u.set_items(items)),
        Err(e) => {
            log::warn!("users: list failed, signing out: {e}");
            users.update(|u| u.loading = false);
            sign_out(session);
        }
    }
}
