//! "Resultados por Radiólogo": per-radiologist records and bulk export.

use leptos::prelude::*;

use crate::app::Clock;
use crate::components::app_shell::AppShell;
use crate::components::export_panel::ExportPanel;
use crate::components::notice_toast::{NoticeToast, install_notice_expiry};
use crate::config::ClientConfig;
use crate::pages::results::RecordList;
use crate::state::auth::Session;
use crate::state::feedbacks::FeedbacksState;
use crate::state::notice::NoticeQueue;
use crate::util::auth::{Access, api_client, sign_out};

#[component]
pub fn FeedbacksPage() -> impl IntoView {
    let session = expect_context::<RwSignal<Session>>();
    let config = expect_context::<ClientConfig>();
    let clock = expect_context::<Clock>();
    let state = RwSignal::new(FeedbacksState::default());
    let notices = RwSignal::new(NoticeQueue::default());
    install_notice_expiry(clock, notices);

    let requested = RwSignal::new(false);
    let list_config = config.clone();
    Effect::new(move || {
        let s = session.get();
        if requested.get_untracked() || !s.is_admin() {
            return;
        }
        requested.set(true);
        let client = api_client(&list_config, &s);
        leptos::task::spawn_local(async move {
            match client.radiologists().await {
                Ok(items) => state.update(|f| f.radiologists = items),
                Err(e) => {
                    log::warn!("feedbacks: radiologist list failed: {e}");
                    if e.is_unauthorized() {
                        sign_out(session);
                    }
                }
            }
        });
    });

    let on_select = Callback::new(move |id: String| {
        let Some(id) = state.try_update(|f| f.select(&id)).flatten() else {
            return;
        };
        let client = api_client(&config, &session.get_untracked());
        leptos::task::spawn_local(async move {
            let outcome = client.records_by_radiologist(&id).await;
            state.update(|f| f.finish_records(&id, outcome));
        });
    });

    let records = Signal::derive(move || state.get().records);
    let on_toggle = Callback::new(move |key: String| state.update(|f| f.records.toggle(&key)));
    let on_dismiss = Callback::new(move |id: u64| notices.update(|q| q.dismiss(id)));

    view! {
        <AppShell access=Access::AdminOnly title="Resultados por Radiólogo">
            <NoticeToast notices=notices on_dismiss=on_dismiss/>
            <div class="chips">
                {move || {
                    let selected = state.get().selected;
                    state
                        .get()
                        .radiologists
                        .into_iter()
                        .map(|r| {
                            let active = selected.as_deref() == Some(r.id.as_str());
                            let id = r.id.clone();
                            view! {
                                <button
                                    class="chip"
                                    class:chip--active=active
                                    on:click=move |_| on_select.run(id.clone())
                                >
                                    {r.username}
                                </button>
                            }
                        })
                        .collect::<Vec<_>>()
                }}
            </div>
            <Show
                when=move || state.get().selected.is_some()
                fallback=|| view! { <p class="records__hint">"Selecciona un radiólogo para ver sus registros."</p> }
            >
                <h2 class="records__heading">
                    {move || format!("Registros de {}", state.get().selected_name().unwrap_or_default())}
                </h2>
                <RecordList records=records on_toggle=on_toggle/>
            </Show>
            <ExportPanel state=state notices=notices/>
        </AppShell>
    }
}
