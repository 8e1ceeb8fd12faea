//! "Resultados": the signed-in user's own saved records.

use leptos::prelude::*;

use crate::components::app_shell::AppShell;
use crate::components::record_card::RecordCard;
use crate::config::ClientConfig;
use crate::state::auth::Session;
use crate::state::records::{RecordsState, SortOrder};
use crate::util::auth::{Access, api_client, sign_out};

#[component]
pub fn ResultsPage() -> impl IntoView {
    let session = expect_context::<RwSignal<Session>>();
    let config = expect_context::<ClientConfig>();
    let records = RwSignal::new(RecordsState::loading());

    // Fetch once the session is known.
    let requested = RwSignal::new(false);
    Effect::new(move || {
        let s = session.get();
        if requested.get_untracked() || s.loading || !s.is_authenticated() {
            return;
        }
        requested.set(true);
        let client = api_client(&config, &s);
        leptos::task::spawn_local(async move {
            match client.my_records().await {
                Ok(items) => {
                    log::debug!("results: {} records", items.len());
                    records.update(|r| r.set_items(items));
                }
                Err(e) => {
                    log::warn!("results: fetch failed: {e}");
                    if e.is_unauthorized() {
                        sign_out(session);
                    }
                    records.update(|r| {
                        r.loading = false;
                        r.error = Some("No se pudieron cargar los registros.".to_owned());
                    });
                }
            }
        });
    });

    let on_toggle = Callback::new(move |key: String| records.update(|r| r.toggle(&key)));

    view! {
        <AppShell access=Access::SignedIn title="Resultados">
            <div class="records-toolbar">
                <input
                    class="records-toolbar__search"
                    type="search"
                    placeholder="Buscar por clave, ciudad, parroquia, cantón o género"
                    prop:value=move || records.get().query
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        records.update(|r| r.query = value);
                    }
                />
                <select
                    class="records-toolbar__sort"
                    prop:value=move || records.get().sort.as_str()
                    on:change=move |ev| {
                        let order = SortOrder::parse(&event_target_value(&ev));
                        records.update(|r| r.sort = order);
                    }
                >
                    {SortOrder::OFFERED
                        .into_iter()
                        .map(|o| view! { <option value=o.as_str()>{o.label()}</option> })
                        .collect::<Vec<_>>()}
                </select>
            </div>
            <RecordList records=records on_toggle=on_toggle/>
        </AppShell>
    }
}

/// Loading, error, empty, or card list for a [`RecordsState`].
#[component]
pub fn RecordList(#[prop(into)] records: Signal<RecordsState>, on_toggle: Callback<String>) -> impl IntoView {
    view! {
        <Show when=move || records.get().error.is_some()>
            <p class="records__error">{move || records.get().error.unwrap_or_default()}</p>
        </Show>
        <Show
            when=move || !records.get().loading
            fallback=|| view! { <p class="records__loading">"Cargando registros..."</p> }
        >
            {move || {
                let visible = records.get().visible();
                if visible.is_empty() {
                    return view! { <p class="records__empty">"No hay registros."</p> }.into_any();
                }
                view! {
                    <div class="records">
                        {visible
                            .into_iter()
                            .map(|record| {
                                let key = record.key.clone();
                                let expanded = Signal::derive(move || records.with(|r| r.is_expanded(&key)));
                                view! { <RecordCard record=record expanded=expanded on_toggle=on_toggle/> }
                            })
                            .collect::<Vec<_>>()}
                    </div>
                }
                .into_any()
            }}
        </Show>
    }
}
