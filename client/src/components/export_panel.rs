//! Bulk export form for administrators.
//!
//! Builds an export query from the form, downloads the response body and
//! hands it to the browser as a file.

use leptos::prelude::*;

use crate::config::ClientConfig;
use crate::net::types::ExportFormat;
use crate::state::auth::Session;
use crate::state::export::{EXPORT_FAILED_TEXT, EXPORT_OK_TEXT, download_file_name};
use crate::state::feedbacks::FeedbacksState;
use crate::state::notice::{NoticeKind, NoticeQueue};
use crate::util::auth::api_client;
use crate::util::format::{now_ms, today_utc};

#[component]
pub fn ExportPanel(state: RwSignal<FeedbacksState>, notices: RwSignal<NoticeQueue>) -> impl IntoView {
    let session = expect_context::<RwSignal<Session>>();
    let config = expect_context::<ClientConfig>();
    let ttl = config.notice_ttl_ms;

    let notify = move |kind: NoticeKind, text: String| {
        notices.update(|q| {
            q.push(kind, text, now_ms(), ttl);
        });
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let form = state.get_untracked().export;
        if form.busy {
            return;
        }
        let query = match form.to_query() {
            Ok(query) => query,
            Err(e) => {
                notify(NoticeKind::Warning, e.to_string());
                return;
            }
        };
        state.update(|s| s.export.busy = true);
        let client = api_client(&config, &session.get_untracked());
        leptos::task::spawn_local(async move {
            let outcome = client.export_records(&query).await;
            state.update(|s| s.export.busy = false);
            match outcome {
                Ok(file) => {
                    let name = download_file_name(&file, query.format, today_utc());
                    #[cfg(feature = "hydrate")]
                    if let Err(e) = crate::util::download::save_bytes(&file.bytes, &file.content_type, &name) {
                        log::error!("export: saving {name} failed: {e:?}");
                        notify(NoticeKind::Error, EXPORT_FAILED_TEXT.to_owned());
                        return;
                    }
                    log::info!("export: downloaded {name} ({} bytes)", file.bytes.len());
                    notify(NoticeKind::Success, EXPORT_OK_TEXT.to_owned());
                }
                Err(e) => {
                    log::warn!("export failed: {e}");
                    notify(NoticeKind::Error, EXPORT_FAILED_TEXT.to_owned());
                }
            }
        });
    };

    view! {
        <form class="export-panel" on:submit=on_submit>
            <h2>"Exportar registros"</h2>
            <label class="export-panel__field">
                "Radiólogo"
                <select
                    prop:value=move || state.get().export.user_id
                    on:change=move |ev| {
                        let value = event_target_value(&ev);
                        state.update(|s| s.export.user_id = value);
                    }
                >
                    <option value="">"Todos"</option>
                    {move || {
                        state
                            .get()
                            .radiologists
                            .into_iter()
                            .map(|r| view! { <option value=r.id>{r.username}</option> })
                            .collect::<Vec<_>>()
                    }}
                </select>
            </label>
            <label class="export-panel__field">
                "Desde"
                <input
                    type="date"
                    prop:value=move || state.get().export.date_from
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        state.update(|s| s.export.date_from = value);
                    }
                />
            </label>
            <label class="export-panel__field">
                "Hasta"
                <input
                    type="date"
                    prop:value=move || state.get().export.date_to
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        state.update(|s| s.export.date_to = value);
                    }
                />
            </label>
            <label class="export-panel__field">
                "Formato"
                <select
                    prop:value=move || state.get().export.format.as_str()
                    on:change=move |ev| {
                        if let Some(format) = ExportFormat::parse(&event_target_value(&ev)) {
                            state.update(|s| s.export.set_format(format));
                        }
                    }
                >
                    {ExportFormat::ALL
                        .into_iter()
                        .map(|f| view! { <option value=f.as_str()>{f.as_str().to_ascii_uppercase()}</option> })
                        .collect::<Vec<_>>()}
                </select>
            </label>
            <Show when=move || state.get().export.format.supports_images()>
                <label class="export-panel__check">
                    <input
                        type="checkbox"
                        prop:checked=move || state.get().export.include_images
                        on:change=move |ev| {
                            let checked = event_target_checked(&ev);
                            state.update(|s| s.export.include_images = checked);
                        }
                    />
                    "Incluir imágenes"
                </label>
            </Show>
            <button class="btn btn--primary" type="submit" disabled=move || state.get().export.busy>
                {move || if state.get().export.busy { "Exportando..." } else { "Exportar" }}
            </button>
        </form>
    }
}
