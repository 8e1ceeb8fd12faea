//! "Análisis": upload a chest X-ray, run inference, annotate, and save.
//!
//! SYSTEM CONTEXT
//! ==============
//! The page is a thin shell around [`AnalysisState`]. Handlers call the
//! `begin_*` step, send the returned payload, and feed the outcome to the
//! matching `finish_*` step. The app clock drives notice expiry and the
//! post-save redirect.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::app::Clock;
use crate::components::app_shell::AppShell;
use crate::components::notice_toast::NoticeToast;
use crate::components::prediction_list::PredictionList;
use crate::config::ClientConfig;
use crate::state::analysis::{AnalysisState, FlowSettings, FlowSignal, GENDER_OPTIONS, PatientField, PatientForm};
use crate::state::auth::Session;
use crate::util::auth::{Access, api_client, sign_out};
use crate::util::format::{format_date, format_percent, now_ms};

/// Where the flow sends the user after a save.
#[must_use]
pub fn history_path(session: &Session) -> &'static str {
    if session.is_admin() { "/feedbacks" } else { "/resultados" }
}

/// Caption of the analyze button for the current phase.
#[must_use]
pub fn analyze_label(state: &AnalysisState) -> &'static str {
    use crate::state::analysis::AnalysisPhase;
    match state.phase {
        AnalysisPhase::Analyzing => "Analizando...",
        AnalysisPhase::ResultsReady | AnalysisPhase::Saving | AnalysisPhase::Saved => "Analizar de nuevo",
        AnalysisPhase::Idle | AnalysisPhase::ImageSelected => "Analizar",
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let session = expect_context::<RwSignal<Session>>();
    let config = expect_context::<ClientConfig>();
    let clock = expect_context::<Clock>();
    let analysis = RwSignal::new(AnalysisState::new(FlowSettings::from(&config), PatientForm::fresh()));
    let dragging = RwSignal::new(false);
    let navigate = use_navigate();

    Effect::new(move || {
        let now = clock.get();
        if !analysis.with_untracked(|s| s.tick_due(now)) {
            return;
        }
        if let Some(FlowSignal::OpenHistory) = analysis.try_update(|s| s.tick(now)).flatten() {
            let target = history_path(&session.get_untracked());
            log::info!("analysis saved; opening {target}");
            navigate(target, NavigateOptions::default());
        }
    });

    let analyze_config = config.clone();
    let on_analyze = Callback::new(move |()| {
        let Some(Ok(pending)) = analysis.try_update(|s| s.begin_analysis(now_ms())) else {
            return;
        };
        let client = api_client(&analyze_config, &session.get_untracked());
        leptos::task::spawn_local(async move {
            let outcome = client.predict(&pending.payload).await;
            if outcome.as_ref().is_err_and(crate::net::api::ApiError::is_unauthorized) {
                sign_out(session);
            }
            analysis.update(|s| s.finish_analysis(pending.generation, outcome, now_ms()));
        });
    });

    let on_save = Callback::new(move |()| {
        let Some(Ok(pending)) = analysis.try_update(|s| s.begin_save(now_ms())) else {
            return;
        };
        let client = api_client(&config, &session.get_untracked());
        leptos::task::spawn_local(async move {
            let outcome = client.save_record(&pending.payload).await;
            if outcome.as_ref().is_err_and(crate::net::api::ApiError::is_unauthorized) {
                sign_out(session);
            }
            analysis.update(|s| s.finish_save(pending.generation, outcome, now_ms()));
        });
    });

    let on_file_change = move |ev: leptos::ev::Event| {
        #[cfg(feature = "hydrate")]
        {
            let input: web_sys::HtmlInputElement = event_target(&ev);
            if let Some(file) = input.files().and_then(|list| list.get(0)) {
                accept_file(analysis, file);
            }
            input.set_value("");
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = ev;
    };

    let on_drop = move |ev: leptos::ev::DragEvent| {
        ev.prevent_default();
        dragging.set(false);
        #[cfg(feature = "hydrate")]
        if let Some(file) = ev.data_transfer().and_then(|dt| dt.files()).and_then(|list| list.get(0)) {
            accept_file(analysis, file);
        }
    };

    let on_dismiss = Callback::new(move |id: u64| analysis.update(|s| s.notices.dismiss(id)));
    let notices = Signal::derive(move || analysis.with(|s| s.notices.clone()));

    view! {
        <AppShell access=Access::SignedIn title="Análisis">
            <NoticeToast notices=notices on_dismiss=on_dismiss/>
            <div class="analysis">
                <section class="analysis__upload">
                    <label
                        class="dropzone"
                        class:dropzone--active=move || dragging.get()
                        on:dragover=move |ev: leptos::ev::DragEvent| {
                            ev.prevent_default();
                            dragging.set(true);
                        }
                        on:dragleave=move |_| dragging.set(false)
                        on:drop=on_drop
                    >
                        <input
                            class="dropzone__input"
                            type="file"
                            accept="image/*"
                            disabled=move || analysis.with(AnalysisState::is_busy)
                            on:change=on_file_change
                        />
                        {move || {
                            analysis
                                .with(|s| s.image.as_ref().map(|img| (img.data_url.clone(), img.file_name.clone())))
                                .map_or_else(
                                    || view! { <span class="dropzone__hint">"Arrastra una radiografía o haz clic para elegirla"</span> }.into_any(),
                                    |(src, name)| view! { <img class="dropzone__preview" src=src alt=name/> }.into_any(),
                                )
                        }}
                    </label>
                </section>

                <section class="analysis__form">
                    <p class="analysis__meta">
                        "Clave: " <code>{move || analysis.with(|s| s.form.key.to_string())}</code>
                    </p>
                    <p class="analysis__meta">
                        "Fecha de inferencia: " {move || analysis.with(|s| format_date(s.form.inference_date))}
                    </p>
                    <PatientInput analysis=analysis field=PatientField::BirthDate kind="date"/>
                    <label class="analysis__field">
                        {PatientField::Gender.label()}
                        <select
                            prop:value=move || analysis.with(|s| s.form.gender.clone())
                            on:change=move |ev| {
                                let value = event_target_value(&ev);
                                analysis.update(|s| s.set_field(PatientField::Gender, value));
                            }
                        >
                            <option value="">"Selecciona"</option>
                            {GENDER_OPTIONS
                                .into_iter()
                                .map(|g| view! { <option value=g>{g}</option> })
                                .collect::<Vec<_>>()}
                        </select>
                    </label>
                    <PatientInput analysis=analysis field=PatientField::City kind="text"/>
                    <PatientInput analysis=analysis field=PatientField::Parish kind="text"/>
                    <PatientInput analysis=analysis field=PatientField::Canton kind="text"/>
                    <button
                        class="btn btn--primary"
                        disabled=move || !analysis.with(AnalysisState::can_analyze)
                        on:click=move |_| on_analyze.run(())
                    >
                        {move || analysis.with(analyze_label)}
                    </button>
                    <button class="btn" type="button" on:click=move |_| analysis.update(AnalysisState::reset)>
                        "Cancelar"
                    </button>
                </section>

                <Show when=move || analysis.with(AnalysisState::shows_results)>
                    <section class="analysis__results">
                        <h2>"Resultados"</h2>
                        {move || view! { <PredictionList predictions=analysis.with(|s| s.predictions.clone())/> }}
                        <p class="analysis__precision">
                            "Precisión: "
                            {move || analysis.with(|s| s.precision.map_or_else(|| "-".to_owned(), format_percent))}
                        </p>
                        <label class="analysis__field">
                            "Observaciones"
                            <textarea
                                rows="4"
                                prop:value=move || analysis.with(|s| s.observation.clone())
                                on:input=move |ev| {
                                    let value = event_target_value(&ev);
                                    analysis.update(|s| s.set_observation(value));
                                }
                            ></textarea>
                        </label>
                        <button
                            class="btn btn--primary"
                            disabled=move || !analysis.with(AnalysisState::can_save)
                            on:click=move |_| on_save.run(())
                        >
                            {move || if analysis.with(AnalysisState::is_busy) { "Guardando..." } else { "Guardar registro" }}
                        </button>
                    </section>
                </Show>
            </div>
        </AppShell>
    }
}

/// Labeled text/date input bound to one patient field.
#[component]
fn PatientInput(analysis: RwSignal<AnalysisState>, field: PatientField, kind: &'static str) -> impl IntoView {
    view! {
        <label class="analysis__field">
            {field.label()}
            <input
                type=kind
                prop:value=move || analysis.with(|s| s.form.get(field).to_owned())
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    analysis.update(|s| s.set_field(field, value));
                }
            />
        </label>
    }
}

#[cfg(feature = "hydrate")]
fn accept_file(analysis: RwSignal<AnalysisState>, file: web_sys::File) {
    leptos::task::spawn_local(async move {
        match crate::util::download::read_file(file).await {
            Ok((name, mime, bytes)) => analysis.update(|s| {
                if let Err(e) = s.select_file(&name, &mime, bytes, now_ms()) {
                    log::debug!("analysis: file {name} rejected: {e}");
                }
            }),
            Err(e) => log::error!("analysis: reading file failed: {e:?}"),
        }
    });
}
