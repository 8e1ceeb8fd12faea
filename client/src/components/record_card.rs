//! Collapsible card for one saved diagnostic record.

use leptos::prelude::*;

use crate::components::prediction_list::PredictionList;
use crate::net::types::DiagnosticRecord;
use crate::util::format::format_percent;

const NO_OBSERVATION: &str = "Sin observaciones.";

#[component]
pub fn RecordCard(
    record: DiagnosticRecord,
    #[prop(into)] expanded: Signal<bool>,
    on_toggle: Callback<String>,
) -> impl IntoView {
    let predictions = record.predictions();
    let precision = record.precision.map_or_else(|| "-".to_owned(), format_percent);
    let place = format!("{} / {} / {}", record.city, record.canton, record.parish);
    let DiagnosticRecord { key, inference_date, birth_date, gender, feedback, image, .. } = record;
    let observation = if feedback.trim().is_empty() { NO_OBSERVATION.to_owned() } else { feedback };
    let toggle_key = key.clone();
    let has_image = !image.is_empty();

    view! {
        <article class="record-card" class:record-card--open=move || expanded.get()>
            <button class="record-card__summary" on:click=move |_| on_toggle.run(toggle_key.clone())>
                <span class="record-card__date">{inference_date}</span>
                <span class="record-card__place">{place}</span>
                <span class="record-card__gender">{gender}</span>
                <span class="record-card__precision">{precision}</span>
            </button>
            <Show when=move || expanded.get()>
                <div class="record-card__detail">
                    <p class="record-card__key">{key.clone()}</p>
                    <p class="record-card__birth">"Nacimiento: " {birth_date.clone()}</p>
                    <PredictionList predictions=predictions.clone()/>
                    <p class="record-card__observation">{observation.clone()}</p>
                    {has_image.then(|| view! { <img class="record-card__image" src=image.clone() alt="Radiografía"/> })}
                </div>
            </Show>
        </article>
    }
}
