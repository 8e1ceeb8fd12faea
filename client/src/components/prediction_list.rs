//! Label/probability rows with a bounded percentage bar.

use leptos::prelude::*;

use crate::net::types::Prediction;
use crate::util::format::{format_percent, percent};

#[component]
pub fn PredictionList(predictions: Vec<Prediction>) -> impl IntoView {
    if predictions.is_empty() {
        return view! { <p class="predictions predictions--empty">"Sin resultados."</p> }.into_any();
    }
    view! {
        <ul class="predictions">
            {predictions
                .into_iter()
                .map(|p| {
                    let width = format!("width: {:.2}%", percent(p.probability));
                    view! {
                        <li class="predictions__row">
                            <span class="predictions__label">{p.label}</span>
                            <span class="predictions__bar">
                                <span class="predictions__fill" style=width></span>
                            </span>
                            <span class="predictions__value">{format_percent(p.probability)}</span>
                        </li>
                    }
                })
                .collect::<Vec<_>>()}
        </ul>
    }
    .into_any()
}
