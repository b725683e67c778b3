use leptos::prelude::*;
use leptos_meta::Title;
use sheet_types::page_title;

use crate::i18n::{use_locale, use_t, Msg};

const STEPS: [(&str, &str); 3] = [
    ("1", "Upload your DXF and get a manufacturability report in seconds."),
    ("2", "Your parts are nested onto a buffer sheet shared with other makers."),
    ("3", "The sheet is cut on an industrial laser and your parts ship."),
];

#[component]
pub fn HomePage() -> impl IntoView {
    let locale = use_locale();
    let tr = use_t();

    view! {
        <Title text=page_title("SheetMates - Community-Driven Laser Cutting Platform") />
        <section class="hero">
            <h1>{move || tr(Msg::HeroTitle)}</h1>
            <p class="subtitle">{move || tr(Msg::HeroSubtitle)}</p>
            <div class="hero-actions">
                <a class="btn btn-primary" href=move || locale.get().href("/upload")>
                    {move || tr(Msg::HeroCta)}
                </a>
                <a class="btn btn-ghost" href=move || locale.get().href("/pricing")>
                    {move || tr(Msg::NavPricing)}
                </a>
            </div>
        </section>
        <section class="steps">
            {STEPS
                .iter()
                .map(|(n, text)| {
                    view! {
                        <div class="card step">
                            <div class="step-number">{*n}</div>
                            <p>{*text}</p>
                        </div>
                    }
                })
                .collect_view()}
        </section>
    }
}
