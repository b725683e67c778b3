use leptos::prelude::*;

use crate::i18n::{use_locale, use_t, Msg};

#[component]
pub fn Footer() -> impl IntoView {
    let locale = use_locale();
    let tr = use_t();
    let href = move |path: &'static str| move || locale.get().href(path);

    view! {
        <footer class="footer">
            <p class="footer-tagline">{move || tr(Msg::FooterTagline)}</p>
            <nav class="footer-links">
                <a href=href("/pricing")>{move || tr(Msg::NavPricing)}</a>
                <a href=href("/materials")>{move || tr(Msg::NavMaterials)}</a>
                <a href=href("/contact")>{move || tr(Msg::NavContact)}</a>
            </nav>
            <p class="footer-copy">"© SheetMates"</p>
        </footer>
    }
}
