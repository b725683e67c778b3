use leptos::prelude::*;
use leptos_router::hooks::use_location;
use sheet_types::Locale;

use crate::i18n::use_locale;

/// Same page in another language.
fn switch_path(path: &str, target: Locale) -> String {
    match Locale::split_path(path) {
        Some((_, rest)) => target.href(rest),
        None => target.href("/"),
    }
}

#[component]
pub fn LanguageSwitcher() -> impl IntoView {
    let current = use_locale();
    let location = use_location();

    view! {
        <div class="language-switcher">
            {Locale::ALL
                .into_iter()
                .map(|locale| {
                    view! {
                        <a
                            href=move || switch_path(&location.pathname.get(), locale)
                            class=move || {
                                if current.get() == locale { "lang active" } else { "lang" }
                            }
                            hreflang=locale.as_str()
                            title=locale.native_name()
                        >
                            {locale.as_str().to_uppercase()}
                        </a>
                    }
                })
                .collect_view()}
        </div>
    }
}
