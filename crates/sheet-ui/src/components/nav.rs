use leptos::prelude::*;
use sheet_types::CurrentUser;

use crate::components::language_switcher::LanguageSwitcher;
use crate::i18n::{use_locale, use_t, Msg};

#[server]
pub async fn get_session() -> Result<Option<CurrentUser>, ServerFnError> {
    crate::server::current_user().await
}

#[server]
async fn logout(locale: String) -> Result<(), ServerFnError> {
    use http::header::{HeaderValue, SET_COOKIE};
    use leptos_axum::ResponseOptions;
    use sheet_types::Locale;

    let state = crate::server::app_state()?;
    let responseOptions = expect_context::<ResponseOptions>();
    responseOptions.insert_header(
        SET_COOKIE,
        HeaderValue::from_str(&state.sessions.clear_cookie())
            .map_err(|e| ServerFnError::new(format!("cookie error: {e}")))?,
    );

    let locale = Locale::from_segment(&locale).unwrap_or_default();
    leptos_axum::redirect(&locale.href("/"));
    Ok(())
}

#[component]
pub fn Nav() -> impl IntoView {
    let locale = use_locale();
    let tr = use_t();
    let logoutAction = ServerAction::<Logout>::new();

    #[allow(unused_variables)]
    let (user, setUser) = signal(Option::<CurrentUser>::None);

    #[cfg(feature = "hydrate")]
    {
        use wasm_bindgen_futures::spawn_local;

        spawn_local(async move {
            if let Ok(session) = get_session().await {
                setUser.set(session);
            }
        });
    }

    let href = move |path: &str| locale.get().href(path);

    view! {
        <header class="navbar">
            <a class="nav-brand" href=move || href("/")>
                <span class="brand-icon">"S"</span>
                <span class="brand-text">"SheetMates"</span>
            </a>
            <nav class="nav-links">
                {move || {
                    if user.get().is_some() {
                        view! {
                            <a href=href("/upload")>{tr(Msg::NavUpload)}</a>
                            <a href=href("/sheets")>{tr(Msg::NavSheets)}</a>
                        }
                            .into_any()
                    } else {
                        ().into_any()
                    }
                }}
                <a href=move || href("/pricing")>{move || tr(Msg::NavPricing)}</a>
                <a href=move || href("/materials")>{move || tr(Msg::NavMaterials)}</a>
                <a href=move || href("/contact")>{move || tr(Msg::NavContact)}</a>
                {move || {
                    user.get()
                        .filter(|u| u.is_admin())
                        .map(|_| view! { <a href=href("/admin")>{tr(Msg::NavAdmin)}</a> })
                }}
            </nav>
            <div class="nav-actions">
                <LanguageSwitcher />
                {move || match user.get() {
                    Some(current) => {
                        view! {
                            <a class="nav-user" href=href("/account/orders")>
                                {current.display_name.clone()}
                            </a>
                            <ActionForm action=logoutAction>
                                <input type="hidden" name="locale" value=locale.get().as_str() />
                                <button type="submit" class="btn btn-ghost">
                                    {tr(Msg::NavLogout)}
                                </button>
                            </ActionForm>
                        }
                            .into_any()
                    }
                    None => {
                        view! {
                            <a class="btn btn-ghost" href=href("/login")>{tr(Msg::NavLogin)}</a>
                            <a class="btn btn-primary" href=href("/signup")>{tr(Msg::NavSignup)}</a>
                        }
                            .into_any()
                    }
                }}
            </div>
        </header>
    }
}
