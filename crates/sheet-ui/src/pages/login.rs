use leptos::prelude::*;
use leptos_meta::Title;
use sheet_types::page_title;

use crate::i18n::{use_locale, use_t, Msg};

#[server]
async fn login(email: String, password: String, locale: String) -> Result<(), ServerFnError> {
    use http::header::{HeaderValue, SET_COOKIE};
    use leptos_axum::ResponseOptions;
    use sheet_types::{Locale, LoginRequest};

    let state = crate::server::app_state()?;
    let (_, token) = sheet_api::routes::auth::log_in(&state, LoginRequest { email, password })
        .await
        .map_err(|_| ServerFnError::new("invalid email or password"))?;

    let responseOptions = expect_context::<ResponseOptions>();
    responseOptions.insert_header(
        SET_COOKIE,
        HeaderValue::from_str(&state.sessions.cookie(&token))
            .map_err(|e| ServerFnError::new(format!("cookie error: {e}")))?,
    );

    let locale = Locale::from_segment(&locale).unwrap_or_default();
    leptos_axum::redirect(&locale.href("/upload"));
    Ok(())
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let locale = use_locale();
    let tr = use_t();
    let loginAction = ServerAction::<Login>::new();
    let loginValue = loginAction.value();

    let errorMessage = move || {
        loginValue
            .get()
            .and_then(|result| result.err())
            .map(|e| e.to_string())
    };

    view! {
        <Title text=page_title("Log in") />
        <div class="auth-page">
            <div class="auth-card">
                <h1>{move || tr(Msg::SignIn)}</h1>
                {move || errorMessage().map(|e| view! { <div class="form-error">{e}</div> })}
                <ActionForm action=loginAction>
                    <input type="hidden" name="locale" value=move || locale.get().as_str() />
                    <div class="form-group">
                        <label for="email">{move || tr(Msg::Email)}</label>
                        <input type="email" id="email" name="email" autocomplete="email" required />
                    </div>
                    <div class="form-group">
                        <label for="password">{move || tr(Msg::Password)}</label>
                        <input
                            type="password"
                            id="password"
                            name="password"
                            autocomplete="current-password"
                            required
                        />
                    </div>
                    <button type="submit" class="btn btn-primary">
                        {move || tr(Msg::SignIn)}
                    </button>
                </ActionForm>
                <p class="auth-switch">
                    {move || tr(Msg::NoAccount)} " "
                    <a href=move || locale.get().href("/signup")>{move || tr(Msg::NavSignup)}</a>
                </p>
            </div>
        </div>
    }
}
