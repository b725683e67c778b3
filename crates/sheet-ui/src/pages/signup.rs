use leptos::prelude::*;
use leptos_meta::Title;
use sheet_types::page_title;

use crate::i18n::{use_locale, use_t, Msg};

#[server]
async fn signup(
    email: String,
    password: String,
    display_name: String,
    locale: String,
) -> Result<(), ServerFnError> {
    use http::header::{HeaderValue, SET_COOKIE};
    use leptos_axum::ResponseOptions;
    use sheet_types::{Locale, SignupRequest};

    let state = crate::server::app_state()?;
    let request = SignupRequest {
        email,
        password,
        display_name,
    };
    let (_, token) = sheet_api::routes::auth::sign_up(&state, request)
        .await
        .map_err(crate::server::api_error)?;

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
pub fn SignupPage() -> impl IntoView {
    let locale = use_locale();
    let tr = use_t();
    let signupAction = ServerAction::<Signup>::new();
    let signupValue = signupAction.value();

    view! {
        <Title text=page_title("Sign up") />
        <div class="auth-page">
            <div class="auth-card">
                <h1>{move || tr(Msg::CreateAccount)}</h1>
                {move || {
                    signupValue
                        .get()
                        .and_then(|r| r.err())
                        .map(|e| view! { <div class="form-error">{e.to_string()}</div> })
                }}
                <ActionForm action=signupAction>
                    <input type="hidden" name="locale" value=move || locale.get().as_str() />
                    <div class="form-group">
                        <label for="display_name">{move || tr(Msg::DisplayName)}</label>
                        <input type="text" id="display_name" name="display_name" autocomplete="name" />
                    </div>
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
                            autocomplete="new-password"
                            minlength="8"
                            required
                        />
                    </div>
                    <button type="submit" class="btn btn-primary">
                        {move || tr(Msg::CreateAccount)}
                    </button>
                </ActionForm>
                <p class="auth-switch">
                    {move || tr(Msg::HaveAccount)} " "
                    <a href=move || locale.get().href("/login")>{move || tr(Msg::NavLogin)}</a>
                </p>
            </div>
        </div>
    }
}
