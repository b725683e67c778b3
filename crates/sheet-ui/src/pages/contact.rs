use leptos::prelude::*;
use leptos_meta::Title;
use sheet_types::{contact_reason_label, page_title};

use crate::i18n::{use_t, Msg};

static REASONS: [&str; 5] = ["general", "quote", "orderSupport", "technical", "other"];

#[server]
async fn send_contact(
    reason: String,
    name: String,
    email: String,
    order_reference: String,
    message: String,
) -> Result<(), ServerFnError> {
    use sheet_api::routes::contact::validate_contact;
    use sheet_types::ContactRequest;

    let request = ContactRequest {
        reason,
        name,
        email,
        order_reference: Some(order_reference),
        message,
    };
    validate_contact(&request).map_err(ServerFnError::new)?;

    let state = crate::server::app_state()?;
    let saved = sheet_store::contact::save_contact_message(&state.store.docs, request)
        .await
        .map_err(crate::server::api_error)?;
    tracing::info!("contact message {} ({})", saved.id, saved.reason);
    Ok(())
}

#[component]
pub fn ContactPage() -> impl IntoView {
    let tr = use_t();
    let sendAction = ServerAction::<SendContact>::new();
    let sendValue = sendAction.value();

    view! {
        <Title text=page_title("Contact") />
        <div class="page-header">
            <h1>{move || tr(Msg::ContactTitle)}</h1>
        </div>
        <div class="card narrow">
            {move || match sendValue.get() {
                Some(Ok(())) => view! { <div class="form-success">{tr(Msg::MessageSent)}</div> }.into_any(),
                Some(Err(e)) => view! { <div class="form-error">{e.to_string()}</div> }.into_any(),
                None => ().into_any(),
            }}
            <ActionForm action=sendAction>
                <div class="form-group">
                    <label for="reason">{move || tr(Msg::Reason)}</label>
                    <select id="reason" name="reason">
                        {REASONS
                            .iter()
                            .map(|r| view! { <option value=*r>{contact_reason_label(r).to_string()}</option> })
                            .collect_view()}
                    </select>
                </div>
                <div class="form-row">
                    <div class="form-group">
                        <label for="name">{move || tr(Msg::Name)}</label>
                        <input type="text" id="name" name="name" autocomplete="name" required />
                    </div>
                    <div class="form-group">
                        <label for="email">{move || tr(Msg::Email)}</label>
                        <input type="email" id="email" name="email" autocomplete="email" required />
                    </div>
                </div>
                <div class="form-group">
                    <label for="order_reference">{move || tr(Msg::OrderReference)}</label>
                    <input type="text" id="order_reference" name="order_reference" />
                </div>
                <div class="form-group">
                    <label for="message">{move || tr(Msg::Message)}</label>
                    <textarea id="message" name="message" rows="6" maxlength="5000" required></textarea>
                </div>
                <button type="submit" class="btn btn-primary">{move || tr(Msg::Send)}</button>
            </ActionForm>
        </div>
    }
}
