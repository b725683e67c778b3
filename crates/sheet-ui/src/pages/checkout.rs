use leptos::prelude::*;
use leptos_meta::Title;
use sheet_types::page_title;

use crate::i18n::{use_locale, use_t, Msg};

/// Landing page after a successful payment. The order itself is marked paid by the webhook.
#[component]
pub fn CheckoutSuccessPage() -> impl IntoView {
    let locale = use_locale();
    let tr = use_t();

    view! {
        <Title text=page_title("Payment received") />
        <div class="card narrow center">
            <div class="success-icon">"✓"</div>
            <h1>{move || tr(Msg::PaymentThanks)}</h1>
            <a class="btn btn-primary" href=move || locale.get().href("/account/orders")>
                {move || tr(Msg::MyOrders)}
            </a>
        </div>
    }
}

/// Where the payment page sends customers who cancel.
#[component]
pub fn CheckoutPage() -> impl IntoView {
    let locale = use_locale();
    let tr = use_t();

    view! {
        <Title text=page_title("Checkout") />
        <div class="card narrow center">
            <h1>"Payment not completed"</h1>
            <p class="muted">
                "Your order is saved. You can pay for it any time from your orders."
            </p>
            <a class="btn btn-primary" href=move || locale.get().href("/account/orders")>
                {move || tr(Msg::MyOrders)}
            </a>
        </div>
    }
}
