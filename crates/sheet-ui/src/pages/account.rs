use leptos::prelude::*;
use leptos_meta::Title;
use sheet_types::{page_title, Order, OrderStatus};

use crate::components::price_breakdown::money;
use crate::components::toast::use_toast;
use crate::i18n::{use_locale, use_t, Msg};

#[server]
async fn get_my_orders() -> Result<Vec<Order>, ServerFnError> {
    let user = crate::server::require_user().await?;
    let state = crate::server::app_state()?;
    sheet_store::orders::get_orders_by_user(&state.store.docs, &user.uid)
        .await
        .map_err(crate::server::api_error)
}

#[server]
async fn pay_order(order_id: String, locale: String) -> Result<String, ServerFnError> {
    use sheet_api::routes::checkout::start_checkout;
    use sheet_types::{CheckoutRequest, Locale};

    let user = crate::server::require_user().await?;
    let state = crate::server::app_state()?;
    let request = CheckoutRequest {
        order_id,
        locale: Locale::from_segment(&locale).unwrap_or_default(),
    };
    let checkout = start_checkout(&state, &user, &request)
        .await
        .map_err(crate::server::api_error)?;
    Ok(checkout.url)
}

#[component]
pub fn AccountOrdersPage() -> impl IntoView {
    let locale = use_locale();
    let tr = use_t();
    let toast = use_toast();
    let payAction = ServerAction::<PayOrder>::new();

    #[allow(unused_variables)]
    let (orders, setOrders) = signal(Option::<Vec<Order>>::None);

    #[cfg(feature = "hydrate")]
    {
        use wasm_bindgen_futures::spawn_local;

        spawn_local(async move {
            match get_my_orders().await {
                Ok(list) => setOrders.set(Some(list)),
                Err(e) => toast.error(e.to_string()),
            }
        });

        Effect::new(move |_| match payAction.value().get() {
            Some(Ok(url)) => {
                if let Err(e) = window().location().set_href(&url) {
                    leptos::logging::error!("redirect to checkout failed: {e:?}");
                }
            }
            Some(Err(e)) => toast.error(e.to_string()),
            None => {}
        });
    }

    view! {
        <Title text=page_title("My orders") />
        <div class="page-header">
            <h1>{move || tr(Msg::MyOrders)}</h1>
        </div>
        {move || match orders.get() {
            None => view! { <p class="muted">{tr(Msg::Loading)}</p> }.into_any(),
            Some(list) if list.is_empty() => {
                view! {
                    <p class="muted">
                        {tr(Msg::Nothing)} " "
                        <a href=locale.get().href("/upload")>{tr(Msg::HeroCta)}</a>
                    </p>
                }
                    .into_any()
            }
            Some(list) => {
                view! {
                    <table class="data-table">
                        <thead>
                            <tr>
                                <th>"#"</th>
                                <th>{tr(Msg::MyParts)}</th>
                                <th>{tr(Msg::Total)}</th>
                                <th>{tr(Msg::Status)}</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            {list
                                .into_iter()
                                .map(|order| {
                                    let orderId = order.id.clone();
                                    let parts = order
                                        .items
                                        .iter()
                                        .map(|i| format!("{} ×{}", i.file_name, i.quantity))
                                        .collect::<Vec<_>>()
                                        .join(", ");
                                    view! {
                                        <tr>
                                            <td class="mono">{order.id.chars().take(8).collect::<String>()}</td>
                                            <td>{parts}</td>
                                            <td>{money(order.total)}</td>
                                            <td>
                                                <span class=format!("badge badge-{}", order.status.as_str())>
                                                    {order.status.as_str()}
                                                </span>
                                            </td>
                                            <td>
                                                {(order.status == OrderStatus::Pending)
                                                    .then(|| {
                                                        view! {
                                                            <button
                                                                class="btn btn-primary btn-small"
                                                                disabled=move || payAction.pending().get()
                                                                on:click=move |_| {
                                                                    payAction
                                                                        .dispatch(PayOrder {
                                                                            order_id: orderId.clone(),
                                                                            locale: locale.get().as_str().to_string(),
                                                                        });
                                                                }
                                                            >
                                                                {tr(Msg::Pay)}
                                                            </button>
                                                        }
                                                    })}
                                            </td>
                                        </tr>
                                    }
                                })
                                .collect_view()}
                        </tbody>
                    </table>
                }
                    .into_any()
            }
        }}
    }
}
