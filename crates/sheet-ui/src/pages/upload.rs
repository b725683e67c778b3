use leptos::prelude::*;
use leptos_meta::Title;
use serde::{Deserialize, Serialize};
use sheet_types::{page_title, Part, PartStatus, PricingConfig};

use crate::components::dxf_preview::DxfPreview;
use crate::components::toast::use_toast;
use crate::i18n::{use_locale, use_t, Msg};
use crate::pages::pricing::get_pricing;

/// A stored part with the framing its outline preview needs.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PartView {
    pub part: Part,
    pub view_box: String,
    pub stroke_width: f64,
}

#[server]
async fn get_my_parts() -> Result<Vec<PartView>, ServerFnError> {
    use sheet_engine::svg::{stroke_width, view_box};

    let user = crate::server::require_user().await?;
    let state = crate::server::app_state()?;
    let parts = sheet_store::parts::get_parts_by_user(&state.store.docs, &user.uid)
        .await
        .map_err(crate::server::api_error)?;

    Ok(parts
        .into_iter()
        .map(|part| {
            let size = part.bounding_box;
            PartView {
                view_box: view_box(size.width, size.height),
                stroke_width: stroke_width(size.width, size.height),
                part,
            }
        })
        .collect())
}

#[server]
async fn remove_part(part_id: String) -> Result<(), ServerFnError> {
    let user = crate::server::require_user().await?;
    let state = crate::server::app_state()?;
    let docs = &state.store.docs;

    let part = sheet_store::parts::get_part(docs, &part_id)
        .await
        .map_err(crate::server::api_error)?
        .filter(|p| p.user_id == user.uid)
        .ok_or_else(|| ServerFnError::new("part not found"))?;
    let removed = sheet_store::parts::delete_pending_part(docs, &part.id)
        .await
        .map_err(crate::server::api_error)?;
    if let Err(e) = state.store.objects.delete_url(&removed.file_url).await {
        tracing::warn!("could not delete stored drawing {}: {e}", removed.file_url);
    }
    Ok(())
}

/// Creates an order for the chosen parts and returns the payment page URL.
#[server]
async fn order_and_pay(
    part_ids: Vec<String>,
    material: String,
    thickness: String,
    locale: String,
) -> Result<String, ServerFnError> {
    use sheet_api::routes::{checkout::start_checkout, orders::place_order};
    use sheet_types::{CheckoutRequest, CreateOrderRequest, Locale, OrderLineRequest};

    let user = crate::server::require_user().await?;
    let state = crate::server::app_state()?;
    if part_ids.is_empty() {
        return Err(ServerFnError::new("select at least one part"));
    }

    let mut items = Vec::with_capacity(part_ids.len());
    for id in part_ids {
        let part = sheet_store::parts::get_part(&state.store.docs, &id)
            .await
            .map_err(crate::server::api_error)?
            .ok_or_else(|| ServerFnError::new("part not found"))?;
        items.push(OrderLineRequest {
            part_id: part.id,
            quantity: part.quantity,
        });
    }

    let order = place_order(
        &state,
        &user,
        CreateOrderRequest {
            items,
            material,
            thickness,
        },
    )
    .await
    .map_err(crate::server::api_error)?;

    let checkout = start_checkout(
        &state,
        &user,
        &CheckoutRequest {
            order_id: order.id,
            locale: Locale::from_segment(&locale).unwrap_or_default(),
        },
    )
    .await
    .map_err(crate::server::api_error)?;
    Ok(checkout.url)
}

fn status_label(status: PartStatus) -> &'static str {
    match status {
        PartStatus::Pending => "pending",
        PartStatus::Nested => "nested",
        PartStatus::Cut => "cut",
        PartStatus::Shipped => "shipped",
    }
}

#[component]
pub fn UploadPage() -> impl IntoView {
    let locale = use_locale();
    let tr = use_t();
    let toast = use_toast();

    let removeAction = ServerAction::<RemovePart>::new();
    let orderAction = ServerAction::<OrderAndPay>::new();
    let selected = RwSignal::new(Vec::<String>::new());
    let material = RwSignal::new("steel".to_string());
    let thickness = RwSignal::new("2".to_string());

    #[allow(unused_variables)]
    let (parts, setParts) = signal(Option::<Vec<PartView>>::None);
    #[allow(unused_variables)]
    let (config, setConfig) = signal(PricingConfig::default());

    #[cfg(feature = "hydrate")]
    {
        use wasm_bindgen_futures::spawn_local;

        spawn_local(async move {
            if let Ok(loaded) = get_pricing().await {
                setConfig.set(loaded);
            }
        });

        // reload after every delete
        Effect::new(move |_| {
            removeAction.version().get();
            spawn_local(async move {
                match get_my_parts().await {
                    Ok(list) => setParts.set(Some(list)),
                    Err(e) => toast.error(e.to_string()),
                }
            });
        });

        Effect::new(move |_| match orderAction.value().get() {
            Some(Ok(url)) => {
                if let Err(e) = window().location().set_href(&url) {
                    leptos::logging::error!("redirect to checkout failed: {e:?}");
                }
            }
            Some(Err(e)) => toast.error(e.to_string()),
            None => {}
        });
    }

    let toggle = move |id: String| {
        selected.update(|ids| {
            if let Some(pos) = ids.iter().position(|s| *s == id) {
                ids.remove(pos);
            } else {
                ids.push(id);
            }
        })
    };

    let placeOrder = move |_| {
        if selected.with(Vec::is_empty) {
            toast.error("Select at least one part");
            return;
        }
        orderAction.dispatch(OrderAndPay {
            part_ids: selected.get(),
            material: material.get(),
            thickness: thickness.get(),
            locale: locale.get().as_str().to_string(),
        });
    };

    view! {
        <Title text=page_title("Upload DXF") />
        <div class="page-header">
            <h1>{move || tr(Msg::UploadTitle)}</h1>
            <p class="subtitle">{move || tr(Msg::UploadHint)}</p>
        </div>

        <div class="card">
            <form method="post" action="/api/v1/parts" enctype="multipart/form-data" class="upload-form">
                <input type="hidden" name="redirect" value=move || locale.get().href("/upload") />
                <div class="form-group">
                    <input type="file" name="file" accept=".dxf" required />
                </div>
                <div class="form-row">
                    <div class="form-group">
                        <label for="quantity">{move || tr(Msg::Quantity)}</label>
                        <input type="number" id="quantity" name="quantity" min="1" value="1" />
                    </div>
                    <div class="form-group">
                        <label for="upload-thickness">{move || tr(Msg::Thickness)}</label>
                        <input
                            type="number"
                            id="upload-thickness"
                            name="thickness"
                            min="0.5"
                            step="0.5"
                            value="2"
                        />
                    </div>
                </div>
                <button type="submit" class="btn btn-primary">{move || tr(Msg::UploadButton)}</button>
            </form>
        </div>

        <h2>{move || tr(Msg::MyParts)}</h2>
        {move || match parts.get() {
            None => view! { <p class="muted">{tr(Msg::Loading)}</p> }.into_any(),
            Some(list) if list.is_empty() => view! { <p class="muted">{tr(Msg::Nothing)}</p> }.into_any(),
            Some(list) => {
                view! {
                    <div class="parts-grid">
                        {list
                            .into_iter()
                            .map(|item| {
                                let id = item.part.id.clone();
                                let checkId = id.clone();
                                let isPending = item.part.status == PartStatus::Pending;
                                let size = item.part.bounding_box;
                                view! {
                                    <div class="card part-card">
                                        <DxfPreview
                                            svg_path=item.part.svg_path.clone()
                                            view_box=item.view_box.clone()
                                            stroke_width=item.stroke_width
                                        />
                                        <div class="part-meta">
                                            <strong>{item.part.file_name.clone()}</strong>
                                            <span class="muted">
                                                {format!(
                                                    "{:.1} × {:.1} mm · ×{}",
                                                    size.width,
                                                    size.height,
                                                    item.part.quantity,
                                                )}
                                            </span>
                                            <span class=format!("badge badge-{}", status_label(item.part.status))>
                                                {status_label(item.part.status)}
                                            </span>
                                        </div>
                                        {isPending
                                            .then(|| {
                                                let removeId = id.clone();
                                                view! {
                                                    <label class="part-select">
                                                        <input
                                                            type="checkbox"
                                                            prop:checked=move || selected.with(|ids| ids.contains(&checkId))
                                                            on:change=move |_| toggle(id.clone())
                                                        />
                                                        "Select"
                                                    </label>
                                                    <button
                                                        class="btn btn-ghost btn-small"
                                                        on:click=move |_| {
                                                            removeAction.dispatch(RemovePart { part_id: removeId.clone() });
                                                        }
                                                    >
                                                        "Delete"
                                                    </button>
                                                }
                                            })}
                                    </div>
                                }
                            })
                            .collect_view()}
                    </div>
                }
                    .into_any()
            }
        }}

        <div class="card order-bar">
            <div class="form-row">
                <div class="form-group">
                    <label for="order-material">{move || tr(Msg::Material)}</label>
                    <select
                        id="order-material"
                        on:change=move |ev| material.set(event_target_value(&ev))
                        prop:value=move || material.get()
                    >
                        {move || {
                            config
                                .get()
                                .material_multipliers
                                .into_keys()
                                .map(|name| view! { <option value=name.clone()>{name.clone()}</option> })
                                .collect_view()
                        }}
                    </select>
                </div>
                <div class="form-group">
                    <label for="order-thickness">{move || tr(Msg::Thickness)}</label>
                    <select
                        id="order-thickness"
                        on:change=move |ev| thickness.set(event_target_value(&ev))
                        prop:value=move || thickness.get()
                    >
                        {move || {
                            config
                                .get()
                                .thickness_multipliers
                                .into_keys()
                                .map(|mm| view! { <option value=mm.clone()>{format!("{mm} mm")}</option> })
                                .collect_view()
                        }}
                    </select>
                </div>
            </div>
            <button
                class="btn btn-primary"
                disabled=move || orderAction.pending().get()
                on:click=placeOrder
            >
                {move || format!("{} ({})", tr(Msg::OrderSelected), selected.with(Vec::len))}
            </button>
        </div>
    }
}
