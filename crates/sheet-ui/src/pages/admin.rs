//! Staff pages: overview counts, order fulfilment and the production queue.

use leptos::prelude::*;
use leptos_meta::Title;
use serde::{Deserialize, Serialize};
use sheet_types::{page_title, Order, OrderStatus, Sheet, SheetStatus};

use crate::components::price_breakdown::money;
use crate::components::toast::use_toast;
use crate::i18n::{use_locale, use_t, Msg};

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct AdminOverview {
    pub total_orders: usize,
    pub pending_orders: usize,
    pub paid_orders: usize,
    pub revenue: f64,
    pub open_sheets: usize,
    pub queued_sheets: usize,
}

impl AdminOverview {
    pub fn from_parts(orders: &[Order], openSheets: usize, queuedSheets: usize) -> Self {
        let pending = orders.iter().filter(|o| o.status == OrderStatus::Pending).count();
        Self {
            total_orders: orders.len(),
            pending_orders: pending,
            paid_orders: orders.len() - pending,
            revenue: orders
                .iter()
                .filter(|o| o.status != OrderStatus::Pending)
                .map(|o| o.total)
                .sum(),
            open_sheets: openSheets,
            queued_sheets: queuedSheets,
        }
    }
}

const ORDER_STEPS: [OrderStatus; 4] = [
    OrderStatus::Paid,
    OrderStatus::Processing,
    OrderStatus::Shipped,
    OrderStatus::Delivered,
];

/// The status a staff member would usually move to next.
pub fn next_sheet_status(status: SheetStatus) -> Option<SheetStatus> {
    [SheetStatus::Full, SheetStatus::Cutting, SheetStatus::Done]
        .into_iter()
        .find(|next| status.can_advance_to(*next))
}

#[server]
async fn get_admin_overview() -> Result<AdminOverview, ServerFnError> {
    use sheet_store::{orders::get_all_orders, production::get_production_queue, sheets::get_open_sheets};

    crate::server::require_admin().await?;
    let state = crate::server::app_state()?;
    let docs = &state.store.docs;
    let orders = get_all_orders(docs).await.map_err(crate::server::api_error)?;
    let open = get_open_sheets(docs).await.map_err(crate::server::api_error)?;
    let queue = get_production_queue(docs).await.map_err(crate::server::api_error)?;
    Ok(AdminOverview::from_parts(&orders, open.len(), queue.len()))
}

#[server]
async fn get_admin_orders() -> Result<Vec<Order>, ServerFnError> {
    crate::server::require_admin().await?;
    let state = crate::server::app_state()?;
    sheet_store::orders::get_all_orders(&state.store.docs)
        .await
        .map_err(crate::server::api_error)
}

#[server]
async fn set_order_status(order_id: String, status: OrderStatus) -> Result<(), ServerFnError> {
    let admin = crate::server::require_admin().await?;
    let state = crate::server::app_state()?;
    sheet_store::orders::advance_order_status(&state.store.docs, &order_id, status)
        .await
        .map_err(crate::server::api_error)?;
    tracing::info!("{} moved order {order_id} to {}", admin.email, status.as_str());
    Ok(())
}

#[server]
async fn get_queue() -> Result<Vec<Sheet>, ServerFnError> {
    crate::server::require_admin().await?;
    let state = crate::server::app_state()?;
    sheet_store::production::get_production_queue(&state.store.docs)
        .await
        .map_err(crate::server::api_error)
}

#[server]
async fn set_sheet_status(sheet_id: String, status: SheetStatus) -> Result<(), ServerFnError> {
    crate::server::require_admin().await?;
    let state = crate::server::app_state()?;
    sheet_store::production::update_sheet_status(&state.store.docs, &sheet_id, status)
        .await
        .map_err(crate::server::api_error)?;
    Ok(())
}

#[server]
async fn inject_stock(
    width: f64,
    height: f64,
    material: String,
    thickness: f64,
    quantity: u32,
    initial_price: f64,
    floor_price: f64,
    qr_code_prefix: String,
) -> Result<usize, ServerFnError> {
    use sheet_types::InjectSheetRequest;

    crate::server::require_admin().await?;
    let state = crate::server::app_state()?;
    let request = InjectSheetRequest {
        width,
        height,
        material,
        thickness,
        quantity,
        initial_price,
        floor_price,
        qr_code_prefix: Some(qr_code_prefix),
    };
    let injected = sheet_store::inject::inject_sheets(&state.store.docs, &request, chrono::Utc::now())
        .await
        .map_err(crate::server::api_error)?;
    Ok(injected.len())
}

/// Nests a comma separated list of pending part ids.
#[server]
async fn nest_parts(part_ids: String, material: String, thickness: f64) -> Result<String, ServerFnError> {
    let ids: Vec<String> = part_ids
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from)
        .collect();
    if ids.is_empty() {
        return Err(ServerFnError::new("enter at least one part id"));
    }

    crate::server::require_admin().await?;
    let state = crate::server::app_state()?;
    let result = sheet_store::autonest::auto_nest_parts(&state.store.docs, &ids, &material, thickness)
        .await
        .map_err(crate::server::api_error)?;
    let mut summary = format!(
        "{} placed, {} left over, sheet {:.0}% used",
        result.placed_part_ids.len(),
        result.unplaced_part_ids.len(),
        result.utilization * 100.0
    );
    if !result.displaced_part_ids.is_empty() {
        summary.push_str(&format!(", {} returned to pending", result.displaced_part_ids.len()));
    }
    Ok(summary)
}

#[component]
pub fn AdminDashboardPage() -> impl IntoView {
    let locale = use_locale();

    #[allow(unused_variables)]
    let (overview, setOverview) = signal(AdminOverview::default());

    #[cfg(feature = "hydrate")]
    {
        use wasm_bindgen_futures::spawn_local;

        spawn_local(async move {
            if let Ok(loaded) = get_admin_overview().await {
                setOverview.set(loaded);
            }
        });
    }

    view! {
        <Title text=page_title("Admin") />
        <div class="page-header">
            <h1>"Admin"</h1>
        </div>
        <div class="stats-grid">
            <div class="card stat">
                <span class="stat-value">{move || overview.get().total_orders}</span>
                <span class="stat-label">"Orders"</span>
            </div>
            <div class="card stat">
                <span class="stat-value">{move || overview.get().pending_orders}</span>
                <span class="stat-label">"Awaiting payment"</span>
            </div>
            <div class="card stat">
                <span class="stat-value">{move || money(overview.get().revenue)}</span>
                <span class="stat-label">"Paid revenue"</span>
            </div>
            <div class="card stat">
                <span class="stat-value">{move || overview.get().open_sheets}</span>
                <span class="stat-label">"Open sheets"</span>
            </div>
            <div class="card stat">
                <span class="stat-value">{move || overview.get().queued_sheets}</span>
                <span class="stat-label">"In production"</span>
            </div>
        </div>
        <div class="admin-links">
            <a class="btn btn-ghost" href=move || locale.get().href("/admin/orders")>"Orders"</a>
            <a class="btn btn-ghost" href=move || locale.get().href("/admin/queue")>"Production queue"</a>
        </div>
    }
}

#[component]
pub fn AdminOrdersPage() -> impl IntoView {
    let tr = use_t();
    let toast = use_toast();
    let statusAction = ServerAction::<SetOrderStatus>::new();

    #[allow(unused_variables)]
    let (orders, setOrders) = signal(Vec::<Order>::new());

    #[cfg(feature = "hydrate")]
    {
        use wasm_bindgen_futures::spawn_local;

        Effect::new(move |_| {
            statusAction.version().get();
            spawn_local(async move {
                match get_admin_orders().await {
                    Ok(list) => setOrders.set(list),
                    Err(e) => toast.error(e.to_string()),
                }
            });
        });
    }

    Effect::new(move |_| {
        if let Some(Err(e)) = statusAction.value().get() {
            toast.error(e.to_string());
        }
    });

    view! {
        <Title text=page_title("Admin orders") />
        <div class="page-header">
            <h1>{move || tr(Msg::MyOrders)}</h1>
        </div>
        <table class="data-table">
            <thead>
                <tr>
                    <th>"#"</th>
                    <th>"Customer"</th>
                    <th>{move || tr(Msg::Total)}</th>
                    <th>{move || tr(Msg::Status)}</th>
                    <th></th>
                </tr>
            </thead>
            <tbody>
                <For each=move || orders.get() key=|o| (o.id.clone(), o.status.as_str()) let:order>
                    <tr>
                        <td class="mono">{order.id.chars().take(8).collect::<String>()}</td>
                        <td class="mono">{order.user_id.clone()}</td>
                        <td>{money(order.total)}</td>
                        <td>
                            <span class=format!("badge badge-{}", order.status.as_str())>
                                {order.status.as_str()}
                            </span>
                        </td>
                        <td>
                            <ActionForm action=statusAction>
                                <input type="hidden" name="order_id" value=order.id.clone() />
                                <select name="status">
                                    {ORDER_STEPS
                                        .into_iter()
                                        .filter(|next| order.status.can_advance_to(*next))
                                        .map(|next| view! { <option value=next.as_str()>{next.as_str()}</option> })
                                        .collect_view()}
                                </select>
                                <button
                                    type="submit"
                                    class="btn btn-small"
                                    disabled=order.status == OrderStatus::Delivered
                                >
                                    "Update"
                                </button>
                            </ActionForm>
                        </td>
                    </tr>
                </For>
            </tbody>
        </table>
    }
}

#[component]
pub fn AdminQueuePage() -> impl IntoView {
    let toast = use_toast();
    let statusAction = ServerAction::<SetSheetStatus>::new();
    let injectAction = ServerAction::<InjectStock>::new();
    let nestAction = ServerAction::<NestParts>::new();

    #[allow(unused_variables)]
    let (queue, setQueue) = signal(Vec::<Sheet>::new());

    #[cfg(feature = "hydrate")]
    {
        use wasm_bindgen_futures::spawn_local;

        Effect::new(move |_| {
            statusAction.version().get();
            nestAction.version().get();
            spawn_local(async move {
                match get_queue().await {
                    Ok(list) => setQueue.set(list),
                    Err(e) => toast.error(e.to_string()),
                }
            });
        });
    }

    Effect::new(move |_| match injectAction.value().get() {
        Some(Ok(count)) => toast.success(format!("{count} sheets added to the buffer")),
        Some(Err(e)) => toast.error(e.to_string()),
        None => {}
    });
    Effect::new(move |_| match nestAction.value().get() {
        Some(Ok(summary)) => toast.success(summary),
        Some(Err(e)) => toast.error(e.to_string()),
        None => {}
    });
    Effect::new(move |_| {
        if let Some(Err(e)) = statusAction.value().get() {
            toast.error(e.to_string());
        }
    });

    view! {
        <Title text=page_title("Production queue") />
        <div class="page-header">
            <h1>"Production queue"</h1>
        </div>
        <table class="data-table">
            <thead>
                <tr>
                    <th>"Sheet"</th>
                    <th>"Material"</th>
                    <th>"Parts"</th>
                    <th>"Utilization"</th>
                    <th>"Status"</th>
                    <th></th>
                </tr>
            </thead>
            <tbody>
                <For each=move || queue.get() key=|s| (s.id.clone(), s.status.as_str()) let:sheet>
                    <tr>
                        <td class="mono">
                            {sheet.qr_code.clone().unwrap_or_else(|| sheet.id.chars().take(8).collect())}
                        </td>
                        <td>{format!("{} {} mm", sheet.material, sheet.thickness)}</td>
                        <td>{sheet.placements.len()}</td>
                        <td>{format!("{:.0}%", sheet.utilization * 100.0)}</td>
                        <td>
                            <span class=format!("badge badge-{}", sheet.status.as_str())>
                                {sheet.status.as_str()}
                            </span>
                        </td>
                        <td>
                            <a class="btn btn-ghost btn-small" href=format!("/api/v1/sheets/{}/export.dxf", sheet.id)>
                                "DXF"
                            </a>
                            {next_sheet_status(sheet.status)
                                .map(|next| {
                                    view! {
                                        <ActionForm action=statusAction>
                                            <input type="hidden" name="sheet_id" value=sheet.id.clone() />
                                            <input type="hidden" name="status" value=next.as_str() />
                                            <button type="submit" class="btn btn-small">
                                                {format!("Mark {}", next.as_str())}
                                            </button>
                                        </ActionForm>
                                    }
                                })}
                        </td>
                    </tr>
                </For>
            </tbody>
        </table>

        <div class="grid-2">
            <div class="card">
                <h2>"Inject buffer sheets"</h2>
                <ActionForm action=injectAction>
                    <div class="form-row">
                        <div class="form-group">
                            <label for="width">"Width (mm)"</label>
                            <input type="number" id="width" name="width" value="3000" />
                        </div>
                        <div class="form-group">
                            <label for="height">"Height (mm)"</label>
                            <input type="number" id="height" name="height" value="1500" />
                        </div>
                    </div>
                    <div class="form-row">
                        <div class="form-group">
                            <label for="inject-material">"Material"</label>
                            <input type="text" id="inject-material" name="material" value="steel" />
                        </div>
                        <div class="form-group">
                            <label for="inject-thickness">"Thickness (mm)"</label>
                            <input type="number" id="inject-thickness" name="thickness" step="0.5" value="2" />
                        </div>
                        <div class="form-group">
                            <label for="inject-quantity">"Quantity"</label>
                            <input type="number" id="inject-quantity" name="quantity" min="1" value="1" />
                        </div>
                    </div>
                    <div class="form-row">
                        <div class="form-group">
                            <label for="initial_price">"Start price"</label>
                            <input type="number" id="initial_price" name="initial_price" step="0.01" value="120" />
                        </div>
                        <div class="form-group">
                            <label for="floor_price">"Floor price"</label>
                            <input type="number" id="floor_price" name="floor_price" step="0.01" value="40" />
                        </div>
                        <div class="form-group">
                            <label for="qr_code_prefix">"QR prefix"</label>
                            <input type="text" id="qr_code_prefix" name="qr_code_prefix" value="SM" />
                        </div>
                    </div>
                    <button type="submit" class="btn btn-primary">"Inject"</button>
                </ActionForm>
            </div>

            <div class="card">
                <h2>"Nest parts"</h2>
                <ActionForm action=nestAction>
                    <div class="form-group">
                        <label for="part_ids">"Part ids (comma separated)"</label>
                        <textarea id="part_ids" name="part_ids" rows="3"></textarea>
                    </div>
                    <div class="form-row">
                        <div class="form-group">
                            <label for="nest-material">"Material"</label>
                            <input type="text" id="nest-material" name="material" value="steel" />
                        </div>
                        <div class="form-group">
                            <label for="nest-thickness">"Thickness (mm)"</label>
                            <input type="number" id="nest-thickness" name="thickness" step="0.5" value="2" />
                        </div>
                    </div>
                    <button type="submit" class="btn btn-primary">"Nest"</button>
                </ActionForm>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn order(status: OrderStatus, total: f64) -> Order {
        Order {
            id: "o".into(),
            user_id: "u".into(),
            items: vec![],
            subtotal: total,
            vat: 0.0,
            total,
            vat_rate: None,
            status,
            stripe_session_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn overview_counts_only_paid_revenue() {
        let orders = [
            order(OrderStatus::Pending, 10.0),
            order(OrderStatus::Paid, 20.0),
            order(OrderStatus::Shipped, 5.5),
        ];
        let overview = AdminOverview::from_parts(&orders, 3, 1);
        assert_eq!(overview.total_orders, 3);
        assert_eq!(overview.pending_orders, 1);
        assert_eq!(overview.paid_orders, 2);
        assert_eq!(overview.revenue, 25.5);
    }

    #[test]
    fn sheets_step_through_production() {
        assert_eq!(next_sheet_status(SheetStatus::Open), Some(SheetStatus::Full));
        assert_eq!(next_sheet_status(SheetStatus::Full), Some(SheetStatus::Cutting));
        assert_eq!(next_sheet_status(SheetStatus::Done), None);
    }
}
