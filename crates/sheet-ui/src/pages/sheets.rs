use leptos::prelude::*;
use leptos_meta::Title;
use sheet_types::{page_title, LockError, LockResult, SheetListing};

use crate::components::price_breakdown::money;
use crate::components::toast::use_toast;
use crate::i18n::{use_t, Msg};

#[server]
async fn get_sheet_listings() -> Result<Vec<SheetListing>, ServerFnError> {
    let state = crate::server::app_state()?;
    sheet_api::routes::sheets::sheet_listings(&state, chrono::Utc::now())
        .await
        .map_err(crate::server::api_error)
}

#[server]
async fn reserve_sheet(sheet_id: String) -> Result<LockResult, ServerFnError> {
    let user = crate::server::require_user().await?;
    let state = crate::server::app_state()?;
    sheet_store::locks::acquire_sheet_lock(&state.store.docs, &sheet_id, &user.uid, chrono::Utc::now())
        .await
        .map_err(crate::server::api_error)
}

fn lock_message(result: &LockResult) -> String {
    match (result.success, result.error, result.lock_expiry) {
        (true, _, Some(expiry)) => format!("Sheet reserved until {}", expiry.format("%H:%M")),
        (true, _, None) => "Sheet reserved".into(),
        (false, Some(LockError::AlreadyLocked), _) => "Someone else is arranging parts on this sheet".into(),
        (false, Some(LockError::SheetFull), _) => "This sheet is no longer open".into(),
        (false, _, _) => "Sheet not found".into(),
    }
}

fn minutes_to_floor(ms: i64) -> String {
    let minutes = ms.max(0) / 60_000;
    if minutes >= 60 {
        format!("{}h {}m", minutes / 60, minutes % 60)
    } else {
        format!("{minutes}m")
    }
}

#[component]
pub fn SheetsPage() -> impl IntoView {
    let tr = use_t();
    let toast = use_toast();
    let reserveAction = ServerAction::<ReserveSheet>::new();

    #[allow(unused_variables)]
    let (listings, setListings) = signal(Option::<Vec<SheetListing>>::None);

    #[cfg(feature = "hydrate")]
    {
        use wasm_bindgen_futures::spawn_local;

        Effect::new(move |_| {
            reserveAction.version().get();
            spawn_local(async move {
                match get_sheet_listings().await {
                    Ok(list) => setListings.set(Some(list)),
                    Err(e) => toast.error(e.to_string()),
                }
            });
        });
    }

    Effect::new(move |_| match reserveAction.value().get() {
        Some(Ok(result)) if result.success => toast.success(lock_message(&result)),
        Some(Ok(result)) => toast.error(lock_message(&result)),
        Some(Err(e)) => toast.error(e.to_string()),
        None => {}
    });

    view! {
        <Title text=page_title("Buffer sheets") />
        <div class="page-header">
            <h1>{move || tr(Msg::OpenSheets)}</h1>
            <p class="subtitle">
                "Auction sheets get cheaper over time. Reserve one to place your parts on it."
            </p>
        </div>
        {move || match listings.get() {
            None => view! { <p class="muted">{tr(Msg::Loading)}</p> }.into_any(),
            Some(list) if list.is_empty() => view! { <p class="muted">{tr(Msg::Nothing)}</p> }.into_any(),
            Some(list) => {
                view! {
                    <div class="sheets-grid">
                        {list
                            .into_iter()
                            .map(|listing| {
                                let sheet = listing.sheet;
                                let sheetId = sheet.id.clone();
                                let price = listing.auction.map(|a| {
                                    view! {
                                        <div class="auction">
                                            <span class="price">{money(a.current_price)}</span>
                                            <span class="muted">
                                                {format!("-{:.0}%", a.price_drop_percent)}
                                            </span>
                                            {if a.is_at_floor {
                                                view! { <span class="badge">"floor"</span> }.into_any()
                                            } else {
                                                view! {
                                                    <span class="muted">
                                                        {format!("floor in {}", minutes_to_floor(a.time_to_floor_ms))}
                                                    </span>
                                                }
                                                    .into_any()
                                            }}
                                        </div>
                                    }
                                });
                                view! {
                                    <div class="card sheet-card">
                                        <h3>{format!("{} {} mm", sheet.material, sheet.thickness)}</h3>
                                        <p class="muted">
                                            {format!("{:.0} × {:.0} mm", sheet.width, sheet.height)}
                                        </p>
                                        <div class="utilization">
                                            <div
                                                class="utilization-bar"
                                                style=format!("width: {:.0}%", sheet.utilization * 100.0)
                                            ></div>
                                        </div>
                                        <p>
                                            {tr(Msg::Utilization)} ": "
                                            {format!("{:.0}%", sheet.utilization * 100.0)}
                                        </p>
                                        {price}
                                        {listing
                                            .premium
                                            .map(|p| {
                                                view! {
                                                    <p class="muted">{format!("Cut now: +{}", money(p))}</p>
                                                }
                                            })}
                                        <button
                                            class="btn btn-primary"
                                            disabled=move || reserveAction.pending().get()
                                            on:click=move |_| {
                                                reserveAction
                                                    .dispatch(ReserveSheet {
                                                        sheet_id: sheetId.clone(),
                                                    });
                                            }
                                        >
                                            {tr(Msg::Reserve)}
                                        </button>
                                    </div>
                                }
                            })
                            .collect_view()}
                    </div>
                }
                    .into_any()
            }
        }}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn formats_time_to_floor() {
        assert_eq!(minutes_to_floor(45 * 60_000), "45m");
        assert_eq!(minutes_to_floor(135 * 60_000), "2h 15m");
        assert_eq!(minutes_to_floor(-5), "0m");
    }

    #[test]
    fn explains_denied_locks() {
        let held = LockResult::denied(LockError::AlreadyLocked);
        assert!(lock_message(&held).contains("Someone else"));
        let granted = LockResult::granted(Utc::now());
        assert!(lock_message(&granted).starts_with("Sheet reserved until"));
    }
}
