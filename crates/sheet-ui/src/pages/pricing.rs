use leptos::prelude::*;
use leptos_meta::Title;
use serde::{Deserialize, Serialize};
use sheet_types::{page_title, PriceBreakdown, PricingConfig};

use crate::components::price_breakdown::{money, PriceBreakdownCard};
use crate::i18n::{use_t, Msg};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuoteResult {
    pub breakdown: PriceBreakdown,
    pub quantity: u32,
}

#[server]
pub async fn get_pricing() -> Result<PricingConfig, ServerFnError> {
    let state = crate::server::app_state()?;
    sheet_store::pricing_config::get_pricing_config(&state.store.docs)
        .await
        .map_err(crate::server::api_error)
}

/// Quote for a rectangular blank; the outline is the cut path.
#[server]
async fn quote(
    width_mm: f64,
    height_mm: f64,
    material: String,
    thickness: String,
    quantity: u32,
) -> Result<QuoteResult, ServerFnError> {
    use sheet_engine::pricing::calculate_part_price;
    use sheet_types::PartPriceInput;

    if width_mm <= 0.0 || height_mm <= 0.0 || quantity == 0 {
        return Err(ServerFnError::new("size and quantity must be positive"));
    }
    let state = crate::server::app_state()?;
    let config = sheet_store::pricing_config::get_pricing_config(&state.store.docs)
        .await
        .map_err(crate::server::api_error)?;

    let input = PartPriceInput {
        area_mm2: width_mm * height_mm,
        cut_length_mm: 2.0 * (width_mm + height_mm),
        material,
        thickness,
        quantity,
    };
    Ok(QuoteResult {
        breakdown: calculate_part_price(&input, &config),
        quantity,
    })
}

#[component]
pub fn PricingPage() -> impl IntoView {
    let tr = use_t();
    let quoteAction = ServerAction::<Quote>::new();
    let quoteValue = quoteAction.value();

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
    }

    view! {
        <Title text=page_title("Pricing") />
        <div class="page-header">
            <h1>{move || tr(Msg::NavPricing)}</h1>
            <p class="subtitle">
                "Transparent pricing: you pay for the area you use and the length we cut."
            </p>
        </div>

        <div class="grid-2">
            <div class="card">
                <h2>"Rates"</h2>
                <table class="rates">
                    <tbody>
                        <tr>
                            <td>{move || tr(Msg::PerArea)}</td>
                            <td>{move || format!("{}/cm²", money(config.get().per_cm2_rate))}</td>
                        </tr>
                        <tr>
                            <td>{move || tr(Msg::PerCut)}</td>
                            <td>{move || format!("{}/mm", money(config.get().per_mm_cut_rate))}</td>
                        </tr>
                        <tr>
                            <td>"Minimum per part"</td>
                            <td>{move || money(config.get().minimum_price)}</td>
                        </tr>
                        <tr>
                            <td>"Bulk discount"</td>
                            <td>
                                {move || {
                                    let c = config.get();
                                    format!(
                                        "{}% from {} pieces",
                                        c.bulk_discount_percent,
                                        c.bulk_discount_threshold,
                                    )
                                }}
                            </td>
                        </tr>
                        <tr>
                            <td>{move || tr(Msg::Vat)}</td>
                            <td>{move || format!("{:.0}%", config.get().vat_rate * 100.0)}</td>
                        </tr>
                    </tbody>
                </table>
                <h3>{move || tr(Msg::Material)}</h3>
                <ul class="multipliers">
                    {move || {
                        config
                            .get()
                            .material_multipliers
                            .into_iter()
                            .map(|(name, factor)| view! { <li>{format!("{name}: ×{factor:.1}")}</li> })
                            .collect_view()
                    }}
                </ul>
            </div>

            <div class="card">
                <h2>"Quick quote"</h2>
                <ActionForm action=quoteAction>
                    <div class="form-row">
                        <div class="form-group">
                            <label for="width_mm">"Width (mm)"</label>
                            <input type="number" id="width_mm" name="width_mm" min="1" step="0.1" value="100" />
                        </div>
                        <div class="form-group">
                            <label for="height_mm">"Height (mm)"</label>
                            <input type="number" id="height_mm" name="height_mm" min="1" step="0.1" value="100" />
                        </div>
                    </div>
                    <div class="form-row">
                        <div class="form-group">
                            <label for="material">{move || tr(Msg::Material)}</label>
                            <select id="material" name="material">
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
                            <label for="thickness">{move || tr(Msg::Thickness)}</label>
                            <select id="thickness" name="thickness">
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
                        <div class="form-group">
                            <label for="quantity">{move || tr(Msg::Quantity)}</label>
                            <input type="number" id="quantity" name="quantity" min="1" value="1" />
                        </div>
                    </div>
                    <button type="submit" class="btn btn-primary">"Calculate"</button>
                </ActionForm>
                {move || match quoteValue.get() {
                    Some(Ok(q)) => {
                        view! { <PriceBreakdownCard breakdown=q.breakdown quantity=q.quantity /> }
                            .into_any()
                    }
                    Some(Err(e)) => view! { <div class="form-error">{e.to_string()}</div> }.into_any(),
                    None => ().into_any(),
                }}
            </div>
        </div>
    }
}
