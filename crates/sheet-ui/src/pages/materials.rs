use leptos::prelude::*;
use leptos_meta::Title;
use sheet_types::{page_title, AvailableInventory};

use crate::i18n::{use_locale, use_t, Msg};

struct MaterialInfo {
    key: &'static str,
    name: &'static str,
    thicknesses: &'static str,
    notes: &'static str,
}

static MATERIALS: [MaterialInfo; 4] = [
    MaterialInfo {
        key: "steel",
        name: "Mild steel (S235)",
        thicknesses: "1 - 10 mm",
        notes: "Brackets, enclosures and structural parts. Powder coat friendly.",
    },
    MaterialInfo {
        key: "stainless",
        name: "Stainless steel (1.4301)",
        thicknesses: "1 - 8 mm",
        notes: "Food contact, outdoor and marine parts. Brushed finish on request.",
    },
    MaterialInfo {
        key: "aluminum",
        name: "Aluminium (5754)",
        thicknesses: "1 - 8 mm",
        notes: "Lightweight panels and housings with good corrosion resistance.",
    },
    MaterialInfo {
        key: "copper",
        name: "Copper (Cu-ETP)",
        thicknesses: "1 - 3 mm",
        notes: "Bus bars and decorative work.",
    },
];

#[server]
async fn get_inventory() -> Result<AvailableInventory, ServerFnError> {
    let state = crate::server::app_state()?;
    sheet_store::sheets::available_inventory(&state.store.docs)
        .await
        .map_err(crate::server::api_error)
}

#[component]
pub fn MaterialsPage() -> impl IntoView {
    let locale = use_locale();
    let tr = use_t();

    #[allow(unused_variables)]
    let (inventory, setInventory) = signal(Option::<AvailableInventory>::None);

    #[cfg(feature = "hydrate")]
    {
        use wasm_bindgen_futures::spawn_local;

        spawn_local(async move {
            if let Ok(loaded) = get_inventory().await {
                setInventory.set(Some(loaded));
            }
        });
    }

    // thicknesses currently on open buffer sheets
    let inStock = move |key: &'static str| {
        inventory.get().and_then(|inv| {
            inv.thicknesses_by_material.get(key).map(|list| {
                list.iter()
                    .map(|t| format!("{t} mm"))
                    .collect::<Vec<_>>()
                    .join(", ")
            })
        })
    };

    view! {
        <Title text=page_title("Materials") />
        <div class="page-header">
            <h1>{move || tr(Msg::NavMaterials)}</h1>
        </div>
        <div class="grid-2">
            {MATERIALS
                .iter()
                .map(|m| {
                    view! {
                        <div class="card material">
                            <h2>{m.name}</h2>
                            <p class="muted">{m.thicknesses}</p>
                            <p>{m.notes}</p>
                            {move || {
                                inStock(m.key)
                                    .map(|list| {
                                        view! { <p class="in-stock">"Open sheets: " {list}</p> }
                                    })
                            }}
                        </div>
                    }
                })
                .collect_view()}
        </div>
        <p class="cta-line">
            <a class="btn btn-primary" href=move || locale.get().href("/upload")>
                {move || tr(Msg::HeroCta)}
            </a>
        </p>
    }
}
