use leptos::prelude::*;
use sheet_types::PriceBreakdown;

use crate::i18n::{use_t, Msg};

pub fn money(value: f64) -> String {
    format!("€{value:.2}")
}

#[component]
pub fn PriceBreakdownCard(breakdown: PriceBreakdown, quantity: u32) -> impl IntoView {
    let tr = use_t();
    let discount = (breakdown.bulk_discount > 0.0).then(|| {
        view! {
            <tr class="discount">
                <td>"Bulk discount"</td>
                <td>{format!("-{}", money(breakdown.bulk_discount))}</td>
            </tr>
        }
    });

    view! {
        <div class="card price-breakdown">
            <table>
                <tbody>
                    <tr>
                        <td>{move || tr(Msg::PerArea)}</td>
                        <td>{money(breakdown.area_cost)}</td>
                    </tr>
                    <tr>
                        <td>{move || tr(Msg::PerCut)}</td>
                        <td>{money(breakdown.cut_cost)}</td>
                    </tr>
                    <tr>
                        <td>{move || tr(Msg::Material)}</td>
                        <td>{format!("×{:.2}", breakdown.material_multiplier)}</td>
                    </tr>
                    <tr>
                        <td>{move || tr(Msg::Thickness)}</td>
                        <td>{format!("×{:.2}", breakdown.thickness_multiplier)}</td>
                    </tr>
                    {discount}
                    <tr>
                        <td>{move || format!("{} ({quantity} ×)", tr(Msg::Subtotal))}</td>
                        <td>{money(breakdown.total_before_vat)}</td>
                    </tr>
                    <tr>
                        <td>{move || tr(Msg::Vat)}</td>
                        <td>{money(breakdown.vat)}</td>
                    </tr>
                    <tr class="total">
                        <td>{move || tr(Msg::Total)}</td>
                        <td>{money(breakdown.total)}</td>
                    </tr>
                </tbody>
            </table>
        </div>
    }
}
