use leptos::prelude::*;

/// Outline preview of an analyzed drawing.
#[component]
pub fn DxfPreview(
    svg_path: String,
    view_box: String,
    #[prop(default = 0.5)] stroke_width: f64,
) -> impl IntoView {
    view! {
        <svg class="dxf-preview" viewBox=view_box preserveAspectRatio="xMidYMid meet">
            <path
                d=svg_path
                fill="none"
                stroke="currentColor"
                stroke-width=stroke_width.to_string()
                vector-effect="non-scaling-stroke"
            />
        </svg>
    }
}
