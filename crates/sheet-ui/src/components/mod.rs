pub mod dxf_preview;
pub mod footer;
pub mod language_switcher;
pub mod nav;
pub mod price_breakdown;
pub mod toast;
