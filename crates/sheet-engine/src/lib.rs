#![allow(non_snake_case)]

pub mod auction;
pub mod dfm;
pub mod dxf;
pub mod export;
pub mod geometry;
pub mod layout;
pub mod nesting;
pub mod pricing;
pub mod svg;

use sheet_types::PartAnalysis;

pub use dfm::DfmOptions;
pub use dxf::{parse_dxf, DxfError, Entity, ParsedDxf};

/// Parse a DXF drawing and run every analysis the storefront shows for it.
pub fn analyze_dxf(
    fileName: &str,
    content: &str,
    thickness: f64,
) -> Result<PartAnalysis, DxfError> {
    let parsed = parse_dxf(content)?;

    let area = geometry::compute_area(&parsed);
    let cutLength = geometry::compute_cut_length(&parsed);
    let issues = dfm::check_dfm(&parsed, &DfmOptions::for_thickness(thickness));
    let summary = dfm::summarize(&issues);

    tracing::debug!(
        "analyzed {fileName}: {} entities, {:.1}x{:.1}mm, {} dfm issues",
        parsed.entities.len(),
        parsed.width,
        parsed.height,
        issues.len()
    );

    Ok(PartAnalysis {
        file_name: fileName.to_string(),
        bounding_box: parsed.bounding_box,
        width: parsed.width,
        height: parsed.height,
        area,
        cut_length: cutLength,
        entity_count: parsed.entities.len(),
        svg_path: svg::to_svg_path(&parsed),
        view_box: svg::view_box(parsed.width, parsed.height),
        dfm: issues,
        summary,
    })
}
