use sheet_types::SheetPlacement;

use crate::layout::footprint;

pub const SHEET_LAYER: &str = "SHEET";
pub const PARTS_LAYER: &str = "PARTS";

/// Cutting plan as ASCII DXF: the sheet outline plus one rectangle per placed part.
pub fn nesting_dxf(placements: &[SheetPlacement], sheetWidth: f64, sheetHeight: f64) -> String {
    let mut lines: Vec<String> = ["0", "SECTION", "2", "HEADER", "0", "ENDSEC"]
        .into_iter()
        .chain(["0", "SECTION", "2", "ENTITIES"])
        .map(String::from)
        .collect();

    add_rect(&mut lines, 0.0, 0.0, sheetWidth, sheetHeight, SHEET_LAYER);
    for r in placements.iter().map(footprint) {
        add_rect(&mut lines, r.x, r.y, r.width, r.height, PARTS_LAYER);
    }

    lines.extend(["0", "ENDSEC", "0", "EOF"].map(String::from));
    lines.join("\n")
}

fn add_rect(lines: &mut Vec<String>, x: f64, y: f64, w: f64, h: f64, layer: &str) {
    let corners = [(x, y), (x + w, y), (x + w, y + h), (x, y + h)];
    for i in 0..4 {
        let (x1, y1) = corners[i];
        let (x2, y2) = corners[(i + 1) % 4];
        let (x1, y1, x2, y2) = (x1.to_string(), y1.to_string(), x2.to_string(), y2.to_string());
        let groups = [
            "0", "LINE", "8", layer, "10", x1.as_str(), "20", y1.as_str(), "30", "0", "11",
            x2.as_str(), "21", y2.as_str(), "31",
            "0",
        ];
        lines.extend(groups.map(String::from));
    }
}
