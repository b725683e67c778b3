//! Shelf ("first fit decreasing height") packing of rectangular parts onto sheets.

use sheet_types::{NestingPart, NestingPlacement, NestingResult, NestingSheet};

pub const DEFAULT_KERF_MM: f64 = 2.0;

#[derive(Clone, Copy, Debug)]
struct Shelf {
    y: f64,
    height: f64,
    xCursor: f64,
}

#[derive(Debug, Default)]
struct SheetState {
    shelves: Vec<Shelf>,
}

impl SheetState {
    fn try_place(&mut self, w: f64, h: f64, sheet: NestingSheet, kerf: f64) -> Option<(f64, f64)> {
        for shelf in self.shelves.iter_mut() {
            if h <= shelf.height && shelf.xCursor + w + kerf <= sheet.width {
                let x = shelf.xCursor;
                shelf.xCursor += w + kerf;
                return Some((x, shelf.y));
            }
        }

        let used = self
            .shelves
            .iter()
            .fold(0.0_f64, |acc, s| acc.max(s.y + s.height));
        if used + h + kerf <= sheet.height && w + kerf <= sheet.width {
            let y = if used > 0.0 { used + kerf } else { used };
            self.shelves.push(Shelf {
                y,
                height: h,
                xCursor: w + kerf,
            });
            return Some((0.0, y));
        }

        None
    }

    /// Tries the part as drawn, then turned 90 degrees.
    fn place(
        &mut self,
        id: &str,
        index: usize,
        (w, h): (f64, f64),
        sheet: NestingSheet,
        kerf: f64,
    ) -> Option<NestingPlacement> {
        let orientations = [(w, h, 0), (h, w, 90)];
        orientations.into_iter().find_map(|(pw, ph, rotation)| {
            self.try_place(pw, ph, sheet, kerf).map(|(x, y)| NestingPlacement {
                part_id: id.to_string(),
                sheet_index: index,
                x,
                y,
                width: pw,
                height: ph,
                rotation,
            })
        })
    }
}

pub fn shelf_pack(parts: &[NestingPart], sheet: NestingSheet, kerf: f64) -> NestingResult {
    let mut expanded: Vec<(&str, f64, f64)> = parts
        .iter()
        .flat_map(|p| (0..p.quantity).map(move |_| (p.id.as_str(), p.width, p.height)))
        .collect();
    expanded.sort_by(|a, b| b.2.total_cmp(&a.2));

    let mut sheets: Vec<SheetState> = Vec::new();
    let mut placements = Vec::new();

    for (id, w, h) in expanded {
        let existing = sheets
            .iter_mut()
            .enumerate()
            .find_map(|(index, state)| state.place(id, index, (w, h), sheet, kerf));

        let placement = match existing {
            Some(p) => Some(p),
            None => {
                let index = sheets.len();
                let mut state = SheetState::default();
                let placed = state.place(id, index, (w, h), sheet, kerf);
                // A part too big for an empty sheet still opens one, as the count reports it.
                sheets.push(state);
                placed
            }
        };

        if let Some(p) = placement {
            placements.push(p);
        }
    }

    let sheetArea = sheet.width * sheet.height;
    let utilization = (0..sheets.len())
        .map(|index| {
            if sheetArea <= 0.0 {
                return 0.0;
            }
            let used: f64 = placements
                .iter()
                .filter(|p| p.sheet_index == index)
                .map(|p| p.width * p.height)
                .sum();
            used / sheetArea
        })
        .collect();

    NestingResult {
        placements,
        sheets_used: sheets.len(),
        utilization,
    }
}
