use sheet_types::SheetPlacement;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Footprint of a placement, swapping sides for quarter turns.
pub fn footprint(placement: &SheetPlacement) -> Rect {
    let (width, height) = match placement.rotation % 360 {
        90 | 270 => (placement.height, placement.width),
        _ => (placement.width, placement.height),
    };
    Rect {
        x: placement.x,
        y: placement.y,
        width,
        height,
    }
}

pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.width && a.x + a.width > b.x && a.y < b.y + b.height && a.y + a.height > b.y
}

pub fn collides_with_others(placements: &[SheetPlacement], partId: &str) -> bool {
    let Some(target) = placements.iter().find(|p| p.part_id == partId) else {
        return false;
    };
    let targetBox = footprint(target);
    placements
        .iter()
        .filter(|p| p.part_id != partId)
        .any(|p| overlaps(&targetBox, &footprint(p)))
}

pub fn out_of_bounds(placement: &SheetPlacement, sheetWidth: f64, sheetHeight: f64) -> bool {
    let r = footprint(placement);
    r.x < 0.0 || r.y < 0.0 || r.x + r.width > sheetWidth || r.y + r.height > sheetHeight
}

pub fn utilization(placements: &[SheetPlacement], sheetWidth: f64, sheetHeight: f64) -> f64 {
    let sheetArea = sheetWidth * sheetHeight;
    if sheetArea == 0.0 {
        return 0.0;
    }
    placements.iter().map(|p| p.width * p.height).sum::<f64>() / sheetArea
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placed(id: &str, x: f64, y: f64, w: f64, h: f64, rotation: u16) -> SheetPlacement {
        SheetPlacement {
            part_id: id.to_string(),
            x,
            y,
            rotation,
            width: w,
            height: h,
        }
    }

    #[test]
    fn rotation_swaps_footprint() {
        let r = footprint(&placed("a", 0.0, 0.0, 100.0, 20.0, 90));
        assert_eq!((r.width, r.height), (20.0, 100.0));
    }

    #[test]
    fn touching_edges_do_not_collide() {
        let parts = [
            placed("a", 0.0, 0.0, 10.0, 10.0, 0),
            placed("b", 10.0, 0.0, 10.0, 10.0, 0),
        ];
        assert!(!collides_with_others(&parts, "a"));
    }

    #[test]
    fn overlapping_parts_collide() {
        let parts = [
            placed("a", 0.0, 0.0, 10.0, 10.0, 0),
            placed("b", 5.0, 5.0, 10.0, 10.0, 0),
        ];
        assert!(collides_with_others(&parts, "b"));
        assert!(!collides_with_others(&parts, "missing"));
    }

    #[test]
    fn bounds_and_utilization() {
        let part = placed("a", 95.0, 0.0, 10.0, 10.0, 0);
        assert!(out_of_bounds(&part, 100.0, 100.0));
        assert!(!out_of_bounds(&placed("b", 0.0, 0.0, 10.0, 10.0, 0), 100.0, 100.0));
        assert_eq!(utilization(&[part], 100.0, 100.0), 0.01);
        assert_eq!(utilization(&[], 0.0, 100.0), 0.0);
    }
}
