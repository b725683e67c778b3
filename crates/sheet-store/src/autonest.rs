use std::collections::BTreeSet;

use chrono::Utc;
use sheet_engine::layout::{collides_with_others, out_of_bounds, utilization};
use sheet_engine::nesting::{shelf_pack, DEFAULT_KERF_MM};
use sheet_types::{
    AutoNestResult, NestingPart, NestingSheet, Part, PartPosition, PartStatus, Sheet,
    SheetPlacement, SheetStatus,
};

use crate::sheets::{blank_sheet, open_sheets_of};
use crate::{new_id, DocumentStore, StoreError, PARTS, SHEETS};

/// A sheet at or above this utilization is ready for the cutter.
pub const FULL_THRESHOLD: f64 = 0.85;

/// Packs pending parts onto an open sheet of the same material and thickness,
/// opening a standard sheet when none exists. Parts that do not fit stay pending.
pub async fn auto_nest_parts(
    docs: &DocumentStore,
    partIds: &[String],
    material: &str,
    thickness: f64,
) -> Result<AutoNestResult, StoreError> {
    let result = docs
        .transaction(|tx| {
            let mut incoming: Vec<Part> = Vec::new();
            for id in partIds {
                let part: Part = tx.fetch(PARTS, id)?;
                if part.status != PartStatus::Pending {
                    return Err(StoreError::Invalid(format!("part {id} is not pending")));
                }
                if !incoming.iter().any(|p| p.id == part.id) {
                    incoming.push(part);
                }
            }

            let existingSheet = open_sheets_of(tx, material)?
                .into_iter()
                .find(|s| s.thickness == thickness);
            let isNewSheet = existingSheet.is_none();
            let mut sheet: Sheet = existingSheet
                .unwrap_or_else(|| blank_sheet(new_id(), material, thickness, Utc::now()));

            let onSheet: Vec<Part> = tx
                .list::<Part>(PARTS)?
                .into_iter()
                .filter(|p| p.sheet_id.as_deref() == Some(sheet.id.as_str()))
                .collect();

            // drop incoming parts from the back until everything already on the sheet still fits
            let mut candidates: Vec<&Part> = incoming.iter().collect();
            let mut placements = pack_first_sheet(&sheet, onSheet.iter().chain(candidates.iter().copied()));
            while !candidates.is_empty() && !onSheet.iter().all(|p| fully_placed(&placements, p)) {
                candidates.pop();
                placements = pack_first_sheet(&sheet, onSheet.iter().chain(candidates.iter().copied()));
            }

            let keptIds: BTreeSet<String> = onSheet
                .iter()
                .chain(candidates.iter().copied())
                .filter(|p| fully_placed(&placements, p))
                .map(|p| p.id.clone())
                .collect();
            placements.retain(|p| keptIds.contains(&p.part_id));

            for spot in &placements {
                if out_of_bounds(spot, sheet.width, sheet.height)
                    || collides_with_others(&placements, &spot.part_id)
                {
                    return Err(StoreError::Invalid(format!(
                        "nesting produced an invalid placement for part {}",
                        spot.part_id
                    )));
                }
            }

            sheet.utilization = utilization(&placements, sheet.width, sheet.height);
            sheet.status = if sheet.utilization >= FULL_THRESHOLD {
                SheetStatus::Full
            } else {
                SheetStatus::Open
            };
            sheet.placements = placements.clone();
            tx.set(SHEETS, &sheet.id, &sheet)?;

            let mut displacedPartIds = Vec::new();
            for part in onSheet.iter().chain(incoming.iter()) {
                let Some(spot) = placements.iter().find(|p| p.part_id == part.id) else {
                    if part.status == PartStatus::Nested {
                        tx.set(
                            PARTS,
                            &part.id,
                            &Part {
                                status: PartStatus::Pending,
                                sheet_id: None,
                                position: None,
                                ..part.clone()
                            },
                        )?;
                        displacedPartIds.push(part.id.clone());
                    }
                    continue;
                };
                let nested = Part {
                    status: PartStatus::Nested,
                    sheet_id: Some(sheet.id.clone()),
                    position: Some(PartPosition {
                        x: spot.x,
                        y: spot.y,
                        rotation: spot.rotation,
                    }),
                    ..part.clone()
                };
                tx.set(PARTS, &part.id, &nested)?;
            }

            let (placedPartIds, unplacedPartIds): (Vec<String>, Vec<String>) = incoming
                .iter()
                .map(|p| p.id.clone())
                .partition(|id| keptIds.contains(id));

            Ok(AutoNestResult {
                sheet_id: sheet.id.clone(),
                utilization: sheet.utilization,
                placed_part_ids: placedPartIds,
                unplaced_part_ids: unplacedPartIds,
                displaced_part_ids: displacedPartIds,
                is_new_sheet: isNewSheet,
            })
        })
        .await?;

    tracing::info!(
        "nested {} parts onto sheet {} ({:.0}% used, {} left over)",
        result.placed_part_ids.len(),
        result.sheet_id,
        result.utilization * 100.0,
        result.unplaced_part_ids.len()
    );
    if !result.displaced_part_ids.is_empty() {
        tracing::warn!(
            "{} parts no longer fit sheet {} and went back to pending",
            result.displaced_part_ids.len(),
            result.sheet_id
        );
    }
    Ok(result)
}

/// Shelf-packs the parts and keeps what lands on the first sheet.
fn pack_first_sheet<'a>(sheet: &Sheet, parts: impl Iterator<Item = &'a Part>) -> Vec<SheetPlacement> {
    let nestingParts: Vec<NestingPart> = parts
        .map(|p| NestingPart {
            id: p.id.clone(),
            width: p.bounding_box.width,
            height: p.bounding_box.height,
            quantity: p.quantity,
        })
        .collect();
    shelf_pack(
        &nestingParts,
        NestingSheet {
            width: sheet.width,
            height: sheet.height,
        },
        DEFAULT_KERF_MM,
    )
    .placements
    .into_iter()
    .filter(|p| p.sheet_index == 0)
    .map(|p| {
        // placements keep the drawn size; the rotation turns it into the footprint
        let (width, height) = match p.rotation {
            90 | 270 => (p.height, p.width),
            _ => (p.width, p.height),
        };
        SheetPlacement {
            part_id: p.part_id,
            x: p.x,
            y: p.y,
            rotation: p.rotation,
            width,
            height,
        }
    })
    .collect()
}

/// Every copy of the part made it onto the sheet.
fn fully_placed(placements: &[SheetPlacement], part: &Part) -> bool {
    placements.iter().filter(|p| p.part_id == part.id).count() == part.quantity as usize
}
