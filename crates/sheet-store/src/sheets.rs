use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use sheet_types::{AvailableInventory, Sheet, SheetStatus};

use crate::{DocumentStore, StoreError, Transaction, SHEETS};

pub const STANDARD_SHEET_WIDTH: f64 = 3000.0;
pub const STANDARD_SHEET_HEIGHT: f64 = 1500.0;

/// An empty open sheet without an auction.
pub fn blank_sheet(id: String, material: &str, thickness: f64, now: DateTime<Utc>) -> Sheet {
    Sheet {
        id,
        width: STANDARD_SHEET_WIDTH,
        height: STANDARD_SHEET_HEIGHT,
        material: material.to_string(),
        thickness,
        placements: Vec::new(),
        utilization: 0.0,
        status: SheetStatus::Open,
        auction_enabled: false,
        initial_price: None,
        floor_price: None,
        decay_rate: None,
        auction_start_time: None,
        current_lock_holder: None,
        lock_expiry: None,
        lock_acquired_at: None,
        qr_code: None,
        created_at: now,
    }
}

pub async fn get_sheet(docs: &DocumentStore, id: &str) -> Result<Option<Sheet>, StoreError> {
    docs.get(SHEETS, id).await
}

pub async fn get_open_sheets(docs: &DocumentStore) -> Result<Vec<Sheet>, StoreError> {
    let mut sheets = docs
        .find(SHEETS, |s: &Sheet| s.status == SheetStatus::Open)
        .await?;
    sheets.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    Ok(sheets)
}

pub(crate) fn open_sheets_of(tx: &Transaction<'_>, material: &str) -> Result<Vec<Sheet>, StoreError> {
    let mut sheets: Vec<Sheet> = tx
        .list::<Sheet>(SHEETS)?
        .into_iter()
        .filter(|s| s.status == SheetStatus::Open && s.material == material)
        .collect();
    sheets.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    Ok(sheets)
}

/// Materials with open sheets, and the thicknesses each is stocked in.
pub async fn available_inventory(docs: &DocumentStore) -> Result<AvailableInventory, StoreError> {
    let mut byMaterial: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for sheet in get_open_sheets(docs).await? {
        let thicknesses = byMaterial.entry(sheet.material).or_default();
        if !thicknesses.contains(&sheet.thickness) {
            thicknesses.push(sheet.thickness);
        }
    }
    for thicknesses in byMaterial.values_mut() {
        thicknesses.sort_by(f64::total_cmp);
    }

    Ok(AvailableInventory {
        materials: byMaterial.keys().cloned().collect(),
        thicknesses_by_material: byMaterial,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn inventory_groups_open_sheets() {
        let docs = DocumentStore::in_memory();
        let now = Utc::now();
        let sheets = [
            ("a", "steel", 3.0, SheetStatus::Open),
            ("b", "steel", 1.0, SheetStatus::Open),
            ("c", "steel", 3.0, SheetStatus::Open),
            ("d", "copper", 2.0, SheetStatus::Open),
            ("e", "aluminum", 5.0, SheetStatus::Cutting),
        ];
        for (id, material, thickness, status) in sheets {
            let sheet = Sheet {
                status,
                ..blank_sheet(id.to_string(), material, thickness, now)
            };
            docs.set(SHEETS, id, &sheet).await.unwrap();
        }

        let inventory = available_inventory(&docs).await.unwrap();
        assert_eq!(inventory.materials, vec!["copper", "steel"]);
        assert_eq!(inventory.thicknesses_by_material["steel"], vec![1.0, 3.0]);
        assert_eq!(get_open_sheets(&docs).await.unwrap().len(), 4);
    }
}
