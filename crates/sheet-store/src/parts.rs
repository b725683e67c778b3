use chrono::Utc;
use sheet_types::{Part, PartSize, PartStatus};

use crate::objects::sanitize_file_name;
use crate::{new_id, DocumentStore, StoreError, PARTS};

#[derive(Clone, Debug)]
pub struct NewPart {
    pub user_id: String,
    pub file_name: String,
    pub file_url: String,
    pub bounding_box: PartSize,
    pub svg_path: String,
    pub area: f64,
    pub cut_length: f64,
    pub quantity: u32,
}

/// Object key for an uploaded drawing: `dxf/<uid>/<millis>_<name>`.
pub fn storage_key(uid: &str, millis: i64, fileName: &str) -> String {
    format!("dxf/{uid}/{millis}_{}", sanitize_file_name(fileName))
}

pub async fn create_part(docs: &DocumentStore, new: NewPart) -> Result<Part, StoreError> {
    let part = Part {
        id: new_id(),
        user_id: new.user_id,
        file_name: new.file_name,
        file_url: new.file_url,
        bounding_box: new.bounding_box,
        svg_path: new.svg_path,
        area: new.area,
        cut_length: new.cut_length,
        quantity: new.quantity.max(1),
        status: PartStatus::Pending,
        sheet_id: None,
        position: None,
        created_at: Utc::now(),
    };
    docs.insert(PARTS, &part.id, &part).await?;
    Ok(part)
}

pub async fn get_part(docs: &DocumentStore, id: &str) -> Result<Option<Part>, StoreError> {
    docs.get(PARTS, id).await
}

pub async fn get_parts_by_user(docs: &DocumentStore, userId: &str) -> Result<Vec<Part>, StoreError> {
    let mut parts = docs.find(PARTS, |p: &Part| p.user_id == userId).await?;
    parts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(parts)
}

/// Deletes a part that has not been nested yet.
pub async fn delete_pending_part(docs: &DocumentStore, id: &str) -> Result<Part, StoreError> {
    docs.transaction(|tx| {
        let part: Part = tx.fetch(PARTS, id)?;
        if part.status != PartStatus::Pending {
            return Err(StoreError::Invalid(format!(
                "part {id} is already on a sheet and cannot be deleted"
            )));
        }
        tx.delete(PARTS, id);
        Ok(part)
    })
    .await
}
