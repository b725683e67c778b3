use sheet_types::{Sheet, SheetStatus};

use crate::{DocumentStore, StoreError, SHEETS};

/// Sheets waiting for or on the cutter, oldest first.
pub async fn get_production_queue(docs: &DocumentStore) -> Result<Vec<Sheet>, StoreError> {
    let mut queue = docs
        .find(SHEETS, |s: &Sheet| {
            matches!(s.status, SheetStatus::Full | SheetStatus::Cutting)
        })
        .await?;
    queue.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    Ok(queue)
}

pub async fn update_sheet_status(
    docs: &DocumentStore,
    id: &str,
    next: SheetStatus,
) -> Result<Sheet, StoreError> {
    let sheet = docs
        .transaction(|tx| {
            let mut sheet: Sheet = tx.fetch(SHEETS, id)?;
            if !sheet.status.can_advance_to(next) {
                return Err(StoreError::InvalidTransition {
                    from: sheet.status.as_str().to_string(),
                    to: next.as_str().to_string(),
                });
            }
            sheet.status = next;
            tx.set(SHEETS, id, &sheet)?;
            Ok(sheet)
        })
        .await?;

    tracing::info!("sheet {id} is now {}", next.as_str());
    Ok(sheet)
}
