//! Exclusive, time-limited claims on an open sheet while a customer arranges parts on it.

use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use sheet_types::{LockError, LockResult, Sheet, SheetStatus};

use crate::{DocumentStore, StoreError, SHEETS};

pub const LOCK_DURATION_MINUTES: i64 = 10;

pub async fn acquire_sheet_lock(
    docs: &DocumentStore,
    sheetId: &str,
    userId: &str,
    now: DateTime<Utc>,
) -> Result<LockResult, StoreError> {
    docs.transaction(|tx| {
        let Some(sheet) = tx.get::<Sheet>(SHEETS, sheetId)? else {
            return Ok(LockResult::denied(LockError::SheetNotFound));
        };
        if sheet.status != SheetStatus::Open {
            return Ok(LockResult::denied(LockError::SheetFull));
        }
        if let (Some(holder), Some(expiry)) = (&sheet.current_lock_holder, sheet.lock_expiry) {
            if expiry > now && holder != userId {
                return Ok(LockResult::denied(LockError::AlreadyLocked));
            }
        }

        let expiry = now + Duration::minutes(LOCK_DURATION_MINUTES);
        tx.update(
            SHEETS,
            sheetId,
            json!({
                "current_lock_holder": userId,
                "lock_expiry": expiry,
                "lock_acquired_at": now,
            }),
        )?;
        Ok(LockResult::granted(expiry))
    })
    .await
}

/// Releases the lock if `userId` holds it. Returns whether anything was released.
pub async fn release_sheet_lock(docs: &DocumentStore, sheetId: &str, userId: &str) -> Result<bool, StoreError> {
    docs.transaction(|tx| {
        let Some(sheet) = tx.get::<Sheet>(SHEETS, sheetId)? else {
            return Ok(false);
        };
        if sheet.current_lock_holder.as_deref() != Some(userId) {
            return Ok(false);
        }
        tx.update(
            SHEETS,
            sheetId,
            json!({
                "current_lock_holder": null,
                "lock_expiry": null,
                "lock_acquired_at": null,
            }),
        )?;
        Ok(true)
    })
    .await
}

pub async fn extend_sheet_lock(
    docs: &DocumentStore,
    sheetId: &str,
    userId: &str,
    now: DateTime<Utc>,
) -> Result<LockResult, StoreError> {
    docs.transaction(|tx| {
        let Some(sheet) = tx.get::<Sheet>(SHEETS, sheetId)? else {
            return Ok(LockResult::denied(LockError::SheetNotFound));
        };
        if sheet.current_lock_holder.as_deref() != Some(userId) {
            return Ok(LockResult::denied(LockError::AlreadyLocked));
        }
        let expiry = now + Duration::minutes(LOCK_DURATION_MINUTES);
        tx.update(SHEETS, sheetId, json!({ "lock_expiry": expiry }))?;
        Ok(LockResult::granted(expiry))
    })
    .await
}
