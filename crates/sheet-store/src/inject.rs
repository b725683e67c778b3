use chrono::{DateTime, Utc};
use sheet_engine::auction::{dynamic_decay_rate, BASE_DECAY_RATE};
use sheet_types::{InjectSheetRequest, InjectedSheet, Sheet, SheetStatus};

use crate::sheets::{blank_sheet, open_sheets_of};
use crate::{new_id, DocumentStore, StoreError, SHEETS};

/// Adds `quantity` open auction sheets to the buffer inventory.
///
/// Decay speeds up when many sheets of the same material are already waiting.
pub async fn inject_sheets(
    docs: &DocumentStore,
    request: &InjectSheetRequest,
    now: DateTime<Utc>,
) -> Result<Vec<InjectedSheet>, StoreError> {
    if request.quantity == 0 || request.width <= 0.0 || request.height <= 0.0 {
        return Err(StoreError::Invalid("sheet size and quantity must be positive".into()));
    }
    if request.floor_price < 0.0 || request.floor_price > request.initial_price {
        return Err(StoreError::Invalid(
            "floor price must be between 0 and the initial price".into(),
        ));
    }

    let prefix = request
        .qr_code_prefix
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or("SM");
    let millis = now.timestamp_millis();

    let injected = docs
        .transaction(|tx| {
            let inventory = open_sheets_of(tx, &request.material)?.len();
            let decayRate = dynamic_decay_rate(inventory, BASE_DECAY_RATE);

            let mut injected = Vec::new();
            for i in 0..request.quantity {
                let qrCode = format!("{prefix}-{millis}-{i}");
                let sheet = Sheet {
                    width: request.width,
                    height: request.height,
                    status: SheetStatus::Open,
                    auction_enabled: true,
                    initial_price: Some(request.initial_price),
                    floor_price: Some(request.floor_price),
                    decay_rate: Some(decayRate),
                    auction_start_time: Some(now),
                    qr_code: Some(qrCode.clone()),
                    ..blank_sheet(new_id(), &request.material, request.thickness, now)
                };
                tx.insert(SHEETS, &sheet.id, &sheet)?;
                injected.push(InjectedSheet {
                    id: sheet.id,
                    qr_code: qrCode,
                });
            }
            Ok(injected)
        })
        .await?;

    tracing::info!(
        "injected {} {} sheets ({}mm)",
        injected.len(),
        request.material,
        request.thickness
    );
    Ok(injected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(quantity: u32) -> InjectSheetRequest {
        InjectSheetRequest {
            width: 3000.0,
            height: 1500.0,
            material: "steel".into(),
            thickness: 2.0,
            quantity,
            initial_price: 120.0,
            floor_price: 40.0,
            qr_code_prefix: Some("TC".into()),
        }
    }

    #[tokio::test]
    async fn creates_auction_sheets_with_qr_codes() {
        let docs = DocumentStore::in_memory();
        let now = Utc::now();
        let injected = inject_sheets(&docs, &request(3), now).await.unwrap();

        assert_eq!(injected.len(), 3);
        assert_eq!(injected[2].qr_code, format!("TC-{}-2", now.timestamp_millis()));

        let sheet: Sheet = docs.get(SHEETS, &injected[0].id).await.unwrap().unwrap();
        assert!(sheet.auction_enabled);
        assert_eq!(sheet.status, SheetStatus::Open);
        // empty inventory gets the conservative rate
        assert_eq!(sheet.decay_rate, Some(0.01));
    }

    #[tokio::test]
    async fn rejects_inverted_prices() {
        let docs = DocumentStore::in_memory();
        let bad = InjectSheetRequest {
            floor_price: 500.0,
            ..request(1)
        };
        assert!(inject_sheets(&docs, &bad, Utc::now()).await.is_err());
    }
}
