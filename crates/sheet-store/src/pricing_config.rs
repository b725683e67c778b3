use sheet_types::PricingConfig;

use crate::{DocumentStore, StoreError, PRICING_CONFIG};

const DEFAULT_DOC: &str = "default";

/// Stored pricing configuration, or the built-in defaults when none was saved.
pub async fn get_pricing_config(docs: &DocumentStore) -> Result<PricingConfig, StoreError> {
    Ok(docs
        .get(PRICING_CONFIG, DEFAULT_DOC)
        .await?
        .unwrap_or_default())
}

pub async fn save_pricing_config(docs: &DocumentStore, config: &PricingConfig) -> Result<(), StoreError> {
    let invalid = config.per_cm2_rate < 0.0
        || config.per_mm_cut_rate < 0.0
        || config.minimum_price < 0.0
        || !(0.0..=1.0).contains(&config.vat_rate)
        || !(0.0..=100.0).contains(&config.bulk_discount_percent);
    if invalid {
        return Err(StoreError::Invalid("pricing values out of range".into()));
    }
    docs.set(PRICING_CONFIG, DEFAULT_DOC, config).await?;
    tracing::info!("pricing configuration updated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn defaults_until_saved() {
        let docs = DocumentStore::in_memory();
        assert_eq!(get_pricing_config(&docs).await.unwrap(), PricingConfig::default());

        let custom = PricingConfig {
            minimum_price: 7.5,
            ..PricingConfig::default()
        };
        save_pricing_config(&docs, &custom).await.unwrap();
        assert_eq!(get_pricing_config(&docs).await.unwrap().minimum_price, 7.5);
    }

    #[tokio::test]
    async fn rejects_nonsense() {
        let docs = DocumentStore::in_memory();
        let bad = PricingConfig {
            vat_rate: 21.0,
            ..PricingConfig::default()
        };
        assert!(save_pricing_config(&docs, &bad).await.is_err());
    }
}
