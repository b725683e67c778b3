use chrono::Utc;
use sheet_types::{Order, OrderItem, OrderStatus, OrderUpdate};

use crate::{new_id, DocumentStore, StoreError, ORDERS};

#[derive(Clone, Debug)]
pub struct NewOrder {
    pub user_id: String,
    pub items: Vec<OrderItem>,
    pub subtotal: f64,
    pub vat: f64,
    pub total: f64,
    pub vat_rate: f64,
}

/// What a payment confirmation did to its order.
#[derive(Clone, Debug, PartialEq)]
pub enum PaymentOutcome {
    MarkedPaid(Order),
    /// The order had already left `pending`; nothing was written.
    Unchanged(OrderStatus),
}

pub async fn create_order(docs: &DocumentStore, new: NewOrder) -> Result<Order, StoreError> {
    let order = Order {
        id: new_id(),
        user_id: new.user_id,
        items: new.items,
        subtotal: new.subtotal,
        vat: new.vat,
        total: new.total,
        vat_rate: Some(new.vat_rate),
        status: OrderStatus::Pending,
        stripe_session_id: None,
        created_at: Utc::now(),
    };
    docs.insert(ORDERS, &order.id, &order).await?;
    tracing::info!("order {} created for {} ({:.2})", order.id, order.user_id, order.total);
    Ok(order)
}

pub async fn get_order(docs: &DocumentStore, id: &str) -> Result<Option<Order>, StoreError> {
    docs.get(ORDERS, id).await
}

fn newest_first(mut orders: Vec<Order>) -> Vec<Order> {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    orders
}

pub async fn get_orders_by_user(docs: &DocumentStore, userId: &str) -> Result<Vec<Order>, StoreError> {
    let orders = docs.find(ORDERS, |o: &Order| o.user_id == userId).await?;
    Ok(newest_first(orders))
}

pub async fn get_all_orders(docs: &DocumentStore) -> Result<Vec<Order>, StoreError> {
    Ok(newest_first(docs.list(ORDERS).await?))
}

pub async fn update_order(docs: &DocumentStore, id: &str, update: &OrderUpdate) -> Result<Order, StoreError> {
    let patch = serde_json::to_value(update)?;
    docs.transaction(|tx| {
        tx.update(ORDERS, id, patch)?;
        tx.fetch(ORDERS, id)
    })
    .await
}

/// Moves a pending order to paid. Repeated confirmations are no-ops.
pub async fn mark_order_paid(
    docs: &DocumentStore,
    id: &str,
    sessionId: &str,
) -> Result<PaymentOutcome, StoreError> {
    docs.transaction(|tx| {
        let mut order: Order = tx.fetch(ORDERS, id)?;
        if order.status != OrderStatus::Pending {
            return Ok(PaymentOutcome::Unchanged(order.status));
        }
        order.status = OrderStatus::Paid;
        order.stripe_session_id = Some(sessionId.to_string());
        tx.set(ORDERS, id, &order)?;
        Ok(PaymentOutcome::MarkedPaid(order))
    })
    .await
}

/// Staff status change; only forward moves are allowed.
pub async fn advance_order_status(
    docs: &DocumentStore,
    id: &str,
    next: OrderStatus,
) -> Result<Order, StoreError> {
    docs.transaction(|tx| {
        let mut order: Order = tx.fetch(ORDERS, id)?;
        if !order.status.can_advance_to(next) {
            return Err(StoreError::InvalidTransition {
                from: order.status.as_str().to_string(),
                to: next.as_str().to_string(),
            });
        }
        order.status = next;
        tx.set(ORDERS, id, &order)?;
        Ok(order)
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_order(user: &str, total: f64) -> NewOrder {
        NewOrder {
            user_id: user.to_string(),
            items: vec![OrderItem {
                part_id: "p1".into(),
                file_name: "plate.dxf".into(),
                quantity: 2,
                price_per_unit: total / 2.0,
                total,
            }],
            subtotal: total,
            vat: 0.0,
            total,
            vat_rate: 0.0,
        }
    }

    #[tokio::test]
    async fn lists_newest_first_per_user() {
        let docs = DocumentStore::in_memory();
        let first = create_order(&docs, new_order("u1", 10.0)).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = create_order(&docs, new_order("u1", 20.0)).await.unwrap();
        create_order(&docs, new_order("u2", 30.0)).await.unwrap();

        let mine = get_orders_by_user(&docs, "u1").await.unwrap();
        assert_eq!(
            mine.iter().map(|o| o.id.as_str()).collect::<Vec<_>>(),
            vec![second.id.as_str(), first.id.as_str()]
        );
        assert_eq!(get_all_orders(&docs).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn update_patches_only_given_fields() {
        let docs = DocumentStore::in_memory();
        let order = create_order(&docs, new_order("u1", 10.0)).await.unwrap();

        let updated = update_order(
            &docs,
            &order.id,
            &OrderUpdate {
                stripe_session_id: Some("cs_test".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.status, OrderStatus::Pending);
        assert_eq!(updated.stripe_session_id.as_deref(), Some("cs_test"));
        assert_eq!(updated.items, order.items);
    }

    #[tokio::test]
    async fn payment_is_idempotent() {
        let docs = DocumentStore::in_memory();
        let order = create_order(&docs, new_order("u1", 10.0)).await.unwrap();

        let first = mark_order_paid(&docs, &order.id, "cs_1").await.unwrap();
        assert!(matches!(first, PaymentOutcome::MarkedPaid(ref o) if o.status == OrderStatus::Paid));

        let again = mark_order_paid(&docs, &order.id, "cs_2").await.unwrap();
        assert_eq!(again, PaymentOutcome::Unchanged(OrderStatus::Paid));

        let stored = get_order(&docs, &order.id).await.unwrap().unwrap();
        assert_eq!(stored.stripe_session_id.as_deref(), Some("cs_1"));

        assert!(mark_order_paid(&docs, "missing", "cs").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn status_cannot_go_backwards() {
        let docs = DocumentStore::in_memory();
        let order = create_order(&docs, new_order("u1", 10.0)).await.unwrap();

        advance_order_status(&docs, &order.id, OrderStatus::Shipped).await.unwrap();
        let err = advance_order_status(&docs, &order.id, OrderStatus::Paid).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidTransition { .. }));
    }
}
