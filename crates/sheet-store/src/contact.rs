use chrono::Utc;
use sheet_types::{ContactMessage, ContactRequest};

use crate::{new_id, DocumentStore, StoreError, CONTACT_MESSAGES};

pub async fn save_contact_message(
    docs: &DocumentStore,
    request: ContactRequest,
) -> Result<ContactMessage, StoreError> {
    let message = ContactMessage {
        id: new_id(),
        reason: request.reason,
        name: request.name.trim().to_string(),
        email: request.email.trim().to_string(),
        order_reference: request
            .order_reference
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty()),
        message: request.message.trim().to_string(),
        created_at: Utc::now(),
    };
    docs.insert(CONTACT_MESSAGES, &message.id, &message).await?;
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stores_trimmed_message() {
        let docs = DocumentStore::in_memory();
        let saved = save_contact_message(
            &docs,
            ContactRequest {
                reason: "quote".into(),
                name: " Ada ".into(),
                email: "ada@example.com".into(),
                order_reference: Some("  ".into()),
                message: "Need 40 brackets\n".into(),
            },
        )
        .await
        .unwrap();

        assert_eq!(saved.name, "Ada");
        assert_eq!(saved.order_reference, None);
        let stored: Vec<ContactMessage> = docs.list(CONTACT_MESSAGES).await.unwrap();
        assert_eq!(stored, vec![saved]);
    }
}
