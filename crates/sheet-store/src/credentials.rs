use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{DocumentStore, StoreError, CREDENTIALS};

/// Login record, keyed by normalized email.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Credential {
    pub uid: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Fails with `AlreadyExists` when the email is taken.
pub async fn create_credential(docs: &DocumentStore, credential: &Credential) -> Result<(), StoreError> {
    docs.insert(CREDENTIALS, &normalize_email(&credential.email), credential)
        .await
}

pub async fn get_credential(docs: &DocumentStore, email: &str) -> Result<Option<Credential>, StoreError> {
    docs.get(CREDENTIALS, &normalize_email(email)).await
}
