#![allow(non_snake_case)]

pub mod autonest;
pub mod contact;
pub mod credentials;
pub mod document;
pub mod error;
pub mod inject;
pub mod locks;
pub mod objects;
pub mod orders;
pub mod parts;
pub mod pricing_config;
pub mod production;
pub mod sheets;
pub mod users;

pub use document::{DocumentStore, Transaction};
pub use error::StoreError;
pub use objects::ObjectStorage;

pub const USERS: &str = "users";
pub const CREDENTIALS: &str = "credentials";
pub const ORDERS: &str = "orders";
pub const PARTS: &str = "parts";
pub const SHEETS: &str = "sheets";
pub const PRICING_CONFIG: &str = "pricingConfig";
pub const CONTACT_MESSAGES: &str = "contactMessages";

/// Document database plus file storage, shared by every request.
#[derive(Clone)]
pub struct Store {
    pub docs: DocumentStore,
    pub objects: ObjectStorage,
}

impl Store {
    pub fn new(docs: DocumentStore, objects: ObjectStorage) -> Self {
        Self { docs, objects }
    }
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
