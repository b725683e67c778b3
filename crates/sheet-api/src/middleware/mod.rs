pub mod auth;
pub mod locale;
