pub mod contact;
pub mod geometry;
pub mod locale;
pub mod nesting;
pub mod order;
pub mod part;
pub mod pricing;
pub mod seo;
pub mod sheet;
pub mod user;

pub use contact::*;
pub use geometry::*;
pub use locale::*;
pub use nesting::*;
pub use order::*;
pub use part::*;
pub use pricing::*;
pub use seo::*;
pub use sheet::*;
pub use user::*;

/// Name of the cookie carrying the signed session token.
pub const SESSION_COOKIE: &str = "session_token";

/// Name of the cookie remembering the visitor's last locale.
pub const LOCALE_COOKIE: &str = "locale";
