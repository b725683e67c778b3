pub mod account;
pub mod admin;
pub mod checkout;
pub mod contact;
pub mod home;
pub mod login;
pub mod materials;
pub mod pricing;
pub mod sheets;
pub mod signup;
pub mod upload;
