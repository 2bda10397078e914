pub mod advance;
pub mod alert;
pub mod auth;
pub mod balance;
pub mod disbursement;
pub mod document;
pub mod intervenant;
pub mod mouvement;
pub mod settings;
pub mod tenancy;
