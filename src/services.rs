pub mod lifecycle;
pub mod auth;
pub mod user_service;
pub mod tenancy_service;
pub mod intervenant_service;
pub mod mouvement_service;
pub mod disbursement_service;
pub mod advance_service;
pub mod document_service;
pub mod balance_service;
pub mod alert_service;
pub mod dashboard_service;
