pub mod advances;
pub mod alerts;
pub mod auth;
pub mod dashboard;
pub mod disbursements;
pub mod documents;
pub mod intervenants;
pub mod mouvements;
pub mod settings;
pub mod tenancy;
pub mod users;
