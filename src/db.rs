pub mod user_repo;
pub use user_repo::UserRepository;
pub mod tenancy_repo;
pub use tenancy_repo::TenantRepository;
pub mod settings_repo;
pub use settings_repo::SettingsRepository;
pub mod intervenant_repo;
pub use intervenant_repo::IntervenantRepository;
pub mod mouvement_repo;
pub use mouvement_repo::MouvementRepository;
pub mod disbursement_repo;
pub use disbursement_repo::DisbursementRepository;
pub mod advance_repo;
pub use advance_repo::AdvanceRepository;
pub mod document_repo;
pub use document_repo::DocumentRepository;
pub mod alert_repo;
pub use alert_repo::AlertRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;
