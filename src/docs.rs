// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Users ---
        handlers::users::list_users,
        handlers::users::create_user,
        handlers::users::update_user,

        // --- Tenancy ---
        handlers::tenancy::get_tenant,
        handlers::tenancy::update_tenant,

        // --- Settings ---
        handlers::settings::get_settings,
        handlers::settings::update_settings,

        // --- Intervenants ---
        handlers::intervenants::list_intervenants,
        handlers::intervenants::create_intervenant,
        handlers::intervenants::get_intervenant,
        handlers::intervenants::update_intervenant,

        // --- Mouvements ---
        handlers::mouvements::list_mouvements,
        handlers::mouvements::create_mouvement,
        handlers::mouvements::update_mouvement,
        handlers::mouvements::delete_mouvement,

        // --- Disbursements ---
        handlers::disbursements::list_disbursements,
        handlers::disbursements::create_disbursement,
        handlers::disbursements::get_disbursement,
        handlers::disbursements::justify_disbursement,
        handlers::disbursements::return_disbursement,

        // --- Advances ---
        handlers::advances::list_advances,
        handlers::advances::create_advance,
        handlers::advances::reimburse_advance,

        // --- Balances / Cash ---
        handlers::dashboard::list_balances,
        handlers::dashboard::get_balance,
        handlers::dashboard::get_cash_balance,
        handlers::dashboard::get_dashboard,

        // --- Documents ---
        handlers::documents::list_documents,
        handlers::documents::create_document,
        handlers::documents::get_document_stats,
        handlers::documents::pay_document,

        // --- Alerts ---
        handlers::alerts::list_alerts,
        handlers::alerts::create_alert,
        handlers::alerts::dismiss_alert,
        handlers::alerts::check_alerts,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserRole,
            models::auth::User,
            models::auth::LoginUserPayload,
            models::auth::RegisterTenantPayload,
            models::auth::AuthResponse,
            models::auth::CreateUserPayload,
            models::auth::UpdateUserPayload,

            // --- Tenancy / Settings ---
            models::tenancy::Tenant,
            models::tenancy::UpdateTenantPayload,
            models::settings::TenantSettings,
            models::settings::UpdateSettingsRequest,

            // --- Intervenants ---
            models::intervenant::IntervenantKind,
            models::intervenant::Intervenant,
            models::intervenant::CreateIntervenantPayload,
            models::intervenant::UpdateIntervenantPayload,

            // --- Mouvements ---
            models::mouvement::MouvementKind,
            models::mouvement::PaymentModality,
            models::mouvement::Mouvement,
            models::mouvement::CreateMouvementPayload,
            models::mouvement::UpdateMouvementPayload,

            // --- Disbursements ---
            models::disbursement::DisbursementStatus,
            models::disbursement::Disbursement,
            models::disbursement::Justification,
            models::disbursement::DisbursementDetail,
            models::disbursement::JustificationResult,
            models::disbursement::ReturnResult,
            models::disbursement::CreateDisbursementPayload,
            models::disbursement::JustifyDisbursementPayload,
            models::disbursement::ReturnDisbursementPayload,

            // --- Advances ---
            models::advance::AdvanceStatus,
            models::advance::Advance,
            models::advance::ReimbursementResult,
            models::advance::CreateAdvancePayload,
            models::advance::ReimburseAdvancePayload,

            // --- Documents ---
            models::document::DocumentKind,
            models::document::DocumentDirection,
            models::document::DocumentStatus,
            models::document::Document,
            models::document::PaymentResult,
            models::document::DirectionStats,
            models::document::DocumentStats,
            models::document::CreateDocumentPayload,
            models::document::PayDocumentPayload,

            // --- Alerts ---
            models::alert::AlertKind,
            models::alert::AlertSeverity,
            models::alert::Alert,
            models::alert::CreateAlertPayload,

            // --- Balances ---
            models::balance::BalancePosition,
            models::balance::IntervenantBalance,
            models::balance::CashBalance,
            models::balance::CashBalanceResponse,
            models::balance::CashDashboard,
        )
    ),
    tags(
        (name = "Auth", description = "Registro da empresa e autenticação"),
        (name = "Users", description = "Usuários da empresa"),
        (name = "Tenancy", description = "Dados da empresa"),
        (name = "Settings", description = "Limites de alerta"),
        (name = "Intervenants", description = "Pessoas e organizações que movimentam o caixa"),
        (name = "Mouvements", description = "Entradas e saídas de caixa"),
        (name = "Disbursements", description = "Desembolsos, justificativas e devoluções"),
        (name = "Advances", description = "Adiantamentos e reembolsos"),
        (name = "Balances", description = "Saldos por interveniente"),
        (name = "Cash", description = "Saldo e painel de caixa"),
        (name = "Documents", description = "Faturas, recibos e pagamentos"),
        (name = "Alerts", description = "Alertas de tesouraria")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_cash_routes_and_bearer_scheme() {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key("/api/disbursements/{id}/justify"));
        assert!(doc.paths.paths.contains_key("/api/cash/dashboard"));
        assert!(doc.paths.paths.contains_key("/api/documents/{id}/pay"));

        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("api_jwt"));
    }
}
