// src/config.rs

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, net::SocketAddr, time::Duration};

use crate::{
    common::{
        cache::{BalanceCache, DEFAULT_BALANCE_TTL},
        i18n::I18nStore,
    },
    db::{
        AdvanceRepository, AlertRepository, DashboardRepository, DisbursementRepository,
        DocumentRepository, IntervenantRepository, MouvementRepository, SettingsRepository,
        TenantRepository, UserRepository,
    },
    services::{
        advance_service::AdvanceService, alert_service::AlertService, auth::AuthService,
        balance_service::BalanceService, dashboard_service::DashboardService,
        disbursement_service::DisbursementService, document_service::DocumentService,
        intervenant_service::IntervenantService, mouvement_service::MouvementService,
        tenancy_service::TenantService, user_service::UserService,
    },
};

const DEFAULT_JWT_TTL_HOURS: i64 = 24;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Configuração lida do ambiente (.env em desenvolvimento).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub max_connections: u32,
    pub bind_addr: SocketAddr,
    pub balance_cache_ttl: Duration,
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} inválido ('{}'): {}", name, raw, e)),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let cache_secs = parse_var("BALANCE_CACHE_TTL_SECS", DEFAULT_BALANCE_TTL.as_secs())?;

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_ttl_hours: parse_var("JWT_TTL_HOURS", DEFAULT_JWT_TTL_HOURS)?,
            max_connections: parse_var("DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
            bind_addr: parse_var("BIND_ADDR", DEFAULT_BIND_ADDR.parse()?)?,
            balance_cache_ttl: Duration::from_secs(cache_secs),
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Config,
    pub i18n_store: I18nStore,

    pub auth_service: AuthService,
    pub user_service: UserService,
    pub tenant_service: TenantService,
    pub intervenant_service: IntervenantService,
    pub mouvement_service: MouvementService,
    pub disbursement_service: DisbursementService,
    pub advance_service: AdvanceService,
    pub document_service: DocumentService,
    pub balance_service: BalanceService,
    pub alert_service: AlertService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = Config::from_env()?;

        let db_pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        let i18n_store = I18nStore::load()?;
        Ok(Self::build(config, db_pool, i18n_store))
    }

    // --- Monta o gráfico de dependências ---
    pub fn build(config: Config, db_pool: PgPool, i18n_store: I18nStore) -> Self {
        let balance_cache = BalanceCache::new(config.balance_cache_ttl);

        let user_repo = UserRepository::new(db_pool.clone());
        let tenant_repo = TenantRepository::new();
        let settings_repo = SettingsRepository::new();
        let intervenant_repo = IntervenantRepository::new();
        let mouvement_repo = MouvementRepository::new();
        let disbursement_repo = DisbursementRepository::new();
        let advance_repo = AdvanceRepository::new();
        let document_repo = DocumentRepository::new();
        let alert_repo = AlertRepository::new();
        let dashboard_repo = DashboardRepository::new();

        let auth_service = AuthService::new(
            user_repo.clone(),
            tenant_repo.clone(),
            settings_repo.clone(),
            config.jwt_secret.clone(),
            config.jwt_ttl_hours,
            db_pool.clone(),
        );
        let user_service = UserService::new(user_repo, db_pool.clone());
        let tenant_service = TenantService::new(tenant_repo, settings_repo.clone(), db_pool.clone());
        let intervenant_service = IntervenantService::new(intervenant_repo.clone(), db_pool.clone());
        let mouvement_service = MouvementService::new(
            mouvement_repo.clone(),
            intervenant_repo.clone(),
            balance_cache.clone(),
            db_pool.clone(),
        );
        let disbursement_service = DisbursementService::new(
            disbursement_repo.clone(),
            mouvement_repo.clone(),
            intervenant_repo.clone(),
            balance_cache.clone(),
            db_pool.clone(),
        );
        let advance_service = AdvanceService::new(
            advance_repo,
            mouvement_repo.clone(),
            intervenant_repo.clone(),
            balance_cache.clone(),
            db_pool.clone(),
        );
        let document_service = DocumentService::new(
            document_repo.clone(),
            mouvement_repo.clone(),
            intervenant_repo.clone(),
            balance_cache.clone(),
            db_pool.clone(),
        );
        let balance_service = BalanceService::new(
            mouvement_repo,
            intervenant_repo,
            balance_cache.clone(),
            db_pool.clone(),
        );
        let alert_service = AlertService::new(
            alert_repo,
            settings_repo,
            disbursement_repo,
            document_repo,
            balance_service.clone(),
            db_pool.clone(),
        );
        let dashboard_service = DashboardService::new(dashboard_repo, balance_service.clone(), db_pool.clone());

        Self {
            db_pool,
            config,
            i18n_store,
            auth_service,
            user_service,
            tenant_service,
            intervenant_service,
            mouvement_service,
            disbursement_service,
            advance_service,
            document_service,
            balance_service,
            alert_service,
            dashboard_service,
        }
    }
}

#[cfg(test)]
impl AppState {
    /// Estado completo sobre um pool já criado (preguiçoso ou do `#[sqlx::test]`).
    pub fn for_tests(db_pool: PgPool) -> Self {
        let config = Config {
            database_url: "postgres://localhost/tesouraria_test".into(),
            jwt_secret: "segredo-de-teste".into(),
            jwt_ttl_hours: 1,
            max_connections: 1,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            balance_cache_ttl: DEFAULT_BALANCE_TTL,
        };
        let i18n_store = I18nStore::load().expect("catálogos válidos");
        Self::build(config, db_pool, i18n_store)
    }

    /// Pool que nunca conecta: serve para rotas que respondem antes do banco.
    pub fn without_database() -> Self {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/tesouraria_test")
            .expect("url de teste válida");
        Self::for_tests(pool)
    }

    /// Registra uma empresa e devolve o administrador criado com ela.
    pub async fn seed_tenant(&self, slug: &str) -> crate::models::auth::User {
        let payload = crate::models::auth::RegisterTenantPayload {
            tenant_name: format!("Empresa {slug}"),
            tenant_slug: slug.to_string(),
            full_name: "Administrador".into(),
            email: format!("admin@{slug}.com"),
            password: "senha-forte-123".into(),
        };
        self.auth_service
            .register_tenant(&payload)
            .await
            .expect("registro de teste")
            .user
    }

    pub async fn seed_intervenant(&self, tenant_id: uuid::Uuid, name: &str) -> crate::models::intervenant::Intervenant {
        let payload = crate::models::intervenant::CreateIntervenantPayload {
            name: name.to_string(),
            kind: crate::models::intervenant::IntervenantKind::Supplier,
            phone: None,
            email: None,
            notes: None,
        };
        self.intervenant_service
            .create(tenant_id, &payload)
            .await
            .expect("interveniente de teste")
    }
}
