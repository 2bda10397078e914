// src/services/alert_service.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::collections::HashSet;
use uuid::Uuid;

use crate::{
    common::{error::AppError, money::sum_money},
    db::{AlertRepository, DisbursementRepository, DocumentRepository, SettingsRepository},
    models::{
        alert::{Alert, AlertDraft, AlertKind, AlertSeverity, CreateAlertPayload},
        balance::IntervenantBalance,
        disbursement::{Disbursement, DisbursementStatus},
        document::Document,
        settings::TenantSettings,
    },
    services::balance_service::BalanceService,
};

/// Tudo que as regras de alerta precisam, já agregado.
#[derive(Debug, Clone)]
pub struct AlertInputs {
    pub cash_balance: Decimal,
    pub balances: Vec<IntervenantBalance>,
    pub open_disbursements: Vec<Disbursement>,
    pub unpaid_documents: Vec<Document>,
}

// =============================================================================
//  REGRAS (puras)
// =============================================================================

fn low_cash(inputs: &AlertInputs, settings: &TenantSettings) -> Option<AlertDraft> {
    let minimum = settings.min_cash_balance?;
    if inputs.cash_balance >= minimum {
        return None;
    }
    let severity = if inputs.cash_balance < Decimal::ZERO {
        AlertSeverity::Critical
    } else {
        AlertSeverity::Warning
    };
    Some(AlertDraft {
        kind: AlertKind::LowCash,
        severity,
        title: "Caixa abaixo do mínimo".into(),
        message: format!(
            "O saldo de caixa ({}) está abaixo do mínimo configurado ({}).",
            inputs.cash_balance, minimum
        ),
        entity_id: None,
        amount: Some(inputs.cash_balance),
    })
}

fn debts(inputs: &AlertInputs, settings: &TenantSettings) -> Vec<AlertDraft> {
    let Some(threshold) = settings.debt_threshold else {
        return Vec::new();
    };

    inputs
        .balances
        .iter()
        .filter_map(|b| {
            if b.balance > threshold {
                Some(AlertDraft {
                    kind: AlertKind::ReceivableDebt,
                    severity: AlertSeverity::Warning,
                    title: format!("{} ultrapassou o limite de dívida", b.name),
                    message: format!(
                        "{} deve {} à empresa (limite {}).",
                        b.name, b.balance, threshold
                    ),
                    entity_id: Some(b.intervenant_id),
                    amount: Some(b.balance),
                })
            } else if -b.balance > threshold {
                Some(AlertDraft {
                    kind: AlertKind::PayableDebt,
                    severity: AlertSeverity::Warning,
                    title: format!("Dívida com {} acima do limite", b.name),
                    message: format!(
                        "A empresa deve {} a {} (limite {}).",
                        -b.balance, b.name, threshold
                    ),
                    entity_id: Some(b.intervenant_id),
                    amount: Some(-b.balance),
                })
            } else {
                None
            }
        })
        .collect()
}

fn overdue_disbursements(
    inputs: &AlertInputs,
    settings: &TenantSettings,
    today: NaiveDate,
) -> Vec<AlertDraft> {
    let max_age = i64::from(settings.disbursement_age_days);

    inputs
        .open_disbursements
        .iter()
        .filter(|d| d.status != DisbursementStatus::Justified)
        .filter(|d| (today - d.disbursed_on).num_days() > max_age)
        .map(|d| AlertDraft {
            kind: AlertKind::DisbursementOverdue,
            severity: AlertSeverity::Warning,
            title: "Desembolso sem justificativa".into(),
            message: format!(
                "O desembolso \"{}\" de {} ainda tem {} pendente após {} dias.",
                d.purpose,
                d.disbursed_on,
                d.remaining_amount,
                (today - d.disbursed_on).num_days()
            ),
            entity_id: Some(d.id),
            amount: Some(d.remaining_amount),
        })
        .collect()
}

fn outstanding_disbursements(inputs: &AlertInputs, settings: &TenantSettings) -> Option<AlertDraft> {
    let threshold = settings.disbursement_amount_threshold?;
    let outstanding = sum_money(
        inputs
            .open_disbursements
            .iter()
            .filter(|d| d.status != DisbursementStatus::Justified)
            .map(|d| d.remaining_amount),
    );
    if outstanding <= threshold {
        return None;
    }
    Some(AlertDraft {
        kind: AlertKind::DisbursementOutstanding,
        severity: AlertSeverity::Critical,
        title: "Total de desembolsos pendentes acima do limite".into(),
        message: format!(
            "Há {} em desembolsos não justificados (limite {}).",
            outstanding, threshold
        ),
        entity_id: None,
        amount: Some(outstanding),
    })
}

fn overdue_documents(inputs: &AlertInputs, today: NaiveDate) -> Vec<AlertDraft> {
    inputs
        .unpaid_documents
        .iter()
        .filter(|d| d.is_overdue(today))
        .map(|d| AlertDraft {
            kind: AlertKind::DocumentOverdue,
            severity: AlertSeverity::Info,
            title: format!("Documento {} vencido", d.reference),
            message: format!(
                "O documento {} venceu em {} com {} em aberto.",
                d.reference,
                d.due_on.map(|x| x.to_string()).unwrap_or_default(),
                d.remaining_amount
            ),
            entity_id: Some(d.id),
            amount: Some(d.remaining_amount),
        })
        .collect()
}

/// Avalia todas as regras contra os limites do tenant.
pub fn evaluate_alerts(inputs: &AlertInputs, settings: &TenantSettings, today: NaiveDate) -> Vec<AlertDraft> {
    let mut drafts = Vec::new();
    drafts.extend(low_cash(inputs, settings));
    drafts.extend(debts(inputs, settings));
    drafts.extend(overdue_disbursements(inputs, settings, today));
    drafts.extend(outstanding_disbursements(inputs, settings));
    drafts.extend(overdue_documents(inputs, today));
    drafts
}

/// Descarta rascunhos que já têm um alerta ativo (mesmo tipo e mesma entidade).
pub fn without_active_duplicates(drafts: Vec<AlertDraft>, active: &[Alert]) -> Vec<AlertDraft> {
    let existing: HashSet<(AlertKind, Option<Uuid>)> = active
        .iter()
        .filter(|a| !a.is_dismissed)
        .map(|a| (a.kind, a.entity_id))
        .collect();

    drafts
        .into_iter()
        .filter(|d| !existing.contains(&(d.kind, d.entity_id)))
        .collect()
}

// =============================================================================
//  SERVIÇO
// =============================================================================

#[derive(Clone)]
pub struct AlertService {
    repo: AlertRepository,
    settings_repo: SettingsRepository,
    disbursement_repo: DisbursementRepository,
    document_repo: DocumentRepository,
    balance_service: BalanceService,
    pool: PgPool,
}

impl AlertService {
    pub fn new(
        repo: AlertRepository,
        settings_repo: SettingsRepository,
        disbursement_repo: DisbursementRepository,
        document_repo: DocumentRepository,
        balance_service: BalanceService,
        pool: PgPool,
    ) -> Self {
        Self { repo, settings_repo, disbursement_repo, document_repo, balance_service, pool }
    }

    pub async fn list(&self, tenant_id: Uuid, include_dismissed: bool) -> Result<Vec<Alert>, AppError> {
        self.repo.list(&self.pool, tenant_id, include_dismissed).await
    }

    pub async fn create_manual(
        &self,
        tenant_id: Uuid,
        payload: CreateAlertPayload,
    ) -> Result<Alert, AppError> {
        let draft = AlertDraft {
            kind: AlertKind::Manual,
            severity: payload.severity,
            title: payload.title,
            message: payload.message,
            entity_id: payload.entity_id,
            amount: None,
        };
        self.repo.insert(&self.pool, tenant_id, &draft).await
    }

    pub async fn dismiss(&self, tenant_id: Uuid, alert_id: Uuid, user_id: Uuid) -> Result<Alert, AppError> {
        self.repo
            .dismiss(&self.pool, tenant_id, alert_id, user_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Alert".into()))
    }

    /// Roda as regras e grava apenas os alertas novos.
    pub async fn check(&self, tenant_id: Uuid, today: NaiveDate) -> Result<Vec<Alert>, AppError> {
        let settings = self.settings_repo.get_settings(&self.pool, tenant_id).await?;

        let inputs = AlertInputs {
            cash_balance: self.balance_service.compute_cash_balance(tenant_id).await?.balance,
            balances: self.balance_service.list_balances(tenant_id).await?,
            open_disbursements: self.disbursement_repo.list_unjustified(&self.pool, tenant_id).await?,
            unpaid_documents: self.document_repo.list_unpaid(&self.pool, tenant_id).await?,
        };

        let active = self.repo.list(&self.pool, tenant_id, false).await?;
        let drafts = without_active_duplicates(evaluate_alerts(&inputs, &settings, today), &active);

        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(drafts.len());
        for draft in &drafts {
            created.push(self.repo.insert(&mut *tx, tenant_id, draft).await?);
        }
        tx.commit().await?;

        tracing::info!(%tenant_id, created = created.len(), "Verificação de alertas concluída");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        balance::BalancePosition,
        document::{DocumentDirection, DocumentKind, DocumentStatus},
        intervenant::IntervenantKind,
        mouvement::PaymentModality,
    };
    use chrono::{Duration, Utc};
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    fn settings() -> TenantSettings {
        TenantSettings {
            debt_threshold: Some(dec!(1000)),
            min_cash_balance: Some(dec!(500)),
            disbursement_amount_threshold: Some(dec!(2000)),
            disbursement_age_days: 30,
            ..TenantSettings::defaults(Uuid::new_v4())
        }
    }

    fn balance(name: &str, value: Decimal) -> IntervenantBalance {
        IntervenantBalance {
            intervenant_id: Uuid::new_v4(),
            name: name.into(),
            kind: IntervenantKind::Client,
            total_entries: dec!(0),
            total_exits: dec!(0),
            balance: value,
            position: BalancePosition::Settled,
        }
    }

    fn disbursement(remaining: Decimal, days_ago: i64) -> Disbursement {
        Disbursement {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            intervenant_id: Uuid::new_v4(),
            initial_amount: remaining,
            remaining_amount: remaining,
            status: DisbursementStatus::Open,
            purpose: "Carburant".into(),
            modality: PaymentModality::Cash,
            disbursed_on: today() - Duration::days(days_ago),
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn document(remaining: Decimal, due_on: Option<NaiveDate>) -> Document {
        Document {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            intervenant_id: None,
            kind: DocumentKind::Invoice,
            direction: DocumentDirection::Receivable,
            reference: "FAC-1".into(),
            total_amount: remaining,
            paid_amount: dec!(0),
            remaining_amount: remaining,
            status: DocumentStatus::Unpaid,
            issued_on: today() - Duration::days(60),
            due_on,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn quiet_inputs() -> AlertInputs {
        AlertInputs {
            cash_balance: dec!(10000),
            balances: vec![balance("Ok", dec!(100))],
            open_disbursements: vec![disbursement(dec!(100), 5)],
            unpaid_documents: vec![document(dec!(10), Some(today()))],
        }
    }

    fn kinds(drafts: &[AlertDraft]) -> Vec<AlertKind> {
        drafts.iter().map(|d| d.kind).collect()
    }

    #[test]
    fn nothing_fires_below_thresholds() {
        assert!(evaluate_alerts(&quiet_inputs(), &settings(), today()).is_empty());
    }

    #[test]
    fn low_cash_severity_depends_on_sign() {
        let mut inputs = quiet_inputs();
        inputs.cash_balance = dec!(499.99);
        let drafts = evaluate_alerts(&inputs, &settings(), today());
        assert_eq!(kinds(&drafts), vec![AlertKind::LowCash]);
        assert_eq!(drafts[0].severity, AlertSeverity::Warning);

        inputs.cash_balance = dec!(-1);
        let drafts = evaluate_alerts(&inputs, &settings(), today());
        assert_eq!(drafts[0].severity, AlertSeverity::Critical);
    }

    #[test]
    fn debt_rules_fire_per_direction() {
        let mut inputs = quiet_inputs();
        inputs.balances = vec![
            balance("Client", dec!(1000.01)),
            balance("Supplier", dec!(-1500)),
            balance("Exact", dec!(1000)),
        ];

        let drafts = evaluate_alerts(&inputs, &settings(), today());
        assert_eq!(kinds(&drafts), vec![AlertKind::ReceivableDebt, AlertKind::PayableDebt]);
        assert_eq!(drafts[1].amount, Some(dec!(1500)));
        assert_eq!(drafts[0].entity_id, Some(inputs.balances[0].intervenant_id));
    }

    #[test]
    fn disbursement_rules() {
        let mut inputs = quiet_inputs();
        inputs.open_disbursements = vec![
            disbursement(dec!(1500), 31),
            disbursement(dec!(600), 30),
        ];

        let drafts = evaluate_alerts(&inputs, &settings(), today());
        assert_eq!(
            kinds(&drafts),
            vec![AlertKind::DisbursementOverdue, AlertKind::DisbursementOutstanding]
        );
        assert_eq!(drafts[1].amount, Some(dec!(2100)));
    }

    #[test]
    fn overdue_documents_fire_once_past_due() {
        let mut inputs = quiet_inputs();
        inputs.unpaid_documents = vec![
            document(dec!(50), Some(today() - Duration::days(1))),
            document(dec!(50), None),
        ];
        let drafts = evaluate_alerts(&inputs, &settings(), today());
        assert_eq!(kinds(&drafts), vec![AlertKind::DocumentOverdue]);
    }

    #[test]
    fn unset_thresholds_disable_rules() {
        let inputs = AlertInputs {
            cash_balance: dec!(-100),
            balances: vec![balance("Big", dec!(1000000))],
            open_disbursements: vec![disbursement(dec!(1000000), 1)],
            unpaid_documents: vec![],
        };
        let settings = TenantSettings::defaults(Uuid::new_v4());
        assert!(evaluate_alerts(&inputs, &settings, today()).is_empty());
    }

    #[test]
    fn active_duplicates_are_suppressed_but_dismissed_ones_are_not() {
        let mut inputs = quiet_inputs();
        inputs.cash_balance = dec!(0);
        let drafts = evaluate_alerts(&inputs, &settings(), today());

        let mut existing = Alert {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            kind: AlertKind::LowCash,
            severity: AlertSeverity::Warning,
            title: "old".into(),
            message: "old".into(),
            entity_id: None,
            amount: None,
            is_dismissed: false,
            dismissed_at: None,
            dismissed_by: None,
            created_at: Utc::now(),
        };
        assert!(without_active_duplicates(drafts.clone(), std::slice::from_ref(&existing)).is_empty());

        existing.is_dismissed = true;
        assert_eq!(without_active_duplicates(drafts, &[existing]).len(), 1);
    }
}
