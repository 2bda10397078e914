// src/services/balance_service.rs

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    common::{
        cache::BalanceCache,
        error::AppError,
        money::{subtract_money, sum_money},
    },
    db::{IntervenantRepository, MouvementRepository},
    models::{
        balance::{BalancePosition, CashBalance, CashBalanceResponse, IntervenantBalance, MovementLine},
        intervenant::Intervenant,
        mouvement::{MouvementKind, PaymentModality},
    },
};

// =============================================================================
//  CÁLCULOS PUROS
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub entries: Decimal,
    pub exits: Decimal,
}

fn totals<'a, I>(lines: I) -> Totals
where
    I: IntoIterator<Item = &'a MovementLine>,
{
    let mut entries = Vec::new();
    let mut exits = Vec::new();
    for line in lines {
        match line.kind {
            MouvementKind::Entry => entries.push(line.amount),
            MouvementKind::Exit => exits.push(line.amount),
        }
    }
    Totals {
        entries: sum_money(entries),
        exits: sum_money(exits),
    }
}

pub fn position_of(balance: Decimal) -> BalancePosition {
    if balance > Decimal::ZERO {
        BalancePosition::OwesCompany
    } else if balance < Decimal::ZERO {
        BalancePosition::CompanyOwes
    } else {
        BalancePosition::Settled
    }
}

/// Saldo do interveniente: Σsaídas - Σentradas.
/// Positivo = ele deve à empresa; negativo = a empresa deve a ele.
pub fn intervenant_balance(intervenant: &Intervenant, lines: &[MovementLine]) -> IntervenantBalance {
    let t = totals(lines.iter().filter(|l| l.intervenant_id == intervenant.id));
    let balance = subtract_money(t.exits, t.entries);

    IntervenantBalance {
        intervenant_id: intervenant.id,
        name: intervenant.name.clone(),
        kind: intervenant.kind,
        total_entries: t.entries,
        total_exits: t.exits,
        balance,
        position: position_of(balance),
    }
}

/// Saldos de todos os intervenientes em uma única passada pelos movimentos.
pub fn intervenant_balances(intervenants: &[Intervenant], lines: &[MovementLine]) -> Vec<IntervenantBalance> {
    let mut by_intervenant: HashMap<Uuid, Vec<MovementLine>> = HashMap::new();
    for line in lines {
        by_intervenant
            .entry(line.intervenant_id)
            .or_default()
            .push(line.clone());
    }

    intervenants
        .iter()
        .map(|i| {
            let own = by_intervenant.get(&i.id).map(Vec::as_slice).unwrap_or(&[]);
            intervenant_balance(i, own)
        })
        .collect()
}

/// Saldo de caixa: Σentradas - Σsaídas, só modalidade CASH.
pub fn cash_balance(lines: &[MovementLine]) -> CashBalance {
    let t = totals(lines.iter().filter(|l| l.modality == PaymentModality::Cash));
    CashBalance {
        balance: subtract_money(t.entries, t.exits),
        total_entries: t.entries,
        total_exits: t.exits,
        computed_at: Utc::now(),
    }
}

// =============================================================================
//  SERVIÇO
// =============================================================================

#[derive(Clone)]
pub struct BalanceService {
    mouvement_repo: MouvementRepository,
    intervenant_repo: IntervenantRepository,
    cache: BalanceCache,
    pool: PgPool,
}

impl BalanceService {
    pub fn new(
        mouvement_repo: MouvementRepository,
        intervenant_repo: IntervenantRepository,
        cache: BalanceCache,
        pool: PgPool,
    ) -> Self {
        Self { mouvement_repo, intervenant_repo, cache, pool }
    }

    pub async fn list_balances(&self, tenant_id: Uuid) -> Result<Vec<IntervenantBalance>, AppError> {
        let intervenants = self.intervenant_repo.list(&self.pool, tenant_id, false).await?;
        let lines = self.mouvement_repo.movement_lines(&self.pool, tenant_id, None).await?;
        Ok(intervenant_balances(&intervenants, &lines))
    }

    pub async fn get_balance(
        &self,
        tenant_id: Uuid,
        intervenant_id: Uuid,
    ) -> Result<IntervenantBalance, AppError> {
        let intervenant = self.intervenant_repo
            .find_by_id(&self.pool, tenant_id, intervenant_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Intervenant".into()))?;

        let lines = self.mouvement_repo
            .movement_lines(&self.pool, tenant_id, Some(intervenant_id))
            .await?;

        Ok(intervenant_balance(&intervenant, &lines))
    }

    /// Saldo de caixa sem passar pelo cache.
    pub async fn compute_cash_balance(&self, tenant_id: Uuid) -> Result<CashBalance, AppError> {
        let lines = self.mouvement_repo.movement_lines(&self.pool, tenant_id, None).await?;
        Ok(cash_balance(&lines))
    }

    /// Saldo de caixa com cache de 5 minutos por tenant.
    pub async fn cached_cash_balance(&self, tenant_id: Uuid) -> Result<CashBalanceResponse, AppError> {
        if let Some(cash) = self.cache.get(&tenant_id) {
            return Ok(CashBalanceResponse { cash, from_cache: true });
        }

        let cash = self.compute_cash_balance(tenant_id).await?;
        self.cache.insert(tenant_id, cash.clone());
        tracing::debug!(%tenant_id, balance = %cash.balance, "Saldo de caixa recalculado");

        Ok(CashBalanceResponse { cash, from_cache: false })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::intervenant::IntervenantKind;
    use rust_decimal_macros::dec;

    fn intervenant(name: &str) -> Intervenant {
        Intervenant {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            name: name.to_string(),
            kind: IntervenantKind::Client,
            phone: None,
            email: None,
            notes: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn line(who: &Intervenant, kind: MouvementKind, amount: Decimal, modality: PaymentModality) -> MovementLine {
        MovementLine { intervenant_id: who.id, kind, amount, modality }
    }

    #[test]
    fn intervenant_owing_the_company_has_positive_balance() {
        let client = intervenant("Client A");
        let lines = vec![
            line(&client, MouvementKind::Exit, dec!(500), PaymentModality::Cash),
            line(&client, MouvementKind::Entry, dec!(200), PaymentModality::BankTransfer),
        ];

        let b = intervenant_balance(&client, &lines);
        assert_eq!(b.total_exits, dec!(500));
        assert_eq!(b.total_entries, dec!(200));
        assert_eq!(b.balance, dec!(300));
        assert_eq!(b.position, BalancePosition::OwesCompany);
    }

    #[test]
    fn company_owing_the_intervenant_has_negative_balance() {
        let supplier = intervenant("Supplier");
        let lines = vec![line(&supplier, MouvementKind::Entry, dec!(80.5), PaymentModality::Cash)];

        let b = intervenant_balance(&supplier, &lines);
        assert_eq!(b.balance, dec!(-80.5));
        assert_eq!(b.position, BalancePosition::CompanyOwes);
    }

    #[test]
    fn balances_ignore_other_intervenants_and_list_idle_ones_as_settled() {
        let a = intervenant("A");
        let b = intervenant("B");
        let idle = intervenant("Idle");
        let lines = vec![
            line(&a, MouvementKind::Exit, dec!(0.1), PaymentModality::Cash),
            line(&a, MouvementKind::Exit, dec!(0.2), PaymentModality::Cash),
            line(&b, MouvementKind::Entry, dec!(10), PaymentModality::Cash),
        ];

        let all = intervenant_balances(&[a.clone(), b.clone(), idle.clone()], &lines);
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].balance, dec!(0.3));
        assert_eq!(all[1].balance, dec!(-10));
        assert_eq!(all[2].balance, dec!(0));
        assert_eq!(all[2].position, BalancePosition::Settled);
    }

    #[test]
    fn cash_balance_only_counts_cash_modality() {
        let who = intervenant("Any");
        let lines = vec![
            line(&who, MouvementKind::Entry, dec!(1000), PaymentModality::Cash),
            line(&who, MouvementKind::Exit, dec!(250.25), PaymentModality::Cash),
            line(&who, MouvementKind::Entry, dec!(9999), PaymentModality::BankTransfer),
            line(&who, MouvementKind::Exit, dec!(50), PaymentModality::MobileMoney),
        ];

        let cash = cash_balance(&lines);
        assert_eq!(cash.total_entries, dec!(1000));
        assert_eq!(cash.total_exits, dec!(250.25));
        assert_eq!(cash.balance, dec!(749.75));
    }

    #[test]
    fn empty_movements_yield_zero_cash() {
        let cash = cash_balance(&[]);
        assert_eq!(cash.balance, Decimal::ZERO);
    }

    #[sqlx::test]
    async fn cash_balance_reflects_each_write(pool: PgPool) {
        use crate::models::{
            disbursement::{CreateDisbursementPayload, ReturnDisbursementPayload},
            mouvement::CreateMouvementPayload,
        };

        let state = crate::config::AppState::for_tests(pool);
        let admin = state.seed_tenant("empresa-a").await;
        let client = state.seed_intervenant(admin.tenant_id, "Cliente A").await;
        let tenant_id = admin.tenant_id;

        let first = state.balance_service.cached_cash_balance(tenant_id).await.unwrap();
        assert!(!first.from_cache);
        assert_eq!(first.cash.balance, Decimal::ZERO);
        assert!(state.balance_service.cached_cash_balance(tenant_id).await.unwrap().from_cache);

        state
            .mouvement_service
            .create(
                tenant_id,
                admin.id,
                CreateMouvementPayload {
                    intervenant_id: client.id,
                    kind: MouvementKind::Entry,
                    amount: dec!(250.10),
                    modality: PaymentModality::Cash,
                    category: "VENTE".into(),
                    description: None,
                    occurred_on: None,
                },
            )
            .await
            .unwrap();

        let after_entry = state.balance_service.cached_cash_balance(tenant_id).await.unwrap();
        assert!(!after_entry.from_cache);
        assert_eq!(after_entry.cash.balance, dec!(250.10));

        let disbursement = state
            .disbursement_service
            .create(
                tenant_id,
                admin.id,
                CreateDisbursementPayload {
                    intervenant_id: client.id,
                    amount: dec!(100),
                    purpose: "Compras".into(),
                    modality: PaymentModality::Cash,
                    disbursed_on: None,
                },
            )
            .await
            .unwrap();

        let after_exit = state.balance_service.cached_cash_balance(tenant_id).await.unwrap();
        assert!(!after_exit.from_cache);
        assert_eq!(after_exit.cash.balance, dec!(150.10));

        state
            .disbursement_service
            .record_return(
                tenant_id,
                admin.id,
                disbursement.id,
                ReturnDisbursementPayload {
                    amount: dec!(40),
                    modality: PaymentModality::Cash,
                    description: None,
                    returned_on: None,
                },
            )
            .await
            .unwrap();

        let after_return = state.balance_service.cached_cash_balance(tenant_id).await.unwrap();
        assert!(!after_return.from_cache);
        assert_eq!(after_return.cash.balance, dec!(190.10));
    }
}
