// src/services/lifecycle.rs

//! Regras de quitação compartilhadas por desembolsos, adiantamentos e documentos.
//!
//! Todos seguem o mesmo formato: um valor inicial que é reduzido por
//! operações parciais até chegar a zero, nunca abaixo disso.

use rust_decimal::Decimal;

use crate::common::error::AppError;
use crate::common::money::{round_money, subtract_money, sum_money};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementStage {
    Open,
    Partial,
    Settled,
}

/// Estágio derivado do restante contra o valor inicial.
pub fn settlement_stage(remaining: Decimal, initial: Decimal) -> SettlementStage {
    let remaining = round_money(remaining);
    if remaining <= Decimal::ZERO {
        SettlementStage::Settled
    } else if remaining < round_money(initial) {
        SettlementStage::Partial
    } else {
        SettlementStage::Open
    }
}

/// `initial - Σjustificativas - Σdevoluções`, arredondado e limitado a zero.
pub fn compute_remaining<J, R>(initial: Decimal, justifications: J, returns: R) -> Decimal
where
    J: IntoIterator<Item = Decimal>,
    R: IntoIterator<Item = Decimal>,
{
    let consumed = sum_money(justifications.into_iter().chain(returns));
    subtract_money(initial, consumed).max(Decimal::ZERO)
}

/// Aplica uma redução ao restante atual; rejeita valores acima dele.
pub fn reduce_remaining(remaining: Decimal, amount: Decimal) -> Result<Decimal, AppError> {
    let amount = round_money(amount);
    let remaining = round_money(remaining);

    if amount <= Decimal::ZERO || amount > remaining {
        return Err(AppError::AmountExceedsRemaining { amount, remaining });
    }

    Ok(subtract_money(remaining, amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::advance::AdvanceStatus;
    use crate::models::disbursement::DisbursementStatus;
    use crate::models::document::DocumentStatus;
    use rust_decimal_macros::dec;

    #[test]
    fn stage_is_a_pure_function_of_remaining_and_initial() {
        assert_eq!(settlement_stage(dec!(0), dec!(1000)), SettlementStage::Settled);
        assert_eq!(settlement_stage(dec!(600), dec!(1000)), SettlementStage::Partial);
        assert_eq!(settlement_stage(dec!(1000), dec!(1000)), SettlementStage::Open);
        assert_eq!(settlement_stage(dec!(0.004), dec!(1000)), SettlementStage::Settled);
    }

    #[test]
    fn disbursement_walkthrough() {
        let initial = dec!(1000);

        let after_justify = reduce_remaining(initial, dec!(400)).unwrap();
        assert_eq!(after_justify, dec!(600));
        assert_eq!(
            DisbursementStatus::from_amounts(after_justify, initial),
            DisbursementStatus::PartiallyJustified
        );

        let after_return = reduce_remaining(after_justify, dec!(600)).unwrap();
        assert_eq!(after_return, dec!(0));
        assert_eq!(
            DisbursementStatus::from_amounts(after_return, initial),
            DisbursementStatus::Justified
        );

        let err = reduce_remaining(after_return, dec!(0.01)).unwrap_err();
        assert!(matches!(err, AppError::AmountExceedsRemaining { .. }));
    }

    #[test]
    fn amount_above_remaining_is_rejected() {
        let err = reduce_remaining(dec!(600), dec!(600.01)).unwrap_err();
        match err {
            AppError::AmountExceedsRemaining { amount, remaining } => {
                assert_eq!(amount, dec!(600.01));
                assert_eq!(remaining, dec!(600));
            }
            other => panic!("erro inesperado: {:?}", other),
        }
    }

    #[test]
    fn zero_or_negative_amounts_are_rejected() {
        assert!(reduce_remaining(dec!(100), dec!(0)).is_err());
        assert!(reduce_remaining(dec!(100), dec!(-1)).is_err());
    }

    #[test]
    fn remaining_matches_rounded_difference() {
        let remaining = compute_remaining(
            dec!(1000),
            vec![dec!(100.10), dec!(200.20)],
            vec![dec!(0.1), dec!(0.2)],
        );
        assert_eq!(remaining, dec!(699.40));

        // Nunca negativo
        assert_eq!(compute_remaining(dec!(10), vec![dec!(20)], vec![]), dec!(0));
    }

    #[test]
    fn incremental_and_aggregate_computations_agree() {
        let initial = dec!(1234.56);
        let ops = [dec!(100.01), dec!(0.1), dec!(0.2), dec!(333.33), dec!(1.11)];

        let mut remaining = initial;
        for op in ops {
            remaining = reduce_remaining(remaining, op).unwrap();
        }

        assert_eq!(remaining, compute_remaining(initial, ops, Vec::new()));
    }

    #[test]
    fn advance_and_document_statuses_follow_the_same_stages() {
        assert_eq!(AdvanceStatus::from_amounts(dec!(250), dec!(250)), AdvanceStatus::Open);
        assert_eq!(
            AdvanceStatus::from_amounts(dec!(50), dec!(250)),
            AdvanceStatus::PartiallyReimbursed
        );
        assert_eq!(AdvanceStatus::from_amounts(dec!(0), dec!(250)), AdvanceStatus::Reimbursed);

        assert_eq!(DocumentStatus::from_amounts(dec!(1200), dec!(1200)), DocumentStatus::Unpaid);
        assert_eq!(
            DocumentStatus::from_amounts(dec!(1), dec!(1200)),
            DocumentStatus::PartiallyPaid
        );
        assert_eq!(DocumentStatus::from_amounts(dec!(0), dec!(1200)), DocumentStatus::Paid);
    }
}
