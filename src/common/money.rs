// src/common/money.rs

use rust_decimal::{Decimal, RoundingStrategy};
use validator::ValidationError;

/// Casas decimais de todo valor monetário persistido.
pub const MONEY_SCALE: u32 = 2;

/// Maior valor aceito pelas colunas `NUMERIC(14, 2)`.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(276_447_231, 23_283, 0, false, 2);

/// Arredonda para 2 casas (meio para longe do zero, como no caixa).
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

pub fn add_money(a: Decimal, b: Decimal) -> Decimal {
    round_money(round_money(a) + round_money(b))
}

pub fn subtract_money(a: Decimal, b: Decimal) -> Decimal {
    round_money(round_money(a) - round_money(b))
}

/// Soma acumulada, arredondando a cada passo.
pub fn sum_money<I>(values: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .fold(Decimal::ZERO, |acc, v| add_money(acc, v))
}

// Validadores usados pelos payloads (`#[validate(custom(...))]`)

// Os valores são checados já arredondados: é o que vai para o banco.
pub fn validate_positive_amount(value: &Decimal) -> Result<(), ValidationError> {
    let rounded = round_money(*value);
    if rounded <= Decimal::ZERO {
        return Err(ValidationError::new("positive_amount")
            .with_message("validation.positive_amount".into()));
    }
    check_max_amount(rounded)
}

pub fn validate_non_negative_amount(value: &Decimal) -> Result<(), ValidationError> {
    let rounded = round_money(*value);
    if rounded < Decimal::ZERO {
        return Err(ValidationError::new("non_negative_amount")
            .with_message("validation.non_negative_amount".into()));
    }
    check_max_amount(rounded)
}

fn check_max_amount(rounded: Decimal) -> Result<(), ValidationError> {
    if rounded > MAX_AMOUNT {
        return Err(ValidationError::new("amount_too_large")
            .with_message("validation.amount_too_large".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn add_money_has_no_float_residue() {
        assert_eq!(add_money(dec!(0.1), dec!(0.2)), dec!(0.3));
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round_money(dec!(10.005)), dec!(10.01));
        assert_eq!(round_money(dec!(-10.005)), dec!(-10.01));
        assert_eq!(round_money(dec!(10.004)), dec!(10.00));
    }

    #[test]
    fn subtract_rounds_each_operand() {
        assert_eq!(subtract_money(dec!(1000), dec!(400.004)), dec!(600.00));
        assert_eq!(subtract_money(dec!(0.3), dec!(0.1)), dec!(0.2));
    }

    #[test]
    fn amount_validators() {
        assert!(validate_positive_amount(&dec!(0.01)).is_ok());
        assert!(validate_positive_amount(&dec!(0)).is_err());
        assert!(validate_positive_amount(&dec!(-5)).is_err());
        assert!(validate_non_negative_amount(&dec!(0)).is_ok());
        assert!(validate_non_negative_amount(&dec!(-0.01)).is_err());
    }

    #[test]
    fn amounts_that_round_to_zero_are_rejected() {
        assert!(validate_positive_amount(&dec!(0.004)).is_err());
        assert!(validate_positive_amount(&dec!(0.005)).is_ok());
        assert!(validate_non_negative_amount(&dec!(-0.004)).is_ok());
    }

    #[test]
    fn amounts_above_the_column_limit_are_rejected() {
        assert_eq!(MAX_AMOUNT, dec!(999999999999.99));
        assert!(validate_positive_amount(&dec!(999999999999.99)).is_ok());
        assert!(validate_positive_amount(&dec!(999999999999.995)).is_err());
        assert!(validate_positive_amount(&dec!(1000000000000)).is_err());

        let err = validate_non_negative_amount(&dec!(100000000000000)).unwrap_err();
        assert_eq!(err.code, "amount_too_large");
    }

    #[test]
    fn sum_of_many_small_amounts_stays_exact() {
        let total = sum_money(std::iter::repeat(dec!(0.1)).take(1000));
        assert_eq!(total, dec!(100.0));
        assert_eq!(sum_money(Vec::new()), Decimal::ZERO);
    }
}
