//! Money, probability and multiplier formatting for estimate display.

use super::num::{localize, trim_fraction};
use rust_decimal::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};

const CURRENCY_PREFIX: &str = "R$";

/// Round a money amount to cents, half away from zero.
pub fn round_money(value: &Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format a money amount as `R$ 1.234,56` (always two decimals).
pub fn display_money(value: &Decimal) -> String {
    let rounded = round_money(value);
    let body = localize(&format!("{:.2}", rounded.abs()));
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{} {}", CURRENCY_PREFIX, body)
    } else {
        format!("{} {}", CURRENCY_PREFIX, body)
    }
}

/// Format a profit with an explicit sign: `+R$ 50,00`, `-R$ 3,10`, `R$ 0,00`.
pub fn display_profit(value: &Decimal) -> String {
    let rounded = round_money(value);
    if rounded > Decimal::ZERO {
        format!("+{}", display_money(&rounded))
    } else {
        display_money(&rounded)
    }
}

/// Format a probability in `[0, 1]` as a percentage with one decimal: `62,5%`.
pub fn display_percent(probability: &Decimal) -> String {
    let pct = probability
        .checked_mul(Decimal::ONE_HUNDRED)
        .unwrap_or(Decimal::ZERO)
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    format!("{}%", localize(&trim_fraction(pct.to_string())))
}

/// Format `payout / stake` as a multiplier, e.g. `2,50x`.
///
/// Returns `None` for a zero stake.
pub fn display_multiplier(payout: &Decimal, stake: &Decimal) -> Option<String> {
    if stake.is_zero() {
        return None;
    }
    let multiplier = payout.checked_div(*stake)?;
    Some(format!("{}x", localize(&format!("{:.2}", round_money(&multiplier)))))
}

/// Abbreviate a pool volume with `K`/`M`/`B` suffixes: `R$ 1,50K`.
pub fn abbr_money(value: &Decimal) -> String {
    let abs = value.abs();
    let sign = if value.is_sign_negative() && !value.is_zero() {
        "-"
    } else {
        ""
    };
    let (scaled, suffix) = if abs >= Decimal::from(1_000_000_000u64) {
        (abs / Decimal::from(1_000_000_000u64), "B")
    } else if abs >= Decimal::from(1_000_000u64) {
        (abs / Decimal::from(1_000_000u64), "M")
    } else if abs >= Decimal::from(1_000u64) {
        (abs / Decimal::from(1_000u64), "K")
    } else {
        (abs, "")
    };
    let truncated = scaled.round_dp_with_strategy(2, RoundingStrategy::ToZero);
    format!(
        "{}{} {}{}",
        sign,
        CURRENCY_PREFIX,
        localize(&format!("{:.2}", truncated)),
        suffix
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_round_money_half_away_from_zero() {
        assert_eq!(round_money(&dec("1.005")), dec("1.01"));
        assert_eq!(round_money(&dec("-1.005")), dec("-1.01"));
        assert_eq!(round_money(&dec("333.3333333")), dec("333.33"));
    }

    #[test]
    fn test_display_money() {
        assert_eq!(display_money(&Decimal::ZERO), "R$ 0,00");
        assert_eq!(display_money(&dec("500")), "R$ 500,00");
        assert_eq!(display_money(&dec("1234.567")), "R$ 1.234,57");
        assert_eq!(display_money(&dec("-12.1")), "-R$ 12,10");
        assert_eq!(display_money(&dec("-0.001")), "R$ 0,00");
    }

    #[test]
    fn test_display_profit_sign() {
        assert_eq!(display_profit(&dec("50")), "+R$ 50,00");
        assert_eq!(display_profit(&Decimal::ZERO), "R$ 0,00");
        assert_eq!(display_profit(&dec("-3.1")), "-R$ 3,10");
    }

    #[test]
    fn test_display_percent() {
        assert_eq!(display_percent(&dec("0.625")), "62,5%");
        assert_eq!(display_percent(&dec("0.5")), "50%");
        assert_eq!(display_percent(&dec("0.33333")), "33,3%");
        assert_eq!(display_percent(&Decimal::ONE), "100%");
    }

    #[test]
    fn test_display_multiplier() {
        assert_eq!(display_multiplier(&dec("500"), &dec("100")).unwrap(), "5,00x");
        assert_eq!(display_multiplier(&dec("250"), &dec("100")).unwrap(), "2,50x");
        assert!(display_multiplier(&dec("250"), &Decimal::ZERO).is_none());
    }

    #[test]
    fn test_abbr_money() {
        assert_eq!(abbr_money(&dec("999")), "R$ 999,00");
        assert_eq!(abbr_money(&dec("1500")), "R$ 1,50K");
        assert_eq!(abbr_money(&dec("12345")), "R$ 12,34K");
        assert_eq!(abbr_money(&dec("2500000")), "R$ 2,50M");
    }
}
