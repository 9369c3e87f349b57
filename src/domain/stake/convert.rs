//! Conversion: BetRow → Bet/Stake (TryFrom + validation).

use super::wire::BetRow;
use super::{Bet, Stake, StakeValidationError};
use crate::shared::OptionId;
use rust_decimal::Decimal;

impl TryFrom<BetRow> for Bet {
    type Error = StakeValidationError;

    fn try_from(source: BetRow) -> Result<Self, Self::Error> {
        let mut errors: Vec<StakeValidationError> = Vec::new();

        let option_id = OptionId::from(source.option_chosen.trim());
        if option_id.is_empty() {
            errors.push(StakeValidationError::MissingOption);
        }
        let amount = match source.amount {
            Some(amount) if amount.is_sign_negative() && !amount.is_zero() => {
                errors.push(StakeValidationError::NegativeAmount(amount));
                Decimal::ZERO
            }
            Some(amount) => amount,
            None => {
                errors.push(StakeValidationError::InvalidAmount);
                Decimal::ZERO
            }
        };

        if !errors.is_empty() {
            return Err(StakeValidationError::Multiple(source.id, errors));
        }

        Ok(Bet {
            id: source.id,
            poll_id: source.poll_id,
            user_id: source.user_id,
            stake: Stake::new(option_id, amount),
            status: source.status,
            created_at: source.created_at,
        })
    }
}

impl TryFrom<BetRow> for Stake {
    type Error = StakeValidationError;

    fn try_from(source: BetRow) -> Result<Self, Self::Error> {
        Bet::try_from(source).map(|bet| bet.stake)
    }
}

/// Validate rows, logging and skipping the ones that fail.
pub fn bets_from_rows(rows: impl IntoIterator<Item = BetRow>) -> Vec<Bet> {
    rows.into_iter()
        .filter_map(|row| match Bet::try_from(row) {
            Ok(bet) => Some(bet),
            Err(err) => {
                tracing::warn!(error = %err, "skipping invalid bet row");
                None
            }
        })
        .collect()
}

/// The live pool of a poll: stakes of the open, valid rows only.
pub fn open_stakes(rows: impl IntoIterator<Item = BetRow>) -> Vec<Stake> {
    bets_from_rows(rows)
        .into_iter()
        .filter(|bet| bet.status.is_open())
        .map(|bet| bet.stake)
        .collect()
}
