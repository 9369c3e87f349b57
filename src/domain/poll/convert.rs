//! Conversion: PollRow → Poll (TryFrom + validation).

use super::wire::PollRow;
use super::{Poll, PollOption, PollStatus, PollValidationError};
use crate::shared::OptionId;
use std::collections::HashSet;

impl TryFrom<PollRow> for Poll {
    type Error = PollValidationError;

    fn try_from(source: PollRow) -> Result<Self, Self::Error> {
        let mut errors: Vec<PollValidationError> = Vec::new();

        let title = match source.title.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => {
                errors.push(PollValidationError::MissingTitle);
                String::new()
            }
        };

        if source.options.len() < 2 {
            errors.push(PollValidationError::TooFewOptions(source.options.len()));
        }

        let mut seen = HashSet::new();
        let mut options = Vec::with_capacity(source.options.len());
        for row in source.options {
            let id = OptionId::from(row.id.trim());
            if id.is_empty() {
                errors.push(PollValidationError::BlankOption);
                continue;
            }
            if !seen.insert(id.clone()) {
                errors.push(PollValidationError::DuplicateOption(id.to_string()));
                continue;
            }
            let label = row
                .label
                .filter(|l| !l.trim().is_empty())
                .unwrap_or_else(|| id.to_string());
            options.push(PollOption { id, label });
        }

        let status = PollStatus::from_str(&source.status).unwrap_or_else(|| {
            errors.push(PollValidationError::InvalidStatus(source.status.clone()));
            PollStatus::Closed
        });

        let winning_option = source
            .winning_option
            .map(|w| OptionId::from(w.trim()))
            .filter(|w| !w.is_empty());
        match &winning_option {
            Some(w) if !seen.contains(w) => {
                errors.push(PollValidationError::UnknownWinningOption(w.to_string()));
            }
            None if status == PollStatus::Resolved => {
                errors.push(PollValidationError::MissingWinningOption);
            }
            _ => {}
        }

        if !errors.is_empty() {
            return Err(PollValidationError::Multiple(source.id.to_string(), errors));
        }

        Ok(Poll {
            id: source.id,
            title,
            description: source.description,
            category: source.category,
            options,
            status,
            winning_option,
            closes_at: source.closes_at,
            created_at: source.created_at,
        })
    }
}
