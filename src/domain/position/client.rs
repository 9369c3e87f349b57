//! Positions sub-client: a user's positions and portfolio.

use crate::client::AposteiClient;
use crate::domain::position::{positions_from_bets, Portfolio, Position, PositionView};
use crate::domain::stake::bets_from_rows;
use crate::error::SdkError;
use crate::shared::{PollId, UserId};

pub struct Positions<'a> {
    pub(crate) client: &'a AposteiClient,
}

impl<'a> Positions<'a> {
    /// Open positions of a user across all polls, merged per option.
    pub async fn get(&self, user_id: &UserId) -> Result<Vec<Position>, SdkError> {
        let rows = self.client.http.get_user_bets(user_id, true).await?;
        let bets = bets_from_rows(rows);
        Ok(positions_from_bets(user_id, &bets))
    }

    /// Open positions of a user in one poll.
    pub async fn get_for_poll(
        &self,
        user_id: &UserId,
        poll_id: &PollId,
    ) -> Result<Vec<Position>, SdkError> {
        Ok(self
            .get(user_id)
            .await?
            .into_iter()
            .filter(|p| &p.poll_id == poll_id)
            .collect())
    }

    /// Every open position of a user, projected against its poll's live pool.
    ///
    /// Polls that can no longer be fetched still get a projection from the
    /// snapshot alone.
    pub async fn portfolio(&self, user_id: &UserId) -> Result<Portfolio, SdkError> {
        let positions = self.get(user_id).await?;
        let mut views = Vec::with_capacity(positions.len());
        for position in positions {
            let stakes = self.client.pools().snapshot(&position.poll_id).await?;
            let poll = self.client.polls().get(&position.poll_id).await;
            views.push(PositionView::evaluate_fetched(position, poll, &stakes)?);
        }
        Ok(Portfolio::build(user_id.clone(), views))
    }
}
