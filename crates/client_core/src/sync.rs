use std::sync::Arc;

use anyhow::Result;
use shared::domain::Player;
use tracing::{debug, info};

use crate::{error::ClientError, state::SessionContext, ClientEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Replaced { count: usize, revision: u64 },
    Superseded,
}

#[derive(Clone)]
pub struct SyncController {
    ctx: Arc<SessionContext>,
}

impl SyncController {
    pub(crate) fn new(ctx: Arc<SessionContext>) -> Self {
        Self { ctx }
    }

    pub async fn sync(&self) -> Result<SyncOutcome, ClientError> {
        let ticket = {
            let mut guard = self.ctx.lock_mounted().await?;
            guard.sync_ticket += 1;
            guard.sync_ticket
        };

        let players = match self.fetch_corrected().await {
            Ok(players) => players,
            Err(err) => {
                let err = ClientError::Fetch(format!("{err:#}"));
                self.ctx.report(&err);
                return Err(err);
            }
        };

        let (count, revision) = {
            let mut guard = self.ctx.lock_mounted().await?;
            if guard.sync_ticket != ticket {
                debug!("sync: discarding superseded roster ticket={ticket}");
                return Ok(SyncOutcome::Superseded);
            }
            guard.roster.replace(players);
            (guard.roster.len(), guard.roster.revision())
        };

        info!("sync: roster replaced count={count} revision={revision}");
        self.ctx.emit(ClientEvent::RosterReplaced { count, revision });
        Ok(SyncOutcome::Replaced { count, revision })
    }

    async fn fetch_corrected(&self) -> Result<Vec<Player>> {
        debug!("sync: requesting data correction");
        self.ctx
            .bounded("data correction", self.ctx.backend.correct_data())
            .await?;
        debug!("sync: fetching players");
        self.ctx
            .bounded("player listing", self.ctx.backend.list_players())
            .await
    }
}

#[cfg(test)]
#[path = "tests/sync_tests.rs"]
mod tests;
