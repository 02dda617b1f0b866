use std::sync::Arc;

use shared::domain::{Player, PlayerId};
use tracing::{debug, info};

use crate::{
    error::ClientError,
    state::{DialogState, SessionContext, Selection},
    ClientEvent,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    Selected(Player),
    Superseded,
}

#[derive(Clone)]
pub struct SelectionController {
    ctx: Arc<SessionContext>,
}

impl SelectionController {
    pub(crate) fn new(ctx: Arc<SessionContext>) -> Self {
        Self { ctx }
    }

    pub async fn select(&self, id: PlayerId) -> Result<SelectOutcome, ClientError> {
        let ticket = {
            let mut guard = self.ctx.lock_mounted().await?;
            guard.select_ticket += 1;
            guard.select_ticket
        };

        debug!("select: fetching player id={} ticket={ticket}", id.0);
        let fetched = self
            .ctx
            .bounded("player fetch", self.ctx.backend.fetch_player(id))
            .await;

        let player = match fetched {
            Ok(player) => player,
            Err(err) => {
                let err = ClientError::Fetch(format!("{err:#}"));
                self.ctx.report(&err);
                return Err(err);
            }
        };

        let closed_editor = {
            let mut guard = self.ctx.lock_mounted().await?;
            if guard.select_ticket != ticket {
                debug!(
                    "select: discarding stale response id={} ticket={ticket} latest={}",
                    id.0, guard.select_ticket
                );
                return Ok(SelectOutcome::Superseded);
            }
            guard.selection = Some(Selection::fresh(player.clone()));
            std::mem::replace(&mut guard.dialog, DialogState::Closed) == DialogState::Editing
        };

        info!("select: selected player id={} name={}", id.0, player.player_name);
        if closed_editor {
            self.ctx.emit(ClientEvent::EditorClosed);
        }
        self.ctx.emit(ClientEvent::SelectionChanged(player.clone()));
        Ok(SelectOutcome::Selected(player))
    }

    pub async fn selection(&self) -> Option<Player> {
        let guard = self.ctx.state.lock().await;
        guard.selection.as_ref().map(|selection| selection.player.clone())
    }
}

#[cfg(test)]
#[path = "tests/selection_tests.rs"]
mod tests;
