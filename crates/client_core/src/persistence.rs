use std::sync::Arc;

use shared::{domain::PlayerId, protocol::UpdateConfirmation};
use tracing::info;

use crate::{enrichment::EnrichedDraft, error::ClientError, state::SessionContext};

#[derive(Clone)]
pub struct PersistenceClient {
    ctx: Arc<SessionContext>,
}

impl PersistenceClient {
    pub(crate) fn new(ctx: Arc<SessionContext>) -> Self {
        Self { ctx }
    }

    pub async fn save(
        &self,
        id: PlayerId,
        update: &EnrichedDraft,
    ) -> Result<UpdateConfirmation, ClientError> {
        info!("persist: updating player id={}", id.0);
        let result = self
            .ctx
            .bounded(
                "player update",
                self.ctx.backend.update_player(id, update.draft()),
            )
            .await;

        match result {
            Ok(confirmation) => {
                match &confirmation {
                    UpdateConfirmation::Player(_) => {
                        info!("persist: backend returned updated record id={}", id.0);
                    }
                    UpdateConfirmation::Acknowledged(ack) => {
                        info!("persist: backend acknowledged id={} message={}", id.0, ack.message);
                    }
                }
                Ok(confirmation)
            }
            Err(err) => {
                let err = ClientError::Persistence(format!("{err:#}"));
                self.ctx.report(&err);
                Err(err)
            }
        }
    }
}
