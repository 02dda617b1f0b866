use std::sync::Arc;

use shared::{
    domain::{PlayerDraft, PlayerId},
    protocol::UpdateConfirmation,
};
use tracing::{info, warn};

use crate::{
    enrichment::{EnrichedDraft, EnrichmentClient},
    error::ClientError,
    persistence::PersistenceClient,
    refresh::{RefreshOrchestrator, RefreshReport},
    state::{DialogState, SavePhase, SessionContext},
    ClientEvent,
};

#[derive(Debug, Clone)]
pub struct SaveReport {
    pub player_id: PlayerId,
    pub description: String,
    pub confirmation: UpdateConfirmation,
    pub refresh: RefreshReport,
}

#[derive(Clone)]
pub struct SaveFlow {
    ctx: Arc<SessionContext>,
    enrichment: EnrichmentClient,
    persistence: PersistenceClient,
    refresh: RefreshOrchestrator,
}

impl SaveFlow {
    pub(crate) fn new(
        ctx: Arc<SessionContext>,
        enrichment: EnrichmentClient,
        persistence: PersistenceClient,
        refresh: RefreshOrchestrator,
    ) -> Self {
        Self {
            ctx,
            enrichment,
            persistence,
            refresh,
        }
    }

    /// `Idle → Enriching → Persisting → Refreshing → Idle`. A failure while
    /// enriching or persisting returns to `Idle` with the dialog left open.
    pub async fn save(&self) -> Result<SaveReport, ClientError> {
        let (generation, id, draft) = self.begin().await?;

        let result = self.run(generation, id, draft).await;
        if let Err(err) = &result {
            warn!("save: abandoned for player id={}: {err}", id.0);
        }
        self.set_phase(generation, SavePhase::Idle).await;
        result
    }

    async fn begin(&self) -> Result<(u64, PlayerId, PlayerDraft), ClientError> {
        let (generation, id, draft) = {
            let mut guard = self.ctx.lock_mounted().await?;
            if guard.save_phase != SavePhase::Idle {
                return Err(ClientError::SaveInProgress);
            }
            if guard.dialog != DialogState::Editing {
                return Err(ClientError::EditorClosed);
            }
            let selection = guard.selection.as_ref().ok_or(ClientError::NoSelection)?;
            let snapshot = (
                guard.generation,
                selection.player.id,
                selection.draft.clone(),
            );
            guard.save_phase = SavePhase::Enriching;
            snapshot
        };
        info!("save: started for player id={}", id.0);
        self.ctx.emit(ClientEvent::SavePhaseChanged(SavePhase::Enriching));
        Ok((generation, id, draft))
    }

    async fn run(
        &self,
        generation: u64,
        id: PlayerId,
        draft: PlayerDraft,
    ) -> Result<SaveReport, ClientError> {
        let description = self.enrichment.enrich(&draft).await;
        let enriched = description
            .and_then(|description| EnrichedDraft::new(draft, description))
            .ok_or_else(|| {
                ClientError::Enrichment("no description was generated; nothing was saved".into())
            })?;

        self.advance(generation, SavePhase::Persisting).await?;
        let confirmation = self.persistence.save(id, &enriched).await?;

        self.advance(generation, SavePhase::Refreshing).await?;
        let refresh = self
            .refresh
            .refresh(generation, id, &enriched, &confirmation)
            .await?;

        info!("save: completed for player id={}", id.0);
        self.ctx.emit(ClientEvent::Saved { player_id: id });
        Ok(SaveReport {
            player_id: id,
            description: enriched.description().to_string(),
            confirmation,
            refresh,
        })
    }

    async fn advance(&self, generation: u64, phase: SavePhase) -> Result<(), ClientError> {
        self.ctx.lock_session(generation).await?.save_phase = phase;
        self.ctx.emit(ClientEvent::SavePhaseChanged(phase));
        Ok(())
    }

    // A save from a torn-down mount must not touch the phase of the current one.
    async fn set_phase(&self, generation: u64, phase: SavePhase) {
        let changed = {
            let mut guard = self.ctx.state.lock().await;
            if guard.generation != generation {
                return;
            }
            std::mem::replace(&mut guard.save_phase, phase) != phase
        };
        if changed {
            self.ctx.emit(ClientEvent::SavePhaseChanged(phase));
        }
    }
}

#[cfg(test)]
#[path = "tests/save_tests.rs"]
mod tests;
