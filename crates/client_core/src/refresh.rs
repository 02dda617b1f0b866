use std::sync::Arc;

use shared::{domain::PlayerId, protocol::UpdateConfirmation};
use tracing::{info, warn};

use crate::{
    enrichment::EnrichedDraft,
    error::ClientError,
    state::{DialogState, SessionContext},
    sync::SyncController,
    ClientEvent,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshReport {
    pub merged: bool,
    pub sync_error: Option<ClientError>,
}

#[derive(Clone)]
pub struct RefreshOrchestrator {
    ctx: Arc<SessionContext>,
    sync: SyncController,
}

impl RefreshOrchestrator {
    pub(crate) fn new(ctx: Arc<SessionContext>, sync: SyncController) -> Self {
        Self { ctx, sync }
    }

    /// Optimistic merge, full re-sync, dialog close, in that order. A failed
    /// re-sync keeps the merge.
    pub async fn refresh(
        &self,
        generation: u64,
        id: PlayerId,
        persisted: &EnrichedDraft,
        confirmation: &UpdateConfirmation,
    ) -> Result<RefreshReport, ClientError> {
        let merged = self
            .merge_selection(generation, id, persisted, confirmation)
            .await?;

        let sync_error = self.sync.sync().await.err();
        if let Some(err) = &sync_error {
            // sync() has already reported it.
            warn!("refresh: roster re-sync failed after saving id={}: {err}", id.0);
        }

        let was_open = {
            let mut guard = self.ctx.lock_session(generation).await?;
            let still_selected = guard
                .selection
                .as_ref()
                .is_some_and(|selection| selection.player.id == id);
            still_selected
                && std::mem::replace(&mut guard.dialog, DialogState::Closed)
                    == DialogState::Editing
        };
        if was_open {
            self.ctx.emit(ClientEvent::EditorClosed);
        }

        Ok(RefreshReport { merged, sync_error })
    }

    async fn merge_selection(
        &self,
        generation: u64,
        id: PlayerId,
        persisted: &EnrichedDraft,
        confirmation: &UpdateConfirmation,
    ) -> Result<bool, ClientError> {
        let merged = {
            let mut guard = self.ctx.lock_session(generation).await?;
            match guard.selection.as_mut() {
                Some(selection) if selection.player.id == id => {
                    selection.player = match confirmation.player() {
                        Some(canonical) => canonical.clone(),
                        None => persisted.draft().merged_into(&selection.player),
                    };
                    selection.reset_draft();
                    Some(selection.player.clone())
                }
                _ => None,
            }
        };

        match merged {
            Some(player) => {
                info!(
                    "refresh: merged saved fields into selection id={} description_chars={}",
                    id.0,
                    persisted.description().len()
                );
                self.ctx.emit(ClientEvent::SelectionChanged(player));
                Ok(true)
            }
            None => {
                info!("refresh: selection changed during save, skipping merge id={}", id.0);
                Ok(false)
            }
        }
    }
}
