use std::sync::Arc;

use shared::domain::{Player, PlayerDraft, PlayerId};
use tokio::sync::broadcast;
use tracing::{info, warn};

pub mod config;
pub mod edit;
pub mod enrichment;
pub mod error;
pub mod persistence;
pub mod refresh;
pub mod roster;
pub mod save;
pub mod selection;
pub mod state;
pub mod sync;
pub mod transport;

use config::ClientSettings;
use edit::EditSession;
use enrichment::EnrichmentClient;
use error::{ClientError, FailureKind};
use persistence::PersistenceClient;
use refresh::RefreshOrchestrator;
use roster::RosterStore;
use save::{SaveFlow, SaveReport};
use selection::{SelectOutcome, SelectionController};
use state::{DialogState, SavePhase, SessionContext};
use sync::{SyncController, SyncOutcome};
use transport::{DescriptionGenerator, HttpDescriptionGenerator, HttpPlayerBackend, PlayerBackend};

#[derive(Debug, Clone)]
pub enum ClientEvent {
    RosterReplaced { count: usize, revision: u64 },
    SelectionChanged(Player),
    DraftChanged,
    EditorOpened,
    EditorClosed,
    SavePhaseChanged(SavePhase),
    Saved { player_id: PlayerId },
    Failure { kind: FailureKind, message: String },
}

pub struct RosterClient {
    ctx: Arc<SessionContext>,
    sync: SyncController,
    selection: SelectionController,
    edit: EditSession,
    save: SaveFlow,
}

impl RosterClient {
    pub fn new(settings: &ClientSettings) -> Arc<Self> {
        Self::new_with_dependencies(
            settings,
            Arc::new(HttpPlayerBackend::new(settings.backend_url.clone())),
            Arc::new(HttpDescriptionGenerator::new(settings.enrichment_url.clone())),
        )
    }

    pub fn new_with_dependencies(
        settings: &ClientSettings,
        backend: Arc<dyn PlayerBackend>,
        generator: Arc<dyn DescriptionGenerator>,
    ) -> Arc<Self> {
        let ctx = Arc::new(SessionContext::new(
            backend,
            generator,
            settings.request_timeout,
            settings.event_buffer,
        ));
        let sync = SyncController::new(Arc::clone(&ctx));
        let save = SaveFlow::new(
            Arc::clone(&ctx),
            EnrichmentClient::new(Arc::clone(&ctx)),
            PersistenceClient::new(Arc::clone(&ctx)),
            RefreshOrchestrator::new(Arc::clone(&ctx), sync.clone()),
        );
        Arc::new(Self {
            selection: SelectionController::new(Arc::clone(&ctx)),
            edit: EditSession::new(Arc::clone(&ctx)),
            sync,
            save,
            ctx,
        })
    }

    // A failed first sync leaves the session mounted with an empty roster.
    pub async fn mount(&self) -> Result<SyncOutcome, ClientError> {
        self.ctx.state.lock().await.mount();
        info!("session: mounted");
        let outcome = self.sync.sync().await;
        if let Err(err) = &outcome {
            warn!("session: initial sync failed: {err}");
        }
        outcome
    }

    pub async fn unmount(&self) {
        self.ctx.state.lock().await.teardown();
        info!("session: unmounted");
    }

    pub async fn is_mounted(&self) -> bool {
        self.ctx.state.lock().await.mounted
    }

    pub async fn sync(&self) -> Result<SyncOutcome, ClientError> {
        self.sync.sync().await
    }

    pub async fn select(&self, id: PlayerId) -> Result<SelectOutcome, ClientError> {
        self.selection.select(id).await
    }

    pub async fn open_editor(&self) -> Result<(), ClientError> {
        self.edit.open_editor().await
    }

    pub async fn set_field(&self, name: &str, value: &str) -> Result<(), ClientError> {
        self.edit.set_field(name, value).await
    }

    pub async fn clear_field(&self, name: &str) -> Result<(), ClientError> {
        self.edit.clear_field(name).await
    }

    pub async fn discard(&self) -> Result<(), ClientError> {
        self.edit.discard().await
    }

    pub async fn cancel_edit(&self) -> Result<(), ClientError> {
        self.edit.cancel_edit().await
    }

    pub async fn save(&self) -> Result<SaveReport, ClientError> {
        self.save.save().await
    }

    pub async fn roster(&self) -> RosterStore {
        self.ctx.state.lock().await.roster.clone()
    }

    pub async fn selection(&self) -> Option<Player> {
        self.selection.selection().await
    }

    pub async fn draft(&self) -> Option<PlayerDraft> {
        self.edit.draft().await
    }

    pub async fn dialog(&self) -> DialogState {
        self.edit.dialog().await
    }

    pub async fn save_phase(&self) -> SavePhase {
        self.ctx.state.lock().await.save_phase
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.ctx.events.subscribe()
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
