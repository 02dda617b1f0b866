//! Session-owned state and the context shared by every controller.

use std::{future::Future, sync::Arc, time::Duration};

use anyhow::{anyhow, Result};
use shared::domain::{Player, PlayerDraft};
use tokio::sync::{broadcast, Mutex, MutexGuard};
use tracing::{error, warn};

use crate::{
    error::{ClientError, FailureKind},
    roster::RosterStore,
    transport::{DescriptionGenerator, PlayerBackend},
    ClientEvent,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogState {
    #[default]
    Closed,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SavePhase {
    #[default]
    Idle,
    Enriching,
    Persisting,
    Refreshing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub player: Player,
    pub draft: PlayerDraft,
}

impl Selection {
    pub(crate) fn fresh(player: Player) -> Self {
        let draft = PlayerDraft::from(&player);
        Self { player, draft }
    }

    pub(crate) fn reset_draft(&mut self) {
        self.draft = PlayerDraft::from(&self.player);
    }
}

#[derive(Debug, Default)]
pub(crate) struct SessionState {
    pub(crate) mounted: bool,
    pub(crate) roster: RosterStore,
    pub(crate) selection: Option<Selection>,
    pub(crate) dialog: DialogState,
    pub(crate) save_phase: SavePhase,
    pub(crate) sync_ticket: u64,
    pub(crate) select_ticket: u64,
    pub(crate) generation: u64,
}

impl SessionState {
    pub(crate) fn mount(&mut self) {
        // Tickets stay monotonic so late responses from a previous mount
        // never match.
        *self = SessionState {
            mounted: true,
            sync_ticket: self.sync_ticket,
            select_ticket: self.select_ticket,
            generation: self.generation + 1,
            ..SessionState::default()
        };
    }

    pub(crate) fn teardown(&mut self) {
        self.mounted = false;
        self.roster = RosterStore::default();
        self.selection = None;
        self.dialog = DialogState::Closed;
        self.save_phase = SavePhase::Idle;
        self.sync_ticket += 1;
        self.select_ticket += 1;
        self.generation += 1;
    }
}

pub(crate) struct SessionContext {
    pub(crate) state: Mutex<SessionState>,
    pub(crate) backend: Arc<dyn PlayerBackend>,
    pub(crate) generator: Arc<dyn DescriptionGenerator>,
    pub(crate) events: broadcast::Sender<ClientEvent>,
    pub(crate) request_timeout: Duration,
}

impl SessionContext {
    pub(crate) fn new(
        backend: Arc<dyn PlayerBackend>,
        generator: Arc<dyn DescriptionGenerator>,
        request_timeout: Duration,
        event_buffer: usize,
    ) -> Self {
        let (events, _) = broadcast::channel(event_buffer.max(1));
        Self {
            state: Mutex::new(SessionState::default()),
            backend,
            generator,
            events,
            request_timeout,
        }
    }

    pub(crate) async fn lock_mounted(&self) -> Result<MutexGuard<'_, SessionState>, ClientError> {
        let guard = self.state.lock().await;
        if !guard.mounted {
            return Err(ClientError::Unmounted);
        }
        Ok(guard)
    }

    /// Like `lock_mounted`, but also fails once the mount that issued
    /// `generation` has been torn down.
    pub(crate) async fn lock_session(
        &self,
        generation: u64,
    ) -> Result<MutexGuard<'_, SessionState>, ClientError> {
        let guard = self.lock_mounted().await?;
        if guard.generation != generation {
            return Err(ClientError::Unmounted);
        }
        Ok(guard)
    }

    pub(crate) fn emit(&self, event: ClientEvent) {
        let _ = self.events.send(event);
    }

    pub(crate) fn report(&self, err: &ClientError) {
        match err.kind() {
            FailureKind::Fetch | FailureKind::Enrichment | FailureKind::Persistence => {
                error!("roster: {err}");
            }
            FailureKind::Edit | FailureKind::Session => warn!("roster: {err}"),
        }
        self.emit(ClientEvent::Failure {
            kind: err.kind(),
            message: err.to_string(),
        });
    }

    pub(crate) async fn bounded<T, F>(&self, what: &str, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match tokio::time::timeout(self.request_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(anyhow!(
                "{what} timed out after {}ms",
                self.request_timeout.as_millis()
            )),
        }
    }
}
