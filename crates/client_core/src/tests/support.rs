//! In-memory transports for controller tests.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::{
    domain::{Player, PlayerDraft, PlayerId},
    protocol::{MessageResponse, UpdateConfirmation},
};
use tokio::sync::{mpsc, oneshot, Mutex};

use crate::{
    config::ClientSettings,
    transport::{DescriptionGenerator, PlayerBackend},
    RosterClient,
};

pub(crate) fn player(id: i64, year: i64, hits: i64) -> Player {
    Player {
        id: PlayerId(id),
        rank: 1,
        player_name: format!("Player {id}"),
        age: 27,
        hits,
        year,
        bats: "R".into(),
        description: None,
    }
}

pub(crate) fn settings(timeout: Duration) -> ClientSettings {
    ClientSettings {
        request_timeout: timeout,
        ..ClientSettings::default()
    }
}

pub(crate) struct FakeBackend {
    pub(crate) listing: Mutex<Vec<Player>>,
    /// Canonical records served by `fetch_player`; falls back to `listing`.
    pub(crate) records: Mutex<HashMap<PlayerId, Player>>,
    pub(crate) gates: Mutex<HashMap<PlayerId, oneshot::Receiver<()>>>,
    pub(crate) fetch_started: Mutex<Option<mpsc::UnboundedSender<PlayerId>>>,
    pub(crate) updates: Mutex<Vec<(PlayerId, PlayerDraft)>>,
    pub(crate) update_reply: Mutex<Option<Player>>,
    pub(crate) listing_gate: Mutex<Option<oneshot::Receiver<()>>>,
    pub(crate) correction_unreachable: AtomicBool,
    pub(crate) fail_listing: AtomicBool,
    pub(crate) fail_fetch: AtomicBool,
    pub(crate) fail_update: AtomicBool,
    pub(crate) hang_fetch: AtomicBool,
    pub(crate) hang_update: AtomicBool,
    pub(crate) correction_calls: AtomicUsize,
    pub(crate) listing_calls: AtomicUsize,
}

impl FakeBackend {
    pub(crate) fn with_players(players: Vec<Player>) -> Arc<Self> {
        Arc::new(Self {
            listing: Mutex::new(players),
            records: Mutex::new(HashMap::new()),
            gates: Mutex::new(HashMap::new()),
            fetch_started: Mutex::new(None),
            updates: Mutex::new(Vec::new()),
            update_reply: Mutex::new(None),
            listing_gate: Mutex::new(None),
            correction_unreachable: AtomicBool::new(false),
            fail_listing: AtomicBool::new(false),
            fail_fetch: AtomicBool::new(false),
            fail_update: AtomicBool::new(false),
            hang_fetch: AtomicBool::new(false),
            hang_update: AtomicBool::new(false),
            correction_calls: AtomicUsize::new(0),
            listing_calls: AtomicUsize::new(0),
        })
    }

    /// Holds `fetch_player(id)` until the returned sender fires.
    pub(crate) async fn gate(&self, id: PlayerId) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().await.insert(id, rx);
        tx
    }

    /// Holds the next `list_players` call, which answers with the listing as
    /// it was when the call started.
    pub(crate) async fn gate_listing(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.listing_gate.lock().await = Some(rx);
        tx
    }

    pub(crate) async fn notify_fetches(&self) -> mpsc::UnboundedReceiver<PlayerId> {
        let (tx, rx) = mpsc::unbounded_channel();
        *self.fetch_started.lock().await = Some(tx);
        rx
    }

    pub(crate) async fn update_count(&self) -> usize {
        self.updates.lock().await.len()
    }
}

#[async_trait]
impl PlayerBackend for FakeBackend {
    async fn correct_data(&self) -> Result<()> {
        self.correction_calls.fetch_add(1, Ordering::SeqCst);
        if self.correction_unreachable.load(Ordering::SeqCst) {
            return Err(anyhow!("failed to reach correction step: connection refused"));
        }
        Ok(())
    }

    async fn list_players(&self) -> Result<Vec<Player>> {
        let snapshot = self.listing.lock().await.clone();
        self.listing_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(anyhow!("connection reset while listing players"));
        }
        let gate = self.listing_gate.lock().await.take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        Ok(snapshot)
    }

    async fn fetch_player(&self, id: PlayerId) -> Result<Player> {
        if let Some(tx) = self.fetch_started.lock().await.as_ref() {
            let _ = tx.send(id);
        }
        if self.hang_fetch.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        let gate = self.gates.lock().await.remove(&id);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(anyhow!("player fetch returned 500"));
        }
        if let Some(record) = self.records.lock().await.get(&id) {
            return Ok(record.clone());
        }
        self.listing
            .lock()
            .await
            .iter()
            .find(|player| player.id == id)
            .cloned()
            .ok_or_else(|| anyhow!("player fetch returned 404"))
    }

    async fn update_player(
        &self,
        id: PlayerId,
        update: &PlayerDraft,
    ) -> Result<UpdateConfirmation> {
        if self.hang_update.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(anyhow!("player update returned 500: Error updating player data"));
        }
        self.updates.lock().await.push((id, update.clone()));
        Ok(match self.update_reply.lock().await.clone() {
            Some(player) => UpdateConfirmation::Player(player),
            None => UpdateConfirmation::Acknowledged(MessageResponse {
                message: "Player updated and ranks recalculated successfully".into(),
            }),
        })
    }
}

pub(crate) struct FakeGenerator {
    pub(crate) reply: Mutex<Result<String, String>>,
    pub(crate) requests: Mutex<Vec<PlayerDraft>>,
    pub(crate) hold: Mutex<Option<oneshot::Receiver<()>>>,
}

impl FakeGenerator {
    pub(crate) fn replying(description: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Mutex::new(Ok(description.to_string())),
            requests: Mutex::new(Vec::new()),
            hold: Mutex::new(None),
        })
    }

    pub(crate) fn failing(err: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Mutex::new(Err(err.to_string())),
            requests: Mutex::new(Vec::new()),
            hold: Mutex::new(None),
        })
    }

    /// Holds the next generation request until the returned sender fires.
    pub(crate) async fn hold_next(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.hold.lock().await = Some(rx);
        tx
    }
}

#[async_trait]
impl DescriptionGenerator for FakeGenerator {
    async fn generate_description(&self, draft: &PlayerDraft) -> Result<String> {
        self.requests.lock().await.push(draft.clone());
        let hold = self.hold.lock().await.take();
        if let Some(hold) = hold {
            let _ = hold.await;
        }
        self.reply.lock().await.clone().map_err(|err| anyhow!(err))
    }
}

pub(crate) async fn mounted_client(
    backend: &Arc<FakeBackend>,
    generator: &Arc<FakeGenerator>,
) -> Arc<RosterClient> {
    let client = RosterClient::new_with_dependencies(
        &settings(Duration::from_secs(5)),
        Arc::clone(backend) as Arc<dyn PlayerBackend>,
        Arc::clone(generator) as Arc<dyn DescriptionGenerator>,
    );
    client.mount().await.expect("initial sync");
    client
}
