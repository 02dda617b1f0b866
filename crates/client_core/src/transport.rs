use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use shared::{
    domain::{Player, PlayerDraft, PlayerId},
    error::ApiError,
    protocol::{
        player_path, DescriptionResponse, UpdateConfirmation, CORRECT_DATA_PATH,
        GENERATE_DESCRIPTION_PATH, PLAYERS_PATH,
    },
};
use tracing::warn;
use url::Url;

#[async_trait]
pub trait PlayerBackend: Send + Sync {
    /// Runs the backend's data-correction step. Only an unreachable backend is
    /// an error; a non-success status still lets the listing proceed.
    async fn correct_data(&self) -> Result<()>;
    async fn list_players(&self) -> Result<Vec<Player>>;
    async fn fetch_player(&self, id: PlayerId) -> Result<Player>;
    async fn update_player(&self, id: PlayerId, update: &PlayerDraft)
        -> Result<UpdateConfirmation>;
}

#[async_trait]
pub trait DescriptionGenerator: Send + Sync {
    async fn generate_description(&self, draft: &PlayerDraft) -> Result<String>;
}

fn endpoint(base_url: &Url, path: &str) -> String {
    format!("{}{path}", base_url.as_str().trim_end_matches('/'))
}

async fn ensure_success(res: Response, what: &str) -> Result<Response> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let body = res.text().await.unwrap_or_default();
    let reason = serde_json::from_str::<ApiError>(&body)
        .ok()
        .and_then(|err| err.reason().map(str::to_owned))
        .unwrap_or(body);
    Err(anyhow!("{what} returned {status}: {reason}"))
}

pub struct HttpPlayerBackend {
    http: Client,
    base_url: Url,
}

impl HttpPlayerBackend {
    pub fn new(base_url: Url) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: Url) -> Self {
        Self { http, base_url }
    }
}

#[async_trait]
impl PlayerBackend for HttpPlayerBackend {
    async fn correct_data(&self) -> Result<()> {
        let url = endpoint(&self.base_url, CORRECT_DATA_PATH);
        let res = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("failed to reach {url}"))?;
        if let Err(err) = ensure_success(res, "data correction").await {
            warn!("sync: correction step failed, listing current data: {err:#}");
        }
        Ok(())
    }

    async fn list_players(&self) -> Result<Vec<Player>> {
        let url = endpoint(&self.base_url, PLAYERS_PATH);
        let res = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("failed to reach {url}"))?;
        let players = ensure_success(res, "player listing")
            .await?
            .json::<Vec<Player>>()
            .await
            .context("malformed player listing")?;
        Ok(players)
    }

    async fn fetch_player(&self, id: PlayerId) -> Result<Player> {
        let url = endpoint(&self.base_url, &player_path(id));
        let res = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("failed to reach {url}"))?;
        let player = ensure_success(res, "player fetch")
            .await?
            .json::<Player>()
            .await
            .with_context(|| format!("malformed player record for id {}", id.0))?;
        if player.id != id {
            return Err(anyhow!(
                "player fetch for id {} returned id {}",
                id.0,
                player.id.0
            ));
        }
        Ok(player)
    }

    async fn update_player(
        &self,
        id: PlayerId,
        update: &PlayerDraft,
    ) -> Result<UpdateConfirmation> {
        let url = endpoint(&self.base_url, &player_path(id));
        let res = self
            .http
            .put(&url)
            .json(update)
            .send()
            .await
            .with_context(|| format!("failed to reach {url}"))?;
        let confirmation = ensure_success(res, "player update")
            .await?
            .json::<UpdateConfirmation>()
            .await
            .context("malformed player update confirmation")?;
        Ok(confirmation)
    }
}

pub struct HttpDescriptionGenerator {
    http: Client,
    base_url: Url,
}

impl HttpDescriptionGenerator {
    pub fn new(base_url: Url) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: Url) -> Self {
        Self { http, base_url }
    }
}

#[async_trait]
impl DescriptionGenerator for HttpDescriptionGenerator {
    async fn generate_description(&self, draft: &PlayerDraft) -> Result<String> {
        let url = endpoint(&self.base_url, GENERATE_DESCRIPTION_PATH);
        let res = self
            .http
            .post(&url)
            .json(draft)
            .send()
            .await
            .with_context(|| format!("failed to reach {url}"))?;
        let body = ensure_success(res, "description service")
            .await?
            .json::<DescriptionResponse>()
            .await
            .context("malformed description response")?;
        Ok(body.description)
    }
}
