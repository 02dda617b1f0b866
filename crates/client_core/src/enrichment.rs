use std::sync::Arc;

use shared::domain::PlayerDraft;
use tracing::info;

use crate::{error::ClientError, state::SessionContext};

/// A draft carrying a non-empty generated description. Persistence only
/// accepts this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedDraft {
    draft: PlayerDraft,
}

impl EnrichedDraft {
    pub fn new(draft: PlayerDraft, description: impl Into<String>) -> Option<Self> {
        let description = description.into();
        if description.trim().is_empty() {
            return None;
        }
        Some(Self {
            draft: draft.with_description(description),
        })
    }

    pub fn draft(&self) -> &PlayerDraft {
        &self.draft
    }

    pub fn description(&self) -> &str {
        self.draft
            .description
            .value()
            .map(String::as_str)
            .unwrap_or_default()
    }
}

#[derive(Clone)]
pub struct EnrichmentClient {
    ctx: Arc<SessionContext>,
}

impl EnrichmentClient {
    pub(crate) fn new(ctx: Arc<SessionContext>) -> Self {
        Self { ctx }
    }

    pub async fn enrich(&self, draft: &PlayerDraft) -> Option<String> {
        let name = draft
            .player_name
            .value()
            .map(String::as_str)
            .unwrap_or("unnamed player");
        info!("enrich: requesting description for {name}");

        let generated = self
            .ctx
            .bounded(
                "description service",
                self.ctx.generator.generate_description(draft),
            )
            .await;

        let failure = match generated {
            Ok(description) if !description.trim().is_empty() => {
                info!("enrich: received description chars={}", description.len());
                return Some(description);
            }
            Ok(_) => "description service returned an empty description".to_string(),
            Err(err) => format!("{err:#}"),
        };

        self.ctx.report(&ClientError::Enrichment(failure));
        None
    }
}
