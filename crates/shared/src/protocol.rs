use serde::{Deserialize, Serialize};

use crate::domain::{Player, PlayerId};

pub const CORRECT_DATA_PATH: &str = "/fetch-and-correct-data";
pub const PLAYERS_PATH: &str = "/players";
pub const GENERATE_DESCRIPTION_PATH: &str = "/generate-description";

pub fn player_path(id: PlayerId) -> String {
    format!("/player/{}", id.0)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescriptionResponse {
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Body of a successful `PUT /player/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UpdateConfirmation {
    Player(Player),
    Acknowledged(MessageResponse),
}

impl UpdateConfirmation {
    pub fn player(&self) -> Option<&Player> {
        match self {
            UpdateConfirmation::Player(player) => Some(player),
            UpdateConfirmation::Acknowledged(_) => None,
        }
    }
}
