use chrono::{DateTime, Utc};
use shared::domain::{Player, PlayerId};

/// Orders players by year, then hits, both descending. `sort_by` is stable,
/// so exact ties keep the backend's order.
pub fn sort_roster(players: &mut [Player]) {
    players.sort_by(|a, b| b.year.cmp(&a.year).then_with(|| b.hits.cmp(&a.hits)));
}

/// Canonical sorted roster. Only ever replaced wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterStore {
    players: Vec<Player>,
    revision: u64,
    synced_at: Option<DateTime<Utc>>,
}

impl RosterStore {
    pub(crate) fn replace(&mut self, mut players: Vec<Player>) {
        sort_roster(&mut players);
        self.players = players;
        self.revision += 1;
        self.synced_at = Some(Utc::now());
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|player| player.id == id)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Number of successful replacements since mount.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn synced_at(&self) -> Option<DateTime<Utc>> {
        self.synced_at
    }
}

#[cfg(test)]
#[path = "tests/roster_tests.rs"]
mod tests;
