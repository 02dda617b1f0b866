//! Plain-text rendering of roster state.

use client_core::{error::FailureKind, roster::RosterStore, ClientEvent};
use shared::domain::Player;

pub fn render_roster(roster: &RosterStore, selected: Option<&Player>) -> String {
    if roster.is_empty() {
        return "roster is empty".to_string();
    }

    let mut out = format!(
        "{:>2} {:>5} {:>4} {:<24} {:>4} {:>5} {:>4}\n",
        "", "id", "rank", "player", "year", "hits", "bats"
    );
    for player in roster.players() {
        let marker = if selected.is_some_and(|s| s.id == player.id) {
            ">"
        } else {
            ""
        };
        out.push_str(&format!(
            "{:>2} {:>5} {:>4} {:<24} {:>4} {:>5} {:>4}\n",
            marker, player.id.0, player.rank, player.player_name, player.year, player.hits, player.bats
        ));
    }
    if let Some(synced_at) = roster.synced_at() {
        out.push_str(&format!(
            "{} players, synced {}",
            roster.len(),
            synced_at.format("%H:%M:%S")
        ));
    }
    out
}

pub fn render_player(player: &Player) -> String {
    format!(
        "#{} {} (rank {})\n  age {}  hits {}  year {}  bats {}\n  {}",
        player.id.0,
        player.player_name,
        player.rank,
        player.age,
        player.hits,
        player.year,
        player.bats,
        player.description.as_deref().unwrap_or("(no description yet)")
    )
}

/// Line shown for observer events, or `None` for events the prompt already
/// reflects.
pub fn render_event(event: &ClientEvent) -> Option<String> {
    match event {
        ClientEvent::Failure { kind, message } => {
            let label = match kind {
                FailureKind::Fetch => "fetch",
                FailureKind::Enrichment => "enrichment",
                FailureKind::Persistence => "save",
                FailureKind::Edit => "edit",
                FailureKind::Session => "session",
            };
            Some(format!("! {label} error: {message}"))
        }
        ClientEvent::SavePhaseChanged(phase) => Some(format!("… {phase:?}")),
        ClientEvent::Saved { player_id } => Some(format!("saved player {}", player_id.0)),
        ClientEvent::RosterReplaced { .. }
        | ClientEvent::SelectionChanged(_)
        | ClientEvent::DraftChanged
        | ClientEvent::EditorOpened
        | ClientEvent::EditorClosed => None,
    }
}
