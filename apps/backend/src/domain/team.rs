use serde::{Deserialize, Serialize};

use crate::domain::color::TeamColor;
use crate::domain::player::{Player, PlayerSummary, Role};

/// One of the two rosters. Membership is ordered and append-only outside of
/// pregame leaves and defection transfers.
#[derive(Debug, Clone)]
pub struct Team {
    pub color: TeamColor,
    pub players: Vec<Player>,
    /// Accusation consensus events spent against the configured vote limit.
    pub accusation_votes: u32,
}

impl Team {
    pub fn new(color: TeamColor) -> Self {
        Self {
            color,
            players: Vec::new(),
            accusation_votes: 0,
        }
    }

    pub fn find(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.name == name)
    }

    /// Case-insensitive lookup, used for accusation suspect names typed by
    /// players.
    pub fn find_ci(&self, name: &str) -> Option<&Player> {
        self.players
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn active_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_active()).count()
    }

    pub fn interactive_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_interactive()).count()
    }

    pub fn mole(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.role == Role::Mole)
    }

    pub fn mole_mut(&mut self) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.role == Role::Mole)
    }

    /// Count of live move ballots, regardless of submitter activity.
    pub fn ballot_count(&self) -> usize {
        self.players.iter().filter(|p| p.ballot.is_some()).count()
    }

    pub fn clear_ballots(&mut self) {
        for player in &mut self.players {
            player.ballot = None;
        }
    }

    /// Every interactive player has flagged resignation (and at least one
    /// exists).
    pub fn is_resigning(&self) -> bool {
        let mut any = false;
        for p in self.players.iter().filter(|p| p.is_interactive()) {
            if !p.resigning {
                return false;
            }
            any = true;
        }
        any
    }

    pub fn summary(&self) -> TeamSummary {
        TeamSummary {
            color: self.color,
            votes: self.accusation_votes,
            players: self.players.iter().map(Player::summary).collect(),
        }
    }
}

/// Public roster view for lobby listings and roster broadcasts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSummary {
    pub color: TeamColor,
    pub votes: u32,
    pub players: Vec<PlayerSummary>,
}
