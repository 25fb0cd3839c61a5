use serde::{Deserialize, Serialize};

use crate::domain::color::TeamColor;

/// Hidden role assigned at game start. Exactly one player per team holds
/// [`Role::Mole`] for the lifetime of the game; defection moves the player,
/// never the role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    None,
    Mole,
}

/// One seat in a session. Humans and AI players share this record; the only
/// behavioral difference is the `ai` flag and who submits their ballots.
#[derive(Debug, Clone)]
pub struct Player {
    pub name: String,
    pub color: TeamColor,
    pub role: Role,
    /// AI-controlled seat (filled by the name pool, votes via an advisor).
    pub ai: bool,
    /// Left after the game started; still a member, no longer counted as active.
    pub away: bool,
    /// Voted off without defection; barred from further ballots.
    pub expelled: bool,
    pub resigning: bool,
    pub score: i32,
    /// Live move ballot for the current turn, cleared after resolution.
    pub ballot: Option<String>,
    /// Live accusation target (canonical player name). Never cleared mid-game.
    pub accusation: Option<String>,
}

impl Player {
    pub fn human(name: impl Into<String>, color: TeamColor) -> Self {
        Self::new(name, color, false)
    }

    pub fn ai(name: impl Into<String>, color: TeamColor) -> Self {
        Self::new(name, color, true)
    }

    fn new(name: impl Into<String>, color: TeamColor, ai: bool) -> Self {
        Self {
            name: name.into(),
            color,
            role: Role::None,
            ai,
            away: false,
            expelled: false,
            resigning: false,
            score: 0,
            ballot: None,
            accusation: None,
        }
    }

    /// Counted for quorum, forfeit detection, and awards.
    #[inline]
    pub fn is_active(&self) -> bool {
        !self.away && !self.expelled
    }

    /// Active and human: the voters whose unanimity drives consensus and
    /// resignation, so bot ballots cannot block an "all real players agree"
    /// decision.
    #[inline]
    pub fn is_interactive(&self) -> bool {
        self.is_active() && !self.ai
    }

    pub fn summary(&self) -> PlayerSummary {
        PlayerSummary {
            name: self.name.clone(),
            ai: self.ai,
            away: self.away,
            expelled: self.expelled,
            score: self.score,
        }
    }
}

/// Public view of a player for lobby listings and roster broadcasts.
/// Role is deliberately absent: the mole stays hidden.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub name: String,
    pub ai: bool,
    pub away: bool,
    pub expelled: bool,
    pub score: i32,
}
